use super::UserKpi;
use crate::records::{DefectRow, TestRunRow};
use crate::users::UserName;
use std::collections::{HashMap, HashSet};

/// Per-user KPIs in the order users were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiTable {
    entries: Vec<(UserName, UserKpi)>,
}

impl KpiTable {
    #[must_use]
    pub fn get(&self, user: &UserName) -> Option<&UserKpi> {
        self.entries.iter().find(|(name, _)| name == user).map(|(_, kpi)| kpi)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserName, &UserKpi)> {
        self.entries.iter().map(|(name, kpi)| (name, kpi))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
struct Accumulator<'a> {
    testrun_count: u64,
    defect_count: u64,
    days: HashSet<&'a str>,
}

/// Group enriched rows by user and compute each user's KPIs.
///
/// Test-run rows only ever count as test runs and defect rows only ever count as defects. Rows
/// with no resolvable user are pooled under [`UserName::Unresolved`].
#[must_use]
pub fn aggregate(testrun_rows: &[TestRunRow], defect_rows: &[DefectRow]) -> KpiTable {
    let mut order: Vec<&UserName> = Vec::new();
    let mut accumulators: HashMap<&UserName, Accumulator<'_>> = HashMap::new();

    for row in testrun_rows {
        let acc = accumulator_for(&mut accumulators, &mut order, &row.user);
        acc.testrun_count += 1;
        if let Some(date) = row.execution_date.as_deref() {
            let _ = acc.days.insert(date);
        }
    }

    for row in defect_rows {
        accumulator_for(&mut accumulators, &mut order, &row.user).defect_count += 1;
    }

    let entries = order
        .into_iter()
        .filter_map(|user| {
            accumulators.get(user).map(|acc| {
                let kpi = UserKpi::from_counts(acc.testrun_count, acc.defect_count, acc.days.len() as u64);
                (user.clone(), kpi)
            })
        })
        .collect();

    KpiTable { entries }
}

fn accumulator_for<'m, 'a>(
    accumulators: &'m mut HashMap<&'a UserName, Accumulator<'a>>,
    order: &mut Vec<&'a UserName>,
    user: &'a UserName,
) -> &'m mut Accumulator<'a> {
    accumulators.entry(user).or_insert_with(|| {
        order.push(user);
        Accumulator::default()
    })
}
