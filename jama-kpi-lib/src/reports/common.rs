//! Common utilities shared across report generators.

use crate::kpi::UserKpi;
use crate::records::{DefectProjection, Record, TestRunProjection};
use crate::users::UserName;
use serde_json::Value;
use strum::{Display, EnumIter};

/// Columns of the KPI table, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum KpiColumn {
    #[strum(serialize = "User")]
    User,
    #[strum(serialize = "Testrun_count")]
    TestrunCount,
    #[strum(serialize = "Defect_count")]
    DefectCount,
    #[strum(serialize = "Days")]
    Days,
    #[strum(serialize = "Test case Productivity")]
    Productivity,
    #[strum(serialize = "Defect Observation Rate")]
    DefectRate,
}

impl KpiColumn {
    /// Render this column's cell for one user. Unresolved users render as an empty cell.
    pub fn cell(self, user: &UserName, kpi: &UserKpi) -> String {
        match self {
            Self::User => user.as_deref().unwrap_or_default().to_string(),
            Self::TestrunCount => kpi.testrun_count.to_string(),
            Self::DefectCount => kpi.defect_count.to_string(),
            Self::Days => kpi.distinct_days.to_string(),
            Self::Productivity => format_ratio(kpi.productivity),
            Self::DefectRate => format_ratio(kpi.defect_rate),
        }
    }
}

/// Format a KPI ratio with two decimals.
pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}

pub const TESTRUN_HEADERS: [&str; 5] = ["TestRunStatus", "ExecutionDate", "Document Key", "Name", "Assigned To"];
pub const DEFECT_HEADERS: [&str; 5] = ["Document Key", "Name", "Created By", "Found in Build", "Found On Date"];

pub fn testrun_cells(projection: &TestRunProjection) -> [Option<&str>; 5] {
    [
        projection.test_run_status.as_deref(),
        projection.execution_date.as_deref(),
        projection.document_key.as_deref(),
        projection.name.as_deref(),
        projection.assigned_to.as_deref(),
    ]
}

pub fn defect_cells(projection: &DefectProjection) -> [Option<&str>; 5] {
    [
        projection.document_key.as_deref(),
        projection.name.as_deref(),
        projection.created_by.as_deref(),
        projection.found_in_build.as_deref(),
        projection.found_on_date.as_deref(),
    ]
}

/// Records flattened into a rectangular table.
///
/// The columns are the union of every record's top-level keys, in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    pub fn from_records(records: &[Record]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for (key, _) in record.top_level() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.to_string());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| {
                        record
                            .top_level()
                            .find(|(key, _)| *key == column.as_str())
                            .map(|(_, value)| format_cell(value))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }
}

/// Render a JSON value as a single table cell.
///
/// Strings are written as-is, null becomes an empty cell, and nested values are written as
/// compact JSON.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kpi_headers() {
        let headers: Vec<_> = KpiColumn::iter().map(|c| c.to_string()).collect();
        assert_eq!(
            headers,
            ["User", "Testrun_count", "Defect_count", "Days", "Test case Productivity", "Defect Observation Rate"]
        );
    }

    #[test]
    fn test_kpi_cells() {
        let kpi = UserKpi::from_counts(3, 1, 2);
        let user = UserName::Resolved("Alice".into());
        let cells: Vec<_> = KpiColumn::iter().map(|c| c.cell(&user, &kpi)).collect();
        assert_eq!(cells, ["Alice", "3", "1", "2", "1.50", "0.33"]);
    }

    #[test]
    fn test_unresolved_user_cell_is_empty() {
        let kpi = UserKpi::from_counts(1, 0, 1);
        assert_eq!(KpiColumn::User.cell(&UserName::Unresolved, &kpi), "");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(2.0), "2.00");
        assert_eq!(format_ratio(0.33), "0.33");
        assert_eq!(format_ratio(0.0), "0.00");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&json!(null)), "");
        assert_eq!(format_cell(&json!("SYS-1")), "SYS-1");
        assert_eq!(format_cell(&json!(42)), "42");
        assert_eq!(format_cell(&json!(true)), "true");
        assert_eq!(format_cell(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(format_cell(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_record_table_union_of_keys() {
        let records = [
            Record::new(json!({"id": 1, "fields": {"documentKey": "SYS-1"}})),
            Record::new(json!({"id": 2, "type": 35})),
        ];

        let table = RecordTable::from_records(&records);

        assert_eq!(table.columns, ["id", "fields", "type"]);
        assert_eq!(table.rows[0], ["1", r#"{"documentKey":"SYS-1"}"#, ""]);
        assert_eq!(table.rows[1], ["2", "", "35"]);
    }

    #[test]
    fn test_record_table_non_mapping_record() {
        let records = [Record::new(json!({"id": 1})), Record::new(json!("stray"))];
        let table = RecordTable::from_records(&records);
        assert_eq!(table.columns, ["id"]);
        assert_eq!(table.rows[1], [""]);
    }

    #[test]
    fn test_record_table_empty() {
        let table = RecordTable::from_records(&[]);
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
    }
}
