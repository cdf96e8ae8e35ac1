use super::common::{self, DEFECT_HEADERS, KpiColumn, RecordTable};
use crate::Result;
use crate::kpi::KpiTable;
use crate::records::{DefectProjection, Record};
use ::csv::Writer;
use std::io::Write;
use strum::IntoEnumIterator;

/// Write the KPI table, one row per user.
pub fn generate_kpis<W: Write>(kpis: &KpiTable, writer: W) -> Result<()> {
    let mut csv = Writer::from_writer(writer);

    csv.write_record(KpiColumn::iter().map(|c| c.to_string()))?;
    for (user, kpi) in kpis.iter() {
        csv.write_record(KpiColumn::iter().map(|c| c.cell(user, kpi)))?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the defect projection table.
pub fn generate_defects<W: Write>(defects: &[DefectProjection], writer: W) -> Result<()> {
    let mut csv = Writer::from_writer(writer);

    csv.write_record(DEFECT_HEADERS)?;
    for defect in defects {
        csv.write_record(common::defect_cells(defect).map(Option::unwrap_or_default))?;
    }

    csv.flush()?;
    Ok(())
}

/// Write raw records, one row per record and one column per top-level key.
pub fn generate_records<W: Write>(records: &[Record], writer: W) -> Result<()> {
    let table = RecordTable::from_records(records);
    let mut csv = Writer::from_writer(writer);

    if !table.columns.is_empty() {
        csv.write_record(&table.columns)?;
        for row in &table.rows {
            csv.write_record(row)?;
        }
    }

    csv.flush()?;
    Ok(())
}
