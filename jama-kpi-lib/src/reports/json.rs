use crate::Result;
use crate::records::{DefectRow, Record, TestRunProjection, TestRunRow};
use core::fmt::Write;
use serde::Serialize;

/// Write records exactly as the upstream service returned them.
pub fn generate_records<W: Write>(records: &[Record], writer: &mut W) -> Result<()> {
    write_pretty(&records, writer)
}

/// Write the enrichment rows that fed the KPI computation.
pub fn generate_enriched<W: Write>(testruns: &[TestRunRow], defects: &[DefectRow], writer: &mut W) -> Result<()> {
    #[derive(Serialize)]
    struct Enriched<'a> {
        testruns: &'a [TestRunRow],
        defects: &'a [DefectRow],
    }

    write_pretty(&Enriched { testruns, defects }, writer)
}

/// Write the test-run projection as an array of objects.
pub fn generate_testruns<W: Write>(testruns: &[TestRunProjection], writer: &mut W) -> Result<()> {
    write_pretty(&testruns, writer)
}

fn write_pretty<T: Serialize + ?Sized, W: Write>(value: &T, writer: &mut W) -> Result<()> {
    write!(writer, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
