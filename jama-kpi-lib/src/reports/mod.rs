//! Report generation for KPI runs
//!
//! Each generator turns one product of a [`KpiRun`] into one output format:
//! - **Console**: aligned KPI table with optional ANSI colors
//! - **CSV**: KPI table, defect projection, and flattened raw/filtered records
//! - **JSON**: raw/filtered records, enrichment rows, and the test-run projection
//! - **Excel**: one workbook with the KPI, defect, and test-run sheets
//!
//! [`write_all`] writes every file product of a run into an output directory under fixed names.

mod common;
mod console;
mod csv;
mod excel;
mod json;

pub use console::{count_line, generate as generate_console};
pub use self::csv::{generate_defects as generate_defects_csv, generate_kpis as generate_kpis_csv, generate_records as generate_records_csv};
pub use excel::generate as generate_xlsx;
pub use json::{
    generate_enriched as generate_enriched_json, generate_records as generate_records_json, generate_testruns as generate_testruns_json,
};

use crate::Result;
use crate::pipeline::KpiRun;
use crate::records::Record;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{EnrichableExt, IntoAppError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};

const LOG_TARGET: &str = "   reports";

pub const RAW_TESTRUN_DATA: &str = "raw_testrun_data";
pub const RAW_DEFECT_DATA: &str = "raw_defect_data";
pub const FILTERED_TESTRUN_DATA: &str = "filtered_testrun_data";
pub const FILTERED_DEFECT_DATA: &str = "filtered_defect_data";
pub const ENRICHED_DATA_JSON: &str = "enriched_data.json";
pub const KP_DATA_CSV: &str = "kp_data.csv";
pub const DEFECT_DATA_CSV: &str = "defect_data.csv";
pub const TESTRUN_DATA_JSON: &str = "testrun_data.json";
pub const KP_DATA_XLSX: &str = "kp_data.xlsx";

/// Write every file report of `run` into `output_dir`, creating the directory if needed.
///
/// Returns the paths written, in the order they were written.
///
/// # Errors
///
/// Returns an error naming the offending path if any file cannot be written.
pub fn write_all(run: &KpiRun, output_dir: &Utf8Path, include_excel: bool) -> Result<Vec<Utf8PathBuf>> {
    fs::create_dir_all(output_dir).into_app_err_with(|| format!("creating output directory '{output_dir}'"))?;

    let mut written = Vec::new();

    write_record_set(output_dir, RAW_TESTRUN_DATA, &run.raw_testruns, &mut written)?;
    write_record_set(output_dir, RAW_DEFECT_DATA, &run.raw_defects, &mut written)?;
    write_record_set(output_dir, FILTERED_TESTRUN_DATA, &run.filtered_testruns, &mut written)?;
    write_record_set(output_dir, FILTERED_DEFECT_DATA, &run.filtered_defects, &mut written)?;

    let mut enriched = String::new();
    generate_enriched_json(&run.testrun_rows, &run.defect_rows, &mut enriched)?;
    written.push(write_text(output_dir, ENRICHED_DATA_JSON, &enriched)?);

    written.push(write_binary(output_dir, KP_DATA_CSV, |w| generate_kpis_csv(&run.kpis, w))?);
    written.push(write_binary(output_dir, DEFECT_DATA_CSV, |w| generate_defects_csv(&run.defect_projections, w))?);

    let mut testruns = String::new();
    generate_testruns_json(&run.testrun_projections, &mut testruns)?;
    written.push(write_text(output_dir, TESTRUN_DATA_JSON, &testruns)?);

    if include_excel {
        written.push(write_binary(output_dir, KP_DATA_XLSX, |w| {
            generate_xlsx(&run.kpis, &run.defect_projections, &run.testrun_projections, w)
        })?);
    }

    log::info!(target: LOG_TARGET, "Wrote {} report file(s) to '{output_dir}'", written.len());
    Ok(written)
}

fn write_record_set(output_dir: &Utf8Path, stem: &str, records: &[Record], written: &mut Vec<Utf8PathBuf>) -> Result<()> {
    let mut json = String::new();
    generate_records_json(records, &mut json)?;
    written.push(write_text(output_dir, &format!("{stem}.json"), &json)?);

    written.push(write_binary(output_dir, &format!("{stem}.csv"), |w| generate_records_csv(records, w))?);
    Ok(())
}

fn write_text(output_dir: &Utf8Path, name: &str, contents: &str) -> Result<Utf8PathBuf> {
    let path = output_dir.join(name);
    fs::write(&path, contents).into_app_err_with(|| format!("writing '{path}'"))?;
    log::debug!(target: LOG_TARGET, "Wrote '{path}'");
    Ok(path)
}

fn write_binary(output_dir: &Utf8Path, name: &str, generate: impl FnOnce(&mut BufWriter<File>) -> Result<()>) -> Result<Utf8PathBuf> {
    let path = output_dir.join(name);
    let file = File::create(&path).into_app_err_with(|| format!("creating '{path}'"))?;

    let mut writer = BufWriter::new(file);
    generate(&mut writer).map_err(|e| e.enrich_with(|| format!("writing '{path}'")))?;
    writer.flush().into_app_err_with(|| format!("writing '{path}'"))?;

    log::debug!(target: LOG_TARGET, "Wrote '{path}'");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::aggregate;
    use crate::records::TestRunRow;
    use crate::users::{UserDirectory, UserName};
    use serde_json::json;

    fn sample_run() -> KpiRun {
        let testrun = Record::new(json!({"id": 1, "fields": {"documentKey": "SYS-1", "assignedTo": 10}}));
        let testrun_rows = vec![TestRunRow {
            document_key: Some("SYS-1".into()),
            user: UserName::Resolved("Alice".into()),
            execution_date: Some("2024-01-01".into()),
        }];
        let kpis = aggregate(&testrun_rows, &[]);

        KpiRun {
            raw_testruns: vec![testrun.clone()],
            raw_defects: Vec::new(),
            filtered_testruns: vec![testrun],
            filtered_defects: Vec::new(),
            directory: UserDirectory::new(),
            testrun_rows,
            defect_rows: Vec::new(),
            kpis,
            testrun_projections: Vec::new(),
            defect_projections: Vec::new(),
        }
    }

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_write_all() {
        let (_dir, path) = temp_dir();

        let written = write_all(&sample_run(), &path, true).unwrap();

        let names: Vec<_> = written.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(
            names,
            [
                "raw_testrun_data.json",
                "raw_testrun_data.csv",
                "raw_defect_data.json",
                "raw_defect_data.csv",
                "filtered_testrun_data.json",
                "filtered_testrun_data.csv",
                "filtered_defect_data.json",
                "filtered_defect_data.csv",
                "enriched_data.json",
                "kp_data.csv",
                "defect_data.csv",
                "testrun_data.json",
                "kp_data.xlsx",
            ]
        );
        assert!(written.iter().all(|p| p.exists()));

        let kp = fs::read_to_string(path.join(KP_DATA_CSV)).unwrap();
        assert!(kp.ends_with("Alice,1,0,1,1.00,0.00\n"));
    }

    #[test]
    fn test_write_all_without_excel() {
        let (_dir, path) = temp_dir();

        let written = write_all(&sample_run(), &path, false).unwrap();

        assert_eq!(written.len(), 12);
        assert!(!path.join(KP_DATA_XLSX).exists());
    }

    #[test]
    fn test_write_all_creates_output_dir() {
        let (_dir, path) = temp_dir();
        let nested = path.join("out").join("run");

        let _ = write_all(&sample_run(), &nested, false).unwrap();

        assert!(nested.join(KP_DATA_CSV).exists());
    }
}
