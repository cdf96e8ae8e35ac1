//! End-to-end KPI computation for one run.
//!
//! fetch → exclude by prefix → resolve users → extract rows → aggregate

use crate::Result;
use crate::kpi::{KpiTable, aggregate};
use crate::progress::Progress;
use crate::records::{
    DOCUMENT_KEY, DefectFields, DefectProjection, DefectRow, Record, TestRunProjection, TestRunRow, defect_projection, defect_row,
    exclude_by_prefix, testrun_projection, testrun_row,
};
use crate::upstream::{Client, Credentials, FilterSource, UserLookup};
use crate::users::{USER_ID_FIELDS, UserDirectory, resolve};
use ohno::EnrichableExt;
use url::Url;

const LOG_TARGET: &str = "  pipeline";

/// Everything a run needs to know, gathered up front.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub host_domain: Url,

    /// OAuth client id and secret.
    pub credentials: Credentials,
    pub testrun_filter_id: u32,
    pub defect_filter_id: u32,
    pub excluded_prefix: String,
    pub defect_build_field: String,
    pub defect_found_date_field: String,
    pub page_size: u32,
}

impl PipelineConfig {
    fn defect_fields(&self) -> DefectFields<'_> {
        DefectFields {
            found_in_build: &self.defect_build_field,
            found_on_date: &self.defect_found_date_field,
        }
    }
}

/// The products of one run, handed to the report generators.
#[derive(Debug, Clone)]
pub struct KpiRun {
    pub raw_testruns: Vec<Record>,
    pub raw_defects: Vec<Record>,
    pub filtered_testruns: Vec<Record>,
    pub filtered_defects: Vec<Record>,
    pub directory: UserDirectory,
    pub testrun_rows: Vec<TestRunRow>,
    pub defect_rows: Vec<DefectRow>,
    pub kpis: KpiTable,
    pub testrun_projections: Vec<TestRunProjection>,
    pub defect_projections: Vec<DefectProjection>,
}

/// Connect to the configured Jama instance and compute the KPIs.
///
/// # Errors
///
/// Fails if authentication or either filter fetch fails. User lookup failures are logged and
/// leave the affected users unresolved.
pub async fn run(config: &PipelineConfig, progress: &dyn Progress) -> Result<KpiRun> {
    progress.set_phase("Connecting");
    let client = Client::connect(&config.host_domain, &config.credentials, config.page_size).await?;
    run_with(&client, config, progress).await
}

/// Compute the KPIs against any upstream source.
///
/// # Errors
///
/// Fails if either filter fetch fails.
pub async fn run_with<S>(source: &S, config: &PipelineConfig, progress: &dyn Progress) -> Result<KpiRun>
where
    S: FilterSource + UserLookup,
{
    progress.set_phase("Fetching");

    let raw_testruns = source
        .get_filter_results(config.testrun_filter_id)
        .await
        .map_err(|e| e.enrich_with(|| format!("fetching test runs from filter {}", config.testrun_filter_id)))?;
    log::info!(target: LOG_TARGET, "Fetched {} test run items", raw_testruns.len());

    let raw_defects = source
        .get_filter_results(config.defect_filter_id)
        .await
        .map_err(|e| e.enrich_with(|| format!("fetching defects from filter {}", config.defect_filter_id)))?;
    log::info!(target: LOG_TARGET, "Fetched {} defect items", raw_defects.len());

    let filtered_testruns = exclude_by_prefix(&raw_testruns, DOCUMENT_KEY, &config.excluded_prefix);
    let filtered_defects = exclude_by_prefix(&raw_defects, DOCUMENT_KEY, &config.excluded_prefix);
    log::info!(
        target: LOG_TARGET,
        "Kept {} test run(s) and {} defect(s) after excluding '{}' document keys",
        filtered_testruns.len(),
        filtered_defects.len(),
        config.excluded_prefix
    );

    let directory = resolve(filtered_testruns.iter().chain(&filtered_defects), USER_ID_FIELDS, source, progress).await;

    let testrun_rows: Vec<_> = filtered_testruns.iter().map(|r| testrun_row(r, &directory)).collect();
    let defect_rows: Vec<_> = filtered_defects.iter().map(|r| defect_row(r, &directory)).collect();
    let kpis = aggregate(&testrun_rows, &defect_rows);

    let testrun_projections = filtered_testruns.iter().map(|r| testrun_projection(r, &directory)).collect();
    let defect_projections = filtered_defects
        .iter()
        .map(|r| defect_projection(r, &directory, config.defect_fields()))
        .collect();

    Ok(KpiRun {
        raw_testruns,
        raw_defects,
        filtered_testruns,
        filtered_defects,
        directory,
        testrun_rows,
        defect_rows,
        kpis,
        testrun_projections,
        defect_projections,
    })
}
