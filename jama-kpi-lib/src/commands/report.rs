use super::common::{ColorMode, LogLevel, init_logging};
use super::config::Config;
use super::{Host, ProgressReporter};
use crate::Result;
use crate::pipeline::{self, KpiRun, PipelineConfig};
use crate::progress::{NoProgress, Progress};
use crate::reports::{self, count_line, generate_console};
use crate::upstream::Credentials;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use core::time::Duration;
use ohno::IntoAppError;
use std::io::{IsTerminal, Write};

const LOG_TARGET: &str = "    report";

/// How long user resolution has to run before the progress bar appears.
const PROGRESS_DELAY: Duration = Duration::from_millis(300);

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path to configuration file (default is `kpi.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// OAuth client id
    #[arg(long, value_name = "ID", env = "JAMA_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, value_name = "SECRET", env = "JAMA_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Base URL of the Jama Connect instance, overriding the configuration file
    #[arg(long, value_name = "URL", help_heading = "Overrides")]
    pub host_domain: Option<String>,

    /// Saved filter returning the test runs, overriding the configuration file
    #[arg(long, value_name = "ID", help_heading = "Overrides")]
    pub testrun_filter: Option<u32>,

    /// Saved filter returning the defects, overriding the configuration file
    #[arg(long, value_name = "ID", help_heading = "Overrides")]
    pub defect_filter: Option<u32>,

    /// Document-key prefix of items to leave out, overriding the configuration file
    #[arg(long, value_name = "PREFIX", help_heading = "Overrides")]
    pub excluded_prefix: Option<String>,

    /// Directory the report files are written to
    #[arg(long, short = 'o', value_name = "PATH", default_value = ".", help_heading = "Report Output")]
    pub output_dir: Utf8PathBuf,

    /// Don't print the KPI summary table
    #[arg(long, help_heading = "Report Output")]
    pub no_console: bool,

    /// Don't write the Excel workbook
    #[arg(long, help_heading = "Report Output")]
    pub no_excel: bool,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: LogLevel,
}

impl ReportArgs {
    /// Load the configuration file and apply the command-line overrides on top of it.
    fn effective_config(&self) -> Result<Config> {
        let (mut config, source) = Config::load_unvalidated(Utf8Path::new("."), self.config.as_deref())?;

        match &source {
            Some(path) => log::info!(target: LOG_TARGET, "Using configuration file '{path}'"),
            None => log::info!(target: LOG_TARGET, "No configuration file found, using defaults"),
        }

        if let Some(host) = &self.host_domain {
            config.host_domain.clone_from(host);
        }
        if let Some(id) = self.testrun_filter {
            config.testrun_filter_id = id;
        }
        if let Some(id) = self.defect_filter {
            config.defect_filter_id = id;
        }
        if let Some(prefix) = &self.excluded_prefix {
            config.excluded_prefix.clone_from(prefix);
        }

        config.validate()?;
        Ok(config)
    }

    fn credentials(&self) -> Result<Credentials> {
        let client_id = self
            .client_id
            .clone()
            .into_app_err("no client id given; pass --client-id or set JAMA_CLIENT_ID")?;
        let client_secret = self
            .client_secret
            .clone()
            .into_app_err("no client secret given; pass --client-secret or set JAMA_CLIENT_SECRET")?;

        Ok(Credentials { client_id, client_secret })
    }

    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let config = self.effective_config()?;
        let credentials = self.credentials()?;

        Ok(PipelineConfig {
            host_domain: config.host_url()?,
            credentials,
            testrun_filter_id: config.testrun_filter_id,
            defect_filter_id: config.defect_filter_id,
            excluded_prefix: config.excluded_prefix,
            defect_build_field: config.defect_build_field,
            defect_found_date_field: config.defect_found_date_field,
            page_size: config.page_size,
        })
    }

    /// The progress bar stays hidden when stderr is not a terminal or verbose logging would interleave with it.
    fn show_progress(&self) -> bool {
        std::io::stderr().is_terminal() && matches!(self.log_level, LogLevel::None | LogLevel::Error | LogLevel::Warn)
    }
}

/// Compute the KPIs and write every report.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, credentials are missing, either filter
/// cannot be fetched, or a report file cannot be written.
pub async fn generate_report<H: Host>(host: &mut H, args: &ReportArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = args.pipeline_config()?;
    log::debug!(target: LOG_TARGET, "Effective configuration: {config:?}");

    let reporter = args
        .show_progress()
        .then(|| ProgressReporter::new(PROGRESS_DELAY, args.color.for_stderr()));
    let progress: &dyn Progress = match &reporter {
        Some(reporter) => reporter,
        None => &NoProgress,
    };

    let result = pipeline::run(&config, progress).await;
    progress.done();

    let run = match result {
        Ok(run) => run,
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Report failed: {e:#}");
            host.exit(1);
            return Err(e);
        }
    };

    report(host, &run, args)
}

fn report<H: Host>(host: &mut H, run: &KpiRun, args: &ReportArgs) -> Result<()> {
    let _ = writeln!(host.output(), "{}", count_line("Test runs", run.raw_testruns.len(), run.filtered_testruns.len()));
    let _ = writeln!(host.output(), "{}", count_line("Defects", run.raw_defects.len(), run.filtered_defects.len()));
    let _ = writeln!(host.output(), "Resolved {} user(s)", run.directory.len());

    let written = reports::write_all(run, &args.output_dir, !args.no_excel)?;
    let _ = writeln!(host.output(), "Wrote {} file(s) to {}", written.len(), args.output_dir);

    if !args.no_console {
        let mut console_output = String::new();
        generate_console(&run.kpis, args.color.for_stdout(), &mut console_output)?;
        let _ = writeln!(host.output());
        let _ = write!(host.output(), "{console_output}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: ReportArgs,
    }

    fn parse(args: &[&str]) -> ReportArgs {
        TestCli::parse_from(std::iter::once("jama-kpi").chain(args.iter().copied())).args
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.output_dir, Utf8PathBuf::from("."));
        assert_eq!(args.log_level, LogLevel::Warn);
        assert_eq!(args.color, ColorMode::Auto);
        assert!(!args.no_console);
        assert!(!args.no_excel);
    }

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("kpi.toml")).unwrap();
        std::fs::write(&path, "testrun_filter_id = 1\ndefect_filter_id = 2\n").unwrap();

        let args = parse(&[
            "--config",
            path.as_str(),
            "--defect-filter",
            "99",
            "--excluded-prefix",
            "TMP",
            "--host-domain",
            "https://acme.jamacloud.com",
        ]);
        let config = args.effective_config().unwrap();

        assert_eq!(config.testrun_filter_id, 1);
        assert_eq!(config.defect_filter_id, 99);
        assert_eq!(config.excluded_prefix, "TMP");
        assert_eq!(config.host_domain, "https://acme.jamacloud.com");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("kpi.toml")).unwrap();
        std::fs::write(&path, "").unwrap();

        let args = parse(&["--config", path.as_str(), "--excluded-prefix", ""]);
        assert!(args.effective_config().is_err());
    }

    #[test]
    fn test_override_repairs_invalid_file_value() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("kpi.toml")).unwrap();
        std::fs::write(&path, "excluded_prefix = \"\"\ntestrun_filter_id = 0\n").unwrap();

        let args = parse(&["--config", path.as_str(), "--excluded-prefix", "LCE", "--testrun-filter", "5"]);
        let config = args.effective_config().unwrap();

        assert_eq!(config.excluded_prefix, "LCE");
        assert_eq!(config.testrun_filter_id, 5);
    }

    #[test]
    fn test_invalid_file_value_without_override_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("kpi.toml")).unwrap();
        std::fs::write(&path, "excluded_prefix = \"\"\n").unwrap();

        let args = parse(&["--config", path.as_str()]);
        assert!(args.effective_config().is_err());
    }

    #[test]
    fn test_credentials_from_flags() {
        let args = parse(&["--client-id", "id", "--client-secret", "secret"]);
        let credentials = args.credentials().unwrap();
        assert_eq!(credentials.client_id, "id");
        assert_eq!(credentials.client_secret, "secret");
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let mut args = parse(&[]);
        args.client_id = Some("id".into());
        args.client_secret = None;
        assert!(args.credentials().is_err());
    }
}
