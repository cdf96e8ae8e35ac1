//! Command dispatch logic for jama-kpi

use super::{InitArgs, ReportArgs, ValidateArgs, generate_report, init_config, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "jama-kpi", author, version, long_about = None)]
#[command(about = "Compute per-user test execution KPIs from Jama Connect filters")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: KpiSubcommand,
}

#[derive(Subcommand, Debug)]
enum KpiSubcommand {
    /// Fetch test runs and defects, compute the KPIs, and write the reports
    Report(Box<ReportArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        KpiSubcommand::Report(report_args) => generate_report(host, report_args).await,
        KpiSubcommand::Init(init_args) => init_config(host, init_args),
        KpiSubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}
