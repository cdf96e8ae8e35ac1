//! Command-line interface and orchestration for jama-kpi
//!
//! This module parses the command line, loads configuration, and drives the KPI pipeline
//! end to end.
//!
//! ## Commands
//!
//! - **report**: Fetch both filters, compute the KPIs, write every report file, and print a
//!   summary table
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file's syntax and values
//!
//! Configuration comes from a TOML file (`kpi.toml` by default) with command-line overrides
//! layered on top. OAuth credentials only ever come from the command line or the environment.

mod common;
mod config;
mod host;
mod init;
mod progress_reporter;
mod report;
mod run;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use common::{ColorMode, LogLevel};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use report::{ReportArgs, generate_report};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
