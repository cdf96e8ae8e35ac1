#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for jama-kpi
//!
//! This library holds all functionality of the jama-kpi tool, which computes per-user test
//! execution KPIs from saved Jama Connect filters.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`upstream`]: Jama REST client and the traits the pipeline consumes
//! - [`records`]: Schema-free records, key search, filtering, and field extraction
//! - [`users`]: User references and their resolution to display names
//! - [`kpi`]: Per-user KPI aggregation
//! - [`pipeline`]: The end-to-end run
//! - [`reports`]: Report generation in multiple formats

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod kpi;
pub mod pipeline;
pub mod progress;
pub mod records;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub mod upstream;
pub mod users;

pub use crate::commands::{Host, run};
