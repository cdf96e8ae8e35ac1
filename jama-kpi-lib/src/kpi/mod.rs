//! Per-user productivity and quality metrics.
//!
//! [`aggregate`] takes the test-run rows and the defect rows as two separate inputs, so a row's
//! kind is known from the sequence it arrived in and never reconstructed from its contents.

mod aggregator;
mod user_kpi;

pub use aggregator::{KpiTable, aggregate};
pub use user_kpi::UserKpi;
