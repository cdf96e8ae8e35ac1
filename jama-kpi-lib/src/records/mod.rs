//! Schema-less upstream records and the operations that pull data out of them.
//!
//! # Implementation Model
//!
//! A [`Record`] wraps the deserialized payload of one Jama item. Fields are located with a
//! depth-first key search over a typed [`Node`] view rather than through a fixed schema, which
//! keeps the tool working across item types and across instances with different field layouts.
//!
//! - [`exclude_by_prefix`] removes records belonging to an excluded document series.
//! - The `extract` functions turn filtered records into the enrichment rows consumed by
//!   aggregation, and into the flat projections written to reports.

mod extract;
mod filter;
mod record;

pub use extract::{
    DOCUMENT_KEY, DefectFields, DefectProjection, DefectRow, TestRunProjection, TestRunRow, defect_projection, defect_row,
    testrun_projection, testrun_row,
};
pub use filter::exclude_by_prefix;
pub use record::{Node, Record, scalar_text};
