//! Access to the upstream requirements-management service.
//!
//! The pipeline only needs two capabilities, expressed as [`FilterSource`] and [`UserLookup`].
//! [`Client`] implements both against the Jama Connect REST API; tests substitute their own
//! implementations.

mod client;

pub use client::{Client, Credentials, MAX_PAGE_SIZE};

use crate::Result;
use crate::records::Record;
use crate::users::UserId;

/// Source of the records matched by a saved upstream filter.
pub trait FilterSource {
    /// Fetch every record matched by `filter_id`.
    ///
    /// A failure here is fatal to the run.
    fn get_filter_results(&self, filter_id: u32) -> impl Future<Output = Result<Vec<Record>>>;
}

/// Lookup of individual users.
pub trait UserLookup {
    /// Fetch the user record for `user_id`, or `None` if the service has no such user.
    fn get_user(&self, user_id: &UserId) -> impl Future<Output = Result<Option<Record>>>;
}
