use super::{UserDirectory, UserId};
use crate::progress::Progress;
use crate::records::Record;
use crate::upstream::UserLookup;
use std::collections::HashSet;

const LOG_TARGET: &str = "     users";

/// Keys that may carry a user reference in a test run or defect.
pub const USER_ID_FIELDS: &[&str] = &["assignedTo", "modifiedBy", "createdBy"];

/// Name recorded for a user whose record carries no first name.
pub const UNKNOWN_NAME: &str = "Unknown";

const NAME_FIELD: &str = "firstName";

/// Collect the distinct user references found at any of `id_fields`, in first-seen order.
#[must_use]
pub fn referenced_user_ids<'a>(records: impl IntoIterator<Item = &'a Record>, id_fields: &[&str]) -> Vec<UserId> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for record in records {
        for field in id_fields {
            if let Some(id) = record.find_user_id(field)
                && seen.insert(id.clone())
            {
                ids.push(id);
            }
        }
    }

    ids
}

/// Build a directory of display names for every user referenced by `records`.
///
/// Each distinct user is looked up once, one call at a time. A failed lookup is logged and the
/// user is left out of the directory; it never fails the batch.
pub async fn resolve<L>(
    records: impl IntoIterator<Item = &Record>,
    id_fields: &[&str],
    lookup: &L,
    progress: &dyn Progress,
) -> UserDirectory
where
    L: UserLookup,
{
    let ids = referenced_user_ids(records, id_fields);
    let total = ids.len() as u64;
    let mut names = Vec::with_capacity(ids.len());

    progress.set_phase("Resolving");
    log::debug!(target: LOG_TARGET, "Resolving {total} distinct user(s)");

    for (index, id) in ids.into_iter().enumerate() {
        progress.set_position(index as u64, total, &format!("user {id}"));

        match lookup.get_user(&id).await {
            Ok(Some(user)) => {
                let name = user.find_text(NAME_FIELD).unwrap_or_else(|| UNKNOWN_NAME.to_string());
                log::debug!(target: LOG_TARGET, "User {id} is '{name}'");
                names.push((id, name));
            }
            Ok(None) => {
                log::debug!(target: LOG_TARGET, "User {id} does not exist upstream");
            }
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not fetch user info for ID {id}: {e:#}");
            }
        }
    }

    progress.done();

    let directory: UserDirectory = names.into_iter().collect();
    log::info!(target: LOG_TARGET, "Resolved {} of {total} user(s)", directory.len());
    directory
}
