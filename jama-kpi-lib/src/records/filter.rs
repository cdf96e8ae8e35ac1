use super::Record;

/// Drop every record whose `key_name` starts with `prefix`.
///
/// A record is kept only when `key_name` can be found and bound to a scalar whose text does not start
/// with `prefix`. Records whose key is missing, null, or structured cannot be identified and are
/// dropped as well. Relative order is preserved and the input is left untouched.
#[must_use]
pub fn exclude_by_prefix(records: &[Record], key_name: &str, prefix: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|record| record.find_text(key_name).is_some_and(|key| !key.starts_with(prefix)))
        .cloned()
        .collect()
}
