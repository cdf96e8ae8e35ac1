use super::UserId;
use core::fmt::{Display, Formatter};
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// The outcome of looking a user reference up in a [`UserDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserName {
    Resolved(String),

    /// The record named no user, or the user could not be resolved.
    Unresolved,
}

impl UserName {
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Resolved(name) => Some(name),
            Self::Unresolved => None,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl Display for UserName {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Resolved(name) => f.write_str(name),
            Self::Unresolved => f.write_str("(unresolved)"),
        }
    }
}

impl Serialize for UserName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_deref().serialize(serializer)
    }
}

/// Display names for the users referenced by one run's records.
///
/// Built once by [`resolve`](super::resolve) and read-only afterwards. Users whose lookup failed
/// have no entry.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    names: HashMap<UserId, String>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an optional user reference to a name.
    #[must_use]
    pub fn name_of(&self, user_id: Option<&UserId>) -> UserName {
        user_id
            .and_then(|id| self.names.get(id))
            .map_or(UserName::Unresolved, |name| UserName::Resolved(name.clone()))
    }

    #[must_use]
    pub fn get(&self, user_id: &UserId) -> Option<&str> {
        self.names.get(user_id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(UserId, String)> for UserDirectory {
    fn from_iter<T: IntoIterator<Item = (UserId, String)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
