//! User references and their resolution to display names.

mod directory;
mod resolver;
mod user_id;

pub use directory::{UserDirectory, UserName};
pub use resolver::{UNKNOWN_NAME, USER_ID_FIELDS, referenced_user_ids, resolve};
pub use user_id::UserId;
