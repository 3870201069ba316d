//! Ownership guard: the single place where a path-supplied owner is checked
//! against the verified caller.

use tracing::warn;

use crate::domain::{Error, UserId};

/// Message returned when the path owner differs from the verified caller.
pub const OWNER_MISMATCH_MESSAGE: &str =
    "access denied: path owner does not match authenticated user";

/// Require `path_owner` to name exactly the verified caller.
///
/// The comparison is on the raw path text, so differently formatted
/// spellings of the same identifier are mismatches.
///
/// # Examples
/// ```
/// use taskboard::domain::{UserId, assert_owner_match};
///
/// let caller = UserId::new("user-1").expect("valid id");
/// assert!(assert_owner_match("user-1", &caller).is_ok());
/// assert!(assert_owner_match("user-2", &caller).is_err());
/// ```
pub fn assert_owner_match(path_owner: &str, verified: &UserId) -> Result<(), Error> {
    if path_owner == verified.as_ref() {
        return Ok(());
    }
    warn!(
        path_owner = %path_owner,
        caller = %verified,
        "owner path does not match authenticated user"
    );
    Err(Error::forbidden(OWNER_MISMATCH_MESSAGE))
}
