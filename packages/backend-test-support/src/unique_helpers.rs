//! Unique identifiers for test isolation.

use ulid::Ulid;

/// Generate a unique string in the form `{prefix}-{ulid}`.
///
/// ```
/// use ono_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("player");
/// let b = unique_str("player");
/// assert_ne!(a, b);
/// assert!(a.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a room code that satisfies `^[A-Z0-9]{3,10}$`.
///
/// Takes the tail of a ULID, which is its random component.
///
/// ```
/// use ono_test_support::unique_helpers::unique_room_code;
///
/// let code = unique_room_code();
/// assert_eq!(code.len(), 10);
/// assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
/// ```
pub fn unique_room_code() -> String {
    let ulid = Ulid::new().to_string();
    ulid[ulid.len() - 10..].to_string()
}
