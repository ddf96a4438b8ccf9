//! ETag helpers for optimistic concurrency control.
//!
//! A room's ETag names its code and state version, so `If-Match` carries
//! the version a client last saw.

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Generate an ETag for a room at a given state version.
///
/// Format: `"room-{code}-v{version}"` (quoted, as HTTP requires)
///
/// # Example
/// ```
/// # use ono_backend::http::etag::room_etag;
/// assert_eq!(room_etag("ABCD", 5), r#""room-ABCD-v5""#);
/// ```
pub fn room_etag(code: &str, version: u64) -> String {
    format!(r#""room-{code}-v{version}""#)
}

/// Parse the state version from a room ETag value. Weak ETags (`W/`) are
/// accepted.
///
/// # Errors
/// `INVALID_HEADER` when the value is not a room ETag.
///
/// # Example
/// ```
/// # use ono_backend::http::etag::parse_room_version_from_etag;
/// assert_eq!(parse_room_version_from_etag(r#""room-ABCD-v5""#).unwrap(), 5);
/// ```
pub fn parse_room_version_from_etag(s: &str) -> Result<u64, AppError> {
    let s = s.trim();
    let s = s.strip_prefix("W/").unwrap_or(s).trim_matches('"');

    let invalid = |reason: &str| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag {reason}. Expected \"room-{{code}}-v{{version}}\", got: \"{s}\""),
        )
    };

    let rest = s.strip_prefix("room-").ok_or_else(|| invalid("prefix"))?;
    let (_, version) = rest.rsplit_once("-v").ok_or_else(|| invalid("version marker"))?;
    version.parse::<u64>().map_err(|_| invalid("version"))
}

/// Whether an `If-None-Match` header value matches `etag`.
pub fn if_none_match_hits(header: &str, etag: &str) -> bool {
    header.trim() == "*" || header.split(',').map(str::trim).any(|candidate| candidate == etag)
}
