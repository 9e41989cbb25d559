//! Identifier helpers.
//!
//! Every entity is keyed by a UUID. New identifiers are UUIDv7 so that
//! records sort by creation time; the canonical string form is the
//! lowercase hyphenated rendering produced by `Uuid::to_string()`.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::error::{Error, Result};

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use fleet_core::uuid_utils::new_v7;
///
/// let a = new_v7();
/// let b = new_v7();
/// assert_ne!(a, b);
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Canonical string form of an identifier.
#[inline]
pub fn canonical(id: &Uuid) -> String {
    id.to_string()
}

/// Parse a caller-supplied identifier.
///
/// `field` names the parameter in the error message, so an empty value
/// yields `"Missing asset_id"` and garbage yields `"Invalid asset_id"`.
///
/// ```
/// use fleet_core::uuid_utils::parse_id;
///
/// assert!(parse_id("asset_id", "").is_err());
/// assert!(parse_id("asset_id", "nope").is_err());
/// assert!(parse_id("asset_id", "0190a3c4-7d1e-7c3a-9f00-000000000001").is_ok());
/// ```
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::InvalidInput(format!("Missing {}", field)));
    }
    Uuid::parse_str(raw).map_err(|_| Error::InvalidInput(format!("Invalid {}", field)))
}

/// Parse an optional identifier: empty means absent, garbage is still an error.
pub fn parse_optional_id(field: &str, raw: Option<&str>) -> Result<Option<Uuid>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_id(field, value).map(Some),
    }
}

/// Parse a list of referenced identifiers, silently dropping malformed entries.
///
/// Order of first appearance is kept and duplicates are removed.
pub fn parse_id_list<'a, I>(values: I) -> Vec<Uuid>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    let mut ids = Vec::new();
    for value in values {
        match Uuid::parse_str(value.trim()) {
            Ok(id) => {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
            Err(_) => {
                tracing::debug!(
                    subsystem = "core",
                    component = "uuid_utils",
                    op = "parse_id_list",
                    value,
                    "Dropping malformed reference id"
                );
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_is_version_7() {
        let id = new_v7();
        assert_eq!(id.get_version_num(), 7);
    }

    #[test]
    fn test_new_v7_is_time_ordered() {
        let a = new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = new_v7();
        assert!(a < b);
    }

    #[test]
    fn test_canonical_is_hyphenated_lowercase() {
        let id = Uuid::parse_str("0190A3C4-7D1E-7C3A-9F00-00000000000A").unwrap();
        assert_eq!(canonical(&id), "0190a3c4-7d1e-7c3a-9f00-00000000000a");
    }

    #[test]
    fn test_parse_id_missing() {
        let err = parse_id("asset_id", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Missing asset_id");
    }

    #[test]
    fn test_parse_id_invalid() {
        let err = parse_id("schedule_id", "zzz").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Invalid schedule_id");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_parse_id_trims() {
        let id = new_v7();
        let parsed = parse_id("id", &format!("  {}  ", id)).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_optional_id() {
        assert_eq!(parse_optional_id("maintenance_id", None).unwrap(), None);
        assert_eq!(parse_optional_id("maintenance_id", Some("")).unwrap(), None);
        assert!(parse_optional_id("maintenance_id", Some("bad")).is_err());

        let id = new_v7();
        let raw = id.to_string();
        assert_eq!(
            parse_optional_id("maintenance_id", Some(raw.as_str())).unwrap(),
            Some(id)
        );
    }

    #[test]
    fn test_parse_id_list_drops_malformed_and_duplicates() {
        let a = new_v7();
        let b = new_v7();
        let a_str = a.to_string();
        let b_str = b.to_string();
        let parsed = parse_id_list(vec![a_str.as_str(), "garbage", b_str.as_str(), a_str.as_str()]);
        assert_eq!(parsed, vec![a, b]);
    }
}
