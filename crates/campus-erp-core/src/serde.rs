//! Deserialization helpers for query-string filters.
//!
//! Query parameters arrive as text, and an empty value (`?status=`) means the
//! filter is not applied.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Parses any `FromStr` value (typed ids, choice enums), treating "" as unset.
pub fn deserialize_optional_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Distinguishes an absent field from an explicit `null` in update bodies.
///
/// Use with `#[serde(default)]`: absent gives `None`, `null` gives
/// `Some(None)` and a value gives `Some(Some(v))`.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A presence flag such as `?available=1`.
///
/// Any non-empty value switches the filter on except the explicit negatives
/// `false`, `0`, `no` and `off`.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.as_deref().is_some_and(is_truthy))
}

pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !["false", "0", "no", "off"]
            .iter()
            .any(|neg| value.eq_ignore_ascii_case(neg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "deserialize_optional_parsed")]
        user: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        status: Option<String>,
        #[serde(default, deserialize_with = "deserialize_flag")]
        available: bool,
        #[serde(default, deserialize_with = "deserialize_optional_parsed")]
        credits: Option<i32>,
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("true"));
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("anything"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("  "));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("FALSE"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let f: Filters =
            serde_json::from_str(r#"{"user":"","status":"","available":"","credits":""}"#)
                .unwrap();
        assert!(f.user.is_none());
        assert!(f.status.is_none());
        assert!(!f.available);
        assert!(f.credits.is_none());
    }

    #[test]
    fn test_missing_values_are_unset() {
        let f: Filters = serde_json::from_str("{}").unwrap();
        assert!(f.user.is_none());
        assert!(!f.available);
    }

    #[test]
    fn test_values_are_parsed() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"user":"{}","status":"OPEN","available":"true","credits":"3"}}"#,
            id
        );
        let f: Filters = serde_json::from_str(&json).unwrap();
        assert_eq!(f.user, Some(id));
        assert_eq!(f.status.as_deref(), Some("OPEN"));
        assert!(f.available);
        assert_eq!(f.credits, Some(3));
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_nullable")]
        head: Option<Option<Uuid>>,
    }

    #[test]
    fn test_nullable_distinguishes_absent_from_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.head, None);

        let null: Patch = serde_json::from_str(r#"{"head":null}"#).unwrap();
        assert_eq!(null.head, Some(None));

        let id = Uuid::new_v4();
        let set: Patch = serde_json::from_str(&format!(r#"{{"head":"{}"}}"#, id)).unwrap();
        assert_eq!(set.head, Some(Some(id)));
    }

    #[test]
    fn test_invalid_uuid_is_rejected() {
        let result: Result<Filters, _> = serde_json::from_str(r#"{"user":"not-a-uuid"}"#);
        assert!(result.is_err());
    }
}
