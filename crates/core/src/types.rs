use serde::{Deserialize, Deserializer};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (attendance days, leave ranges, pay periods).
pub type Date = chrono::NaiveDate;

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>` field:
///
/// - key absent        -> `None` (leave unchanged)
/// - `"key": null`     -> `Some(None)` (clear)
/// - `"key": value`    -> `Some(Some(value))`
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        assigned_to: Option<Option<DbId>>,
    }

    #[test]
    fn absent_key_is_none() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.assigned_to, None);
    }

    #[test]
    fn explicit_null_is_some_none() {
        let p: Patch = serde_json::from_str(r#"{"assigned_to": null}"#).unwrap();
        assert_eq!(p.assigned_to, Some(None));
    }

    #[test]
    fn value_is_some_some() {
        let p: Patch = serde_json::from_str(r#"{"assigned_to": 7}"#).unwrap();
        assert_eq!(p.assigned_to, Some(Some(7)));
    }
}
