//! Datetime serialization/deserialization helpers.
//!
//! Serializes `DateTime<Utc>` as RFC3339; deserialization accepts RFC3339
//! strings as well as Unix timestamps (seconds or milliseconds), which some
//! storage backends and older exports use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Serializes `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

/// Deserializes `DateTime<Utc>` from RFC3339 or a Unix timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Raw::deserialize(deserializer)? {
        Raw::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
        Raw::Number(ts) => {
            from_unix(ts).ok_or_else(|| Error::custom("Invalid Unix timestamp"))
        }
    }
}

/// `Option<DateTime<Utc>>` serializer/deserializer helpers.
pub mod option {
    use super::{DateTime, Deserialize, Deserializer, Raw, Serializer, Utc, from_unix};

    /// Serializes `Option<DateTime<Utc>>` as RFC3339 or `null`.
    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes `Option<DateTime<Utc>>` from RFC3339, Unix timestamp, or `null`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
            Some(Raw::Number(ts)) => from_unix(ts)
                .map(Some)
                .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
            None => Ok(None),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Text(String),
    Number(i64),
}

/// Parses a Unix timestamp, auto-detecting seconds vs milliseconds.
fn from_unix(ts: i64) -> Option<DateTime<Utc>> {
    // Values above 10^11 can only be milliseconds.
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        at: DateTime<Utc>,
    }

    #[test]
    fn round_trips_rfc3339() {
        let original = Wrapper { at: Utc::now() };
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.at.timestamp(), original.at.timestamp());
    }

    #[test]
    fn accepts_unix_seconds() {
        let parsed: Wrapper = serde_json::from_str(r#"{"at":1700000000}"#).unwrap();
        assert_eq!(parsed.at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn accepts_unix_milliseconds() {
        let parsed: Wrapper = serde_json::from_str(r#"{"at":1700000000000}"#).unwrap();
        assert_eq!(parsed.at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn rejects_garbage() {
        let result: Result<Wrapper, _> = serde_json::from_str(r#"{"at":"not a date"}"#);
        assert!(result.is_err());
    }
}
