//! `google.protobuf.Timestamp` helpers.
//!
//! The binary encoding carries the prost `Timestamp` message as-is; the JSON
//! mapping renders it as an RFC 3339 string.

use chrono::{DateTime, SecondsFormat, Utc};
use prost_types::Timestamp;
use serde::{Deserialize, Deserializer, Serializer};

pub fn now() -> Timestamp {
    from_datetime(Utc::now())
}

pub fn from_datetime(dt: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

pub fn to_datetime(ts: &Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.seconds, ts.nanos.max(0) as u32)
}

pub fn to_rfc3339(ts: &Timestamp) -> Option<String> {
    to_datetime(ts).map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// `#[serde(with = "...")]` adapter for `Option<Timestamp>` fields.
pub mod rfc3339 {
    use super::*;

    pub fn serialize<S>(value: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value.as_ref().and_then(to_rfc3339) {
            Some(text) => serializer.serialize_some(&text),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text: Option<String> = Option::deserialize(deserializer)?;
        match text {
            None => Ok(None),
            Some(text) if text.is_empty() => Ok(None),
            Some(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| Some(from_datetime(dt.with_timezone(&Utc))))
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rfc3339_rendering() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        let ts = from_datetime(dt);

        assert_eq!(to_rfc3339(&ts).unwrap(), "2024-03-09T12:30:00Z");
        assert_eq!(to_datetime(&ts).unwrap(), dt);
    }

    #[test]
    fn test_subsecond_precision_survives() {
        let dt = Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap();
        let ts = from_datetime(dt);

        assert_eq!(ts.nanos, 123_000_000);
        assert_eq!(to_rfc3339(&ts).unwrap(), "2023-11-14T22:13:20.123Z");
    }
}
