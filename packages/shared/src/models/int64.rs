//! proto3 JSON form of `int64` fields: written as a decimal string, read
//! from either a string or a number.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(Int64Visitor)
}

struct Int64Visitor;

impl<'de> Visitor<'de> for Int64Visitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an int64 as a number or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
        i64::try_from(value).map_err(|_| E::custom(format!("int64 out of range: {}", value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(0);
        }
        value
            .parse()
            .map_err(|_| E::custom(format!("invalid int64: {:?}", value)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        #[serde(with = "super")]
        value: i64,
    }

    #[test]
    fn test_written_as_string() {
        let json = serde_json::to_string(&Counter { value: 42 }).unwrap();

        assert_eq!(json, r#"{"value":"42"}"#);
    }

    #[test]
    fn test_read_from_string_or_number() {
        let from_string: Counter = serde_json::from_str(r#"{"value":"-7"}"#).unwrap();
        let from_number: Counter = serde_json::from_str(r#"{"value":9}"#).unwrap();

        assert_eq!(from_string.value, -7);
        assert_eq!(from_number.value, 9);
    }

    #[test]
    fn test_rejects_garbage_and_overflow() {
        assert!(serde_json::from_str::<Counter>(r#"{"value":"seven"}"#).is_err());
        assert!(serde_json::from_str::<Counter>(r#"{"value":18446744073709551615}"#).is_err());
    }
}
