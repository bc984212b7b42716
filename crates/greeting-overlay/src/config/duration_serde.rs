//! Serde helpers for human-readable durations in configuration.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::{fmt, time::Duration};

/// Custom serde functions for Duration that support human-readable strings
pub mod duration {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration_str = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&duration_str)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(
                    "a duration as seconds (number) or human-readable string (e.g., '7d', '12h', '1h30m')",
                )
            }

            fn visit_u64<E>(self, seconds: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Duration::from_secs(seconds))
            }

            fn visit_i64<E>(self, seconds: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(seconds)
                    .map(Duration::from_secs)
                    .map_err(|_| de::Error::custom(format!("Negative duration: {seconds}")))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                humantime::parse_duration(value)
                    .map_err(|e| de::Error::custom(format!("Invalid duration '{value}': {e}")))
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(with = "super::duration")]
        max_age: Duration,
    }

    #[test]
    fn test_parses_human_readable_strings() {
        let holder: Holder = serde_json::from_str(r#"{"max_age":"7d"}"#).unwrap();
        assert_eq!(holder.max_age, Duration::from_secs(7 * 24 * 60 * 60));

        let holder: Holder = serde_json::from_str(r#"{"max_age":"1h 30m"}"#).unwrap();
        assert_eq!(holder.max_age, Duration::from_secs(90 * 60));
    }

    #[test]
    fn test_parses_plain_seconds() {
        let holder: Holder = serde_json::from_str(r#"{"max_age":3600}"#).unwrap();
        assert_eq!(holder.max_age, Duration::from_secs(3600));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Holder>(r#"{"max_age":"soon"}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"max_age":-5}"#).is_err());
    }

    #[test]
    fn test_round_trips_through_string() {
        let holder = Holder {
            max_age: Duration::from_secs(7 * 24 * 60 * 60),
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"max_age":"7days"}"#);
        assert_eq!(serde_json::from_str::<Holder>(&json).unwrap(), holder);
    }
}
