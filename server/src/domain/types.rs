//! Request value types shared by the admin filters

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::data::search::{FieldView, SearchField, SqlValue};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp accepted as `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` or unix
/// milliseconds (number or numeric string, negative allowed). Serialized as
/// milliseconds.
///
/// The zero value is `0001-01-01 00:00:00` and is never filtered on. Empty
/// strings and `null` read as zero; the unix epoch (`0`) is a real bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FlexibleTime(pub NaiveDateTime);

impl Default for FlexibleTime {
    fn default() -> Self {
        Self(
            NaiveDate::from_ymd_opt(1, 1, 1)
                .unwrap_or_default()
                .and_time(NaiveTime::MIN),
        )
    }
}

impl FlexibleTime {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if let Ok(millis) = s.parse::<i64>() {
            return Self::from_millis(millis);
        }
        let parsed = if s.len() > 10 {
            NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        } else {
            NaiveDate::parse_from_str(s, DATE_FORMAT).map(|d| d.and_time(NaiveTime::MIN))
        };
        parsed
            .map(Self)
            .map_err(|e| format!("invalid time '{}': {}", s, e))
    }

    pub fn from_millis(millis: i64) -> Result<Self, String> {
        DateTime::from_timestamp_millis(millis)
            .map(|dt| Self(dt.naive_utc()))
            .ok_or_else(|| format!("timestamp out of range: {}", millis))
    }

    pub fn millis(&self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }
}

impl fmt::Display for FlexibleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATETIME_FORMAT))
    }
}

impl SearchField for FlexibleTime {
    fn view(&self) -> FieldView<'_> {
        FieldView::Scalar(SqlValue::Timestamp(self.0))
    }

    fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl Serialize for FlexibleTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.millis())
    }
}

impl<'de> Deserialize<'de> for FlexibleTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimeVisitor;

        impl Visitor<'_> for TimeVisitor {
            type Value = FlexibleTime;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a date, a datetime or unix milliseconds")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                FlexibleTime::from_millis(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                let v = i64::try_from(v).map_err(E::custom)?;
                FlexibleTime::from_millis(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v.trim().is_empty() {
                    return Ok(FlexibleTime::default());
                }
                FlexibleTime::parse(v).map_err(E::custom)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(FlexibleTime::default())
            }
        }

        deserializer.deserialize_any(TimeVisitor)
    }
}

/// Serde adapter for 64-bit ids sent as JSON strings
///
/// Accepts a string or a number; empty strings and `null` read as `0`.
/// Serializes as a string.
pub mod id_string {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = i64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer id as a string or number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
                i64::try_from(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
                let v = v.trim();
                if v.is_empty() {
                    return Ok(0);
                }
                v.parse()
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
                Ok(0)
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}
