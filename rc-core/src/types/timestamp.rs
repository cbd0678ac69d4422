//! Serde adapters for Rocket.Chat timestamps.
//!
//! The REST API returns RFC 3339 strings; some endpoints (and older servers) return epoch
//! milliseconds or Mongo-style `{"$date": ms}` objects. All three are accepted; output is RFC 3339.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    Mongo {
        #[serde(rename = "$date")]
        date: i64,
    },
}

fn parse<E: serde::de::Error>(raw: RawTimestamp) -> Result<DateTime<Utc>, E> {
    match raw {
        RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| E::custom(format!("invalid timestamp {s:?}: {e}"))),
        RawTimestamp::Millis(ms) | RawTimestamp::Mongo { date: ms } => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| E::custom(format!("timestamp out of range: {ms}"))),
    }
}

pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    parse(RawTimestamp::deserialize(deserializer)?)
}

/// Same formats for optional fields; `null` and a missing field both become `None`.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        ts: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_some(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<RawTimestamp>::deserialize(deserializer)?
            .map(parse::<D::Error>)
            .transpose()
    }
}

/// `starred` is a list of users on the server and a plain flag in our own output.
pub fn flag_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        List(Vec<serde_json::Value>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Flag(b)) => b,
        Some(Raw::List(items)) => !items.is_empty(),
        None => false,
    })
}

/// Counter fields come back as `null` for rooms the caller has not joined.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
