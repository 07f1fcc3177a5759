//! Persisted metadata shapes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RFC 3339, millisecond precision, `Z` suffix.
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod millis {
    use super::*;

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let value = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&value)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// The persisted metadata of one fragment.
///
/// Serializes as `{id, ownerId, type, size, created, updated}`; every field is
/// present once a fragment has been saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentRecord {
    pub id: String,
    pub owner_id: String,
    #[serde(rename = "type")]
    pub fragment_type: String,
    pub size: u64,
    #[serde(with = "millis")]
    pub created: DateTime<Utc>,
    #[serde(with = "millis")]
    pub updated: DateTime<Utc>,
}

/// Result of listing one owner's fragments.
///
/// Serialized untagged, so ids become a JSON array of strings and
/// expanded records an array of objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FragmentList {
    Ids(Vec<String>),
    Records(Vec<FragmentRecord>),
}

impl FragmentList {
    pub fn len(&self) -> usize {
        match self {
            FragmentList::Ids(ids) => ids.len(),
            FragmentList::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fragment ids in this listing, whichever form it takes.
    pub fn ids(&self) -> Vec<&str> {
        match self {
            FragmentList::Ids(ids) => ids.iter().map(String::as_str).collect(),
            FragmentList::Records(records) => records.iter().map(|r| r.id.as_str()).collect(),
        }
    }
}
