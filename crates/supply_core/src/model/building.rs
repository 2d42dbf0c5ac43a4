//! Construction site record.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Site activity status. Unrecognized labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildingStatus {
    Working,
    Wip,
    Other(String),
}

impl BuildingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Working => "Working",
            Self::Wip => "WIP",
            Self::Other(label) => label.as_str(),
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Working" => Self::Working,
            "WIP" => Self::Wip,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Display for BuildingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BuildingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BuildingStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|label| Self::from_label(&label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: u64,
    pub name: String,
    pub status: BuildingStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
