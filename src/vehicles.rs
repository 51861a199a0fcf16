use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Vehicle classes a detector can report. Add a variant to extend the set;
/// every map keyed by `VehicleType` picks it up automatically.
#[derive(
    Debug,
    Clone,
    Copy,
    EnumIter,
    EnumString,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum VehicleType {
    Car,
    Truck,
    Bus,
    Motorcycle,
    Bicycle,
}

impl VehicleType {
    pub fn all() -> Vec<VehicleType> {
        VehicleType::iter().collect()
    }
}

// JSON, CSV and CLI input all parse labels the same case-insensitive way.
impl TryFrom<String> for VehicleType {
    type Error = String;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label
            .parse()
            .map_err(|_| format!("unknown vehicle type '{}'", label))
    }
}

/// Frequency map over vehicle types. Ordered so reports and JSON are stable.
pub type VehicleTypeCounts = BTreeMap<VehicleType, u32>;

pub fn count_types<'a, I>(types: I) -> VehicleTypeCounts
where
    I: IntoIterator<Item = &'a VehicleType>,
{
    let mut counts = VehicleTypeCounts::new();
    for &t in types {
        *counts.entry(t).or_insert(0) += 1;
    }
    counts
}
