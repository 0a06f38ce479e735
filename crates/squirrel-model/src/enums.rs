//! Type-safe enumerations for census attributes.
//!
//! The census files store these as free-text columns (`"Tail flags"`,
//! `"Gray"`, `"?"`). Loaders normalize them once so the filter layer never
//! compares raw strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Observed squirrel activity.
///
/// The declaration order is the canonical display order used by every chart
/// legend and by the highlight computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Activity {
    Running,
    Climbing,
    Chasing,
    Eating,
    Foraging,
    Kuks,
    Quaas,
    #[serde(rename = "Tail flags")]
    TailFlags,
    #[serde(rename = "Tail twitches")]
    TailTwitches,
    Approaches,
    Indifferent,
    #[serde(rename = "Runs from")]
    RunsFrom,
}

impl Activity {
    /// All activities in canonical order.
    pub const ALL: [Activity; 12] = [
        Activity::Running,
        Activity::Climbing,
        Activity::Chasing,
        Activity::Eating,
        Activity::Foraging,
        Activity::Kuks,
        Activity::Quaas,
        Activity::TailFlags,
        Activity::TailTwitches,
        Activity::Approaches,
        Activity::Indifferent,
        Activity::RunsFrom,
    ];

    /// Column name as it appears in the census dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Running => "Running",
            Activity::Climbing => "Climbing",
            Activity::Chasing => "Chasing",
            Activity::Eating => "Eating",
            Activity::Foraging => "Foraging",
            Activity::Kuks => "Kuks",
            Activity::Quaas => "Quaas",
            Activity::TailFlags => "Tail flags",
            Activity::TailTwitches => "Tail twitches",
            Activity::Approaches => "Approaches",
            Activity::Indifferent => "Indifferent",
            Activity::RunsFrom => "Runs from",
        }
    }

    /// Position in [`Activity::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activity {
    type Err = ModelError;

    /// Accepts dataset column names as well as the lowercase / snake_case
    /// keys used in GeoJSON properties (`tail_flags`, `runs-from`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        Activity::ALL
            .into_iter()
            .find(|activity| activity.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| ModelError::UnknownActivity(s.to_string()))
    }
}

/// Age category of the observed squirrel.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AgeGroup {
    Adult,
    Juvenile,
    /// Missing, `?`, or not recorded.
    #[default]
    Unknown,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Adult, AgeGroup::Juvenile, AgeGroup::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Adult => "Adult",
            AgeGroup::Juvenile => "Juvenile",
            AgeGroup::Unknown => "Unknown",
        }
    }

    /// Lenient census parsing: anything unrecognized becomes `Unknown`.
    pub fn from_census(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeGroup {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADULT" => Ok(AgeGroup::Adult),
            "JUVENILE" => Ok(AgeGroup::Juvenile),
            "UNKNOWN" | "?" | "" => Ok(AgeGroup::Unknown),
            _ => Err(ModelError::UnknownAgeGroup(s.to_string())),
        }
    }
}

/// Primary fur color.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FurColor {
    Gray,
    Cinnamon,
    Black,
    #[default]
    Unknown,
}

impl FurColor {
    pub const ALL: [FurColor; 4] = [
        FurColor::Gray,
        FurColor::Cinnamon,
        FurColor::Black,
        FurColor::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FurColor::Gray => "Gray",
            FurColor::Cinnamon => "Cinnamon",
            FurColor::Black => "Black",
            FurColor::Unknown => "Unknown",
        }
    }

    pub fn from_census(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for FurColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FurColor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GRAY" | "GREY" => Ok(FurColor::Gray),
            "CINNAMON" => Ok(FurColor::Cinnamon),
            "BLACK" => Ok(FurColor::Black),
            "UNKNOWN" | "" => Ok(FurColor::Unknown),
            _ => Err(ModelError::UnknownFurColor(s.to_string())),
        }
    }
}

/// Census shift (time-of-day bucket).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Am => "AM",
            Shift::Pm => "PM",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AM" => Ok(Shift::Am),
            "PM" => Ok(Shift::Pm),
            _ => Err(ModelError::UnknownShift(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_from_str_accepts_column_and_property_names() {
        assert_eq!("Running".parse::<Activity>().unwrap(), Activity::Running);
        assert_eq!("tail_flags".parse::<Activity>().unwrap(), Activity::TailFlags);
        assert_eq!("RUNS FROM".parse::<Activity>().unwrap(), Activity::RunsFrom);
        assert!("Sleeping".parse::<Activity>().is_err());
    }

    #[test]
    fn activity_index_matches_canonical_order() {
        for (position, activity) in Activity::ALL.iter().enumerate() {
            assert_eq!(activity.index(), position);
        }
    }

    #[test]
    fn lenient_age_and_color() {
        assert_eq!(AgeGroup::from_census(Some("?")), AgeGroup::Unknown);
        assert_eq!(AgeGroup::from_census(Some("adult")), AgeGroup::Adult);
        assert_eq!(AgeGroup::from_census(None), AgeGroup::Unknown);
        assert_eq!(FurColor::from_census(Some("grey")), FurColor::Gray);
        assert_eq!(FurColor::from_census(Some("Purple")), FurColor::Unknown);
    }

    #[test]
    fn shift_from_str() {
        assert_eq!(" am ".parse::<Shift>().unwrap(), Shift::Am);
        assert!("noon".parse::<Shift>().is_err());
    }
}
