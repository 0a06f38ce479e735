//! Sighting records and map features.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Activity, AgeGroup, FurColor, ModelError, RecordId, Shift};

/// Set of activities observed on one sighting.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Activity>", into = "Vec<Activity>")]
pub struct ActivitySet(u16);

impl ActivitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, activity: Activity) {
        self.0 |= 1 << activity.index();
    }

    pub fn contains(&self, activity: Activity) -> bool {
        self.0 & (1 << activity.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Activities in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Activity> + '_ {
        Activity::ALL
            .into_iter()
            .filter(move |activity| self.contains(*activity))
    }
}

impl FromIterator<Activity> for ActivitySet {
    fn from_iter<I: IntoIterator<Item = Activity>>(iter: I) -> Self {
        let mut set = Self::new();
        for activity in iter {
            set.insert(activity);
        }
        set
    }
}

impl From<Vec<Activity>> for ActivitySet {
    fn from(value: Vec<Activity>) -> Self {
        value.into_iter().collect()
    }
}

impl From<ActivitySet> for Vec<Activity> {
    fn from(value: ActivitySet) -> Self {
        value.iter().collect()
    }
}

impl fmt::Debug for ActivitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// WGS84 position (longitude first, as in GeoJSON).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Result<Self, ModelError> {
        let in_range = (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat);
        if !lon.is_finite() || !lat.is_finite() || !in_range {
            return Err(ModelError::InvalidCoordinate { lon, lat });
        }
        Ok(Self { lon, lat })
    }
}

/// One squirrel sighting from the merged census dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub hectare: Option<String>,
    pub shift: Option<Shift>,
    pub date: Option<NaiveDate>,
    pub age: AgeGroup,
    pub fur_color: FurColor,
    pub activities: ActivitySet,
    /// Number of dogs reported in the hectare during the shift.
    pub dogs: u32,
    /// Observed temperature in degrees Fahrenheit.
    pub temperature: Option<f64>,
    pub location: Option<GeoPoint>,
}

impl Record {
    /// A record with only an identifier; the remaining attributes take their
    /// "not observed" values.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            hectare: None,
            shift: None,
            date: None,
            age: AgeGroup::Unknown,
            fur_color: FurColor::Unknown,
            activities: ActivitySet::new(),
            dogs: 0,
            temperature: None,
            location: None,
        }
    }
}

/// One point of the sightings GeoJSON layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightingFeature {
    pub id: RecordId,
    pub position: GeoPoint,
    pub date: Option<NaiveDate>,
    pub age: AgeGroup,
    pub fur_color: FurColor,
    pub activities: ActivitySet,
    /// Dog count when the feature carries it; most layers do not.
    pub dogs: Option<u32>,
}

/// Attributes the filter layer reads from a sighting.
///
/// Implemented by both [`Record`] and [`SightingFeature`] so the same
/// evaluator drives the charts and the map.
pub trait Sighting {
    fn id(&self) -> &RecordId;
    fn activities(&self) -> ActivitySet;
    fn age(&self) -> AgeGroup;
    fn fur_color(&self) -> FurColor;
    fn dog_count(&self) -> u32;

    fn is_doing(&self, activity: Activity) -> bool {
        self.activities().contains(activity)
    }

    fn has_dogs(&self) -> bool {
        self.dog_count() > 0
    }
}

impl Sighting for Record {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn activities(&self) -> ActivitySet {
        self.activities
    }

    fn age(&self) -> AgeGroup {
        self.age
    }

    fn fur_color(&self) -> FurColor {
        self.fur_color
    }

    fn dog_count(&self) -> u32 {
        self.dogs
    }
}

impl Sighting for SightingFeature {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn activities(&self) -> ActivitySet {
        self.activities
    }

    fn age(&self) -> AgeGroup {
        self.age
    }

    fn fur_color(&self) -> FurColor {
        self.fur_color
    }

    fn dog_count(&self) -> u32 {
        self.dogs.unwrap_or(0)
    }
}
