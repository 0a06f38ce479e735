//! Active filter predicates and the store that owns them.
//!
//! The store keeps four independent buckets (behaviors, ages, fur colors,
//! dogs). It never combines them; cross-category semantics live in
//! [`crate::evaluate`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use squirrel_model::{Activity, AgeGroup, FurColor};

/// Snapshot of the active filters.
///
/// An empty bucket imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Activities that must all be observed.
    pub behaviors: BTreeSet<Activity>,
    /// Accepted age groups (any of).
    pub ages: BTreeSet<AgeGroup>,
    /// Accepted fur colors (any of).
    pub colors: BTreeSet<FurColor>,
    /// Require at least one dog in the hectare.
    pub dogs: bool,
}

impl FilterState {
    /// True when no category constrains anything.
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty() && !self.has_subsetting_filters()
    }

    /// True when age, color, or dog filters are active.
    pub fn has_subsetting_filters(&self) -> bool {
        !self.ages.is_empty() || !self.colors.is_empty() || self.dogs
    }

    /// Copy with the behavior bucket cleared.
    pub fn without_behaviors(&self) -> Self {
        Self {
            behaviors: BTreeSet::new(),
            ..self.clone()
        }
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("no filters");
        }
        let mut parts = Vec::new();
        if !self.behaviors.is_empty() {
            parts.push(format!("behaviors={}", join(&self.behaviors)));
        }
        if !self.ages.is_empty() {
            parts.push(format!("ages={}", join(&self.ages)));
        }
        if !self.colors.is_empty() {
            parts.push(format!("colors={}", join(&self.colors)));
        }
        if self.dogs {
            parts.push("dogs".to_string());
        }
        f.write_str(&parts.join(" "))
    }
}

fn join<T: fmt::Display>(values: &BTreeSet<T>) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("+")
}

type ChangeCallback = Box<dyn FnMut(&FilterState)>;

/// Owner of the active filters.
///
/// Every mutation calls the registered change callback synchronously with the
/// new snapshot before returning. There is at most one callback.
#[derive(Default)]
pub struct FilterStore {
    state: FilterState,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStore")
            .field("state", &self.state)
            .field("has_callback", &self.on_change.is_some())
            .finish()
    }
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the change callback, replacing any previous one.
    pub fn set_on_change(&mut self, callback: impl FnMut(&FilterState) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    /// Copy of the current filters.
    pub fn snapshot(&self) -> FilterState {
        self.state.clone()
    }

    /// Borrow the current filters without copying.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn toggle_behavior(&mut self, activity: Activity) {
        toggle(&mut self.state.behaviors, activity);
        self.notify("toggle_behavior");
    }

    pub fn add_behavior(&mut self, activity: Activity) {
        self.state.behaviors.insert(activity);
        self.notify("add_behavior");
    }

    pub fn remove_behavior(&mut self, activity: Activity) {
        self.state.behaviors.remove(&activity);
        self.notify("remove_behavior");
    }

    pub fn toggle_age_value(&mut self, age: AgeGroup) {
        toggle(&mut self.state.ages, age);
        self.notify("toggle_age_value");
    }

    pub fn add_age_value(&mut self, age: AgeGroup) {
        self.state.ages.insert(age);
        self.notify("add_age_value");
    }

    pub fn remove_age_value(&mut self, age: AgeGroup) {
        self.state.ages.remove(&age);
        self.notify("remove_age_value");
    }

    pub fn toggle_color(&mut self, color: FurColor) {
        toggle(&mut self.state.colors, color);
        self.notify("toggle_color");
    }

    pub fn add_color(&mut self, color: FurColor) {
        self.state.colors.insert(color);
        self.notify("add_color");
    }

    pub fn remove_color(&mut self, color: FurColor) {
        self.state.colors.remove(&color);
        self.notify("remove_color");
    }

    pub fn toggle_dogs(&mut self) {
        self.state.dogs = !self.state.dogs;
        self.notify("toggle_dogs");
    }

    pub fn set_dogs(&mut self, required: bool) {
        self.state.dogs = required;
        self.notify("set_dogs");
    }

    /// Empty every bucket.
    pub fn clear_all(&mut self) {
        self.state = FilterState::default();
        self.notify("clear_all");
    }

    fn notify(&mut self, operation: &'static str) {
        debug!(operation, filters = %self.state, "filters changed");
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.state);
        }
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}
