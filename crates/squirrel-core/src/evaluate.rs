//! Filter evaluation.
//!
//! Combination policy:
//! - behaviors: every selected activity must be observed (AND)
//! - ages: the record's age must be one of the selected values (OR)
//! - colors: the record's fur color must be one of the selected values (OR)
//! - dogs: when set, the dog count must be positive
//!
//! Category results are ANDed together and an empty category passes
//! everything. Behaviors are also the only *highlight* filter: the charts
//! keep every record that survives the subsetting categories and use the
//! behavior bucket to decide which series to emphasize.

use serde::{Deserialize, Serialize};

use squirrel_model::{Activity, Sighting};

use crate::filter_state::FilterState;
use crate::selection::Selection;

/// Which filter categories remove data for a given view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterScope {
    /// Behaviors, ages, colors, and dogs all subset the data.
    All,
    /// Only ages, colors, and dogs subset; behaviors only highlight.
    SubsettingOnly,
}

/// Visual weight of one activity series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    /// No behavior filter is active.
    Neutral,
    /// The activity is one of the selected behaviors.
    Highlighted,
    /// Other behaviors are selected.
    Dimmed,
}

pub fn passes_behaviors<S: Sighting + ?Sized>(item: &S, filters: &FilterState) -> bool {
    filters
        .behaviors
        .iter()
        .all(|activity| item.is_doing(*activity))
}

pub fn passes_subsetting<S: Sighting + ?Sized>(item: &S, filters: &FilterState) -> bool {
    let age_ok = filters.ages.is_empty() || filters.ages.contains(&item.age());
    let color_ok = filters.colors.is_empty() || filters.colors.contains(&item.fur_color());
    let dogs_ok = !filters.dogs || item.has_dogs();
    age_ok && color_ok && dogs_ok
}

/// Whether one sighting survives every active category.
pub fn matches<S: Sighting + ?Sized>(item: &S, filters: &FilterState) -> bool {
    passes_behaviors(item, filters) && passes_subsetting(item, filters)
}

/// Filter with all four categories, preserving input order.
pub fn apply<'a, S: Sighting>(items: &'a [S], filters: &FilterState) -> Vec<&'a S> {
    items.iter().filter(|item| matches(*item, filters)).collect()
}

/// Filter with ages, colors, and dogs only, preserving input order.
pub fn apply_subsetting<'a, S: Sighting>(items: &'a [S], filters: &FilterState) -> Vec<&'a S> {
    items
        .iter()
        .filter(|item| passes_subsetting(*item, filters))
        .collect()
}

/// Filter according to a view's scope.
pub fn apply_scoped<'a, S: Sighting>(
    items: &'a [S],
    filters: &FilterState,
    scope: FilterScope,
) -> Vec<&'a S> {
    match scope {
        FilterScope::All => apply(items, filters),
        FilterScope::SubsettingOnly => apply_subsetting(items, filters),
    }
}

/// Keep only selected sightings when a selection is active.
///
/// With no selection the input passes through. With a selection that matches
/// nothing the result is empty; there is no fallback to the unselected data.
pub fn restrict_to_selection<'a, S: Sighting>(
    items: Vec<&'a S>,
    selection: &Selection,
) -> Vec<&'a S> {
    if !selection.is_active() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| selection.contains(item.id()))
        .collect()
}

/// The data a view plots: scoped filtering, then selection restriction.
pub fn working_set<'a, S: Sighting>(
    items: &'a [S],
    filters: &FilterState,
    selection: &Selection,
    scope: FilterScope,
) -> Vec<&'a S> {
    restrict_to_selection(apply_scoped(items, filters, scope), selection)
}

/// Activities drawn at full weight, in canonical order.
///
/// With no behavior filter every activity is highlighted.
pub fn highlighted_activities(filters: &FilterState) -> Vec<Activity> {
    if filters.behaviors.is_empty() {
        return Activity::ALL.to_vec();
    }
    Activity::ALL
        .into_iter()
        .filter(|activity| filters.behaviors.contains(activity))
        .collect()
}

pub fn emphasis_for(activity: Activity, filters: &FilterState) -> Emphasis {
    if filters.behaviors.is_empty() {
        Emphasis::Neutral
    } else if filters.behaviors.contains(&activity) {
        Emphasis::Highlighted
    } else {
        Emphasis::Dimmed
    }
}
