//! Filter and selection coordination shared by every dashboard view.

pub mod evaluate;
pub mod events;
pub mod filter_state;
pub mod selection;

pub use evaluate::{
    Emphasis, FilterScope, apply, apply_scoped, apply_subsetting, emphasis_for,
    highlighted_activities, matches, restrict_to_selection, working_set,
};
pub use events::{Dispatcher, SubscriptionId};
pub use filter_state::{FilterState, FilterStore};
pub use selection::{Selection, SelectionEvent, SelectionStore};
