//! Filter and selection behavior over small census fixtures.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use squirrel_core::{
    FilterScope, FilterState, FilterStore, Selection, SelectionEvent, SelectionStore, apply,
    apply_subsetting, restrict_to_selection, working_set,
};
use squirrel_model::{Activity, AgeGroup, FurColor, Record, RecordId};

fn rid(raw: &str) -> RecordId {
    RecordId::new(raw).expect("test id must be non-empty")
}

fn record(id: &str, age: AgeGroup, color: FurColor, activities: &[Activity], dogs: u32) -> Record {
    let mut record = Record::new(rid(id));
    record.age = age;
    record.fur_color = color;
    record.activities = activities.iter().copied().collect();
    record.dogs = dogs;
    record
}

/// R1 adult gray running; R2 juvenile black climbing with dogs;
/// R3 adult cinnamon running and climbing.
fn fixture() -> Vec<Record> {
    vec![
        record("R1", AgeGroup::Adult, FurColor::Gray, &[Activity::Running], 0),
        record("R2", AgeGroup::Juvenile, FurColor::Black, &[Activity::Climbing], 2),
        record(
            "R3",
            AgeGroup::Adult,
            FurColor::Cinnamon,
            &[Activity::Running, Activity::Climbing],
            0,
        ),
    ]
}

fn ids(items: &[&Record]) -> Vec<String> {
    items.iter().map(|r| r.id.as_str().to_string()).collect()
}

#[test]
fn behaviors_are_conjunctive() {
    let records = fixture();
    let mut filters = FilterState::default();
    filters.behaviors.insert(Activity::Running);
    assert_eq!(ids(&apply(&records, &filters)), vec!["R1", "R3"]);
    filters.behaviors.insert(Activity::Climbing);
    assert_eq!(ids(&apply(&records, &filters)), vec!["R3"]);
}

#[test]
fn ages_are_disjunctive() {
    let records = fixture();
    let mut filters = FilterState::default();
    filters.ages.insert(AgeGroup::Juvenile);
    assert_eq!(ids(&apply(&records, &filters)), vec!["R2"]);
    filters.ages.insert(AgeGroup::Adult);
    assert_eq!(ids(&apply(&records, &filters)), vec!["R1", "R2", "R3"]);
}

#[test]
fn categories_combine_with_and() {
    let records = fixture();
    let mut filters = FilterState::default();
    filters.ages.insert(AgeGroup::Adult);
    filters.colors.insert(FurColor::Black);
    assert!(apply(&records, &filters).is_empty());

    filters.colors.insert(FurColor::Cinnamon);
    filters.behaviors.insert(Activity::Climbing);
    assert_eq!(ids(&apply(&records, &filters)), vec!["R3"]);
}

#[test]
fn dogs_gate_and_unknown_color() {
    let mut records = fixture();
    records.push(record("R4", AgeGroup::Unknown, FurColor::Unknown, &[], 1));
    let mut filters = FilterState::default();
    filters.dogs = true;
    assert_eq!(ids(&apply(&records, &filters)), vec!["R2", "R4"]);
    filters.colors.insert(FurColor::Unknown);
    assert_eq!(ids(&apply(&records, &filters)), vec!["R4"]);
}

#[test]
fn charts_keep_behavior_mismatches() {
    let records = fixture();
    let mut filters = FilterState::default();
    filters.behaviors.insert(Activity::Climbing);
    filters.behaviors.insert(Activity::Running);
    assert_eq!(ids(&apply_subsetting(&records, &filters)), vec!["R1", "R2", "R3"]);
}

#[test]
fn selection_restricts_and_empty_match_stays_empty() {
    let records = fixture();
    let filters = FilterState::default();

    let none = Selection::default();
    let all = working_set(&records, &filters, &none, FilterScope::SubsettingOnly);
    assert_eq!(all.len(), 3);

    let some: Selection = [rid("R2"), rid("R3")].into_iter().collect();
    let picked = working_set(&records, &filters, &some, FilterScope::SubsettingOnly);
    assert_eq!(ids(&picked), vec!["R2", "R3"]);

    let missing: Selection = [rid("nope")].into_iter().collect();
    let empty = restrict_to_selection(apply(&records, &filters), &missing);
    assert!(empty.is_empty());
}

#[test]
fn selection_store_publishes_on_membership_change_only() {
    let fired: Rc<RefCell<Vec<usize>>> = Rc::default();
    let sink = Rc::clone(&fired);
    let mut store = SelectionStore::new();
    let subscription = store.on(SelectionEvent::Change, move |selection| {
        sink.borrow_mut().push(selection.len());
    });

    assert!(store.set([rid("a"), rid("b")]));
    assert!(!store.set([rid("b"), rid("a")]));
    assert!(store.has());
    assert!(store.clear());
    assert!(!store.clear());
    assert!(store.off(subscription));
    assert!(store.set([rid("c")]));

    assert_eq!(*fired.borrow(), vec![2, 0]);
}

fn arb_record() -> impl Strategy<Value = Record> {
    (
        0usize..3,
        0usize..4,
        proptest::collection::vec(0usize..12, 0..5),
        0u32..3,
    )
        .prop_map(|(age, color, acts, dogs)| {
            (
                AgeGroup::ALL[age],
                FurColor::ALL[color],
                acts.into_iter().map(|i| Activity::ALL[i]).collect::<Vec<_>>(),
                dogs,
            )
        })
        .prop_map(|(age, color, acts, dogs)| record("x", age, color, &acts, dogs))
}

fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::vec(arb_record(), 0..20).prop_map(|mut records| {
        for (i, record) in records.iter_mut().enumerate() {
            record.id = rid(&format!("S{i}"));
        }
        records
    })
}

fn arb_filters() -> impl Strategy<Value = FilterState> {
    (
        proptest::collection::btree_set(0usize..12, 0..3),
        proptest::collection::btree_set(0usize..3, 0..3),
        proptest::collection::btree_set(0usize..4, 0..3),
        any::<bool>(),
    )
        .prop_map(|(behaviors, ages, colors, dogs)| FilterState {
            behaviors: behaviors.into_iter().map(|i| Activity::ALL[i]).collect(),
            ages: ages.into_iter().map(|i| AgeGroup::ALL[i]).collect(),
            colors: colors.into_iter().map(|i| FurColor::ALL[i]).collect(),
            dogs,
        })
}

proptest! {
    #[test]
    fn empty_filters_are_identity(records in arb_records()) {
        let kept = apply(&records, &FilterState::default());
        prop_assert_eq!(kept.len(), records.len());
    }

    #[test]
    fn filtering_preserves_order_and_subsets(records in arb_records(), filters in arb_filters()) {
        let kept = apply(&records, &filters);
        let mut cursor = records.iter();
        for item in &kept {
            prop_assert!(cursor.any(|candidate| candidate.id == item.id));
        }
        prop_assert!(kept.len() <= apply_subsetting(&records, &filters).len());
    }

    #[test]
    fn adding_a_behavior_never_grows_the_result(
        records in arb_records(),
        filters in arb_filters(),
        extra in 0usize..12,
    ) {
        let before = apply(&records, &filters).len();
        let mut narrower = filters.clone();
        narrower.behaviors.insert(Activity::ALL[extra]);
        prop_assert!(apply(&records, &narrower).len() <= before);
    }

    #[test]
    fn adding_an_age_never_shrinks_a_nonempty_bucket(
        records in arb_records(),
        filters in arb_filters(),
        extra in 0usize..3,
    ) {
        prop_assume!(!filters.ages.is_empty());
        let before = apply(&records, &filters).len();
        let mut wider = filters.clone();
        wider.ages.insert(AgeGroup::ALL[extra]);
        prop_assert!(apply(&records, &wider).len() >= before);
    }

    #[test]
    fn toggling_twice_restores_state(filters in arb_filters(), which in 0usize..12) {
        let mut store = FilterStore::new();
        for activity in &filters.behaviors {
            store.add_behavior(*activity);
        }
        let before = store.snapshot();
        store.toggle_behavior(Activity::ALL[which]);
        store.toggle_behavior(Activity::ALL[which]);
        prop_assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn clear_all_restores_full_dataset(records in arb_records(), filters in arb_filters()) {
        let mut store = FilterStore::new();
        for activity in &filters.behaviors {
            store.add_behavior(*activity);
        }
        for age in &filters.ages {
            store.add_age_value(*age);
        }
        for color in &filters.colors {
            store.add_color(*color);
        }
        store.set_dogs(filters.dogs);
        store.clear_all();
        prop_assert_eq!(apply(&records, store.state()).len(), records.len());
    }

    #[test]
    fn reordered_selection_fires_once(
        raw in proptest::collection::btree_set("[a-z]{1,4}", 1..8),
        seed in any::<u64>(),
    ) {
        let fired = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&fired);
        let mut store = SelectionStore::new();
        store.on(SelectionEvent::Change, move |_| *sink.borrow_mut() += 1);

        let ids: Vec<RecordId> = raw.iter().map(|id| rid(id)).collect();
        let mut shuffled = ids.clone();
        shuffled.rotate_left((seed as usize) % ids.len());
        shuffled.reverse();
        // Duplicates collapse into the same member set.
        shuffled.push(ids[0].clone());

        prop_assert!(store.set(ids));
        prop_assert!(!store.set(shuffled));
        prop_assert_eq!(*fired.borrow(), 1);
    }
}
