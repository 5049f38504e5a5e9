//! Property tests: arbitrary operation sequences against a plain `Vec` model.

use proptest::prelude::*;
use serde_json::{json, Value};
use tracked_collection::{CollectionManager, Record};

#[derive(Clone, Debug)]
enum Op {
    Create(Vec<i64>),
    Remove(usize),
    Update(usize, String, i64),
    Reset,
}

const FIELDS: [&str; 3] = ["a", "b", "c"];

fn make_record(n: i64) -> Record {
    Record::from_value(json!({ "a": n, "b": format!("r{n}") })).unwrap()
}

fn arb_field() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(FIELDS[0].to_string()),
        Just(FIELDS[1].to_string()),
        Just(FIELDS[2].to_string()),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => prop::collection::vec(any::<i64>(), 1..3).prop_map(Op::Create),
        3 => (0usize..8).prop_map(Op::Remove),
        3 => (0usize..8, arb_field(), any::<i64>()).prop_map(|(i, f, v)| Op::Update(i, f, v)),
        1 => Just(Op::Reset),
    ]
}

fn arb_baseline() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(any::<i64>(), 0..6).prop_map(|ns| ns.into_iter().map(make_record).collect())
}

/// Apply `op` to both; returns whether the manager accepted it.
fn apply_both(manager: &CollectionManager, model: &mut Vec<Record>, baseline: &[Record], op: Op) -> bool {
    match op {
        Op::Create(ns) => {
            let records: Vec<_> = ns.into_iter().map(make_record).collect();
            model.extend(records.iter().cloned());
            manager.create_many(records);
            true
        }
        Op::Remove(index) => {
            let ok = manager.remove(index).is_ok();
            if index < model.len() {
                model.remove(index);
            }
            ok
        }
        Op::Update(index, field, value) => {
            let ok = manager.update(index, field.as_str(), Value::from(value)).is_ok();
            if index < model.len() {
                model[index] = model[index].with_field(field, Value::from(value));
            }
            ok
        }
        Op::Reset => {
            *model = baseline.to_vec();
            manager.reset();
            true
        }
    }
}

proptest! {
    #[test]
    fn items_track_model(baseline in arb_baseline(), ops in prop::collection::vec(arb_op(), 0..20)) {
        let manager = CollectionManager::new(baseline.clone());
        let mut model = baseline.clone();

        for op in ops {
            let len_before = model.len();
            let index = match &op {
                Op::Remove(i) | Op::Update(i, _, _) => Some(*i),
                _ => None,
            };
            let before = manager.items();
            let accepted = apply_both(&manager, &mut model, &baseline, op);

            if let Some(i) = index {
                prop_assert_eq!(accepted, i < len_before);
                if !accepted {
                    prop_assert!(manager.items().ptr_eq(&before));
                }
            }
            prop_assert_eq!(manager.items().to_vec(), model.clone());
        }
    }

    #[test]
    fn diff_is_positional(baseline in arb_baseline(), ops in prop::collection::vec(arb_op(), 0..20)) {
        let manager = CollectionManager::new(baseline.clone());
        let mut model = baseline.clone();
        for op in ops {
            apply_both(&manager, &mut model, &baseline, op);
        }

        let items = manager.items();
        let diff = manager.diff();

        let created: Vec<_> = items.iter().skip(baseline.len()).cloned().collect();
        prop_assert_eq!(&diff.created, &created);

        let removed: Vec<_> = baseline.iter().skip(items.len()).cloned().collect();
        prop_assert_eq!(&diff.removed, &removed);

        let updated: Vec<_> = baseline
            .iter()
            .zip(items.iter())
            .filter(|(b, c)| !b.ptr_eq(c))
            .map(|(_, c)| c.clone())
            .collect();
        prop_assert_eq!(diff.updated.len(), updated.len());
        for (reported, expected) in diff.updated.iter().zip(updated.iter()) {
            prop_assert!(reported.ptr_eq(expected));
        }

        prop_assert_eq!(
            manager.is_dirty(),
            !diff.created.is_empty() || !diff.updated.is_empty() || !diff.removed.is_empty()
        );
    }

    #[test]
    fn reset_restores_baseline(baseline in arb_baseline(), ops in prop::collection::vec(arb_op(), 0..20)) {
        let manager = CollectionManager::new(baseline.clone());
        let mut model = baseline.clone();
        for op in ops {
            apply_both(&manager, &mut model, &baseline, op);
        }

        manager.reset();
        prop_assert_eq!(manager.items().to_vec(), baseline.clone());
        prop_assert!(!manager.is_dirty());

        manager.reset();
        prop_assert_eq!(manager.items().to_vec(), baseline);
        prop_assert!(!manager.is_dirty());
    }
}
