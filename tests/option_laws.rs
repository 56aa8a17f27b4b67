//! Property tests for option normalization and multi-select set semantics.

use formctl::domain::{OptionEntry, flatten_options, normalize};
use formctl::form::selection::{filter_options, is_selected, toggle};
use proptest::prelude::*;
use serde_json::{Value, json};

fn arb_text() -> impl Strategy<Value = String> {
    "[A-Za-z ]{0,8}"
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_text().prop_map(Value::String),
        any::<i32>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
    ]
}

fn arb_item() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_text().prop_map(Value::String),
        (arb_scalar(), arb_scalar()).prop_map(|(value, label)| json!({"value": value, "label": label})),
        arb_scalar().prop_map(|value| json!({"value": value})),
        arb_scalar(),
    ]
}

fn arb_entry() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => arb_item(),
        1 => (arb_text(), prop::collection::vec(arb_item(), 0..4))
            .prop_map(|(label, items)| json!({"group": label, "items": items})),
        1 => (arb_text(), prop::collection::vec(arb_item(), 0..4))
            .prop_map(|(label, items)| json!({"label": label, "options": items})),
        1 => prop::collection::vec(arb_item(), 0..3).prop_map(|items| json!({"items": items})),
    ]
}

fn canonical_json(entries: &[OptionEntry]) -> Vec<Value> {
    entries
        .iter()
        .map(|entry| serde_json::to_value(entry).expect("options serialize"))
        .collect()
}

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in prop::collection::vec(arb_entry(), 0..8)) {
        let once = normalize(&raw);
        let twice = normalize(&canonical_json(&once));
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn toggle_membership_follows_parity(ops in prop::collection::vec(0usize..4, 0..40)) {
        let alphabet = ["a", "b", "c", "d"];
        let mut current: Vec<String> = Vec::new();
        for op in &ops {
            current = toggle(&current, alphabet[*op]);
        }
        for (index, value) in alphabet.iter().enumerate() {
            let toggles = ops.iter().filter(|op| **op == index).count();
            prop_assert_eq!(is_selected(&current, value), toggles % 2 == 1);
        }
    }

    #[test]
    fn toggle_twice_restores_membership(
        picks in prop::collection::btree_set(0usize..6, 0..6),
        target in 0usize..6,
    ) {
        let current = picks.iter().map(|n| format!("v{n}")).collect::<Vec<_>>();
        let value = format!("v{target}");
        let restored = toggle(&toggle(&current, &value), &value);
        if picks.contains(&target) {
            let mut left = restored.clone();
            let mut right = current.clone();
            left.sort();
            right.sort();
            prop_assert_eq!(left, right);
        } else {
            prop_assert_eq!(restored, current);
        }
    }

    #[test]
    fn filtered_items_all_match_or_sit_in_a_matching_group(
        raw in prop::collection::vec(arb_entry(), 0..8),
        query in "[a-z]{0,2}",
    ) {
        let options = normalize(&raw);
        let filtered = filter_options(&query, &options);
        if query.is_empty() {
            prop_assert_eq!(&filtered, &options);
        }
        for item in flatten_options(&filtered) {
            prop_assert!(item.label.to_lowercase().contains(&query));
        }
        prop_assert!(filtered.len() <= options.len());
    }
}

#[test]
fn grouped_filter_keeps_only_matching_children() {
    let options = normalize(&[
        json!({"group": "A", "items": ["Apple", "Avocado"]}),
        json!({"group": "B", "items": ["Banana"]}),
    ]);
    let filtered = filter_options("av", &options);
    assert_eq!(
        canonical_json(&filtered),
        vec![json!({"group": "A", "items": [{"value": "Avocado", "label": "Avocado"}]})]
    );
}
