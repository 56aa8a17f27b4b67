//! Canonical option shapes and the normalizer that produces them.
//!
//! Option lists arrive from loosely typed call sites: bare strings, labeled
//! pairs and groups may be mixed in one array. Normalization keeps order and
//! duplicates, promotes strings to `value == label` items, and drops anything
//! it cannot recognise instead of failing the whole field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub value: String,
    pub label: String,
}

impl OptionItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn simple(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    #[serde(rename = "group")]
    pub group_label: String,
    pub items: Vec<OptionItem>,
}

impl OptionGroup {
    pub fn new(group_label: impl Into<String>, items: impl IntoIterator<Item = OptionItem>) -> Self {
        Self {
            group_label: group_label.into(),
            items: items.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionEntry {
    Group(OptionGroup),
    Item(OptionItem),
}

impl From<&str> for OptionEntry {
    fn from(text: &str) -> Self {
        OptionEntry::Item(OptionItem::simple(text))
    }
}

impl From<OptionItem> for OptionEntry {
    fn from(item: OptionItem) -> Self {
        OptionEntry::Item(item)
    }
}

impl From<OptionGroup> for OptionEntry {
    fn from(group: OptionGroup) -> Self {
        OptionEntry::Group(group)
    }
}

pub fn normalize(options: &[Value]) -> Vec<OptionEntry> {
    options.iter().filter_map(normalize_entry).collect()
}

/// Items in display order with group membership flattened away.
pub fn flatten_options(entries: &[OptionEntry]) -> impl Iterator<Item = &OptionItem> + '_ {
    entries.iter().flat_map(|entry| match entry {
        OptionEntry::Item(item) => std::slice::from_ref(item).iter(),
        OptionEntry::Group(group) => group.items.iter(),
    })
}

pub fn find_option<'a>(entries: &'a [OptionEntry], value: &str) -> Option<&'a OptionItem> {
    flatten_options(entries).find(|item| item.value == value)
}

fn normalize_entry(raw: &Value) -> Option<OptionEntry> {
    match raw {
        Value::String(text) => Some(OptionItem::simple(text.clone()).into()),
        Value::Object(map) => {
            if let Some(items) = group_items(map) {
                let Some(label) = group_label(map) else {
                    tracing::trace!(entry = %raw, "dropping option group without a label");
                    return None;
                };
                let items = items.iter().filter_map(normalize_item).collect::<Vec<_>>();
                return Some(OptionGroup::new(label, items).into());
            }
            normalize_item(raw).map(OptionEntry::Item)
        }
        _ => {
            tracing::trace!(entry = %raw, "dropping malformed option");
            None
        }
    }
}

fn normalize_item(raw: &Value) -> Option<OptionItem> {
    match raw {
        Value::String(text) => Some(OptionItem::simple(text.clone())),
        Value::Object(map) => {
            let value = map.get("value").and_then(scalar_text);
            let label = map.get("label").and_then(scalar_text);
            match (value, label) {
                (Some(value), Some(label)) => Some(OptionItem::new(value, label)),
                (Some(value), None) => Some(OptionItem::simple(value)),
                (None, Some(label)) => Some(OptionItem::simple(label)),
                (None, None) => {
                    tracing::trace!(entry = %raw, "dropping option without value or label");
                    None
                }
            }
        }
        _ => {
            tracing::trace!(entry = %raw, "dropping malformed option");
            None
        }
    }
}

fn group_items(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    map.get("items")
        .or_else(|| map.get("options"))
        .and_then(Value::as_array)
}

fn group_label(map: &Map<String, Value>) -> Option<String> {
    ["group", "groupLabel", "label"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mixes_strings_pairs_and_groups_in_order() {
        let raw = vec![
            json!("Draft"),
            json!({"value": "pub", "label": "Published"}),
            json!({"label": "Team", "options": ["Alice", {"value": "bob", "label": "Bob"}]}),
        ];
        let options = normalize(&raw);
        assert_eq!(
            options,
            vec![
                OptionEntry::Item(OptionItem::simple("Draft")),
                OptionEntry::Item(OptionItem::new("pub", "Published")),
                OptionEntry::Group(OptionGroup::new(
                    "Team",
                    [OptionItem::simple("Alice"), OptionItem::new("bob", "Bob")]
                )),
            ]
        );
    }

    #[test]
    fn malformed_entries_are_dropped_without_failing() {
        let raw = vec![json!(42), json!(null), json!({"color": "red"}), json!("Kept")];
        assert_eq!(normalize(&raw), vec![OptionEntry::from("Kept")]);
    }

    #[test]
    fn duplicates_are_preserved() {
        let raw = vec![json!("A"), json!("A")];
        assert_eq!(normalize(&raw).len(), 2);
    }

    #[test]
    fn canonical_output_normalizes_to_itself() {
        let raw = vec![
            json!("x"),
            json!({"group": "G", "items": [{"value": 1, "label": "One"}, true]}),
        ];
        let once = normalize(&raw);
        let serialized = once
            .iter()
            .map(|entry| serde_json::to_value(entry).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(normalize(&serialized), once);
    }

    #[test]
    fn flatten_walks_group_members_in_display_order() {
        let options = vec![
            OptionEntry::from("a"),
            OptionGroup::new("G", [OptionItem::simple("b"), OptionItem::simple("c")]).into(),
        ];
        let values = flatten_options(&options)
            .map(|item| item.value.as_str())
            .collect::<Vec<_>>();
        assert_eq!(values, ["a", "b", "c"]);
        assert!(find_option(&options, "c").is_some());
        assert!(find_option(&options, "G").is_none());
    }
}
