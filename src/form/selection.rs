//! Set semantics over a multi-select value and the option filter.
//!
//! Every operation returns the next full array; callers emit it whole.

use crate::domain::{OptionEntry, OptionGroup, OptionItem};

pub fn is_selected(current: &[String], value: &str) -> bool {
    current.iter().any(|item| item == value)
}

/// Append `value` when absent, drop every copy of it when present.
pub fn toggle(current: &[String], value: &str) -> Vec<String> {
    if is_selected(current, value) {
        remove(current, value)
    } else {
        let mut next = current.to_vec();
        next.push(value.to_string());
        next
    }
}

pub fn remove(current: &[String], value: &str) -> Vec<String> {
    current
        .iter()
        .filter(|item| item.as_str() != value)
        .cloned()
        .collect()
}

/// Case-insensitive substring filter on labels.
///
/// A group stays when its label or any child matches; inside a kept group
/// only matching children remain.
pub fn filter_options(query: &str, entries: &[OptionEntry]) -> Vec<OptionEntry> {
    if query.is_empty() {
        return entries.to_vec();
    }
    let needle = query.to_lowercase();
    let matches = |text: &str| text.to_lowercase().contains(&needle);
    entries
        .iter()
        .filter_map(|entry| match entry {
            OptionEntry::Item(item) => matches(&item.label).then(|| entry.clone()),
            OptionEntry::Group(group) => {
                let items = group
                    .items
                    .iter()
                    .filter(|item| matches(&item.label))
                    .cloned()
                    .collect::<Vec<OptionItem>>();
                (!items.is_empty() || matches(&group.group_label)).then(|| {
                    OptionEntry::Group(OptionGroup {
                        group_label: group.group_label.clone(),
                        items,
                    })
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn groups() -> Vec<OptionEntry> {
        vec![
            OptionGroup::new(
                "A",
                [OptionItem::simple("Apple"), OptionItem::simple("Avocado")],
            )
            .into(),
            OptionGroup::new("B", [OptionItem::simple("Banana")]).into(),
        ]
    }

    #[test]
    fn toggle_appends_in_selection_order() {
        let next = toggle(&list(&["b"]), "a");
        assert_eq!(next, list(&["b", "a"]));
        assert_eq!(toggle(&next, "b"), list(&["a"]));
    }

    #[test]
    fn filter_keeps_group_with_matching_child_only() {
        let filtered = filter_options("av", &groups());
        assert_eq!(
            filtered,
            vec![OptionEntry::Group(OptionGroup::new(
                "A",
                [OptionItem::simple("Avocado")]
            ))]
        );
    }

    #[test]
    fn filter_is_case_insensitive_on_labels() {
        let entries = vec![
            OptionEntry::Item(OptionItem::new("us", "United States")),
            OptionEntry::Item(OptionItem::new("uk", "United Kingdom")),
        ];
        let filtered = filter_options("KING", &entries);
        assert_eq!(filtered, vec![entries[1].clone()]);
        assert!(filter_options("us", &entries).is_empty(), "values are not searched");
    }

    #[test]
    fn group_label_match_keeps_group_without_children() {
        let filtered = filter_options("b", &groups());
        assert_eq!(
            filtered,
            vec![OptionEntry::Group(OptionGroup::new(
                "B",
                [OptionItem::simple("Banana")]
            ))]
        );
        let team: OptionEntry = OptionGroup::new("Team", [OptionItem::simple("Bob")]).into();
        let label_only = filter_options("a", &[team]);
        assert_eq!(
            label_only,
            vec![OptionEntry::Group(OptionGroup::new("Team", Vec::new()))]
        );
    }

    #[test]
    fn empty_query_returns_everything() {
        assert_eq!(filter_options("", &groups()), groups());
    }
}
