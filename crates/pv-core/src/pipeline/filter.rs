use crate::item::Item;

/// Keep the items whose title contains `query`, ignoring case
///
/// An empty or all-whitespace query matches everything. Input order is
/// preserved and an empty result is not an error.
pub fn filter_items(items: &[Item], query: &str) -> Vec<Item> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| item.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
