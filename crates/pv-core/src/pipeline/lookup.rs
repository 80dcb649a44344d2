use crate::item::{Item, ItemId};

/// First item with the given id, or `None` when absent
pub fn find_by_id(items: &[Item], id: ItemId) -> Option<&Item> {
    items.iter().find(|item| item.id == id)
}
