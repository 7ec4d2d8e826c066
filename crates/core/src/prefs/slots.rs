//! Saved card ordering.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::Item;

/// One display slot and the item placed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotItem {
    pub slot_id: String,
    pub item_id: String,
}

impl SlotItem {
    pub fn new(slot_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self { slot_id: slot_id.into(), item_id: item_id.into() }
    }
}

/// Order `items` by the saved slots.
///
/// Items named by a slot come first, in slot order; slots naming an item
/// that is not on the page are skipped. Items no slot names follow in page
/// order.
pub fn arrange<'a>(items: &'a [Item], slots: &[SlotItem]) -> Vec<&'a Item> {
    let mut arranged: Vec<&Item> = slots
        .iter()
        .filter_map(|slot| items.iter().find(|item| item.id == slot.item_id))
        .collect();
    for item in items {
        if !slots.iter().any(|slot| slot.item_id == item.id) {
            arranged.push(item);
        }
    }
    arranged
}
