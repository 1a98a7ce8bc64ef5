pub mod serialization;

use crate::app::clock::{Clock, StampAllocator};
use crate::catalog::{Archetype, Product};
use crate::placement::FloorPosition;
use glam::{Mat4, Quat};
use std::f32::consts::TAU;

/// Scene-unique identifier of a placed item: `<product id>-<millis>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog product placed in the room.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedItem {
    pub id: ItemId,
    pub product_id: String,
    /// Snapshot of the catalog record at placement time.
    pub product: Product,
    pub position: FloorPosition,
    /// Yaw in radians, kept in `[0, 2π)`.
    pub rotation: f32,
    /// Override of the archetype's default body color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl PlacedItem {
    pub fn archetype(&self) -> Archetype {
        self.product.archetype()
    }

    pub fn effective_color(&self) -> &str {
        let archetype = self.archetype();
        match &self.color {
            Some(color) if archetype.is_tintable() => color,
            _ => archetype.default_color(),
        }
    }

    /// Model matrix: yaw about +Y, then translation onto the floor.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(
            Quat::from_rotation_y(self.rotation),
            self.position.to_vec3(),
        )
    }
}

/// Wraps an angle into `[0, 2π)`, snapping values a rounding error short
/// of a full turn back to zero.
pub fn normalize_yaw(radians: f32) -> f32 {
    if !radians.is_finite() {
        return 0.0;
    }
    let wrapped = radians.rem_euclid(TAU);
    if (TAU - wrapped).abs() < 1.0e-5 {
        0.0
    } else {
        wrapped
    }
}

/// Ordered placed items plus the single selection.
///
/// Insertion order is creation order. `selected_id`, when set, always names
/// an item that exists.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    items: Vec<PlacedItem>,
    selected_id: Option<ItemId>,
    stamps: StampAllocator,
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected_id: None,
            stamps: StampAllocator::default(),
        }
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: &ItemId) -> Option<&PlacedItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn item_mut(&mut self, id: &ItemId) -> Option<&mut PlacedItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.item(id).is_some()
    }

    pub fn selected_id(&self) -> Option<&ItemId> {
        self.selected_id.as_ref()
    }

    pub fn selected_item(&self) -> Option<&PlacedItem> {
        self.selected_id.as_ref().and_then(|id| self.item(id))
    }

    fn allocate_id(&mut self, product_id: &str, clock: &dyn Clock) -> ItemId {
        loop {
            let candidate = ItemId(format!("{}-{}", product_id, self.stamps.next(clock)));
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Places a product at the origin with no rotation and selects it.
    pub fn add_item(&mut self, product: &Product, clock: &dyn Clock) -> &PlacedItem {
        let id = self.allocate_id(&product.id, clock);
        self.items.push(PlacedItem {
            id: id.clone(),
            product_id: product.id.clone(),
            product: product.clone(),
            position: FloorPosition::ORIGIN,
            rotation: 0.0,
            color: None,
        });
        self.selected_id = Some(id);
        let index = self.items.len() - 1;
        &self.items[index]
    }

    /// Inserts a fully specified item, e.g. one rebuilt from a saved design.
    /// The id is replaced if it collides with an existing one.
    pub fn insert_item(&mut self, mut item: PlacedItem, clock: &dyn Clock) -> ItemId {
        if self.contains(&item.id) {
            item.id = self.allocate_id(&item.product_id, clock);
        }
        item.rotation = normalize_yaw(item.rotation);
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Returns the removed item; `None` (and no change) for unknown ids.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<PlacedItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        if self.selected_id.as_ref() == Some(id) {
            self.selected_id = None;
        }
        Some(self.items.remove(index))
    }

    /// Returns whether an item was updated.
    pub fn set_placement(&mut self, id: &ItemId, position: FloorPosition, rotation: f32) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.position = position;
                item.rotation = normalize_yaw(rotation);
                true
            }
            None => false,
        }
    }

    pub fn set_color(&mut self, id: &ItemId, color: &str) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.color = Some(color.to_string());
                true
            }
            None => false,
        }
    }

    /// Adds `step` radians to the selected item's yaw, modulo a full turn.
    pub fn rotate_selected(&mut self, step: f32) -> Option<f32> {
        let id = self.selected_id.clone()?;
        let item = self.item_mut(&id)?;
        item.rotation = normalize_yaw(item.rotation + step);
        Some(item.rotation)
    }

    /// `None` clears the selection. An id that is not in the scene is
    /// ignored and the current selection stays.
    pub fn select(&mut self, id: Option<&ItemId>) {
        match id {
            Some(id) if !self.contains(id) => {}
            Some(id) => self.selected_id = Some(id.clone()),
            None => self.selected_id = None,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected_id = None;
    }

    /// Replaces the whole item list; the selection is dropped.
    pub fn replace(&mut self, items: Vec<PlacedItem>, clock: &dyn Clock) {
        self.clear();
        for item in items {
            self.insert_item(item, clock);
        }
    }
}
