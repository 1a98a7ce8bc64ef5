//! Persisted design documents shared by the 2D canvas and the 3D room.
//!
//! A 3D scene is projected onto the 2D canvas layout when saved. The
//! projection drops nothing the 2D canvas can show, but it is lossy in the
//! other direction: documents drawn natively in 2D carry no height or room
//! bounds, so rebuilding a 3D scene from one is approximate.

pub mod store;

use crate::app::clock::{Clock, StampAllocator};
use crate::catalog::Product;
use crate::config::{ProjectionConfig, WorkspaceConfig};
use crate::placement::{FloorBounds, FloorPosition};
use crate::scene::{normalize_yaw, ItemId, PlacedItem, SceneState};
use glam::Vec3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DesignError {
    #[error("Please enter a design name")]
    EmptyName,
}

/// One product on the 2D canvas. `rotation` is in degrees.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignItem {
    pub product_id: String,
    pub product: Product,
    pub x: f32,
    pub y: f32,
    #[serde(rename = "rotation")]
    pub rotation_degrees: f32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDocument {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub items: Vec<DesignItem>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Affine map from room floor coordinates to canvas pixels:
/// `x2d = x * scale + offset_x`, `y2d = z * scale + offset_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorProjection {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl Default for FloorProjection {
    fn default() -> Self {
        Self::from_config(&ProjectionConfig::default())
    }
}

impl FloorProjection {
    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self {
            scale: config.scale,
            offset_x: config.offset_x,
            offset_y: config.offset_y,
        }
    }

    pub fn project(&self, position: FloorPosition) -> (f32, f32) {
        (
            position.x() * self.scale + self.offset_x,
            position.z() * self.scale + self.offset_y,
        )
    }

    /// Inverse of [`project`](Self::project), clamped into the room.
    pub fn unproject(&self, x: f32, y: f32, bounds: &FloorBounds) -> FloorPosition {
        bounds.clamp(Vec3::new(
            (x - self.offset_x) / self.scale,
            0.0,
            (y - self.offset_y) / self.scale,
        ))
    }

    pub fn radians_to_degrees(radians: f32) -> f32 {
        radians * 180.0 / std::f32::consts::PI
    }

    pub fn degrees_to_radians(degrees: f32) -> f32 {
        degrees * std::f32::consts::PI / 180.0
    }
}

/// Converts between live scenes and saved documents.
#[derive(Debug, Clone)]
pub struct DesignSerializer {
    projection: FloorProjection,
    thumbnail: String,
    ids: StampAllocator,
}

impl DesignSerializer {
    pub fn new(projection: FloorProjection, thumbnail: impl Into<String>) -> Self {
        Self {
            projection,
            thumbnail: thumbnail.into(),
            ids: StampAllocator::default(),
        }
    }

    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self::new(
            FloorProjection::from_config(&config.projection),
            config.thumbnail_3d.clone(),
        )
    }

    pub fn projection(&self) -> &FloorProjection {
        &self.projection
    }

    /// Projects every placed item onto the canvas and stamps a new document.
    pub fn to_document(
        &mut self,
        scene: &SceneState,
        name: &str,
        clock: &dyn Clock,
    ) -> Result<DesignDocument, DesignError> {
        let items = scene
            .items()
            .iter()
            .map(|item| {
                let (x, y) = self.projection.project(item.position);
                DesignItem {
                    product_id: item.product_id.clone(),
                    product: item.product.clone(),
                    x,
                    y,
                    rotation_degrees: FloorProjection::radians_to_degrees(item.rotation),
                }
            })
            .collect();
        new_document(&mut self.ids, name, &self.thumbnail, items, clock)
    }

    /// Rebuilds placed items from a document. Ids are regenerated and
    /// positions that fall outside the room are clamped.
    pub fn scene_items_from_document(
        &self,
        doc: &DesignDocument,
        bounds: &FloorBounds,
        clock: &dyn Clock,
    ) -> Vec<PlacedItem> {
        let mut stamps = StampAllocator::default();
        doc.items
            .iter()
            .map(|entry| PlacedItem {
                id: ItemId::from(format!("{}-{}", entry.product_id, stamps.next(clock))),
                product_id: entry.product_id.clone(),
                product: entry.product.clone(),
                position: self.projection.unproject(entry.x, entry.y, bounds),
                rotation: normalize_yaw(FloorProjection::degrees_to_radians(
                    entry.rotation_degrees,
                )),
                color: None,
            })
            .collect()
    }
}

/// Validates the name and assembles a document around already-projected
/// items. Shared by the 2D canvas and the 3D serializer.
pub(crate) fn new_document(
    ids: &mut StampAllocator,
    name: &str,
    thumbnail: &str,
    items: Vec<DesignItem>,
    clock: &dyn Clock,
) -> Result<DesignDocument, DesignError> {
    if name.trim().is_empty() {
        return Err(DesignError::EmptyName);
    }
    Ok(DesignDocument {
        id: ids.next(clock).to_string(),
        name: name.to_string(),
        thumbnail: thumbnail.to_string(),
        items,
        created_at: clock.now(),
    })
}

/// 2D read path: the canvas items exactly as stored.
pub fn from_document(doc: &DesignDocument) -> Vec<DesignItem> {
    doc.items.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::clock::ManualClock;
    use crate::placement::clamp;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn chair() -> Product {
        Product::new("chair-3", "Dining Chairs (Set of 2)", "Dining", 259.0)
    }

    #[test]
    fn projection_constants() {
        let projection = FloorProjection::default();
        assert_eq!(projection.project(FloorPosition::ORIGIN), (400.0, 300.0));
        let (x, y) = projection.project(clamp(Vec3::new(-8.0, 0.0, 8.0)));
        assert!(close(x, 0.0) && close(y, 700.0));
    }

    #[test]
    fn to_document_projects_position_and_rotation() {
        let clock = ManualClock::new(1_700_000_000_000);
        let mut scene = SceneState::new();
        let id = scene.add_item(&chair(), &clock).id.clone();
        scene.set_placement(&id, clamp(Vec3::new(0.1, 0.0, -2.0)), FRAC_PI_2);

        let mut serializer = DesignSerializer::new(FloorProjection::default(), "thumb.jpg");
        let doc = serializer.to_document(&scene, "Dining nook", &clock).unwrap();

        assert_eq!(doc.name, "Dining nook");
        assert_eq!(doc.thumbnail, "thumb.jpg");
        assert_eq!(doc.id, "1700000000000");
        assert_eq!(doc.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(doc.items.len(), 1);
        let entry = &doc.items[0];
        assert_eq!(entry.product_id, "chair-3");
        assert!(close(entry.x, 405.0), "x = {}", entry.x);
        assert!(close(entry.y, 200.0), "y = {}", entry.y);
        assert!(close(entry.rotation_degrees, 90.0));
    }

    #[test]
    fn blank_names_are_rejected() {
        let clock = ManualClock::new(0);
        let scene = SceneState::new();
        let mut serializer = DesignSerializer::new(FloorProjection::default(), "");
        for name in ["", "   ", "\t\n"] {
            assert_eq!(
                serializer.to_document(&scene, name, &clock),
                Err(DesignError::EmptyName)
            );
        }
    }

    #[test]
    fn document_ids_are_unique_within_a_millisecond() {
        let clock = ManualClock::new(10);
        let scene = SceneState::new();
        let mut serializer = DesignSerializer::new(FloorProjection::default(), "");
        let a = serializer.to_document(&scene, "a", &clock).unwrap();
        let b = serializer.to_document(&scene, "b", &clock).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn document_json_matches_shared_layout_format() {
        let clock = ManualClock::new(0);
        let mut scene = SceneState::new();
        scene.add_item(&chair(), &clock);
        let mut serializer = DesignSerializer::new(FloorProjection::default(), "t");
        let doc = serializer.to_document(&scene, "Layout", &clock).unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("createdAt").is_some());
        let item = &value["items"][0];
        assert_eq!(item["productId"], "chair-3");
        assert_eq!(item["x"], 400.0);
        assert_eq!(item["y"], 300.0);
        assert_eq!(item["rotation"], 0.0);
        assert!(item.get("rotationDegrees").is_none());

        let back: DesignDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
        assert_eq!(from_document(&back), doc.items);
    }

    #[test]
    fn scene_items_rebuilt_through_inverse_projection() {
        let clock = ManualClock::new(0);
        let serializer = DesignSerializer::new(FloorProjection::default(), "");
        let doc = DesignDocument {
            id: "1".to_string(),
            name: "From 2D".to_string(),
            thumbnail: String::new(),
            items: vec![
                DesignItem {
                    product_id: "chair-3".to_string(),
                    product: chair(),
                    x: 405.0,
                    y: 200.0,
                    rotation_degrees: 90.0,
                },
                DesignItem {
                    product_id: "chair-3".to_string(),
                    product: chair(),
                    x: 0.0,
                    y: 0.0,
                    rotation_degrees: 405.0,
                },
            ],
            created_at: clock.now(),
        };

        let items = serializer.scene_items_from_document(&doc, &FloorBounds::DEFAULT, &clock);
        assert_eq!(items.len(), 2);
        assert_ne!(items[0].id, items[1].id);
        let p = items[0].position;
        assert!(close(p.x(), 0.1) && close(p.z(), -2.0));
        assert!(close(items[0].rotation, FRAC_PI_2));
        // The canvas corner maps onto the room's west edge.
        assert_eq!(items[1].position.to_array(), [-8.0, 0.0, -6.0]);
        assert!(close(items[1].rotation, std::f32::consts::FRAC_PI_4));
    }
}
