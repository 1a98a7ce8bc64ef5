//! Raw scene export: the placed-item list as pretty JSON, no projection.

use crate::placement::FloorBounds;
use crate::scene::{PlacedItem, SceneState};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SerializationError>;

pub fn serialize(scene: &SceneState) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(scene.items())?)
}

/// Reads an export back. Positions are re-clamped to `bounds` because the
/// file may have been edited by hand.
pub fn deserialize_items(bytes: &[u8], bounds: &FloorBounds) -> Result<Vec<PlacedItem>> {
    let mut items: Vec<PlacedItem> = serde_json::from_slice(bytes)?;
    for item in &mut items {
        item.position = bounds.clamp_position(item.position);
    }
    Ok(items)
}

pub fn save_scene_to_file(scene: &SceneState, path: &Path) -> Result<()> {
    let bytes = serialize(scene)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn load_items_from_file(path: &Path, bounds: &FloorBounds) -> Result<Vec<PlacedItem>> {
    let bytes = std::fs::read(path)?;
    deserialize_items(&bytes, bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::clock::ManualClock;
    use crate::catalog::Product;
    use crate::placement::clamp;
    use glam::Vec3;

    fn sample_scene() -> SceneState {
        let clock = ManualClock::new(1_000);
        let mut scene = SceneState::new();
        let sofa = Product::new("sofa-01", "Velvet Sofa", "Living Room", 1299.0);
        let desk = Product::new("desk-02", "Walnut Desk", "Office", 499.0);
        let sofa_id = scene.add_item(&sofa, &clock).id.clone();
        let desk_id = scene.add_item(&desk, &clock).id.clone();
        scene.set_placement(&sofa_id, clamp(Vec3::new(-2.0, 0.0, 3.5)), 1.0);
        scene.set_color(&desk_id, "#1F2937");
        scene
    }

    #[test]
    fn test_empty_scene_exports_empty_array() {
        let scene = SceneState::new();
        let bytes = serialize(&scene).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "[]");
    }

    #[test]
    fn test_export_is_raw_item_list() {
        let scene = sample_scene();
        let json = String::from_utf8(serialize(&scene).unwrap()).unwrap();
        println!("Exported scene:\n{}", json);

        assert!(json.contains("\"productId\": \"sofa-01\""));
        assert!(json.contains("\"position\""));
        assert!(json.contains("\"rotation\": 1.0"));
        assert!(json.contains("\"color\": \"#1F2937\""));
        // No 2D projection in the export.
        assert!(!json.contains("\"x\""));
        assert!(json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value[0];
        assert_eq!(first["position"], serde_json::json!([-2.0, 0.0, 3.5]));
        assert!(first.get("color").is_none());
    }

    #[test]
    fn test_reload_clamps_edited_positions() {
        let json = r#"[{
            "id": "bed-1",
            "productId": "bed",
            "product": { "id": "bed", "name": "Platform Bed", "category": "Bedroom", "price": 899.0 },
            "position": [30.0, 2.0, -1.0],
            "rotation": 0.5
        }]"#;
        let items = deserialize_items(json.as_bytes(), &FloorBounds::DEFAULT).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].position.to_array(), [8.0, 0.0, -1.0]);
        assert_eq!(items[0].color, None);
    }

    #[test]
    fn test_save_load_via_file() {
        let scene = sample_scene();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("3d-room-design.json");

        save_scene_to_file(&scene, &path).unwrap();
        let items = load_items_from_file(&path, &FloorBounds::DEFAULT).unwrap();
        assert_eq!(items.as_slice(), scene.items());
    }

    #[test]
    fn test_malformed_export_is_a_json_error() {
        let err = deserialize_items(b"{ not json", &FloorBounds::DEFAULT).unwrap_err();
        assert!(matches!(err, SerializationError::Json(_)));
    }
}
