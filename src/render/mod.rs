//! Hand-off to the 3D renderer.
//!
//! Drawing is done by an external graphics backend. The workspace describes
//! each frame as a [`Frame`]: static room geometry, one [`DrawItem`] per placed
//! item, and the camera matrices.

mod camera;

pub use camera::OrbitCamera;

use crate::catalog::Archetype;
use crate::config::WorkspaceConfig;
use crate::scene::{ItemId, SceneState};
use glam::Mat4;

/// Outline color drawn around the selected item.
pub const SELECTION_HIGHLIGHT: &str = "#3B82F6";

/// Floor plus back, left and right walls. The front stays open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomGeometry {
    pub floor_size: f32,
    pub wall_height: f32,
}

impl RoomGeometry {
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self {
            floor_size: config.floor_size,
            wall_height: config.wall_height,
        }
    }

    pub fn half_size(&self) -> f32 {
        self.floor_size * 0.5
    }

    /// Wall centers: back (-z), left (-x), right (+x).
    pub fn wall_centers(&self) -> [[f32; 3]; 3] {
        let h = self.half_size();
        let y = self.wall_height * 0.5;
        [[0.0, y, -h], [-h, y, 0.0], [h, y, 0.0]]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub item_id: ItemId,
    pub archetype: Archetype,
    pub transform: Mat4,
    pub color: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub room: &'a RoomGeometry,
    pub items: Vec<DrawItem>,
    pub view: Mat4,
    pub projection: Mat4,
}

pub trait SceneRenderer {
    fn draw(&mut self, frame: &Frame<'_>);
}

/// One entry per placed item, in scene order.
pub fn build_draw_list(scene: &SceneState) -> Vec<DrawItem> {
    let selected = scene.selected_id();
    scene
        .items()
        .iter()
        .map(|item| DrawItem {
            item_id: item.id.clone(),
            archetype: item.archetype(),
            transform: item.transform(),
            color: item.effective_color().to_string(),
            selected: selected == Some(&item.id),
        })
        .collect()
}

/// Writes a one-line summary of each drawn item to the log. Used by the
/// headless driver in place of a graphics backend.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u32,
}

impl LogRenderer {
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl SceneRenderer for LogRenderer {
    fn draw(&mut self, frame: &Frame<'_>) {
        self.frames = self.frames.saturating_add(1);
        log::info!(
            "Frame {}: {} items in a {}x{} room",
            self.frames,
            frame.items.len(),
            frame.room.floor_size,
            frame.room.floor_size
        );
        for item in &frame.items {
            let position = item.transform.w_axis;
            log::info!(
                "  {}{} {} at ({:.2}, {:.2}, {:.2}) color {}",
                if item.selected { "*" } else { " " },
                item.item_id,
                item.archetype,
                position.x,
                position.y,
                position.z,
                item.color
            );
        }
    }
}
