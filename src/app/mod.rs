//! The 3D room workspace: owns the scene and routes interaction events to
//! selection, placement and persistence.
//!
//! The catalog and the design store belong to the surrounding application
//! and are passed in per call.

pub mod clock;
pub mod input;

use crate::catalog::{Catalog, Product};
use crate::config::WorkspaceConfig;
use crate::design::store::{DesignStore, StoreError};
use crate::design::{DesignDocument, DesignError, DesignSerializer};
use crate::placement::{DragSession, FloorBounds, FloorPosition};
use crate::render::{build_draw_list, Frame, OrbitCamera, RoomGeometry, SceneRenderer};
use crate::scene::serialization::{self, SerializationError};
use crate::scene::{ItemId, SceneState};
use crate::selection::{InteractionMode, ModeController};
use clock::{Clock, SystemClock};
use glam::Vec3;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Please enter a design name")]
    EmptyDesignName,
    #[error("unknown product: {0}")]
    UnknownProduct(String),
    #[error("design store error: {0}")]
    Store(#[from] StoreError),
    #[error("export failed: {0}")]
    Serialization(#[from] SerializationError),
}

impl WorkspaceError {
    /// Rejections caused by user input, as opposed to I/O failures.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::EmptyDesignName | Self::UnknownProduct(_))
    }
}

impl From<DesignError> for WorkspaceError {
    fn from(err: DesignError) -> Self {
        match err {
            DesignError::EmptyName => Self::EmptyDesignName,
        }
    }
}

/// Transient message for the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Downloadable export of the raw scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

pub struct Workspace {
    config: WorkspaceConfig,
    bounds: FloorBounds,
    room: RoomGeometry,
    scene: SceneState,
    modes: ModeController,
    camera: OrbitCamera,
    serializer: DesignSerializer,
    drag: Option<DragSession>,
    notifications: Vec<Notification>,
    clock: Box<dyn Clock>,
}

impl Workspace {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: WorkspaceConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            bounds: FloorBounds::new(config.room_half_extent),
            room: RoomGeometry::from_config(&config),
            scene: SceneState::new(),
            modes: ModeController::new(),
            camera: OrbitCamera::new(&config.camera),
            serializer: DesignSerializer::from_config(&config),
            drag: None,
            notifications: Vec::new(),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn mode(&self) -> InteractionMode {
        self.modes.mode()
    }

    pub fn modes(&self) -> &ModeController {
        &self.modes
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn bounds(&self) -> &FloorBounds {
        &self.bounds
    }

    pub fn active_drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify_success(&mut self, message: String) {
        log::info!("{}", message);
        self.notifications.push(Notification::Success(message));
    }

    fn notify_error(&mut self, message: String) {
        log::warn!("{}", message);
        self.notifications.push(Notification::Error(message));
    }

    /// A catalog entry was picked: place it at the origin and select it.
    pub fn on_add_product(&mut self, product: &Product) -> ItemId {
        let id = self.scene.add_item(product, self.clock.as_ref()).id.clone();
        self.notify_success(format!("{} added to scene", product.name));
        id
    }

    pub fn on_add_product_id(
        &mut self,
        catalog: &Catalog,
        product_id: &str,
    ) -> Result<ItemId, WorkspaceError> {
        match catalog.get(product_id) {
            Some(product) => Ok(self.on_add_product(product)),
            None => {
                let err = WorkspaceError::UnknownProduct(product_id.to_string());
                self.notify_error(err.to_string());
                Err(err)
            }
        }
    }

    /// Selects the item under the pointer. A stale id leaves selection and
    /// mode as they are.
    pub fn on_pointer_down_on_item(&mut self, id: &ItemId) {
        if !self.scene.contains(id) {
            log::debug!("Pointer down on stale item {}", id);
            return;
        }
        self.modes.click_item(&mut self.scene, id);
        self.end_drag_if_not_selected();
    }

    pub fn on_pointer_down_on_background(&mut self) {
        self.modes.click_background(&mut self.scene);
        self.end_drag_if_not_selected();
    }

    /// Returns whether the mode changed.
    pub fn on_mode_toggle(&mut self, mode: InteractionMode) -> bool {
        let changed = self.modes.set_mode(&self.scene, mode);
        if changed {
            log::debug!("Interaction mode -> {:?}", mode);
        }
        if !matches!(mode, InteractionMode::Transform) {
            self.finish_drag();
        }
        changed
    }

    /// Applies one drag event. The raw point is clamped into the room before
    /// it reaches the scene; ignored unless the item is selected in
    /// transform mode.
    pub fn on_drag_update(&mut self, id: &ItemId, raw: Vec3) -> Option<FloorPosition> {
        if !self.modes.drag_enabled(&self.scene, id) {
            log::debug!("Ignoring drag of {} in {:?} mode", id, self.modes.mode());
            return None;
        }
        let item = self.scene.item(id)?;
        let rotation = item.rotation;
        let start = item.position;

        let restart = self.drag.as_ref().map_or(true, |drag| drag.item_id() != id);
        if restart {
            self.finish_drag();
            self.drag = Some(DragSession::begin(id.clone(), start));
        }
        let drag = self.drag.as_mut()?;
        let position = drag.update(&self.bounds, raw);
        self.scene.set_placement(id, position, rotation);
        log::debug!("Drag {} -> ({:.2}, {:.2})", id, position.x(), position.z());
        Some(position)
    }

    /// Drag driven by a pointer in screen space: the pointer ray is cast onto
    /// the floor, then handled like [`on_drag_update`](Self::on_drag_update).
    pub fn on_drag_pointer(
        &mut self,
        id: &ItemId,
        px: f32,
        py: f32,
        viewport: (f32, f32),
    ) -> Option<FloorPosition> {
        let (origin, dir) = self.camera.screen_ray(px, py, viewport.0, viewport.1)?;
        let hit = crate::placement::floor_hit(origin, dir)?;
        self.on_drag_update(id, hit)
    }

    /// Pointer released: the last clamped position stays.
    pub fn on_drag_end(&mut self) -> Option<FloorPosition> {
        self.finish_drag()
    }

    fn finish_drag(&mut self) -> Option<FloorPosition> {
        let drag = self.drag.take()?;
        let id = drag.item_id().clone();
        let updates = drag.updates();
        let position = drag.finish();
        log::debug!(
            "Drag of {} committed at ({:.2}, {:.2}) after {} updates",
            id,
            position.x(),
            position.z(),
            updates
        );
        Some(position)
    }

    fn end_drag_if_not_selected(&mut self) {
        let selected = self.scene.selected_id().cloned();
        if self
            .drag
            .as_ref()
            .is_some_and(|drag| Some(drag.item_id()) != selected.as_ref())
        {
            self.finish_drag();
        }
    }

    /// Returns the new yaw of the selected item in radians.
    pub fn on_rotate_step_request(&mut self) -> Option<f32> {
        self.scene.rotate_selected(self.config.rotation_step)
    }

    /// Recolors the selected item. Returns whether anything changed.
    pub fn on_color_change_request(&mut self, color: &str) -> bool {
        let Some(id) = self.scene.selected_id().cloned() else {
            return false;
        };
        self.scene.set_color(&id, color)
    }

    pub fn on_remove_request(&mut self, id: &ItemId) -> bool {
        if self.drag.as_ref().is_some_and(|drag| drag.item_id() == id) {
            self.drag = None;
        }
        let removed = self.scene.remove_item(id).is_some();
        self.modes.sync(&self.scene);
        if removed {
            self.notify_success("Item removed".to_string());
        }
        removed
    }

    /// Empties the room.
    pub fn reset(&mut self) {
        self.drag = None;
        self.scene.clear();
        self.modes.sync(&self.scene);
    }

    /// Camera orbit; only active in view mode.
    pub fn on_orbit(&mut self, azimuth_delta: f32, polar_delta: f32) -> bool {
        if !self.modes.orbit_enabled() {
            return false;
        }
        self.camera.orbit(azimuth_delta, polar_delta);
        true
    }

    pub fn on_zoom(&mut self, delta: f32) -> bool {
        if !self.modes.orbit_enabled() {
            return false;
        }
        self.camera.zoom(delta);
        true
    }

    /// Projects the scene into a design document and hands it to the store.
    /// A blank name is rejected and nothing is stored.
    pub fn on_save_request(
        &mut self,
        name: &str,
        store: &mut dyn DesignStore,
    ) -> Result<DesignDocument, WorkspaceError> {
        let doc = match self
            .serializer
            .to_document(&self.scene, name, self.clock.as_ref())
        {
            Ok(doc) => doc,
            Err(err) => {
                let err = WorkspaceError::from(err);
                self.notify_error(err.to_string());
                return Err(err);
            }
        };
        store.save(doc.clone())?;
        self.notify_success(format!("Design '{}' saved successfully!", doc.name));
        Ok(doc)
    }

    pub fn on_export_request(&mut self) -> Result<ExportFile, WorkspaceError> {
        let contents = serialization::serialize(&self.scene)?;
        let file = ExportFile {
            file_name: self.config.export_file_name.clone(),
            contents,
        };
        self.notify_success("Design exported!".to_string());
        Ok(file)
    }

    /// Replaces the room with a saved design (3D or 2D origin). Positions
    /// are recovered through the inverse canvas projection.
    pub fn open_document(&mut self, doc: &DesignDocument) {
        let items =
            self.serializer
                .scene_items_from_document(doc, &self.bounds, self.clock.as_ref());
        self.drag = None;
        self.scene.replace(items, self.clock.as_ref());
        self.modes.sync(&self.scene);
        self.notify_success(format!(
            "Opened '{}' with {} items",
            doc.name,
            self.scene.len()
        ));
    }

    pub fn render(&self, renderer: &mut dyn SceneRenderer, aspect: f32) {
        let frame = Frame {
            room: &self.room,
            items: build_draw_list(&self.scene),
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(aspect),
        };
        renderer.draw(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::clock::ManualClock;
    use super::*;
    use crate::design::store::MemoryDesignStore;
    use std::f32::consts::FRAC_PI_4;

    fn workspace() -> Workspace {
        Workspace::with_clock(
            WorkspaceConfig::default(),
            Box::new(ManualClock::new(1_700_000_000_000)),
        )
    }

    fn sofa() -> Product {
        Product::new("sofa-01", "Velvet Sofa", "Living Room", 1299.0)
    }

    #[test]
    fn add_selects_and_notifies() {
        let mut ws = workspace();
        let id = ws.on_add_product(&sofa());
        assert_eq!(ws.scene().selected_id(), Some(&id));
        assert_eq!(
            ws.take_notifications(),
            vec![Notification::Success("Velvet Sofa added to scene".to_string())]
        );
        assert!(ws.take_notifications().is_empty());
    }

    #[test]
    fn drag_is_ignored_in_view_mode() {
        let mut ws = workspace();
        let id = ws.on_add_product(&sofa());
        assert_eq!(ws.on_drag_update(&id, Vec3::new(2.0, 0.0, 2.0)), None);
        assert_eq!(ws.scene().item(&id).unwrap().position, FloorPosition::ORIGIN);
    }

    #[test]
    fn every_drag_update_is_clamped() {
        let mut ws = workspace();
        let id = ws.on_add_product(&sofa());
        assert!(ws.on_mode_toggle(InteractionMode::Transform));

        let p = ws.on_drag_update(&id, Vec3::new(3.0, 1.5, -2.0)).unwrap();
        assert_eq!(p.to_array(), [3.0, 0.0, -2.0]);
        let p = ws.on_drag_update(&id, Vec3::new(42.0, 0.0, -42.0)).unwrap();
        assert_eq!(p.to_array(), [8.0, 0.0, -8.0]);
        assert_eq!(ws.scene().item(&id).unwrap().position, p);
        assert_eq!(ws.active_drag().unwrap().updates(), 2);

        assert_eq!(ws.on_drag_end(), Some(p));
        assert!(ws.active_drag().is_none());
        assert_eq!(ws.scene().item(&id).unwrap().position.to_array(), [8.0, 0.0, -8.0]);
    }

    #[test]
    fn drag_keeps_rotation() {
        let mut ws = workspace();
        let id = ws.on_add_product(&sofa());
        ws.on_rotate_step_request();
        ws.on_mode_toggle(InteractionMode::Transform);
        ws.on_drag_update(&id, Vec3::new(1.0, 0.0, 1.0));
        let rotation = ws.scene().item(&id).unwrap().rotation;
        assert!((rotation - FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn orbit_suspended_in_transform_mode() {
        let mut ws = workspace();
        ws.on_add_product(&sofa());
        let before = ws.camera().azimuth;
        ws.on_mode_toggle(InteractionMode::Transform);
        assert!(!ws.on_orbit(0.5, 0.0));
        assert!(!ws.on_zoom(2.0));
        assert_eq!(ws.camera().azimuth, before);

        ws.on_mode_toggle(InteractionMode::View);
        assert!(ws.on_orbit(0.5, 0.0));
        assert!(ws.camera().azimuth != before);
    }

    #[test]
    fn removing_the_selected_item_returns_to_view() {
        let mut ws = workspace();
        let id = ws.on_add_product(&sofa());
        ws.on_mode_toggle(InteractionMode::Transform);
        ws.on_drag_update(&id, Vec3::ONE);
        assert!(ws.on_remove_request(&id));
        assert_eq!(ws.scene().selected_id(), None);
        assert_eq!(ws.mode(), InteractionMode::View);
        assert!(ws.active_drag().is_none());
        assert!(!ws.on_remove_request(&id));
    }

    #[test]
    fn click_on_stale_item_keeps_selection_and_mode() {
        let mut ws = workspace();
        let id = ws.on_add_product(&sofa());
        assert!(ws.on_mode_toggle(InteractionMode::Transform));
        ws.on_drag_update(&id, Vec3::new(1.0, 0.0, 1.0));

        ws.on_pointer_down_on_item(&ItemId::from("ghost-1"));
        assert_eq!(ws.scene().selected_id(), Some(&id));
        assert_eq!(ws.mode(), InteractionMode::Transform);
        assert!(ws.active_drag().is_some());
    }

    #[test]
    fn inverted_camera_limits_do_not_panic() {
        let mut config = WorkspaceConfig::default();
        config.camera.min_distance = 50.0;
        config.room_half_extent = f32::NAN;
        let mut ws = Workspace::with_clock(config, Box::new(ManualClock::new(0)));
        assert_eq!(ws.camera().distance, 30.0);
        assert!(ws.on_zoom(100.0));
        assert_eq!(ws.camera().distance, 50.0);
        assert_eq!(ws.bounds().half_extent(), 8.0);

        let id = ws.on_add_product(&sofa());
        ws.on_mode_toggle(InteractionMode::Transform);
        let p = ws.on_drag_update(&id, Vec3::new(20.0, 0.0, 0.0)).unwrap();
        assert_eq!(p.to_array(), [8.0, 0.0, 0.0]);
    }

    #[test]
    fn failed_store_write_reports_error_and_keeps_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("designs.json");
        let mut store = crate::design::store::JsonFileDesignStore::open(&path).unwrap();
        let mut ws = workspace();
        ws.on_add_product(&sofa());
        ws.take_notifications();

        let err = ws.on_save_request("Lounge", &mut store).unwrap_err();
        assert!(matches!(err, WorkspaceError::Store(_)));
        assert!(!err.is_rejection());
        assert!(store.list().is_empty());
        assert!(ws.take_notifications().is_empty());
    }

    #[test]
    fn color_and_rotation_need_a_selection() {
        let mut ws = workspace();
        let id = ws.on_add_product(&sofa());
        ws.on_pointer_down_on_background();
        assert!(!ws.on_color_change_request("#047857"));
        assert_eq!(ws.on_rotate_step_request(), None);

        ws.on_pointer_down_on_item(&id);
        assert!(ws.on_color_change_request("#047857"));
        assert_eq!(
            ws.scene().item(&id).unwrap().color.as_deref(),
            Some("#047857")
        );
    }

    #[test]
    fn blank_save_is_rejected_without_touching_the_store() {
        let mut ws = workspace();
        ws.on_add_product(&sofa());
        let mut store = MemoryDesignStore::new();
        let before = ws.scene().items().to_vec();
        ws.take_notifications();

        let err = ws.on_save_request("   ", &mut store).unwrap_err();
        assert!(matches!(err, WorkspaceError::EmptyDesignName));
        assert!(err.is_rejection());
        assert!(store.list().is_empty());
        assert_eq!(ws.scene().items(), before.as_slice());
        assert_eq!(
            ws.take_notifications(),
            vec![Notification::Error("Please enter a design name".to_string())]
        );
    }

    #[test]
    fn save_stores_projected_document() {
        let mut ws = workspace();
        let id = ws.on_add_product(&sofa());
        ws.on_mode_toggle(InteractionMode::Transform);
        ws.on_drag_update(&id, Vec3::new(0.1, 0.0, -2.0));
        ws.on_rotate_step_request();
        ws.on_rotate_step_request();

        let mut store = MemoryDesignStore::new();
        let doc = ws.on_save_request("Lounge", &mut store).unwrap();
        assert_eq!(store.list(), &[doc.clone()]);
        let entry = &doc.items[0];
        assert!((entry.x - 405.0).abs() < 1e-3);
        assert!((entry.y - 200.0).abs() < 1e-3);
        assert!((entry.rotation_degrees - 90.0).abs() < 1e-3);
    }

    #[test]
    fn export_uses_configured_file_name() {
        let mut ws = workspace();
        ws.on_add_product(&sofa());
        let file = ws.on_export_request().unwrap();
        assert_eq!(file.file_name, "3d-room-design.json");
        let items: serde_json::Value = serde_json::from_slice(&file.contents).unwrap();
        assert_eq!(items.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn unknown_product_id_is_rejected() {
        let mut ws = workspace();
        let catalog = Catalog::from_products(vec![sofa()]).unwrap();
        assert!(ws.on_add_product_id(&catalog, "sofa-01").is_ok());
        let err = ws.on_add_product_id(&catalog, "nope").unwrap_err();
        assert!(matches!(err, WorkspaceError::UnknownProduct(ref id) if id == "nope"));
        assert_eq!(ws.scene().len(), 1);
    }

    #[test]
    fn open_document_restores_layout_without_selection() {
        let mut ws = workspace();
        let id = ws.on_add_product(&sofa());
        ws.on_mode_toggle(InteractionMode::Transform);
        ws.on_drag_update(&id, Vec3::new(-3.0, 0.0, 4.0));
        let mut store = MemoryDesignStore::new();
        let doc = ws.on_save_request("Snapshot", &mut store).unwrap();

        ws.reset();
        assert!(ws.scene().is_empty());
        ws.open_document(&doc);
        assert_eq!(ws.scene().len(), 1);
        assert_eq!(ws.scene().selected_id(), None);
        assert_eq!(ws.mode(), InteractionMode::View);
        let p = ws.scene().items()[0].position;
        assert!((p.x() + 3.0).abs() < 1e-4 && (p.z() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn pointer_drag_lands_on_the_floor_inside_the_room() {
        let mut ws = workspace();
        let id = ws.on_add_product(&sofa());
        ws.on_mode_toggle(InteractionMode::Transform);
        let center = ws.on_drag_pointer(&id, 400.0, 300.0, (800.0, 600.0)).unwrap();
        assert!(center.x().abs() < 1e-2 && center.z().abs() < 1e-2);
        // Far corner of the screen aims beyond the room and gets clamped.
        if let Some(edge) = ws.on_drag_pointer(&id, 0.0, 0.0, (800.0, 600.0)) {
            assert!(ws.bounds().contains(edge));
        }
    }
}
