//! Scripted interaction events, used to drive a workspace without a UI.

use super::{ExportFile, Workspace, WorkspaceError};
use crate::catalog::Catalog;
use crate::design::store::DesignStore;
use crate::design::DesignDocument;
use crate::render::SceneRenderer;
use crate::scene::ItemId;
use crate::selection::InteractionMode;
use glam::Vec3;

/// Addresses a placed item either by id or by its position in the scene.
/// Scripts cannot know generated ids, so indices are the usual form.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    Index(usize),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InteractionEvent {
    AddProduct { product_id: String },
    PointerDownOnItem { item: ItemRef },
    PointerDownOnBackground,
    DragUpdate { item: ItemRef, position: [f32; 3] },
    DragPointer {
        item: ItemRef,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    DragEnd,
    ModeToggle { mode: InteractionMode },
    RotateStep,
    ColorChange { color: String },
    Remove { item: ItemRef },
    Orbit { azimuth: f32, polar: f32 },
    Zoom { delta: f32 },
    Save { name: String },
    Export,
    Render { aspect: f32 },
}

/// What a replayed session produced.
#[derive(Debug, Default)]
pub struct SessionReport {
    pub events: usize,
    pub ignored: usize,
    pub rejected: Vec<String>,
    pub saved: Vec<DesignDocument>,
    pub exports: Vec<ExportFile>,
}

impl Workspace {
    fn resolve(&self, item: &ItemRef) -> Option<ItemId> {
        match item {
            ItemRef::Index(index) => self.scene().items().get(*index).map(|item| item.id.clone()),
            ItemRef::Id(id) => Some(ItemId::from(id.as_str())),
        }
    }

    /// Applies one event. User-facing rejections (blank design name, unknown
    /// product) are recorded in the report; store and export failures abort.
    pub fn apply_event(
        &mut self,
        event: &InteractionEvent,
        catalog: &Catalog,
        store: &mut dyn DesignStore,
        renderer: &mut dyn SceneRenderer,
        report: &mut SessionReport,
    ) -> Result<(), WorkspaceError> {
        report.events += 1;
        let applied = match event {
            InteractionEvent::AddProduct { product_id } => {
                match self.on_add_product_id(catalog, product_id) {
                    Ok(_) => true,
                    Err(err) if err.is_rejection() => {
                        report.rejected.push(err.to_string());
                        true
                    }
                    Err(err) => return Err(err),
                }
            }
            InteractionEvent::PointerDownOnItem { item } => match self.resolve(item) {
                Some(id) if self.scene().contains(&id) => {
                    self.on_pointer_down_on_item(&id);
                    true
                }
                _ => false,
            },
            InteractionEvent::PointerDownOnBackground => {
                self.on_pointer_down_on_background();
                true
            }
            InteractionEvent::DragUpdate { item, position } => self
                .resolve(item)
                .and_then(|id| self.on_drag_update(&id, Vec3::from_array(*position)))
                .is_some(),
            InteractionEvent::DragPointer {
                item,
                x,
                y,
                width,
                height,
            } => self
                .resolve(item)
                .and_then(|id| self.on_drag_pointer(&id, *x, *y, (*width, *height)))
                .is_some(),
            InteractionEvent::DragEnd => self.on_drag_end().is_some(),
            InteractionEvent::ModeToggle { mode } => {
                self.on_mode_toggle(*mode);
                self.mode() == *mode
            }
            InteractionEvent::RotateStep => self.on_rotate_step_request().is_some(),
            InteractionEvent::ColorChange { color } => self.on_color_change_request(color),
            InteractionEvent::Remove { item } => self
                .resolve(item)
                .is_some_and(|id| self.on_remove_request(&id)),
            InteractionEvent::Orbit { azimuth, polar } => self.on_orbit(*azimuth, *polar),
            InteractionEvent::Zoom { delta } => self.on_zoom(*delta),
            InteractionEvent::Save { name } => match self.on_save_request(name, store) {
                Ok(doc) => {
                    report.saved.push(doc);
                    true
                }
                Err(err) if err.is_rejection() => {
                    report.rejected.push(err.to_string());
                    true
                }
                Err(err) => return Err(err),
            },
            InteractionEvent::Export => {
                report.exports.push(self.on_export_request()?);
                true
            }
            InteractionEvent::Render { aspect } => {
                self.render(renderer, *aspect);
                true
            }
        };
        if !applied {
            log::debug!("Event had no effect: {:?}", event);
            report.ignored += 1;
        }
        Ok(())
    }

    pub fn replay(
        &mut self,
        events: &[InteractionEvent],
        catalog: &Catalog,
        store: &mut dyn DesignStore,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<SessionReport, WorkspaceError> {
        let mut report = SessionReport::default();
        for event in events {
            self.apply_event(event, catalog, store, renderer, &mut report)?;
        }
        log::info!(
            "Replayed {} events ({} ignored, {} rejected, {} saved, {} exported)",
            report.events,
            report.ignored,
            report.rejected.len(),
            report.saved.len(),
            report.exports.len()
        );
        Ok(report)
    }
}
