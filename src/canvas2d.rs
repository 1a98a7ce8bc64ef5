//! Flat drag-and-drop layout, the older of the two workspaces.
//!
//! Each product appears at most once: dropping a product that is already on
//! the canvas moves it. Items are addressed by product id.

use crate::app::clock::{Clock, StampAllocator};
use crate::app::ExportFile;
use crate::catalog::Product;
use crate::config::{CanvasConfig, WorkspaceConfig};
use crate::design::{new_document, DesignDocument, DesignError, DesignItem};
use crate::scene::serialization::SerializationError;

const ROTATION_STEP_DEG: f32 = 45.0;

#[derive(Debug, Clone)]
pub struct LayoutCanvas {
    config: CanvasConfig,
    thumbnail: String,
    export_file_name: String,
    items: Vec<DesignItem>,
    ids: StampAllocator,
}

impl LayoutCanvas {
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            config: config.canvas,
            thumbnail: config.thumbnail_2d.clone(),
            export_file_name: config.export_file_name_2d.clone(),
            items: Vec::new(),
            ids: StampAllocator::default(),
        }
    }

    pub fn items(&self) -> &[DesignItem] {
        &self.items
    }

    pub fn item(&self, product_id: &str) -> Option<&DesignItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Keeps the whole item tile on the canvas.
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        let max_x = (self.config.width - self.config.item_footprint).max(0.0);
        let max_y = (self.config.height - self.config.item_footprint).max(0.0);
        let x = if x.is_finite() { x } else { 0.0 };
        let y = if y.is_finite() { y } else { 0.0 };
        (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }

    /// Drops `product` at `(x, y)`, adding it or moving the existing entry.
    pub fn drop_product(&mut self, product: &Product, x: f32, y: f32) {
        let (x, y) = self.clamp(x, y);
        match self.items.iter_mut().find(|item| item.product_id == product.id) {
            Some(existing) => {
                existing.x = x;
                existing.y = y;
            }
            None => self.items.push(DesignItem {
                product_id: product.id.clone(),
                product: product.clone(),
                x,
                y,
                rotation_degrees: 0.0,
            }),
        }
    }

    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        self.items.len() != before
    }

    /// Turns the item a further 45 degrees, wrapping at 360.
    pub fn rotate(&mut self, product_id: &str) -> Option<f32> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)?;
        item.rotation_degrees = (item.rotation_degrees + ROTATION_STEP_DEG).rem_euclid(360.0);
        Some(item.rotation_degrees)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn to_document(
        &mut self,
        name: &str,
        clock: &dyn Clock,
    ) -> Result<DesignDocument, DesignError> {
        new_document(&mut self.ids, name, &self.thumbnail, self.items.clone(), clock)
    }

    /// Raw canvas items as pretty JSON, in canvas coordinates.
    pub fn export(&self) -> Result<ExportFile, SerializationError> {
        Ok(ExportFile {
            file_name: self.export_file_name.clone(),
            contents: serde_json::to_vec_pretty(&self.items)?,
        })
    }

    /// Opens a saved design, including ones saved from the 3D room. Later
    /// duplicates of a product replace earlier ones.
    pub fn load(&mut self, doc: &DesignDocument) {
        self.items.clear();
        for entry in &doc.items {
            let (x, y) = self.clamp(entry.x, entry.y);
            let item = DesignItem {
                x,
                y,
                rotation_degrees: entry.rotation_degrees.rem_euclid(360.0),
                ..entry.clone()
            };
            match self
                .items
                .iter_mut()
                .find(|existing| existing.product_id == item.product_id)
            {
                Some(existing) => *existing = item,
                None => self.items.push(item),
            }
        }
    }
}
