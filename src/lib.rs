//! Room planner - furniture placement for a virtual room.
//!
//! Products from a storefront catalog are placed on the floor of a 3D room,
//! moved and rotated, then saved as design documents that the flat 2D
//! layout canvas can also open.

pub mod app;
pub mod canvas2d;
pub mod catalog;
pub mod config;
pub mod design;
pub mod placement;
pub mod render;
pub mod scene;
pub mod selection;

pub use app::{Notification, Workspace, WorkspaceError};
pub use catalog::{Archetype, Catalog, Product};
pub use config::WorkspaceConfig;
pub use design::{DesignDocument, DesignItem};
pub use placement::{FloorBounds, FloorPosition};
pub use scene::{ItemId, PlacedItem, SceneState};
