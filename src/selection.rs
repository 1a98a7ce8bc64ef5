//! Selection and interaction-mode state machine.
//!
//! Two axes: which item is selected (owned by [`SceneState`]) and the
//! interaction mode. Camera orbit and item dragging are mutually exclusive:
//! orbit runs in [`InteractionMode::View`], dragging in
//! [`InteractionMode::Transform`].

use crate::scene::{ItemId, SceneState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    #[default]
    View,
    Transform,
}

/// Derived state shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoneSelected,
    SelectedView,
    SelectedTransform,
}

#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: InteractionMode,
}

impl ModeController {
    pub fn new() -> Self {
        Self {
            mode: InteractionMode::View,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn state(&self, scene: &SceneState) -> SelectionState {
        match (scene.selected_id(), self.mode) {
            (None, _) => SelectionState::NoneSelected,
            (Some(_), InteractionMode::View) => SelectionState::SelectedView,
            (Some(_), InteractionMode::Transform) => SelectionState::SelectedTransform,
        }
    }

    /// Whether the transform toggle should be offered at all.
    pub fn can_enter_transform(&self, scene: &SceneState) -> bool {
        scene.selected_id().is_some()
    }

    /// Returns whether the mode changed. Entering transform mode with nothing
    /// selected is ignored.
    pub fn set_mode(&mut self, scene: &SceneState, mode: InteractionMode) -> bool {
        if mode == InteractionMode::Transform && !self.can_enter_transform(scene) {
            log::debug!("Ignoring transform mode request with no selection");
            return false;
        }
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Pointer landed on an item: select it, keep the mode. Ids no longer in
    /// the scene change nothing.
    pub fn click_item(&mut self, scene: &mut SceneState, id: &ItemId) {
        scene.select(Some(id));
        self.sync(scene);
    }

    /// Pointer landed on empty floor or sky.
    pub fn click_background(&mut self, scene: &mut SceneState) {
        scene.select(None);
        self.sync(scene);
    }

    /// Falls back to view mode once nothing is selected, so the camera
    /// never stays locked without a drag target.
    pub fn sync(&mut self, scene: &SceneState) {
        if scene.selected_id().is_none() {
            self.mode = InteractionMode::View;
        }
    }

    pub fn orbit_enabled(&self) -> bool {
        self.mode == InteractionMode::View
    }

    /// Dragging applies only to the selected item in transform mode.
    pub fn drag_enabled(&self, scene: &SceneState, id: &ItemId) -> bool {
        self.mode == InteractionMode::Transform && scene.selected_id() == Some(id)
    }
}
