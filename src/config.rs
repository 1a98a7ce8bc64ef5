//! Workspace configuration.
//!
//! Every field carries a serde default so a partial JSON file (or `{}`)
//! yields a complete configuration.

use std::f32::consts::PI;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Named swatch offered by the recolor control.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorOption {
    pub name: String,
    pub value: String,
}

/// Fixed affine mapping from the 3D floor plane onto the 2D canvas.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "default_projection_scale")]
    pub scale: f32,
    #[serde(default = "default_projection_offset_x")]
    pub offset_x: f32,
    #[serde(default = "default_projection_offset_y")]
    pub offset_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: f32,
    #[serde(default = "default_canvas_height")]
    pub height: f32,
    /// Edge length of the square tile an item occupies on the canvas.
    #[serde(default = "default_canvas_footprint")]
    pub item_footprint: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default = "default_camera_fov")]
    pub fov_deg: f32,
    #[serde(default = "default_camera_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_camera_max_distance")]
    pub max_distance: f32,
    #[serde(default = "default_camera_max_polar")]
    pub max_polar_angle: f32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkspaceConfig {
    /// Items are clamped to `[-room_half_extent, room_half_extent]` on x and z.
    #[serde(default = "default_room_half_extent")]
    pub room_half_extent: f32,
    #[serde(default = "default_floor_size")]
    pub floor_size: f32,
    #[serde(default = "default_wall_height")]
    pub wall_height: f32,
    /// Yaw increment applied by one rotate request, in radians.
    #[serde(default = "default_rotation_step")]
    pub rotation_step: f32,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_thumbnail")]
    pub thumbnail_3d: String,
    #[serde(default = "default_thumbnail_2d")]
    pub thumbnail_2d: String,
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
    /// Download name for the 2D canvas export.
    #[serde(default = "default_export_file_name_2d")]
    pub export_file_name_2d: String,
    #[serde(default = "default_palette")]
    pub palette: Vec<ColorOption>,
}

fn default_room_half_extent() -> f32 {
    8.0
}
fn default_floor_size() -> f32 {
    20.0
}
fn default_wall_height() -> f32 {
    5.0
}
fn default_rotation_step() -> f32 {
    PI / 4.0
}
fn default_projection_scale() -> f32 {
    50.0
}
fn default_projection_offset_x() -> f32 {
    400.0
}
fn default_projection_offset_y() -> f32 {
    300.0
}
fn default_canvas_width() -> f32 {
    800.0
}
fn default_canvas_height() -> f32 {
    600.0
}
fn default_canvas_footprint() -> f32 {
    128.0
}
fn default_camera_position() -> [f32; 3] {
    [8.0, 8.0, 8.0]
}
fn default_camera_fov() -> f32 {
    50.0
}
fn default_camera_min_distance() -> f32 {
    5.0
}
fn default_camera_max_distance() -> f32 {
    30.0
}
fn default_camera_max_polar() -> f32 {
    PI / 2.1
}
fn default_thumbnail() -> String {
    "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=400".to_string()
}
fn default_thumbnail_2d() -> String {
    "https://images.unsplash.com/photo-1591115906252-6d977fec0e34?w=400".to_string()
}
fn default_export_file_name_2d() -> String {
    "room-design.json".to_string()
}
fn default_export_file_name() -> String {
    "3d-room-design.json".to_string()
}
fn default_palette() -> Vec<ColorOption> {
    [
        ("Charcoal Gray", "#4A5568"),
        ("Navy Blue", "#2C5282"),
        ("Emerald Green", "#047857"),
        ("Burgundy", "#7C2D12"),
        ("Beige", "#D6BCAB"),
        ("White", "#F3F4F6"),
        ("Black", "#1F2937"),
        ("Brown", "#92400E"),
    ]
    .into_iter()
    .map(|(name, value)| ColorOption {
        name: name.to_string(),
        value: value.to_string(),
    })
    .collect()
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            scale: default_projection_scale(),
            offset_x: default_projection_offset_x(),
            offset_y: default_projection_offset_y(),
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            item_footprint: default_canvas_footprint(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            fov_deg: default_camera_fov(),
            min_distance: default_camera_min_distance(),
            max_distance: default_camera_max_distance(),
            max_polar_angle: default_camera_max_polar(),
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            room_half_extent: default_room_half_extent(),
            floor_size: default_floor_size(),
            wall_height: default_wall_height(),
            rotation_step: default_rotation_step(),
            projection: ProjectionConfig::default(),
            canvas: CanvasConfig::default(),
            camera: CameraConfig::default(),
            thumbnail_3d: default_thumbnail(),
            thumbnail_2d: default_thumbnail_2d(),
            export_file_name: default_export_file_name(),
            export_file_name_2d: default_export_file_name_2d(),
            palette: default_palette(),
        }
    }
}

impl WorkspaceConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: WorkspaceConfig = serde_json::from_str(&json)?;
        config.validate()?;
        log::debug!("Loaded workspace config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("room_half_extent", self.room_half_extent),
            ("floor_size", self.floor_size),
            ("wall_height", self.wall_height),
            ("rotation_step", self.rotation_step),
            ("projection.scale", self.projection.scale),
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
            ("camera.min_distance", self.camera.min_distance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.room_half_extent * 2.0 > self.floor_size {
            return Err(ConfigError::Invalid(format!(
                "room_half_extent {} does not fit a floor of size {}",
                self.room_half_extent, self.floor_size
            )));
        }
        if self.canvas.item_footprint < 0.0
            || self.canvas.item_footprint > self.canvas.width.min(self.canvas.height)
        {
            return Err(ConfigError::Invalid(
                "canvas.item_footprint must fit inside the canvas".to_string(),
            ));
        }
        if self.camera.min_distance > self.camera.max_distance {
            return Err(ConfigError::Invalid(
                "camera.min_distance exceeds camera.max_distance".to_string(),
            ));
        }
        Ok(())
    }
}
