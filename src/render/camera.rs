use crate::config::CameraConfig;
use glam::{Mat4, Vec3};

const MIN_POLAR: f32 = 1.0e-3;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Orbit camera circling a target point on the floor.
///
/// Angles are spherical: `azimuth` around +Y measured from +Z, `polar` down
/// from +Y. `polar` is capped just short of the horizon so the camera never
/// dips under the floor.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: [f32; 3],
    pub azimuth: f32,
    pub polar: f32,
    pub distance: f32,
    pub fov_deg: f32,
    min_distance: f32,
    max_distance: f32,
    max_polar: f32,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        let offset = Vec3::from_array(config.position);
        let (azimuth, polar, distance) = offset_to_spherical(offset);
        let (min_distance, max_distance) =
            distance_limits(config.min_distance, config.max_distance);
        let mut camera = Self {
            target: [0.0, 0.0, 0.0],
            azimuth,
            polar,
            distance,
            fov_deg: config.fov_deg,
            min_distance,
            max_distance,
            max_polar: if config.max_polar_angle.is_finite() {
                config.max_polar_angle
            } else {
                CameraConfig::default().max_polar_angle
            },
        };
        camera.constrain();
        camera
    }

    pub fn position(&self) -> [f32; 3] {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let offset = Vec3::new(sin_polar * sin_az, cos_polar, sin_polar * cos_az) * self.distance;
        (Vec3::from_array(self.target) + offset).to_array()
    }

    pub fn orbit(&mut self, azimuth_delta: f32, polar_delta: f32) {
        self.azimuth += azimuth_delta;
        self.polar += polar_delta;
        self.constrain();
    }

    /// Positive `delta` moves away from the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance += delta;
        self.constrain();
    }

    fn constrain(&mut self) {
        const TWO_PI: f32 = std::f32::consts::PI * 2.0;
        if self.azimuth.is_finite() {
            self.azimuth = self.azimuth.rem_euclid(TWO_PI);
        } else {
            self.azimuth = 0.0;
        }
        let polar = if self.polar.is_finite() { self.polar } else { self.max_polar };
        self.polar = polar.clamp(MIN_POLAR, self.max_polar.max(MIN_POLAR));
        let distance = if self.distance.is_finite() {
            self.distance
        } else {
            self.max_distance
        };
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            Vec3::from_array(self.position()),
            Vec3::from_array(self.target),
            Vec3::Y,
        )
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), aspect.max(1.0e-3), NEAR, FAR)
    }

    /// World-space ray through a pixel of a `width`×`height` viewport
    /// (top-left origin). Returns `(origin, direction)`.
    pub fn screen_ray(&self, px: f32, py: f32, width: f32, height: f32) -> Option<(Vec3, Vec3)> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let view_proj = self.projection_matrix(width / height) * self.view_matrix();
        let inv = view_proj.inverse();
        let ndc_x = (px / width) * 2.0 - 1.0;
        let ndc_y = 1.0 - (py / height) * 2.0;
        let near = inv.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        let dir = (far - near).normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        Some((near, dir))
    }
}

/// Orders the zoom limits so `clamp` always sees `min <= max`. Unusable
/// values fall back to the default camera's limits.
fn distance_limits(min: f32, max: f32) -> (f32, f32) {
    let defaults = CameraConfig::default();
    let min = if min.is_finite() && min > 0.0 {
        min
    } else {
        defaults.min_distance
    };
    let max = if max.is_finite() && max > 0.0 {
        max
    } else {
        defaults.max_distance
    };
    (min.min(max), min.max(max))
}

fn offset_to_spherical(offset: Vec3) -> (f32, f32, f32) {
    let distance = offset.length().max(1e-6);
    let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
    let azimuth = offset.x.atan2(offset.z);
    (azimuth, polar, distance)
}
