//! Floor-plane placement: clamping raw drag points into the room and
//! tracking an in-progress drag.

use crate::scene::ItemId;
use glam::Vec3;

/// A point resting on the floor. `y` is always zero.
///
/// Only [`FloorBounds::clamp`] produces positions from arbitrary input, so a
/// placed item cannot leave the room through the public API.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FloorPosition {
    x: f32,
    z: f32,
}

impl FloorPosition {
    pub const ORIGIN: Self = Self { x: 0.0, z: 0.0 };

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        0.0
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, 0.0, self.z]
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }
}

impl serde::Serialize for FloorPosition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for FloorPosition {
    /// Reads `[x, y, z]` and snaps it onto the floor. Room bounds are applied
    /// by whoever loads the data, since they are configurable.
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [x, _y, z] = <[f32; 3]>::deserialize(deserializer)?;
        Ok(Self {
            x: finite_or_zero(x),
            z: finite_or_zero(z),
        })
    }
}

/// Square walkable area centred on the room origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorBounds {
    half_extent: f32,
}

impl Default for FloorBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FloorBounds {
    /// 20×20 floor with a 2-unit margin so models never clip the walls.
    pub const DEFAULT: Self = Self { half_extent: 8.0 };

    /// Non-finite extents fall back to [`FloorBounds::DEFAULT`].
    pub fn new(half_extent: f32) -> Self {
        if !half_extent.is_finite() {
            return Self::DEFAULT;
        }
        Self {
            half_extent: half_extent.abs(),
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Forces `y` to the floor and clamps `x` and `z` independently, so
    /// corners are reachable. Non-finite components collapse to 0.
    pub fn clamp(&self, raw: Vec3) -> FloorPosition {
        let h = self.half_extent;
        FloorPosition {
            x: finite_or_zero(raw.x).clamp(-h, h),
            z: finite_or_zero(raw.z).clamp(-h, h),
        }
    }

    pub fn clamp_position(&self, position: FloorPosition) -> FloorPosition {
        self.clamp(position.to_vec3())
    }

    pub fn contains(&self, position: FloorPosition) -> bool {
        position.x.abs() <= self.half_extent && position.z.abs() <= self.half_extent
    }
}

/// Clamp against the default room.
pub fn clamp(raw: Vec3) -> FloorPosition {
    FloorBounds::DEFAULT.clamp(raw)
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Intersects a ray with the ground plane `y = 0`.
///
/// Returns `None` when the ray is parallel to the floor or points away from it.
pub fn floor_hit(origin: Vec3, dir: Vec3) -> Option<Vec3> {
    if dir.y.abs() <= 1.0e-6 {
        return None;
    }
    let t = -origin.y / dir.y;
    if t < 0.0 || !t.is_finite() {
        return None;
    }
    Some(origin + dir * t)
}

/// One pointer-down .. pointer-up sequence moving a single item.
///
/// Every update is clamped on arrival; releasing the pointer commits the last
/// clamped position. There is no cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    item_id: ItemId,
    start: FloorPosition,
    current: FloorPosition,
    updates: u32,
}

impl DragSession {
    pub fn begin(item_id: ItemId, start: FloorPosition) -> Self {
        Self {
            item_id,
            start,
            current: start,
            updates: 0,
        }
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn start(&self) -> FloorPosition {
        self.start
    }

    pub fn current(&self) -> FloorPosition {
        self.current
    }

    pub fn updates(&self) -> u32 {
        self.updates
    }

    pub fn update(&mut self, bounds: &FloorBounds, raw: Vec3) -> FloorPosition {
        self.current = bounds.clamp(raw);
        self.updates = self.updates.saturating_add(1);
        self.current
    }

    /// Ends the drag, yielding the committed position.
    pub fn finish(self) -> FloorPosition {
        self.current
    }
}
