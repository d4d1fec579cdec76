//! Render-space extent of the axes box.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tick::{Axis, AxisScales};

/// Size and center of the grid box, one component per axis in render order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridBounds {
    /// `range[1] - range[0]` per axis.
    pub dims: Vec3,
    /// `(range[0] + range[1]) / 2` per axis.
    pub center: Vec3,
}

impl GridBounds {
    /// Derives the box from each scale's range, laid out as (x, z, y).
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_scales(scales: AxisScales<'_>) -> Self {
        let mut dims = [0.0f32; 3];
        let mut center = [0.0f32; 3];
        for (slot, axis) in Axis::RENDER_ORDER.into_iter().enumerate() {
            let [r0, r1] = scales.get(axis).range();
            dims[slot] = (r1 - r0) as f32;
            center[slot] = ((r0 + r1) / 2.0) as f32;
        }
        Self {
            dims: Vec3::from_array(dims),
            center: Vec3::from_array(center),
        }
    }
}
