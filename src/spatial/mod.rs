pub mod math;
pub mod raytracing;
mod tests;

use crate::spatial::math::{octant_direction, vector::V3c};

pub(crate) const FLOAT_ERROR_TOLERANCE: f32 = 0.00001;

/// An axis aligned cube in world space, described by its center point and edge length
#[derive(Default, Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Node {
    pub center: V3c<f32>,
    pub size: f32,
}

impl Node {
    pub fn new(center: V3c<f32>, size: f32) -> Self {
        Self { center, size }
    }

    pub fn half_size(&self) -> f32 {
        self.size / 2.
    }

    pub fn min_position(&self) -> V3c<f32> {
        self.center - V3c::unit(self.half_size())
    }

    pub fn max_position(&self) -> V3c<f32> {
        self.center + V3c::unit(self.half_size())
    }

    /// The child cube inside the given octant: half the size, its center moved by
    /// a quarter of the parent size towards the octant along each axis
    pub fn child(&self, octant: u8) -> Node {
        Node {
            center: self.center + octant_direction(octant) * (self.size / 4.),
            size: self.size / 2.,
        }
    }

    /// True if the given point is inside the cube, with coordinates in inclusive, exclusive range
    pub fn contains_point(&self, point: &V3c<f32>) -> bool {
        let min_position = self.min_position();
        let max_position = self.max_position();
        (point.x >= min_position.x - FLOAT_ERROR_TOLERANCE)
            && (point.x < max_position.x + FLOAT_ERROR_TOLERANCE)
            && (point.y >= min_position.y - FLOAT_ERROR_TOLERANCE)
            && (point.y < max_position.y + FLOAT_ERROR_TOLERANCE)
            && (point.z >= min_position.z - FLOAT_ERROR_TOLERANCE)
            && (point.z < max_position.z + FLOAT_ERROR_TOLERANCE)
    }
}
