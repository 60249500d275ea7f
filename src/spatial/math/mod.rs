mod tests;
pub mod vector;

use crate::spatial::math::vector::V3c;

///####################################################################################
/// Octant
///####################################################################################
pub const OCTANT_COUNT: u8 = 8;

/// Offset of the given octant inside its parent, in range 0..1 for each axis
pub(crate) fn offset_region(octant: u8) -> V3c<f32> {
    debug_assert!(octant < OCTANT_COUNT);
    V3c::new(
        (octant & 0x01) as f32,
        ((octant >> 1) & 0x01) as f32,
        ((octant >> 2) & 0x01) as f32,
    )
}

/// Each Node is separated to 8 Octants based on their relative position to the center of the Node.
/// The hash function assigns an index for each octant, so every child Node can be indexed in a well defined manner:
/// x is bit 0, y is bit 1 and z is bit 2 of the index, the bit is set for non-negative components.
/// * `offset` - The position relative to the center of the Node
pub fn octant_index(offset: &V3c<f32>) -> u8 {
    // The below is rewritten to be branchless
    (offset.x >= 0.) as u8 + (offset.y >= 0.) as u8 * 2 + (offset.z >= 0.) as u8 * 4
}

/// Maps the octant index to the direction pointing from the center of the parent into the octant
pub fn octant_direction(octant: u8) -> V3c<f32> {
    offset_region(octant) * 2. - V3c::unit(1.)
}

/// Maps 3 dimensional space limited by `size` to 1 dimension
/// This mapping function supposes that the coordinates are bound inside
/// a cube, each dimension `size` long.
/// * `x` - x coordinate of position
/// * `y` - y coordinate of position
/// * `z` - z coordinate of position
/// * `size` - Range of the given coordinate space
pub(crate) fn flat_projection(x: usize, y: usize, z: usize, size: usize) -> usize {
    x + (y * size) + (z * size * size)
}
