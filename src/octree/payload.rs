use crate::{
    octree::types::{StoreConfig, StoreError},
    spatial::{
        math::{flat_projection, vector::V3c},
        Node,
    },
};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// 0-255 RGBA color of a voxel
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Albedo {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Albedo {
    pub fn with_red(mut self, r: u8) -> Self {
        self.r = r;
        self
    }

    pub fn with_green(mut self, g: u8) -> Self {
        self.g = g;
        self
    }

    pub fn with_blue(mut self, b: u8) -> Self {
        self.b = b;
        self
    }

    pub fn with_alpha(mut self, a: u8) -> Self {
        self.a = a;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Packs the color into 16 bits: red in bits 0..5, green in bits 5..11 and blue in bits 11..16.
    /// Alpha is dropped.
    pub fn to_rgb565(&self) -> u16 {
        let r = (self.r >> 3) as u16;
        let g = (self.g >> 2) as u16;
        let b = (self.b >> 3) as u16;
        r | (g << 5) | (b << 11)
    }

    /// Unpacks an opaque color, replicating the high bits into the unused low bits
    pub fn from_rgb565(packed: u16) -> Self {
        let r = (packed & 0x1F) as u8;
        let g = ((packed >> 5) & 0x3F) as u8;
        let b = ((packed >> 11) & 0x1F) as u8;
        Self {
            r: (r << 3) | (r >> 2),
            g: (g << 2) | (g >> 4),
            b: (b << 3) | (b >> 2),
            a: 255,
        }
    }
}

impl From<[u8; 4]> for Albedo {
    fn from(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        }
    }
}

/// Resolves the data attached to a leaf the traversal hit.
/// Implementations are shared by every concurrently traced ray.
pub trait LeafPayload: Sync {
    type Payload;

    /// * `leaf` - The bounds of the hit leaf in world space
    /// * `coordinate` - The integer coordinate of the leaf inside the leaf grid
    fn payload(&self, leaf: &Node, coordinate: &V3c<u32>) -> Self::Payload;
}

impl<T: LeafPayload> LeafPayload for &T {
    type Payload = T::Payload;
    fn payload(&self, leaf: &Node, coordinate: &V3c<u32>) -> Self::Payload {
        (**self).payload(leaf, coordinate)
    }
}

/// Hits carry no payload beyond the leaf itself
impl LeafPayload for () {
    type Payload = ();
    fn payload(&self, _leaf: &Node, _coordinate: &V3c<u32>) {}
}

/// Colors each leaf by its position inside the root: x to red, y to green, z to blue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalAlbedo {
    leaves_per_axis: u32,
}

impl PositionalAlbedo {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            leaves_per_axis: config.leaves_per_axis(),
        }
    }

    fn channel(&self, component: u32) -> u8 {
        let max_index = (self.leaves_per_axis - 1).max(1);
        (component.min(max_index) * 255 / max_index) as u8
    }
}

impl LeafPayload for PositionalAlbedo {
    type Payload = Albedo;
    fn payload(&self, _leaf: &Node, coordinate: &V3c<u32>) -> Albedo {
        Albedo::default()
            .with_red(self.channel(coordinate.x))
            .with_green(self.channel(coordinate.y))
            .with_blue(self.channel(coordinate.z))
            .with_alpha(255)
    }
}

/// One RGB565 color for every leaf of the grid, stored flat: x + y * n + z * n * n
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorVolume {
    leaves_per_axis: u32,
    colors: Vec<u16>,
}

impl ColorVolume {
    /// A volume of black colors matching the resolution of the given store layout
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let leaves_per_axis = config.leaves_per_axis();
        let expected = (leaves_per_axis as u64).pow(3);
        let mut colors = Vec::new();
        colors
            .try_reserve_exact(expected as usize)
            .map_err(|_| StoreError::AllocationFailed { words: expected })?;
        colors.resize(expected as usize, 0);
        Ok(Self {
            leaves_per_axis,
            colors,
        })
    }

    /// Wraps already packed colors, which must cover every leaf of the given layout
    pub fn from_colors(config: &StoreConfig, colors: Vec<u16>) -> Result<Self, StoreError> {
        let leaves_per_axis = config.leaves_per_axis();
        let expected = (leaves_per_axis as usize).pow(3);
        if colors.len() != expected {
            return Err(StoreError::ColorVolumeMismatch {
                provided: colors.len(),
                expected,
            });
        }
        Ok(Self {
            leaves_per_axis,
            colors,
        })
    }

    fn index_of(&self, coordinate: &V3c<u32>) -> Result<usize, StoreError> {
        if coordinate.x >= self.leaves_per_axis
            || coordinate.y >= self.leaves_per_axis
            || coordinate.z >= self.leaves_per_axis
        {
            return Err(StoreError::InvalidCoordinate {
                coordinate: *coordinate,
                leaves_per_axis: self.leaves_per_axis,
            });
        }
        Ok(flat_projection(
            coordinate.x as usize,
            coordinate.y as usize,
            coordinate.z as usize,
            self.leaves_per_axis as usize,
        ))
    }

    pub fn set(&mut self, coordinate: &V3c<u32>, color: Albedo) -> Result<(), StoreError> {
        let index = self.index_of(coordinate)?;
        self.colors[index] = color.to_rgb565();
        Ok(())
    }

    pub fn get(&self, coordinate: &V3c<u32>) -> Option<Albedo> {
        let index = self.index_of(coordinate).ok()?;
        self.colors.get(index).map(|packed| Albedo::from_rgb565(*packed))
    }

    pub fn packed_colors(&self) -> &[u16] {
        &self.colors
    }
}

impl LeafPayload for ColorVolume {
    type Payload = Albedo;
    fn payload(&self, _leaf: &Node, coordinate: &V3c<u32>) -> Albedo {
        self.get(coordinate).unwrap_or_default()
    }
}
