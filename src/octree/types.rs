use crate::spatial::{math::vector::V3c, Node};
use bytemuck::Pod;
use num_traits::{PrimInt, Unsigned};
use thiserror::Error;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// The deepest octree the traversal stack is sized for
pub const MAX_TREE_DEPTH: u32 = 20;

/// error types during creation of the occupancy store or the raytracer using it
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Root size must be finite and positive, got {0}")]
    InvalidRootSize(f32),

    #[error("Root center must be finite, got {0:?}")]
    InvalidRootCenter(V3c<f32>),

    #[error("Depth {requested} exceeds the supported maximum of {supported}")]
    DepthTooLarge { requested: u32, supported: u32 },

    #[error("Leaf size {configured} does not match root size / 2^depth = {expected}")]
    LeafSizeMismatch { configured: f32, expected: f32 },

    #[error("Configured {configured} bits per word, but the buffer words have {actual}")]
    WordSizeMismatch { configured: u32, actual: u32 },

    #[error("Buffer holds {available} bits, the octree needs {required}")]
    BufferTooSmall { required: u64, available: u64 },

    #[error("Buffer of {length} bytes is not a whole number of {word_bytes} byte words")]
    MisalignedBuffer { length: usize, word_bytes: usize },

    #[error("Unable to allocate {words} occupancy words")]
    AllocationFailed { words: u64 },

    #[error("Bias {bias} must be positive and below half the leaf size {leaf_size}")]
    InvalidBias { bias: f32, leaf_size: f32 },

    #[error("Iteration limit must be positive")]
    InvalidIterationLimit,

    #[error("Buffer has {occupied} occupied nodes, but the root bit is clear")]
    DetachedRoot { occupied: u64 },

    #[error("Leaf coordinate {coordinate:?} is outside of the {leaves_per_axis}^3 leaf grid")]
    InvalidCoordinate {
        coordinate: V3c<u32>,
        leaves_per_axis: u32,
    },

    #[error("Octant {0} is out of range 0..8")]
    InvalidOctant(u8),

    #[error("Octant path of length {length} is longer than the depth {max_depth}")]
    PathTooLong { length: usize, max_depth: u32 },

    #[error("Color volume of {provided} entries does not match {expected} leaves")]
    ColorVolumeMismatch { provided: usize, expected: usize },

    #[error("Malformed octree bytecode: {0}")]
    Bytecode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The word type the occupancy bits are packed into
pub trait OccupancyWord: PrimInt + Unsigned + Pod + Send + Sync + std::fmt::Debug {
    fn bits() -> u32 {
        Self::zero().count_zeros()
    }
}

impl<W> OccupancyWord for W where W: PrimInt + Unsigned + Pod + Send + Sync + std::fmt::Debug {}

/// Static parameters of the occupancy store.
/// The octree is a complete 8-ary tree of `max_depth` levels below the root,
/// which is a cube of `root_size` edge length around `root_center`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct StoreConfig {
    pub root_center: V3c<f32>,
    pub root_size: f32,
    pub max_depth: u32,
    pub min_leaf_size: f32,
    pub bits_per_word: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::cube(512., 6)
    }
}

impl StoreConfig {
    /// An octree centered to the origin, with the leaf size derived from the size and depth
    pub fn cube(root_size: f32, max_depth: u32) -> Self {
        Self {
            root_center: V3c::unit(0.),
            root_size,
            max_depth,
            min_leaf_size: Self::leaf_size_for(root_size, max_depth),
            bits_per_word: u32::BITS,
        }
    }

    fn leaf_size_for(root_size: f32, max_depth: u32) -> f32 {
        root_size / 2f32.powi(max_depth as i32)
    }

    pub fn with_root_center(mut self, root_center: V3c<f32>) -> Self {
        self.root_center = root_center;
        self
    }

    pub fn with_root_size(mut self, root_size: f32) -> Self {
        self.root_size = root_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_leaf_size(mut self, min_leaf_size: f32) -> Self {
        self.min_leaf_size = min_leaf_size;
        self
    }

    pub fn with_bits_per_word(mut self, bits_per_word: u32) -> Self {
        self.bits_per_word = bits_per_word;
        self
    }

    pub fn root_node(&self) -> Node {
        Node::new(self.root_center, self.root_size)
    }

    /// Number of leaves along one axis of the root
    pub fn leaves_per_axis(&self) -> u32 {
        1 << self.max_depth
    }

    /// Number of bits the store needs, one for each node of every level
    pub fn node_count(&self) -> u64 {
        crate::octree::detail::total_node_count(self.max_depth)
    }

    /// Number of words of the configured width able to hold every node bit
    pub fn words_needed(&self) -> u64 {
        self.node_count().div_ceil(self.bits_per_word as u64)
    }

    /// Checks the consistency of the size, depth and leaf size triple
    pub fn validate(&self) -> Result<(), StoreError> {
        if !self.root_size.is_finite() || self.root_size <= 0. {
            return Err(StoreError::InvalidRootSize(self.root_size));
        }

        if !self.root_center.is_finite() {
            return Err(StoreError::InvalidRootCenter(self.root_center));
        }

        if self.max_depth > MAX_TREE_DEPTH {
            return Err(StoreError::DepthTooLarge {
                requested: self.max_depth,
                supported: MAX_TREE_DEPTH,
            });
        }

        let expected = Self::leaf_size_for(self.root_size, self.max_depth);
        if !((self.min_leaf_size - expected).abs() <= expected * 0.0001) {
            return Err(StoreError::LeafSizeMismatch {
                configured: self.min_leaf_size,
                expected,
            });
        }

        if !matches!(self.bits_per_word, 8 | 16 | 32 | 64) {
            return Err(StoreError::WordSizeMismatch {
                configured: self.bits_per_word,
                actual: 0,
            });
        }
        Ok(())
    }
}
