use crate::{
    octree::{StoreConfig, StoreError, MAX_TREE_DEPTH},
    spatial::{math::vector::V3c, Node},
};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Capacity of the traversal stack: one frame for the root and one for each level below it
pub const TRAVERSAL_STACK_SIZE: usize = MAX_TREE_DEPTH as usize + 1;

/// Parameters of a single traversal
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct TraversalConfig {
    /// Distance the sampling point is moved along the ray past the current entry,
    /// so points on shared faces always resolve into the next cell
    pub bias: f32,

    /// Safety net for the number of state transitions of one ray
    pub iteration_limit: u32,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self::for_store(&StoreConfig::default())
    }
}

impl TraversalConfig {
    /// Default bias and iteration limit derived from the given store layout
    pub fn for_store(store_config: &StoreConfig) -> Self {
        Self {
            bias: store_config.min_leaf_size * 0.001,
            iteration_limit: (16 * (store_config.max_depth + 1)) << store_config.max_depth,
        }
    }

    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_iteration_limit(mut self, iteration_limit: u32) -> Self {
        self.iteration_limit = iteration_limit;
        self
    }

    /// The bias needs to be a positive, finite distance smaller than half of a leaf,
    /// otherwise sampling could skip over whole leaves
    pub fn validate(&self, store_config: &StoreConfig) -> Result<(), StoreError> {
        let leaf_size = store_config.min_leaf_size;
        if !self.bias.is_finite() || self.bias <= 0. || self.bias >= leaf_size / 2. {
            return Err(StoreError::InvalidBias {
                bias: self.bias,
                leaf_size,
            });
        }

        if 0 == self.iteration_limit {
            return Err(StoreError::InvalidIterationLimit);
        }

        if store_config.max_depth as usize >= TRAVERSAL_STACK_SIZE {
            return Err(StoreError::DepthTooLarge {
                requested: store_config.max_depth,
                supported: TRAVERSAL_STACK_SIZE as u32 - 1,
            });
        }
        Ok(())
    }
}

/// The state of one level of the traversal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TraversalFrame {
    pub(crate) node: Node,
    pub(crate) depth: u32,

    /// Distance along the ray where it leaves `node`
    pub(crate) exit_distance: f32,

    /// Bit where the children span of `node` starts
    pub(crate) subtree_offset: u64,
}

/// The leaf a ray first touched
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelHit<P> {
    pub leaf: Node,
    pub coordinate: V3c<u32>,
    pub depth: u32,
    pub bit_offset: u64,
    pub impact_distance: f32,
    pub impact_point: V3c<f32>,
    pub impact_normal: V3c<f32>,
    pub payload: P,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalStep {
    /// Descended into an occupied child
    Push,

    /// Moved past an empty child of the current node
    Advance,

    /// Left the current node, continuing in its parent
    Pop,

    /// Reached an occupied leaf
    Hit,

    /// Left the root
    Exit,
}

/// One transition of the traversal, with the depth and entry distance after it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversalEvent {
    pub step: TraversalStep,
    pub depth: u32,
    pub t_min: f32,
}
