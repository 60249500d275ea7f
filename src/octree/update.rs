use crate::{
    octree::{
        detail::{set_bit, ROOT_BIT_OFFSET, ROOT_SUBTREE_OFFSET},
        types::{OccupancyWord, StoreConfig, StoreError},
        OccupancyStore, V3c,
    },
    spatial::math::OCTANT_COUNT,
};

/// Collects occupied leaves into an [`OccupancyStore`].
/// The store is read-only once built, so every mutation happens here.
#[derive(Debug, Clone)]
pub struct OccupancyStoreBuilder<W: OccupancyWord = u32> {
    store: OccupancyStore<W>,
}

impl<W: OccupancyWord> OccupancyStoreBuilder<W> {
    /// Allocates an empty store for the given layout
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        Ok(Self {
            store: OccupancyStore::empty(config)?,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.store.config
    }

    /// Marks the leaf at the given integer coordinate occupied, together with all of its ancestors
    /// * `coordinate` - the position of the leaf, every component must be below 2^depth
    pub fn insert(&mut self, coordinate: &V3c<u32>) -> Result<(), StoreError> {
        let path = self.store.octant_path(coordinate)?;
        self.insert_path(&path)
    }

    /// Marks every node along the given octant path occupied, starting with the root.
    /// A path shorter, than the depth of the store only marks internal nodes.
    /// * `octants` - child indices from the root downwards, each in range 0..8
    pub fn insert_path(&mut self, octants: &[u8]) -> Result<(), StoreError> {
        if octants.len() > self.store.config.max_depth as usize {
            return Err(StoreError::PathTooLong {
                length: octants.len(),
                max_depth: self.store.config.max_depth,
            });
        }
        if let Some(octant) = octants.iter().find(|octant| **octant >= OCTANT_COUNT) {
            return Err(StoreError::InvalidOctant(*octant));
        }

        set_bit(&mut self.store.words, ROOT_BIT_OFFSET);
        let mut subtree_offset = ROOT_SUBTREE_OFFSET;
        for (depth, octant) in octants.iter().enumerate() {
            let bit_offset = self.store.child_offset(subtree_offset, depth as u32, *octant);
            set_bit(&mut self.store.words, bit_offset);
            subtree_offset = bit_offset + 1;
        }
        Ok(())
    }

    /// Marks the leaf containing the given world space position occupied
    pub fn insert_at(&mut self, position: &V3c<f32>) -> Result<(), StoreError> {
        let root = self.store.root_node();
        let leaves_per_axis = self.store.config.leaves_per_axis();
        let grid_position = ((*position - root.min_position()) / self.store.config.min_leaf_size)
            .floor();
        if !root.contains_point(position)
            || grid_position.x < 0.
            || grid_position.y < 0.
            || grid_position.z < 0.
        {
            return Err(StoreError::InvalidCoordinate {
                coordinate: V3c::new(
                    grid_position.x.max(0.) as u32,
                    grid_position.y.max(0.) as u32,
                    grid_position.z.max(0.) as u32,
                ),
                leaves_per_axis,
            });
        }
        let max_index = leaves_per_axis - 1;
        self.insert(&V3c::new(
            (grid_position.x as u32).min(max_index),
            (grid_position.y as u32).min(max_index),
            (grid_position.z as u32).min(max_index),
        ))
    }

    pub fn build(self) -> OccupancyStore<W> {
        log::debug!(
            "Built occupancy store of depth {} with {} occupied nodes in {} words",
            self.store.config.max_depth,
            self.store.occupied_node_count(),
            self.store.words.len()
        );
        self.store
    }
}
