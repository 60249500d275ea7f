pub mod detail;
pub mod payload;
pub mod types;
pub mod update;


pub use crate::octree::payload::{Albedo, ColorVolume, LeafPayload, PositionalAlbedo};
pub use crate::octree::types::{OccupancyWord, StoreConfig, StoreError, MAX_TREE_DEPTH};
pub use crate::octree::update::OccupancyStoreBuilder;
pub use crate::spatial::math::vector::V3c;

use crate::{
    octree::detail::{
        bit_at, child_offset, used_bits_mask, ROOT_BIT_OFFSET, ROOT_SUBTREE_OFFSET,
    },
    spatial::{math::OCTANT_COUNT, Node},
};

/// Read-only bit-packed occupancy of a complete octree.
/// Every node of every level owns one bit, laid out in depth-first pre-order:
/// the root is bit 0 and the 8 children spans of each node follow it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyStore<W: OccupancyWord = u32> {
    pub(crate) config: StoreConfig,
    pub(crate) words: Vec<W>,
}

impl<W: OccupancyWord> OccupancyStore<W> {
    /// Wraps an externally generated buffer of occupancy words
    /// * `config` - The layout the buffer was generated with, validated here
    /// * `words` - The packed bits, must fit every node of the configured depth.
    ///   Traversal starts at the root, so bit 0 must be set whenever any other bit is.
    pub fn from_words(config: StoreConfig, words: Vec<W>) -> Result<Self, StoreError> {
        Self::check_layout(&config, words.len())?;
        let store = Self { config, words };
        if !store.is_root_occupied() {
            let occupied = store.occupied_node_count();
            if 0 < occupied {
                return Err(StoreError::DetachedRoot { occupied });
            }
        }
        log::debug!(
            "Occupancy store of depth {} in {} words of {} bits",
            store.config.max_depth,
            store.words.len(),
            store.config.bits_per_word
        );
        Ok(store)
    }

    /// Wraps a raw byte buffer, holding native endian words
    pub fn from_bytes(config: StoreConfig, bytes: &[u8]) -> Result<Self, StoreError> {
        Self::check_config(&config)?;
        let word_bytes = std::mem::size_of::<W>();
        if 0 != bytes.len() % word_bytes {
            return Err(StoreError::MisalignedBuffer {
                length: bytes.len(),
                word_bytes,
            });
        }
        let words = bytes
            .chunks_exact(word_bytes)
            .map(bytemuck::pod_read_unaligned::<W>)
            .collect();
        Self::from_words(config, words)
    }

    /// A store with every bit cleared, sized for the given config
    pub(crate) fn empty(config: StoreConfig) -> Result<Self, StoreError> {
        Self::check_config(&config)?;
        let word_count = config.words_needed();
        let mut words = Vec::new();
        words
            .try_reserve_exact(word_count as usize)
            .map_err(|_| StoreError::AllocationFailed { words: word_count })?;
        words.resize(word_count as usize, W::zero());
        Ok(Self { config, words })
    }

    fn check_config(config: &StoreConfig) -> Result<(), StoreError> {
        config.validate()?;
        if config.bits_per_word != W::bits() {
            return Err(StoreError::WordSizeMismatch {
                configured: config.bits_per_word,
                actual: W::bits(),
            });
        }
        Ok(())
    }

    fn check_layout(config: &StoreConfig, word_count: usize) -> Result<(), StoreError> {
        Self::check_config(config)?;
        let available = word_count as u64 * W::bits() as u64;
        let required = config.node_count();
        if available < required {
            return Err(StoreError::BufferTooSmall {
                required,
                available,
            });
        }
        Ok(())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn words(&self) -> &[W] {
        &self.words
    }

    /// The packed words as a byte slice, e.g. for uploading into a GPU buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    pub fn root_node(&self) -> Node {
        self.config.root_node()
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    /// True if the node owning the given bit is present. Offsets beyond the buffer are empty.
    pub fn is_occupied(&self, bit_offset: u64) -> bool {
        bit_at(&self.words, bit_offset)
    }

    pub fn is_root_occupied(&self) -> bool {
        self.is_occupied(ROOT_BIT_OFFSET)
    }

    /// Bit offset of the child in `octant` of a node at `depth`, whose children span starts at `subtree_offset`
    pub fn child_offset(&self, subtree_offset: u64, depth: u32, octant: u8) -> u64 {
        child_offset(subtree_offset, depth, octant, self.config.max_depth)
    }

    /// Octants leading from the root to the leaf at the given coordinate
    pub fn octant_path(&self, coordinate: &V3c<u32>) -> Result<Vec<u8>, StoreError> {
        let leaves_per_axis = self.config.leaves_per_axis();
        if coordinate.x >= leaves_per_axis
            || coordinate.y >= leaves_per_axis
            || coordinate.z >= leaves_per_axis
        {
            return Err(StoreError::InvalidCoordinate {
                coordinate: *coordinate,
                leaves_per_axis,
            });
        }

        Ok((0..self.config.max_depth)
            .rev()
            .map(|level_bit| {
                (((coordinate.x >> level_bit) & 1)
                    | (((coordinate.y >> level_bit) & 1) << 1)
                    | (((coordinate.z >> level_bit) & 1) << 2)) as u8
            })
            .collect())
    }

    /// Bit offset of the node at the end of the given octant path, the empty path being the root
    pub fn path_offset(&self, octants: &[u8]) -> Result<u64, StoreError> {
        if octants.len() > self.config.max_depth as usize {
            return Err(StoreError::PathTooLong {
                length: octants.len(),
                max_depth: self.config.max_depth,
            });
        }

        let mut bit_offset = ROOT_BIT_OFFSET;
        let mut subtree_offset = ROOT_SUBTREE_OFFSET;
        for (depth, octant) in octants.iter().enumerate() {
            if *octant >= OCTANT_COUNT {
                return Err(StoreError::InvalidOctant(*octant));
            }
            bit_offset = self.child_offset(subtree_offset, depth as u32, *octant);
            subtree_offset = bit_offset + 1;
        }
        Ok(bit_offset)
    }

    /// Bit offset of the leaf at the given coordinate
    pub fn leaf_coordinate_offset(&self, coordinate: &V3c<u32>) -> Result<u64, StoreError> {
        self.path_offset(&self.octant_path(coordinate)?)
    }

    /// True if the leaf at the given coordinate is present, coordinates outside the grid are empty
    pub fn is_leaf_occupied(&self, coordinate: &V3c<u32>) -> bool {
        self.leaf_coordinate_offset(coordinate)
            .is_ok_and(|bit_offset| self.is_occupied(bit_offset))
    }

    /// Integer coordinate of the leaf containing the center of the given node
    pub fn leaf_coordinate(&self, leaf: &Node) -> V3c<u32> {
        let root_min = self.config.root_node().min_position();
        let max_index = (self.config.leaves_per_axis() - 1) as f32;
        let grid_position = ((leaf.center - root_min) / self.config.min_leaf_size).floor();
        V3c::new(
            grid_position.x.clamp(0., max_index) as u32,
            grid_position.y.clamp(0., max_index) as u32,
            grid_position.z.clamp(0., max_index) as u32,
        )
    }

    /// Number of set bits belonging to nodes, padding bits of the last word excluded
    pub fn occupied_node_count(&self) -> u64 {
        let node_count = self.config.node_count();
        self.words
            .iter()
            .enumerate()
            .map(|(word_index, word)| {
                (*word & used_bits_mask::<W>(word_index, node_count)).count_ones() as u64
            })
            .sum()
    }
}
