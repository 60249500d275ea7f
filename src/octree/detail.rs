use crate::octree::types::OccupancyWord;

/// Bit of the root node inside the store
pub(crate) const ROOT_BIT_OFFSET: u64 = 0;

/// Bit where the span of the root children starts
pub(crate) const ROOT_SUBTREE_OFFSET: u64 = 1;

/// Number of nodes in a complete octree with the given number of levels
/// (8^levels - 1) / 7
pub fn subtree_node_count(levels_remaining: u32) -> u64 {
    debug_assert!(levels_remaining <= 21, "Node count would overflow u64");
    ((1u64 << (3 * levels_remaining)) - 1) / 7
}

/// Number of node bits a store with `max_depth` levels below the root needs
pub fn total_node_count(max_depth: u32) -> u64 {
    subtree_node_count(max_depth + 1)
}

/// Bit offset of a child node inside the pre-order layout.
/// * `subtree_offset` - The bit where the children span of the parent starts, the parents own bit + 1
/// * `depth` - The depth of the parent node, the root being at 0
/// * `octant` - The index of the child inside the parent
/// * `max_depth` - Depth of the leaf level
pub fn child_offset(subtree_offset: u64, depth: u32, octant: u8, max_depth: u32) -> u64 {
    debug_assert!(depth < max_depth);
    subtree_offset + octant as u64 * subtree_node_count(max_depth - depth)
}

/// Word index and bit position inside the word for the given offset
pub(crate) fn word_position<W: OccupancyWord>(bit_offset: u64) -> (usize, usize) {
    let bits = W::bits() as u64;
    ((bit_offset / bits) as usize, (bit_offset % bits) as usize)
}

/// Reads the bit at the given offset; bits beyond the buffer are empty
pub(crate) fn bit_at<W: OccupancyWord>(words: &[W], bit_offset: u64) -> bool {
    let (word_index, bit_index) = word_position::<W>(bit_offset);
    match words.get(word_index) {
        Some(word) => W::zero() != ((*word >> bit_index) & W::one()),
        None => false,
    }
}

pub(crate) fn set_bit<W: OccupancyWord>(words: &mut [W], bit_offset: u64) {
    let (word_index, bit_index) = word_position::<W>(bit_offset);
    if let Some(word) = words.get_mut(word_index) {
        *word = *word | (W::one() << bit_index);
    }
}

/// Mask of the bits inside the last word which belong to a node
pub(crate) fn used_bits_mask<W: OccupancyWord>(word_index: usize, node_count: u64) -> W {
    let bits = W::bits() as u64;
    let word_start = word_index as u64 * bits;
    if node_count <= word_start {
        W::zero()
    } else if word_start + bits <= node_count {
        W::max_value()
    } else {
        let used = (node_count - word_start) as usize;
        (W::one() << used) - W::one()
    }
}
