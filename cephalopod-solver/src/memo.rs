//! Direct-mapped memo table keyed by (board, ply).
//!
//! Each key hashes to exactly one slot. A store always overwrites the slot,
//! so an unrelated entry that hashes to the same slot is silently evicted.
//! Lookups compare the stored board and ply, so a collision costs a
//! recomputation but never returns a wrong value.

use cephalopod_core::Board;

/// Largest table the depth-based sizing will pick (2^21 entries).
pub const MAX_TABLE_BITS: u32 = 21;

/// Table size for a depth-0 search (2^12 entries).
pub const MIN_TABLE_BITS: u32 = 12;

/// Largest explicit table size accepted by [`MemoTable::with_bits`] (2^26 entries).
pub const MAX_EXPLICIT_TABLE_BITS: u32 = 26;

/// 64-bit golden-ratio multiplier.
const HASH_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// One slot of the memo table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoEntry {
    /// Raw encoding of the board this result belongs to
    pub board_bits: u32,
    /// Aggregate over the subtree (mod 2^30)
    pub result: u32,
    /// Ply at which the board was reached
    pub depth: u16,
    /// False until the slot is first written
    pub valid: bool,
}

impl MemoEntry {
    #[inline]
    fn matches(&self, board: Board, depth: u16) -> bool {
        self.valid && self.board_bits == board.to_u32() && self.depth == depth
    }
}

/// Log2 of the table capacity for a search of `max_depth` plies.
///
/// Grows by a factor of four every five plies, from 2^12 up to 2^21.
pub fn capacity_bits_for_depth(max_depth: u16) -> u32 {
    ((max_depth as u32 + 4) / 5 * 2 + MIN_TABLE_BITS).min(MAX_TABLE_BITS)
}

/// Clamp a requested table size to [`MAX_EXPLICIT_TABLE_BITS`].
pub fn clamp_table_bits(bits: u32) -> u32 {
    if bits > MAX_EXPLICIT_TABLE_BITS {
        log::warn!(
            "memo table of 2^{} entries requested, using 2^{}",
            bits,
            MAX_EXPLICIT_TABLE_BITS
        );
    }
    bits.min(MAX_EXPLICIT_TABLE_BITS)
}

/// Fixed-capacity, lossy memo table.
pub struct MemoTable {
    entries: Vec<MemoEntry>,
    mask: usize,
}

impl MemoTable {
    /// Create a table sized for a search of `max_depth` plies.
    pub fn for_depth(max_depth: u16) -> Self {
        Self::with_bits(capacity_bits_for_depth(max_depth))
    }

    /// Create a table with `2^bits` entries, all invalid.
    ///
    /// `bits` above [`MAX_EXPLICIT_TABLE_BITS`] is clamped to it.
    pub fn with_bits(bits: u32) -> Self {
        let bits = clamp_table_bits(bits);
        let capacity = 1usize << bits;
        log::debug!(
            "memo table: {} entries ({} bytes)",
            capacity,
            capacity * std::mem::size_of::<MemoEntry>()
        );
        Self {
            entries: vec![MemoEntry::default(); capacity],
            mask: capacity - 1,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Slot index for a (board, ply) key.
    #[inline]
    pub fn hash(&self, board_bits: u32, depth: u16) -> usize {
        let mut h = (board_bits as u64).wrapping_mul(HASH_MULTIPLIER);
        h ^= h >> 32;
        h ^= depth as u64;
        (h as usize) & self.mask
    }

    /// Cached aggregate for `(board, depth)`, if its slot still holds it.
    #[inline]
    pub fn lookup(&self, board: Board, depth: u16) -> Option<u32> {
        let entry = &self.entries[self.hash(board.to_u32(), depth)];
        entry.matches(board, depth).then_some(entry.result)
    }

    /// Write `(board, depth) -> result` into its slot, last write wins.
    ///
    /// Returns true if a valid entry for a different key was evicted.
    #[inline]
    pub fn store(&mut self, board: Board, depth: u16, result: u32) -> bool {
        let idx = self.hash(board.to_u32(), depth);
        let entry = &mut self.entries[idx];
        let evicted = entry.valid && !entry.matches(board, depth);
        *entry = MemoEntry {
            board_bits: board.to_u32(),
            result,
            depth,
            valid: true,
        };
        evicted
    }

    /// Number of valid slots.
    pub fn occupied(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    /// Bytes held by the entry array.
    pub fn memory_bytes(&self) -> usize {
        self.entries.len() * std::mem::size_of::<MemoEntry>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_bits_for_depth() {
        assert_eq!(capacity_bits_for_depth(0), 12);
        assert_eq!(capacity_bits_for_depth(1), 14);
        assert_eq!(capacity_bits_for_depth(5), 14);
        assert_eq!(capacity_bits_for_depth(6), 16);
        assert_eq!(capacity_bits_for_depth(20), 20);
        assert_eq!(capacity_bits_for_depth(21), 21);
        assert_eq!(capacity_bits_for_depth(40), 21);
        assert_eq!(capacity_bits_for_depth(u16::MAX), MAX_TABLE_BITS);
    }

    #[test]
    fn test_capacity_is_monotonic() {
        let mut prev = 0;
        for depth in 0..100 {
            let bits = capacity_bits_for_depth(depth);
            assert!(bits >= prev);
            prev = bits;
        }
    }

    #[test]
    fn test_table_bits_are_clamped() {
        assert_eq!(clamp_table_bits(0), 0);
        assert_eq!(clamp_table_bits(MAX_EXPLICIT_TABLE_BITS), MAX_EXPLICIT_TABLE_BITS);
        for bits in [27, 40, 63, 64, u32::MAX] {
            assert_eq!(clamp_table_bits(bits), MAX_EXPLICIT_TABLE_BITS);
        }
        assert!(capacity_bits_for_depth(u16::MAX) <= MAX_EXPLICIT_TABLE_BITS);
    }

    #[test]
    fn test_table_for_depth() {
        let table = MemoTable::for_depth(0);
        assert_eq!(table.capacity(), 1 << 12);
        assert_eq!(table.occupied(), 0);
        assert_eq!(table.memory_bytes(), (1 << 12) * std::mem::size_of::<MemoEntry>());
    }

    #[test]
    fn test_hash_in_range() {
        let table = MemoTable::with_bits(8);
        for bits in (0..(1u32 << 27)).step_by(99_991) {
            for depth in [0u16, 1, 7, 300] {
                assert!(table.hash(bits, depth) < 256);
            }
        }
    }

    #[test]
    fn test_hash_matches_multiplicative_mix() {
        let table = MemoTable::with_bits(MAX_TABLE_BITS);
        let bits = 0o161_222_060u32;
        let mut h = (bits as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        h ^= h >> 32;
        h ^= 3;
        assert_eq!(table.hash(bits, 3), (h as usize) & ((1 << MAX_TABLE_BITS) - 1));
    }

    #[test]
    fn test_lookup_empty_table_misses() {
        let table = MemoTable::with_bits(4);
        // A zeroed slot must not answer for the empty board at ply 0
        assert_eq!(table.lookup(Board::new(), 0), None);
    }

    #[test]
    fn test_store_then_lookup() {
        let mut table = MemoTable::with_bits(10);
        let board = Board::from_cells([0, 6, 0, 2, 2, 2, 1, 6, 1]);

        assert!(!table.store(board, 4, 12345));
        assert_eq!(table.lookup(board, 4), Some(12345));
        assert_eq!(table.occupied(), 1);
    }

    #[test]
    fn test_lookup_checks_depth() {
        let mut table = MemoTable::with_bits(10);
        let board = Board::from_cells([1, 0, 0, 0, 0, 0, 0, 0, 0]);
        table.store(board, 2, 77);

        assert_eq!(table.lookup(board, 2), Some(77));
        assert_eq!(table.lookup(board, 3), None);
    }

    #[test]
    fn test_store_overwrites_same_key() {
        let mut table = MemoTable::with_bits(10);
        let board = Board::from_cells([1, 2, 3, 0, 0, 0, 0, 0, 0]);
        table.store(board, 1, 5);
        assert!(!table.store(board, 1, 6), "same key is an update, not an eviction");
        assert_eq!(table.lookup(board, 1), Some(6));
    }

    #[test]
    fn test_collision_evicts_previous_entry() {
        // A single-slot table makes every key collide
        let mut table = MemoTable::with_bits(0);
        let a = Board::from_cells([1, 0, 0, 0, 0, 0, 0, 0, 0]);
        let b = Board::from_cells([0, 1, 0, 0, 0, 0, 0, 0, 0]);

        assert!(!table.store(a, 1, 10));
        assert!(table.store(b, 1, 20));

        assert_eq!(table.lookup(a, 1), None);
        assert_eq!(table.lookup(b, 1), Some(20));
        assert_eq!(table.occupied(), 1);
    }
}
