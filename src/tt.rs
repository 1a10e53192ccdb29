//! Transposition table for caching search results.
//!
//! Open-addressed with a single 8-byte slot per index, keyed by Zobrist hash.
//! Entries verify against the upper 16 key bits, age with a 6-bit wrapping
//! counter bumped each search, and store mate scores relative to the entry's
//! position so bounds stay valid across transpositions.

use crate::board::Move;
use crate::search::constants::MATE_BOUND;

/// How a stored score bounds the true value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Score is the exact value
    Exact,
    /// Score is at least this value (search failed high)
    Lower,
    /// Score is at most this value (search failed low)
    Upper,
}

const BOUND_EXACT: u8 = 1;
const BOUND_LOWER: u8 = 2;
const BOUND_UPPER: u8 = 3;
const AGE_MASK: u8 = 0x3F;

/// Compact slot: verifier, best move, score, depth, bound + age.
#[derive(Clone, Copy)]
struct Slot {
    verifier: u16,
    mv: u16,
    score: i16,
    depth: u8,
    /// low 2 bits bound (0 = empty slot), high 6 bits age
    meta: u8,
}

const EMPTY_SLOT: Slot = Slot {
    verifier: 0,
    mv: 0,
    score: 0,
    depth: 0,
    meta: 0,
};

impl Slot {
    #[inline]
    fn is_empty(self) -> bool {
        self.meta & 0b11 == 0
    }

    #[inline]
    fn bound_bits(self) -> u8 {
        self.meta & 0b11
    }

    #[inline]
    fn age(self) -> u8 {
        self.meta >> 2
    }

    #[inline]
    fn bound(self) -> Bound {
        match self.bound_bits() {
            BOUND_EXACT => Bound::Exact,
            BOUND_LOWER => Bound::Lower,
            _ => Bound::Upper,
        }
    }
}

/// A probe hit, with the score already re-anchored to the probing ply.
#[derive(Clone, Copy, Debug)]
pub struct TtHit {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u32,
    pub bound: Bound,
}

/// Fixed-size transposition table. A zero-megabyte budget, or an allocation
/// failure, leaves the table disabled: probes miss and stores are no-ops.
pub struct TranspositionTable {
    slots: Vec<Slot>,
    age: u8,
}

impl TranspositionTable {
    /// Allocate a table using at most `size_mb` megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let count = size_mb * 1024 * 1024 / std::mem::size_of::<Slot>();
        let mut slots = Vec::new();
        if count > 0 {
            if slots.try_reserve_exact(count).is_ok() {
                slots.resize(count, EMPTY_SLOT);
            } else {
                log::warn!("transposition table allocation failed ({size_mb} MB); table disabled");
            }
        }
        TranspositionTable { slots, age: 0 }
    }

    /// Whether the table holds any slots.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Drop all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.fill(EMPTY_SLOT);
        self.age = 0;
    }

    /// Advance the 6-bit age counter; called once per search.
    pub fn new_search(&mut self) {
        self.age = (self.age + 1) & AGE_MASK;
    }

    /// Reset the age counter without touching entries.
    pub fn reset_age(&mut self) {
        self.age = 0;
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    #[inline]
    fn verifier(key: u64) -> u16 {
        (key >> 48) as u16
    }

    /// Look up `key`. `ply` re-anchors mate scores to the probing node.
    #[must_use]
    pub fn probe(&self, key: u64, ply: usize) -> Option<TtHit> {
        if self.slots.is_empty() {
            return None;
        }
        let slot = self.slots[self.index(key)];
        if slot.is_empty() || slot.verifier != Self::verifier(key) {
            return None;
        }
        let mv = Move::from_u16(slot.mv);
        Some(TtHit {
            best_move: if mv == Move::null() { None } else { Some(mv) },
            score: score_from_tt(i32::from(slot.score), ply),
            depth: u32::from(slot.depth),
            bound: slot.bound(),
        })
    }

    /// Store an entry. Replacement prefers, in order: an empty slot, a
    /// same-key update (depth >= stored, or an exact bound displacing an
    /// upper bound), entries from an older search, shallower entries, and
    /// failed-low (upper-bound) entries; otherwise the occupant stays.
    pub fn store(
        &mut self,
        key: u64,
        depth: u32,
        ply: usize,
        score: i32,
        bound: Bound,
        best_move: Option<Move>,
    ) {
        if self.slots.is_empty() {
            return;
        }
        let index = self.index(key);
        let existing = self.slots[index];
        let verifier = Self::verifier(key);

        let replace = if existing.is_empty() {
            true
        } else if existing.verifier == verifier {
            depth >= u32::from(existing.depth)
                || (bound == Bound::Exact && existing.bound() == Bound::Upper)
        } else {
            existing.age() != self.age
                || depth >= u32::from(existing.depth)
                || existing.bound() == Bound::Upper
        };
        if !replace {
            return;
        }

        let bound_bits = match bound {
            Bound::Exact => BOUND_EXACT,
            Bound::Lower => BOUND_LOWER,
            Bound::Upper => BOUND_UPPER,
        };
        self.slots[index] = Slot {
            verifier,
            mv: best_move.unwrap_or(Move::null()).as_u16(),
            score: score_to_tt(score, ply) as i16,
            depth: depth.min(255) as u8,
            meta: (self.age << 2) | bound_bits,
        };
    }
}

/// Make a mate score relative to the entry's position before storing.
#[inline]
fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// Re-anchor a stored mate score to the probing node's ply.
#[inline]
fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;
    use crate::search::constants::MATE_SCORE;

    fn some_move() -> Move {
        Move::quiet(Square::new(1, 4), Square::new(3, 4))
    }

    #[test]
    fn test_slot_is_eight_bytes() {
        assert_eq!(std::mem::size_of::<Slot>(), 8);
    }

    #[test]
    fn test_store_probe_round_trip() {
        let mut tt = TranspositionTable::new(1);
        let key = 0xDEAD_BEEF_1234_5678;
        tt.store(key, 6, 0, 42, Bound::Exact, Some(some_move()));

        let hit = tt.probe(key, 0).expect("entry should be found");
        assert_eq!(hit.score, 42);
        assert_eq!(hit.depth, 6);
        assert_eq!(hit.bound, Bound::Exact);
        assert_eq!(hit.best_move, Some(some_move()));
    }

    #[test]
    fn test_probe_rejects_wrong_verifier() {
        let mut tt = TranspositionTable::new(1);
        let key = 0xDEAD_BEEF_1234_5678u64;
        tt.store(key, 4, 0, 10, Bound::Exact, None);
        // Same slot index (equal modulo), different upper bits
        let impostor = key ^ (0xFFFF << 48);
        assert!(tt.probe(impostor, 0).is_none());
    }

    #[test]
    fn test_zero_size_is_disabled() {
        let mut tt = TranspositionTable::new(0);
        assert!(!tt.is_enabled());
        tt.store(1, 5, 0, 10, Bound::Exact, None);
        assert!(tt.probe(1, 0).is_none());
    }

    #[test]
    fn test_same_key_shallower_does_not_replace() {
        let mut tt = TranspositionTable::new(1);
        let key = 99;
        tt.store(key, 8, 0, 100, Bound::Exact, Some(some_move()));
        tt.store(key, 3, 0, -5, Bound::Lower, None);
        let hit = tt.probe(key, 0).unwrap();
        assert_eq!(hit.depth, 8);
        assert_eq!(hit.score, 100);
    }

    #[test]
    fn test_exact_displaces_upper_at_lower_depth(){
        let mut tt = TranspositionTable::new(1);
        let key = 7;
        tt.store(key, 8, 0, 50, Bound::Upper, None);
        tt.store(key, 2, 0, 60, Bound::Exact, Some(some_move()));
        let hit = tt.probe(key, 0).unwrap();
        assert_eq!(hit.bound, Bound::Exact);
        assert_eq!(hit.depth, 2);
    }

    #[test]
    fn test_older_age_is_replaced() {
        let mut tt = TranspositionTable::new(1);
        // 1 MB of 8-byte slots is a power-of-two count, so adding 1 << 48
        // keeps the slot index while changing the verifier
        let key_a = 5u64;
        let key_b = key_a + (1u64 << 48);
        assert_eq!(tt.index(key_a), tt.index(key_b));
        tt.store(key_a, 20, 0, 1, Bound::Exact, None);
        tt.new_search();
        tt.store(key_b, 1, 0, 2, Bound::Upper, None);
        // Old-generation deep entry loses to the new search's shallow entry
        assert!(tt.probe(key_a, 0).is_none());
        assert!(tt.probe(key_b, 0).is_some());
    }

    #[test]
    fn test_mate_score_adjustment() {
        let mut tt = TranspositionTable::new(1);
        let key = 12345;
        // Mate found 5 plies from root, stored from a node at ply 5
        let score_at_node = MATE_SCORE - 5;
        tt.store(key, 10, 5, score_at_node, Bound::Exact, None);
        // Probing the same position at ply 3 must see the mate 2 plies closer
        let hit = tt.probe(key, 3).unwrap();
        assert_eq!(hit.score, MATE_SCORE - 3);
        // And probing at the storing ply returns the original score
        let hit = tt.probe(key, 5).unwrap();
        assert_eq!(hit.score, score_at_node);
    }

    #[test]
    fn test_age_wraps_at_six_bits() {
        let mut tt = TranspositionTable::new(1);
        for _ in 0..64 {
            tt.new_search();
        }
        assert_eq!(tt.age, 0);
    }
}
