//! Magic bitboard tables for rook and bishop attacks.
//!
//! For each square the relevant-occupancy mask (ray squares minus the board
//! edge) is enumerated into all 2^n blocker subsets, reference attacks are
//! computed by ray walking, and a 64-bit magic multiplier is searched so that
//! `((occ & mask) * magic) >> (64 - n)` is a perfect hash into the attack
//! table. The candidate generator favors sparse values (AND of three random
//! words); the search is capped per square and falls back to ray walking on
//! failure. The PRNG seed is fixed so startup is reproducible.

use once_cell::sync::Lazy;
use rand::prelude::*;

const MAGIC_SEED: u64 = 0x5D3E_C0DE_0000_0045;
const MAX_MAGIC_ATTEMPTS: u32 = 1_000_000;

const ROOK_DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// One square's perfect-hash entry.
struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u32,
    table: Box<[u64]>,
}

/// Attack tables for one slider kind. Squares whose magic search failed carry
/// no entry and answer queries by walking rays.
struct SliderAttacks {
    entries: [Option<MagicEntry>; 64],
    bishop: bool,
}

static ROOK_TABLES: Lazy<SliderAttacks> = Lazy::new(|| SliderAttacks::build(false));
static BISHOP_TABLES: Lazy<SliderAttacks> = Lazy::new(|| SliderAttacks::build(true));

/// Squares a rook on `sq` attacks, first blocker included.
#[inline]
pub(crate) fn rook_attacks(sq: usize, occupancy: u64) -> u64 {
    ROOK_TABLES.attacks(sq, occupancy)
}

/// Squares a bishop on `sq` attacks, first blocker included.
#[inline]
pub(crate) fn bishop_attacks(sq: usize, occupancy: u64) -> u64 {
    BISHOP_TABLES.attacks(sq, occupancy)
}

/// Queen attacks are the union of rook and bishop attacks.
#[inline]
pub(crate) fn queen_attacks(sq: usize, occupancy: u64) -> u64 {
    rook_attacks(sq, occupancy) | bishop_attacks(sq, occupancy)
}

impl SliderAttacks {
    fn build(bishop: bool) -> Self {
        let mut rng = StdRng::seed_from_u64(MAGIC_SEED);
        let entries = std::array::from_fn(|sq| build_square(sq, bishop, &mut rng));
        SliderAttacks { entries, bishop }
    }

    #[inline]
    fn attacks(&self, sq: usize, occupancy: u64) -> u64 {
        match &self.entries[sq] {
            Some(entry) => {
                let index = ((occupancy & entry.mask).wrapping_mul(entry.magic)) >> entry.shift;
                entry.table[index as usize]
            }
            None => {
                if self.bishop {
                    bishop_rays(sq, occupancy)
                } else {
                    rook_rays(sq, occupancy)
                }
            }
        }
    }
}

fn build_square(sq: usize, bishop: bool, rng: &mut StdRng) -> Option<MagicEntry> {
    let mask = slider_mask(sq, bishop);
    let bits = mask.count_ones();
    let size = 1usize << bits;
    let shift = 64 - bits;

    let mut subsets = Vec::with_capacity(size);
    let mut reference = Vec::with_capacity(size);
    for index in 0..size {
        let occ = occupancy_subset(index, mask);
        subsets.push(occ);
        reference.push(if bishop {
            bishop_rays(sq, occ)
        } else {
            rook_rays(sq, occ)
        });
    }

    let Some(magic) = find_magic(&subsets, &reference, shift, rng) else {
        log::warn!(
            "magic search failed for {} on square {sq}; using ray-walk fallback",
            if bishop { "bishop" } else { "rook" }
        );
        return None;
    };

    let mut table = vec![0u64; size].into_boxed_slice();
    for (i, &occ) in subsets.iter().enumerate() {
        table[(occ.wrapping_mul(magic) >> shift) as usize] = reference[i];
    }

    Some(MagicEntry {
        mask,
        magic,
        shift,
        table,
    })
}

/// Generate a sparse 64-bit candidate by AND-ing three random words. Sparse
/// multipliers collide far less often in the high index bits.
#[inline]
fn sparse_random(rng: &mut StdRng) -> u64 {
    rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>()
}

/// Search for a multiplier that maps every blocker subset to a slot holding
/// its reference attacks. Constructive collisions (same attacks) are allowed.
fn find_magic(subsets: &[u64], reference: &[u64], shift: u32, rng: &mut StdRng) -> Option<u64> {
    let mut table = vec![0u64; subsets.len()];
    let mut epoch = vec![0u32; subsets.len()];

    for attempt in 1..=MAX_MAGIC_ATTEMPTS {
        let magic = sparse_random(rng);
        let mut valid = true;
        for (i, &occ) in subsets.iter().enumerate() {
            let index = (occ.wrapping_mul(magic) >> shift) as usize;
            if epoch[index] != attempt {
                epoch[index] = attempt;
                table[index] = reference[i];
            } else if table[index] != reference[i] {
                valid = false;
                break;
            }
        }
        if valid {
            return Some(magic);
        }
    }
    None
}

/// Relevant-occupancy mask: ray squares excluding the outer edge in each
/// direction. Edge squares never influence the attack set, so dropping them
/// keeps the tables small.
fn slider_mask(sq: usize, bishop: bool) -> u64 {
    let directions = if bishop {
        BISHOP_DIRECTIONS
    } else {
        ROOK_DIRECTIONS
    };
    let rank = (sq / 8) as isize;
    let file = (sq % 8) as isize;
    let mut mask = 0u64;
    for (dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            if (dr != 0 && (r == 0 || r == 7)) || (df != 0 && (f == 0 || f == 7)) {
                break;
            }
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Expand subset `index` onto the set bits of `mask`.
fn occupancy_subset(index: usize, mask: u64) -> u64 {
    let mut occ = 0u64;
    let mut remaining = mask;
    let mut bit = 0;
    while remaining != 0 {
        let lsb = remaining & remaining.wrapping_neg();
        if index & (1 << bit) != 0 {
            occ |= lsb;
        }
        remaining &= remaining - 1;
        bit += 1;
    }
    occ
}

fn ray_attacks(sq: usize, occupancy: u64, directions: [(isize, isize); 4]) -> u64 {
    let rank = (sq / 8) as isize;
    let file = (sq % 8) as isize;
    let mut attacks = 0u64;
    for (dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Reference rook attacks by walking rays, stopping at the first blocker
/// (inclusive). Used to build the tables and as the fallback path.
pub(crate) fn rook_rays(sq: usize, occupancy: u64) -> u64 {
    ray_attacks(sq, occupancy, ROOK_DIRECTIONS)
}

/// Reference bishop attacks by walking rays, stopping at the first blocker
/// (inclusive).
pub(crate) fn bishop_rays(sq: usize, occupancy: u64) -> u64 {
    ray_attacks(sq, occupancy, BISHOP_DIRECTIONS)
}
