//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes for transposition
//! table keying. Keys come from a fixed-seed PRNG so they are identical across
//! processes and runs - required for reproducible tests and TT portability
//! within a process.

use once_cell::sync::Lazy;
use rand::prelude::*;

/// Fixed seed for key generation. Changing this invalidates every stored hash.
const ZOBRIST_SEED: u64 = 0xB5AD_4ECE_DA1C_E2A9;

/// Index of the "no en passant square" entry in `en_passant_keys`.
/// The entry exists so every `Option<Square>` state has a slot, but it is
/// never XORed into a hash.
pub(crate) const EP_NONE: usize = 64;

pub(crate) struct ZobristKeys {
    /// `piece_keys[piece_type][color][square]`
    pub(crate) piece_keys: [[[u64; 64]; 2]; 6],
    /// One key per castling-rights bitset (4 flag bits, 16 combinations)
    pub(crate) castling_keys: [u64; 16],
    /// One key per en passant target square, plus a terminal "none" entry
    pub(crate) en_passant_keys: [u64; 65],
    /// XORed in when black is to move
    pub(crate) side_key: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let mut castling_keys = [0u64; 16];
        for key in &mut castling_keys {
            *key = rng.gen();
        }

        let mut en_passant_keys = [0u64; 65];
        for key in en_passant_keys.iter_mut().take(64) {
            *key = rng.gen();
        }
        en_passant_keys[EP_NONE] = 0;

        let side_key = rng.gen();

        ZobristKeys {
            piece_keys,
            castling_keys,
            en_passant_keys,
            side_key,
        }
    }
}

/// Initialize Zobrist keys lazily and globally; read-only after first use.
pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);
