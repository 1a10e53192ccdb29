//! NNUE (Efficiently Updatable Neural Network) evaluation.
//!
//! Two-perspective feature transformer with king buckets and horizontal
//! mirroring, `SCReLU` activation, and piece-count-bucketed output heads.
//! The accumulator updates incrementally through make/unmake and is rebuilt
//! from scratch on king moves, promotions and castling.
//!
//! Architecture: (768 x 4 king buckets -> 256) x 2 perspectives -> 8 output buckets

pub mod network;

pub use network::{Accumulator, Network, NetworkError, HIDDEN_SIZE};

/// Weight quantization factor for feature weights
pub const QA: i32 = 255;

/// Output weight quantization factor
pub const QB: i32 = 64;

/// Evaluation scale factor
pub const SCALE: i32 = 400;
