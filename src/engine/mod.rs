//! The engine object wrapped by the external protocol layer.
//!
//! Owns the board, the search state (transposition table included - it is a
//! field of the engine, not a process-wide static), and the optional NNUE
//! network. The search itself is blocking and runs on the caller's thread;
//! `stop` may be called from another thread.

mod time;

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::board::{Board, FenError};
use crate::nnue::Network;
use crate::search::{
    run_search, SearchInfoCallback, SearchIterationInfo, SearchResult, SearchState,
    DEFAULT_TT_MB,
};

pub use time::SearchLimits;
pub(crate) use time::resolve_limits;

/// Network file loaded at startup when present.
pub const DEFAULT_NETWORK_FILE: &str = "quantised.bin";

/// Error type for `set_position` failures. The board is left untouched.
#[derive(Debug)]
pub enum PositionError {
    /// The FEN string did not parse
    Fen(FenError),
    /// A replayed move was unparseable or illegal
    IllegalMove {
        /// The offending move string
        mv: String,
        /// FEN of the position the move was attempted in
        fen: String,
    },
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::Fen(err) => write!(f, "invalid FEN: {err}"),
            PositionError::IllegalMove { mv, fen } => {
                write!(f, "illegal move '{mv}' in position '{fen}'")
            }
        }
    }
}

impl std::error::Error for PositionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PositionError::Fen(err) => Some(err),
            PositionError::IllegalMove { .. } => None,
        }
    }
}

impl From<FenError> for PositionError {
    fn from(err: FenError) -> Self {
        PositionError::Fen(err)
    }
}

/// Error type for `set_option` failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// The option name is not recognized
    Unknown { name: String },
    /// The value did not parse for this option
    InvalidValue { name: String, value: String },
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionError::Unknown { name } => write!(f, "unknown option '{name}'"),
            OptionError::InvalidValue { name, value } => {
                write!(f, "invalid value '{value}' for option '{name}'")
            }
        }
    }
}

impl std::error::Error for OptionError {}

/// A chess engine: position, search state, and evaluator.
pub struct Engine {
    board: Board,
    state: SearchState,
    network: Option<Network>,
    stop: Arc<AtomicBool>,
    info_callback: Option<SearchInfoCallback>,
    last_info: Arc<Mutex<Option<SearchIterationInfo>>>,
}

impl Engine {
    /// Create an engine with the default transposition table size, loading
    /// the default network file if one is present next to the binary.
    #[must_use]
    pub fn new() -> Self {
        let mut engine = Engine::with_tt_size(DEFAULT_TT_MB);
        if Path::new(DEFAULT_NETWORK_FILE).exists() {
            engine.load_network(DEFAULT_NETWORK_FILE);
        }
        engine
    }

    /// Create an engine with a transposition table of `tt_mb` megabytes and
    /// no network.
    #[must_use]
    pub fn with_tt_size(tt_mb: usize) -> Self {
        Engine {
            board: Board::new(),
            state: SearchState::new(tt_mb),
            network: None,
            stop: Arc::new(AtomicBool::new(false)),
            info_callback: None,
            last_info: Arc::new(Mutex::new(None)),
        }
    }

    /// Load an NNUE network, falling back to the classical evaluator with a
    /// warning if the file is missing or malformed. Returns whether the
    /// network is now loaded.
    pub fn load_network(&mut self, path: &str) -> bool {
        match Network::load(path) {
            Ok(network) => {
                self.network = Some(network);
                true
            }
            Err(err) => {
                log::warn!(
                    "failed to load NNUE network '{path}': {err}; using classical evaluation"
                );
                self.network = None;
                false
            }
        }
    }

    /// Whether an NNUE network is loaded.
    #[must_use]
    pub fn has_network(&self) -> bool {
        self.network.is_some()
    }

    /// Register a per-iteration progress callback.
    pub fn set_info_callback(&mut self, callback: SearchInfoCallback) {
        self.info_callback = Some(callback);
    }

    /// The current position.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Reset to the standard initial position; TT age and heuristics reset.
    pub fn new_game(&mut self) {
        self.board = Board::new();
        self.state.new_game();
    }

    /// Set the position from a FEN string and replay `moves` (long
    /// algebraic). On any error the current position is left unchanged.
    pub fn set_position(&mut self, fen: &str, moves: &[&str]) -> Result<(), PositionError> {
        let mut board = Board::try_from_fen(fen)?;
        for &notation in moves {
            let m = board
                .parse_move(notation)
                .map_err(|_| PositionError::IllegalMove {
                    mv: notation.to_string(),
                    fen: board.to_fen(),
                })?;
            board.make_move(m);
        }
        self.board = board;
        Ok(())
    }

    /// Run a blocking search under `limits` and return the best move, score,
    /// and principal variation.
    pub fn go(&mut self, limits: &SearchLimits) -> SearchResult {
        self.stop.store(false, Ordering::Relaxed);

        let budget = resolve_limits(limits, self.board.white_to_move());

        let last_info = Arc::clone(&self.last_info);
        let user_callback = self.info_callback.clone();
        let callback: SearchInfoCallback = Arc::new(move |info: &SearchIterationInfo| {
            *last_info.lock() = Some(info.clone());
            if let Some(cb) = &user_callback {
                cb(info);
            }
        });

        run_search(
            &mut self.board,
            &mut self.state,
            self.network.as_ref(),
            &budget,
            &self.stop,
            Some(&callback),
        )
    }

    /// Request that the running search stop. Callable from any thread.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Shared stop flag, for wiring into an input thread.
    #[must_use]
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// The most recent iteration report, if a search has produced one.
    #[must_use]
    pub fn last_iteration_info(&self) -> Option<SearchIterationInfo> {
        self.last_info.lock().clone()
    }

    /// Mutate a named tunable.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        match name {
            "Hash" => {
                let mb: usize = value.parse().map_err(|_| OptionError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                })?;
                self.state.resize_tt(mb);
                Ok(())
            }
            "NNUE file" => {
                // Load failure degrades to classical eval with a warning; the
                // protocol surface is unchanged
                self.load_network(value);
                Ok(())
            }
            // The age counter is packed into the TT's per-entry meta byte,
            // so only the built-in width is accepted
            "TT replacement age bits" => {
                if value.trim() == "6" {
                    Ok(())
                } else {
                    Err(OptionError::InvalidValue {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                }
            }
            _ => Err(OptionError::Unknown {
                name: name.to_string(),
            }),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
