//! Search limit resolution and time management.

use crate::search::SearchBudget;

/// Minimum soft time in milliseconds when the clock allows it
const SOFT_FLOOR_MS: u64 = 50;

/// Minimum hard time in milliseconds when the clock allows it
const HARD_FLOOR_MS: u64 = 100;

/// Remaining time below which the floors no longer apply
const LOW_TIME_MS: u64 = 1000;

/// Fallback moves-to-go estimate, also the most optimistic divisor
const DEFAULT_MOVES_TO_GO: u64 = 25;

/// Search limits as received from the protocol layer. Every field is
/// optional; a missing field means that axis is unlimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits {
    /// Cap iterative deepening at this depth
    pub depth: Option<u32>,
    /// Stop when the node counter reaches this value
    pub nodes: Option<u64>,
    /// Fixed time per move in ms; sets both soft and hard limits
    pub movetime_ms: Option<u64>,
    /// White's remaining clock time in ms
    pub wtime_ms: Option<u64>,
    /// Black's remaining clock time in ms
    pub btime_ms: Option<u64>,
    /// White's increment per move in ms
    pub winc_ms: Option<u64>,
    /// Black's increment per move in ms
    pub binc_ms: Option<u64>,
    /// Moves until the next time control
    pub movestogo: Option<u64>,
    /// Never stop on time; only an external stop terminates
    pub infinite: bool,
}

impl SearchLimits {
    /// Limits for a fixed-depth search.
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            depth: Some(depth),
            ..SearchLimits::default()
        }
    }

    /// Limits for a fixed time per move.
    #[must_use]
    pub fn movetime(ms: u64) -> Self {
        SearchLimits {
            movetime_ms: Some(ms),
            ..SearchLimits::default()
        }
    }

    /// Limits for an infinite search.
    #[must_use]
    pub fn infinite() -> Self {
        SearchLimits {
            infinite: true,
            ..SearchLimits::default()
        }
    }
}

/// Derive the concrete search budget from protocol limits.
///
/// With clock fields, `base = time / max(movestogo, 25) + inc`; the soft
/// limit is capped at 25% of remaining time and the hard limit at 40%, with
/// ~50/100 ms floors unless under a second remains.
pub(crate) fn resolve_limits(limits: &SearchLimits, white_to_move: bool) -> SearchBudget {
    let mut budget = SearchBudget::default();
    if let Some(depth) = limits.depth {
        budget.max_depth = depth;
    }
    if let Some(nodes) = limits.nodes {
        budget.node_limit = nodes;
    }

    if limits.infinite {
        return budget;
    }

    if let Some(movetime) = limits.movetime_ms {
        let movetime = movetime.max(1);
        budget.soft_time_ms = movetime;
        budget.hard_time_ms = movetime;
        return budget;
    }

    let (time, inc) = if white_to_move {
        (limits.wtime_ms, limits.winc_ms)
    } else {
        (limits.btime_ms, limits.binc_ms)
    };
    let Some(time) = time else {
        return budget;
    };
    let inc = inc.unwrap_or(0);

    let divisor = limits.movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(DEFAULT_MOVES_TO_GO);
    let base = time / divisor + inc;

    let mut soft = base.min(time * 25 / 100);
    let mut hard = (base.saturating_mul(3)).min(time * 40 / 100);
    if time >= LOW_TIME_MS {
        soft = soft.max(SOFT_FLOOR_MS);
        hard = hard.max(HARD_FLOOR_MS);
    }
    budget.soft_time_ms = soft.max(1);
    budget.hard_time_ms = hard.max(budget.soft_time_ms);
    budget
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let budget = resolve_limits(&SearchLimits::default(), true);
        assert_eq!(budget.soft_time_ms, u64::MAX);
        assert_eq!(budget.hard_time_ms, u64::MAX);
        assert_eq!(budget.node_limit, u64::MAX);
    }

    #[test]
    fn test_movetime_sets_both_limits() {
        let budget = resolve_limits(&SearchLimits::movetime(5000), true);
        assert_eq!(budget.soft_time_ms, 5000);
        assert_eq!(budget.hard_time_ms, 5000);
    }

    #[test]
    fn test_depth_limit() {
        let budget = resolve_limits(&SearchLimits::depth(7), false);
        assert_eq!(budget.max_depth, 7);
        assert_eq!(budget.soft_time_ms, u64::MAX);
    }

    #[test]
    fn test_infinite_ignores_clock() {
        let limits = SearchLimits {
            infinite: true,
            wtime_ms: Some(1000),
            ..SearchLimits::default()
        };
        let budget = resolve_limits(&limits, true);
        assert_eq!(budget.soft_time_ms, u64::MAX);
    }

    #[test]
    fn test_clock_uses_side_to_move() {
        let limits = SearchLimits {
            wtime_ms: Some(300_000),
            btime_ms: Some(1_000),
            winc_ms: Some(2_000),
            ..SearchLimits::default()
        };
        let white = resolve_limits(&limits, true);
        let black = resolve_limits(&limits, false);
        // 300000 / 25 + 2000 = 14000
        assert_eq!(white.soft_time_ms, 14_000);
        assert!(black.soft_time_ms < white.soft_time_ms);
    }

    #[test]
    fn test_soft_and_hard_caps() {
        let limits = SearchLimits {
            wtime_ms: Some(10_000),
            winc_ms: Some(10_000),
            ..SearchLimits::default()
        };
        let budget = resolve_limits(&limits, true);
        // base = 10400 but caps bind: soft <= 25%, hard <= 40%
        assert_eq!(budget.soft_time_ms, 2_500);
        assert_eq!(budget.hard_time_ms, 4_000);
    }

    #[test]
    fn test_floors_apply_with_time_on_the_clock() {
        let limits = SearchLimits {
            wtime_ms: Some(1_000),
            ..SearchLimits::default()
        };
        let budget = resolve_limits(&limits, true);
        // base = 40 but the floors lift it
        assert_eq!(budget.soft_time_ms, 50);
        assert_eq!(budget.hard_time_ms, 100);
    }

    #[test]
    fn test_no_floors_when_nearly_flagging() {
        let limits = SearchLimits {
            wtime_ms: Some(200),
            ..SearchLimits::default()
        };
        let budget = resolve_limits(&limits, true);
        assert!(budget.soft_time_ms < 50);
        assert!(budget.hard_time_ms <= 80);
        assert!(budget.soft_time_ms >= 1);
    }

    #[test]
    fn test_movestogo_divisor_is_clamped() {
        let few = SearchLimits {
            wtime_ms: Some(100_000),
            movestogo: Some(2),
            ..SearchLimits::default()
        };
        let many = SearchLimits {
            wtime_ms: Some(100_000),
            movestogo: Some(50),
            ..SearchLimits::default()
        };
        // movestogo below 25 still divides by 25
        assert_eq!(resolve_limits(&few, true).soft_time_ms, 4_000);
        assert_eq!(resolve_limits(&many, true).soft_time_ms, 2_000);
    }
}
