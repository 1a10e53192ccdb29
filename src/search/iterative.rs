//! Iterative deepening with aspiration windows and time management.

use crate::board::Move;

use super::constants::{ASPIRATION_WINDOW, MATE_BOUND, SCORE_INFINITE};
use super::{SearchContext, SearchInfoCallback, SearchIterationInfo, SearchResult};

impl SearchContext<'_> {
    /// Search the root with a small window around the previous iteration's
    /// score, re-searching with a widened window on failure.
    fn search_root(&mut self, depth: u32, previous_score: i32) -> i32 {
        if depth < 4 {
            return self.negamax(depth, -SCORE_INFINITE, SCORE_INFINITE, 0);
        }

        let mut delta = ASPIRATION_WINDOW;
        let mut alpha = previous_score.saturating_sub(delta).max(-SCORE_INFINITE);
        let mut beta = previous_score.saturating_add(delta).min(SCORE_INFINITE);

        loop {
            let score = self.negamax(depth, alpha, beta, 0);
            if self.stopped() {
                return score;
            }
            if score <= alpha {
                alpha = alpha.saturating_sub(delta).max(-SCORE_INFINITE);
                delta = delta.saturating_mul(2);
            } else if score >= beta {
                beta = beta.saturating_add(delta).min(SCORE_INFINITE);
                delta = delta.saturating_mul(2);
            } else {
                return score;
            }
            if delta > 1000 {
                alpha = -SCORE_INFINITE;
                beta = SCORE_INFINITE;
            }
        }
    }

    pub(crate) fn iterative_deepening(
        &mut self,
        max_depth: u32,
        soft_time_ms: u64,
        info_callback: Option<&SearchInfoCallback>,
    ) -> SearchResult {
        let mut result = SearchResult {
            best_move: None,
            score: 0,
            pv: Vec::new(),
        };
        let mut previous_score = 0;

        for depth in 1..=max_depth {
            self.root_best = None;
            let iteration_start_ms = self.start.elapsed().as_millis() as u64;

            let score = self.search_root(depth, previous_score);

            if self.stopped() {
                // Keep the last completed iteration's move; if even depth 1
                // was cut short, fall back to the best root move seen so far
                if result.best_move.is_none() {
                    result.best_move = self.root_best;
                }
                break;
            }

            previous_score = score;
            let pv: Vec<Move> = self.pv[0][..self.pv_len[0]].to_vec();
            result.best_move = pv.first().copied().or(self.root_best);
            result.score = score;
            result.pv = pv;

            let elapsed = self.start.elapsed().as_millis() as u64;
            if let Some(callback) = info_callback {
                let pv_str = result
                    .pv
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                let info = SearchIterationInfo {
                    depth,
                    score_cp: if self.board.white_to_move() {
                        score
                    } else {
                        -score
                    },
                    nodes: self.nodes,
                    nps: self.nodes * 1000 / elapsed.max(1),
                    time_ms: elapsed,
                    pv: pv_str,
                };
                callback(&info);
            }

            // A forced mate does not get better with depth
            if score.abs() >= MATE_BOUND {
                break;
            }

            if soft_time_ms != u64::MAX && elapsed >= soft_time_ms {
                break;
            }
            // The next iteration costs roughly 3x the last one; skip it if
            // that would blow the hard budget
            let last_iteration_ms = elapsed.saturating_sub(iteration_start_ms);
            if self.hard_time_ms != u64::MAX
                && last_iteration_ms > 0
                && elapsed + 3 * last_iteration_ms > self.hard_time_ms
            {
                break;
            }
        }

        result
    }
}
