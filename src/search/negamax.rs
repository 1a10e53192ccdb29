//! The alpha-beta core.

use std::sync::atomic::Ordering;

use crate::board::{Move, MAX_PLY};
use crate::tt::Bound;

use super::constants::{MATE_SCORE, NODE_CHECK_INTERVAL, SCORE_INFINITE};
use super::SearchContext;

impl SearchContext<'_> {
    #[inline]
    pub(crate) fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Node-interval poll: raise the stop flag once the hard deadline or the
    /// node limit is hit. Checking elapsed time every node would be too
    /// expensive; one extra interval of work past the limit is acceptable.
    #[inline]
    pub(crate) fn poll_stop(&mut self) {
        if self.nodes >= self.node_limit {
            self.stop.store(true, Ordering::Relaxed);
            return;
        }
        if self.nodes & (NODE_CHECK_INTERVAL - 1) == 0
            && self.hard_time_ms != u64::MAX
            && self.start.elapsed().as_millis() as u64 >= self.hard_time_ms
        {
            self.stop.store(true, Ordering::Relaxed);
        }
    }

    /// Prepend `m` to the child's principal variation.
    fn update_pv(&mut self, ply: usize, m: Move) {
        let child_len = if ply + 1 < MAX_PLY {
            self.pv_len[ply + 1].min(MAX_PLY - 1)
        } else {
            0
        };
        let (head, tail) = self.pv.split_at_mut(ply + 1);
        head[ply][0] = m;
        for i in 0..child_len {
            head[ply][i + 1] = tail[0][i];
        }
        self.pv_len[ply] = child_len + 1;
    }

    /// Negamax alpha-beta. The score is from the side-to-move's perspective.
    pub(crate) fn negamax(&mut self, depth: u32, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        self.pv_len[ply] = 0;
        self.nodes += 1;
        self.poll_stop();
        if self.stopped() {
            return 0;
        }

        // Draw detection away from the root: a single repetition in the game
        // line scores as a draw, as does the 50-move rule
        if ply > 0
            && (self.board.halfmove_clock() >= 100 || self.board.repetition_count() >= 2)
        {
            return 0;
        }

        if ply >= MAX_PLY - 1 {
            return self.evaluate();
        }

        let mut tt_move = None;
        if let Some(hit) = self.state.tables.tt.probe(self.board.hash(), ply) {
            tt_move = hit.best_move;
            if ply > 0 && hit.depth >= depth {
                let cutoff = match hit.bound {
                    Bound::Exact => true,
                    Bound::Lower => hit.score >= beta,
                    Bound::Upper => hit.score <= alpha,
                };
                if cutoff {
                    return hit.score;
                }
            }
        }

        if depth == 0 {
            return self.quiescence(alpha, beta, ply);
        }

        let us = self.board.side_to_move();
        let in_check = self.board.is_in_check(us);
        let moves = self.board.generate_moves();
        let mut scored = self.order_moves(&moves, tt_move, ply);

        let original_alpha = alpha;
        let mut best_score = -SCORE_INFINITE;
        let mut best_move: Option<Move> = None;
        let mut legal_moves = 0u32;

        let mut index = 0;
        while let Some(scored_move) = scored.pick_best(index) {
            index += 1;
            let m = scored_move.mv;

            // Generation is pseudo-legal: make, then reject moves that leave
            // our own king attacked
            let info = self.make(m);
            if self.board.is_in_check(us) {
                self.unmake(m, &info);
                continue;
            }
            legal_moves += 1;

            let score = -self.negamax(depth - 1, -beta, -alpha, ply + 1);
            self.unmake(m, &info);

            if self.stopped() {
                return alpha;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(m);
                if score > alpha {
                    alpha = score;
                    self.update_pv(ply, m);
                    if ply == 0 {
                        self.root_best = Some(m);
                    }
                    if alpha >= beta {
                        if !m.is_capture() && !m.is_promotion() {
                            self.record_killer(ply, m);
                            self.record_history(m, depth);
                        }
                        break;
                    }
                }
            }
        }

        if legal_moves == 0 {
            return if in_check {
                -MATE_SCORE + ply as i32
            } else {
                0
            };
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.state
            .tables
            .tt
            .store(self.board.hash(), depth, ply, best_score, bound, best_move);

        best_score
    }
}
