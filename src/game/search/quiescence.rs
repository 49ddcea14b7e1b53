// src/game/search/quiescence.rs

use shakmaty::{Color, Move};

use super::{ordering, Searcher};
use crate::game::board::GameBoard;
use crate::game::evaluation;

impl Searcher {
    /// Extends the search past the horizon with captures and safe checks
    /// until the position is quiet.
    ///
    /// Fail-hard: the side to move may always stand pat, so the result is
    /// clamped to `[alpha, beta]`.
    pub fn quiescence(&mut self, board: &mut GameBoard, mut alpha: i32, mut beta: i32, qs_depth: u8) -> i32 {
        self.nodes += 1;

        let stand_pat = evaluation::evaluate(board, &self.config);
        if self.out_of_time() || qs_depth >= self.config.max_quiescence_depth || board.is_game_over() {
            return stand_pat;
        }

        let maximizing = board.turn() == Color::White;
        if maximizing {
            if stand_pat >= beta {
                return beta;
            }
            alpha = alpha.max(stand_pat);
        } else {
            if stand_pat <= alpha {
                return alpha;
            }
            beta = beta.min(stand_pat);
        }

        let candidates: Vec<Move> = board
            .legal_moves()
            .into_iter()
            .filter(|&m| m.is_capture() || ordering::is_safe_check(board, m))
            .collect();

        for m in ordering::order_moves(board, candidates) {
            let score = {
                let mut child = board.play(m);
                self.quiescence(&mut child, alpha, beta, qs_depth + 1)
            };

            if maximizing {
                if score >= beta {
                    return beta;
                }
                alpha = alpha.max(score);
            } else {
                if score <= alpha {
                    return alpha;
                }
                beta = beta.min(score);
            }
        }

        if maximizing {
            alpha
        } else {
            beta
        }
    }
}
