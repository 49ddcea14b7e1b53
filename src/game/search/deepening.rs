//! Iterative deepening under a time budget.

use std::time::{Duration, Instant};

use shakmaty::{Color, Move};
use tracing::debug;

use super::{ordering, SearchConfig, Searcher};
use crate::constants::{INFINITY, MATE_THRESHOLD};
use crate::game::board::{uci, GameBoard};
use crate::game::clock::TimeBudget;
use crate::game::evaluation;

/// Soft budgets below this only get the minimum depth.
const SHORT_BUDGET: Duration = Duration::from_millis(300);

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    /// White's perspective.
    pub score: i32,
    /// Deepest fully completed iteration, 0 when none finished.
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Deepest iteration worth attempting for a soft budget.
pub fn depth_target(soft: Duration, config: &SearchConfig) -> u8 {
    let min = config.min_depth;
    let max = config.max_depth.max(min);
    if soft < SHORT_BUDGET {
        return min;
    }
    let target = ((3.0 * soft.as_secs_f64()).ln() / 3f64.ln()).round() + 3.0;
    (target.max(0.0) as u8).clamp(min, max)
}

impl Searcher {
    /// Searches `root_moves` one ply deeper per iteration until the budget
    /// runs out, keeping the result of the deepest iteration that finished.
    pub fn search(&mut self, board: &mut GameBoard, root_moves: Vec<Move>, budget: &TimeBudget) -> SearchOutcome {
        let start = Instant::now();
        self.deadline = Some(start + budget.hard);
        self.nodes = 0;

        let root_moves = ordering::order_moves(board, root_moves);
        let target = depth_target(budget.soft, &self.config);
        let soft_stop = budget.soft.mul_f64(self.config.soft_stop_fraction);

        let mut completed: Option<(i32, Move, u8)> = None;

        for depth in 1..=target {
            if start.elapsed() >= soft_stop {
                break;
            }

            match self.search_root(board, &root_moves, depth) {
                Some((score, best)) => {
                    debug!(
                        depth,
                        score,
                        best = %uci(&best),
                        nodes = self.nodes,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "completed depth"
                    );
                    completed = Some((score, best, depth));
                    if score.abs() > MATE_THRESHOLD {
                        break;
                    }
                }
                None => {
                    debug!(depth, "depth interrupted by deadline");
                    break;
                }
            }
        }

        let outcome = match completed {
            Some((score, best, depth)) => SearchOutcome {
                best_move: Some(best),
                score,
                depth,
                nodes: self.nodes,
                elapsed: start.elapsed(),
            },
            None => {
                let fallback = root_moves.first().copied();
                let score = match fallback {
                    Some(m) => evaluation::evaluate(&board.play(m), &self.config),
                    None => evaluation::evaluate(board, &self.config),
                };
                SearchOutcome {
                    best_move: fallback,
                    score,
                    depth: 0,
                    nodes: self.nodes,
                    elapsed: start.elapsed(),
                }
            }
        };

        self.deadline = None;
        outcome
    }

    /// One full-width iteration. `None` if the deadline cut it short.
    fn search_root(&mut self, board: &mut GameBoard, root_moves: &[Move], depth: u8) -> Option<(i32, Move)> {
        let maximizing = board.turn() == Color::White;
        let mut alpha = -INFINITY;
        let mut beta = INFINITY;
        let mut best: Option<(i32, Move)> = None;

        for &m in root_moves {
            if self.out_of_time() {
                return None;
            }

            let score = {
                let mut child = board.play(m);
                self.alpha_beta(&mut child, depth - 1, alpha, beta, !maximizing, 1).0
            };

            if self.out_of_time() {
                return None;
            }

            let improves = match best {
                None => true,
                Some((best_score, _)) if maximizing => score > best_score,
                Some((best_score, _)) => score < best_score,
            };
            if improves {
                best = Some((score, m));
            }
            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MATE_SCORE;

    fn budget(soft_ms: u64, hard_ms: u64) -> TimeBudget {
        TimeBudget {
            soft: Duration::from_millis(soft_ms),
            hard: Duration::from_millis(hard_ms),
        }
    }

    #[test]
    fn test_depth_target() {
        let config = SearchConfig::default();
        assert_eq!(depth_target(Duration::from_millis(100), &config), 2);
        assert_eq!(depth_target(Duration::from_secs(1), &config), 4);
        assert_eq!(depth_target(Duration::from_secs(15), &config), 6);
        assert_eq!(depth_target(Duration::from_secs(10_000), &config), 8);
    }

    #[test]
    fn test_stops_at_max_depth() {
        let config = SearchConfig {
            min_depth: 1,
            max_depth: 2,
            ..SearchConfig::default()
        };
        let mut searcher = Searcher::new(config);
        let mut board = GameBoard::new();
        let moves = board.legal_moves();
        let outcome = searcher.search(&mut board, moves, &budget(60_000, 60_000));

        assert_eq!(outcome.depth, 2);
        assert!(outcome.best_move.is_some_and(|m| board.is_legal(&m)));
        assert_eq!(board.pushed(), 0);
    }

    #[test]
    fn test_stops_after_proven_mate() {
        let mut searcher = Searcher::new(SearchConfig::default());
        let mut board =
            GameBoard::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 1")
                .unwrap();
        let moves = board.legal_moves();
        let outcome = searcher.search(&mut board, moves, &budget(60_000, 60_000));

        // The mate is already visible to the quiescence search at depth 1.
        assert_eq!(outcome.best_move.as_ref().map(uci).as_deref(), Some("h5f7"));
        assert_eq!(outcome.depth, 1);
        assert_eq!(outcome.score, MATE_SCORE);
    }

    #[test]
    fn test_no_time_falls_back_to_first_ordered_move() {
        let mut searcher = Searcher::new(SearchConfig::default());
        let mut board =
            GameBoard::from_fen("rnb1kbnr/pppp1ppp/8/4p3/3qP3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 1")
                .unwrap();
        let moves = board.legal_moves();
        let outcome = searcher.search(&mut board, moves, &budget(0, 0));

        assert_eq!(outcome.depth, 0);
        assert_eq!(outcome.best_move.as_ref().map(uci).as_deref(), Some("f3d4"));
    }

    #[test]
    fn test_deadline_is_respected() {
        let mut searcher = Searcher::new(SearchConfig {
            min_depth: 8,
            ..SearchConfig::default()
        });
        let mut board =
            GameBoard::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3")
                .unwrap();
        let moves = board.legal_moves();
        let start = Instant::now();
        let outcome = searcher.search(&mut board, moves, &budget(50, 50));

        assert!(start.elapsed() < Duration::from_millis(1500));
        assert!(outcome.best_move.is_some());
        assert!(outcome.depth < 8);
        assert_eq!(board.pushed(), 0);
    }
}
