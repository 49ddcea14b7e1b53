// src/game/search.rs

pub mod deepening;
pub mod ordering;
pub mod quiescence;
pub mod tt;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use shakmaty::{Color, Move};
use tracing::trace;

use crate::constants::{INFINITY, MATE_SCORE};
use crate::game::board::{GameBoard, GameOutcome, PositionKey};
use crate::game::evaluation;
pub use deepening::SearchOutcome;
use tt::{TranspositionTable, TtEntry};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiescence stops extending captures and checks at this many plies.
    pub max_quiescence_depth: u8,
    pub min_depth: u8,
    pub max_depth: u8,
    /// No new iteration starts once this share of the soft budget is spent.
    pub soft_stop_fraction: f64,
    pub tt_max_entries: usize,
    pub tt_trim_to: usize,
    /// Penalize the side ahead in material for revisiting positions.
    pub anti_repetition: bool,
    pub base_max_time_secs: f64,
    pub min_move_time_secs: f64,
    /// Offered draws are accepted when our score is at or below minus this.
    pub draw_accept_margin: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_quiescence_depth: 10,
            min_depth: 2,
            max_depth: 8,
            soft_stop_fraction: 0.85,
            tt_max_entries: 50_000,
            tt_trim_to: 20_000,
            anti_repetition: false,
            base_max_time_secs: 15.0,
            min_move_time_secs: 0.5,
            draw_accept_margin: 200,
        }
    }
}

/// Single-threaded alpha-beta searcher.
///
/// Owns the transposition table, so cached results carry over from one
/// move to the next for as long as the searcher lives.
pub struct Searcher {
    config: SearchConfig,
    tt: TranspositionTable,
    deadline: Option<Instant>,
    nodes: u64,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        let tt = TranspositionTable::new(config.tt_max_entries, config.tt_trim_to);
        Self {
            config,
            tt,
            deadline: None,
            nodes: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.deadline = deadline;
    }

    fn out_of_time(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Drops the oldest cache entries if the table has outgrown its limit.
    pub fn trim_cache(&mut self) -> usize {
        self.tt.trim()
    }

    /// Minimax with alpha-beta pruning. White maximizes, Black minimizes.
    ///
    /// Scores are from White's perspective. Once the deadline passes the
    /// returned values are best-effort and must not be trusted by callers.
    pub fn alpha_beta(
        &mut self,
        board: &mut GameBoard,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        ply: u8,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;

        if self.out_of_time() {
            return (evaluation::evaluate(board, &self.config), None);
        }

        let key = board.key();
        if let Some(entry) = self.tt.lookup(key, depth).copied() {
            match entry.best_move {
                Some(m) if !board.is_legal(&m) => {
                    trace!(?key, "discarding cache entry with illegal move");
                    self.tt.discard(key);
                }
                _ => return (entry.score, entry.best_move),
            }
        }

        if depth == 0 {
            return (self.quiescence(board, alpha, beta, 0), None);
        }

        match board.outcome() {
            Some(GameOutcome::Decisive(Color::White)) => return (MATE_SCORE - ply as i32, None),
            Some(GameOutcome::Decisive(Color::Black)) => return (-MATE_SCORE + ply as i32, None),
            Some(GameOutcome::Draw) => return (0, None),
            None => {}
        }

        let moves = self.ordered_moves(board, key);

        let mut best_move = None;
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut exhaustive = true;

        for m in moves {
            let score = {
                let mut child = board.play(m);
                self.alpha_beta(&mut child, depth - 1, alpha, beta, !maximizing, ply + 1).0
            };

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(m);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(m);
                }
                beta = beta.min(score);
            }

            if alpha >= beta {
                exhaustive = false;
                break;
            }
        }

        if exhaustive && best_move.is_some() && !self.out_of_time() {
            self.tt.store(
                key,
                TtEntry {
                    depth,
                    score: best_score,
                    best_move,
                },
            );
        }

        (best_score, best_move)
    }

    /// Legal moves with the cached best move, if any and still legal, first.
    fn ordered_moves(&mut self, board: &mut GameBoard, key: PositionKey) -> Vec<Move> {
        let tt_move = self
            .tt
            .probe(key)
            .and_then(|entry| entry.best_move)
            .filter(|m| board.is_legal(m));

        let mut rest = board.legal_moves();
        if let Some(first) = tt_move {
            rest.retain(|m| *m != first);
        }
        let mut moves = Vec::with_capacity(rest.len() + 1);
        moves.extend(tt_move);
        moves.extend(ordering::order_moves(board, rest));
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MATE_THRESHOLD;
    use crate::game::board::uci;

    const SCHOLARS_MATE: &str =
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 1";

    #[test]
    fn test_finds_mate_in_one() {
        let mut board = GameBoard::from_fen(SCHOLARS_MATE).unwrap();
        let mut searcher = Searcher::new(SearchConfig::default());

        let (score, best) = searcher.alpha_beta(&mut board, 2, -INFINITY, INFINITY, true, 0);
        assert_eq!(best.as_ref().map(uci).as_deref(), Some("h5f7"));
        assert_eq!(score, MATE_SCORE - 1);
        assert!(score > MATE_THRESHOLD);

        let entry = searcher.transposition_table().probe(board.key()).copied();
        assert_eq!(entry.map(|e| e.depth), Some(2));
        assert_eq!(entry.and_then(|e| e.best_move), best);
    }

    #[test]
    fn test_search_restores_board() {
        let mut board = GameBoard::new();
        let fen = board.fen();
        let mut searcher = Searcher::new(SearchConfig::default());
        searcher.alpha_beta(&mut board, 2, -INFINITY, INFINITY, true, 0);
        assert_eq!(board.fen(), fen);
        assert_eq!(board.pushed(), 0);
        assert!(searcher.nodes() > 20);
    }

    #[test]
    fn test_cached_result_is_reused() {
        let mut board = GameBoard::new();
        let mut searcher = Searcher::new(SearchConfig::default());
        let first = searcher.alpha_beta(&mut board, 2, -INFINITY, INFINITY, true, 0);
        let nodes = searcher.nodes();

        let second = searcher.alpha_beta(&mut board, 2, -INFINITY, INFINITY, true, 0);
        assert_eq!(first, second);
        assert_eq!(searcher.nodes(), nodes + 1);
    }

    #[test]
    fn test_cache_entry_with_illegal_move_is_replaced() {
        let mut board = GameBoard::new();
        let other = GameBoard::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let foreign = other.parse_uci("a1a8").unwrap();
        assert!(!board.is_legal(&foreign));

        let mut searcher = Searcher::new(SearchConfig::default());
        searcher.tt.store(
            board.key(),
            TtEntry {
                depth: 5,
                score: 12_345,
                best_move: Some(foreign),
            },
        );

        let (score, best) = searcher.alpha_beta(&mut board, 1, -INFINITY, INFINITY, true, 0);
        assert_ne!(score, 12_345);
        assert!(best.is_some_and(|m| board.is_legal(&m)));

        let entry = searcher.transposition_table().probe(board.key()).copied();
        assert_eq!(entry.map(|e| e.depth), Some(1));
        assert_eq!(entry.and_then(|e| e.best_move), best);
    }

    #[test]
    fn test_stalemate_scores_zero() {
        let mut board = GameBoard::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut searcher = Searcher::new(SearchConfig::default());
        let (score, best) = searcher.alpha_beta(&mut board, 3, -INFINITY, INFINITY, false, 0);
        assert_eq!(score, 0);
        assert!(best.is_none());
    }

    #[test]
    fn test_expired_deadline_returns_static_eval() {
        let mut board = GameBoard::new();
        let mut searcher = Searcher::new(SearchConfig::default());
        searcher.set_deadline(Some(Instant::now()));
        let (score, best) = searcher.alpha_beta(&mut board, 4, -INFINITY, INFINITY, true, 0);
        assert_eq!(score, 0);
        assert!(best.is_none());
        assert!(searcher.transposition_table().is_empty());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"max_depth": 4}"#).unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.min_depth, SearchConfig::default().min_depth);
    }
}
