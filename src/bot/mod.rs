//! The engine as seen by a game host.
//!
//! `ChessBot` keeps everything that should survive from one move to the
//! next: the transposition table, the opponent model and the time spent on
//! our own previous move.

use std::time::{Duration, Instant};

use shakmaty::{Color, Move};
use tracing::{debug, info, warn};

use crate::game::board::{uci, GameBoard, PositionKey};
use crate::game::clock::{OpponentModel, TimeLimit, TimeManager};
use crate::game::search::tt::TranspositionTable;
use crate::game::search::{SearchConfig, Searcher};

/// The engine's answer for one move.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayResult {
    pub best_move: Move,
    /// Whether an offered draw is accepted.
    pub draw_offer: bool,
    /// Search score from the bot's own perspective.
    pub score: i32,
    /// Deepest completed search iteration.
    pub depth: u8,
}

pub struct ChessBot {
    searcher: Searcher,
    time_manager: TimeManager,
    opponent: OpponentModel,
    last_position: Option<PositionKey>,
    last_search_end: Option<Instant>,
    last_score: Option<i32>,
}

impl Default for ChessBot {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl ChessBot {
    pub fn new(config: SearchConfig) -> Self {
        let time_manager = TimeManager::new(
            Duration::from_secs_f64(config.base_max_time_secs),
            Duration::from_secs_f64(config.min_move_time_secs),
        );
        Self {
            searcher: Searcher::new(config),
            time_manager,
            opponent: OpponentModel::new(),
            last_position: None,
            last_search_end: None,
            last_score: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        self.searcher.config()
    }

    pub fn opponent_model(&self) -> &OpponentModel {
        &self.opponent
    }

    pub fn transposition_table(&self) -> &TranspositionTable {
        self.searcher.transposition_table()
    }

    /// Picks a move for the side to move on `board`.
    ///
    /// `root_moves` restricts the candidates; a restriction that matches no
    /// legal move is ignored. Returns `None` only when there is no legal move.
    /// The board is returned unchanged.
    pub fn choose_move(
        &mut self,
        board: &mut GameBoard,
        time_limit: Option<&TimeLimit>,
        ponder: bool,
        draw_offered: bool,
        root_moves: Option<&[Move]>,
    ) -> Option<PlayResult> {
        let start = Instant::now();
        let us = board.turn();

        let moves = self.candidate_moves(board, root_moves);
        if moves.is_empty() {
            return None;
        }
        if ponder {
            debug!("ponder requested; searching only on our own time");
        }

        let key = board.key();
        if self.last_position.is_some_and(|last| last != key) {
            self.searcher.trim_cache();
        }
        self.last_position = Some(key);

        let opponent_time = self
            .last_search_end
            .map(|end| start.saturating_duration_since(end));
        if let Some(duration) = opponent_time {
            self.opponent.record_move_time(duration);
        }

        let remaining = time_limit.map(|limit| limit.remaining_for(us));
        let budget = self
            .time_manager
            .allocate(remaining, board.piece_count(), &self.opponent);
        debug!(
            soft_ms = budget.soft.as_millis() as u64,
            hard_ms = budget.hard.as_millis() as u64,
            ?remaining,
            "time allocated"
        );

        let fallback = moves.first().copied();
        let outcome = self.searcher.search(board, moves, &budget);
        let best_move = outcome.best_move.or(fallback)?;

        let perspective = if us == Color::White { 1 } else { -1 };
        let score = outcome.score * perspective;

        if let (Some(before), Some(duration)) = (self.last_score, opponent_time) {
            self.opponent.observe(before, score, duration);
        }

        let elapsed = start.elapsed();
        self.time_manager.record_own_move(elapsed);
        self.last_search_end = Some(Instant::now());
        self.last_score = Some(score);

        let draw_offer = draw_offered && score <= -self.config().draw_accept_margin;

        info!(
            best_move = %uci(&best_move),
            elapsed_ms = elapsed.as_millis() as u64,
            eval = outcome.score,
            depth = outcome.depth,
            nodes = outcome.nodes,
            opponent_strength = self.opponent.strength(),
            draw_offer,
            "move chosen"
        );

        Some(PlayResult {
            best_move,
            draw_offer,
            score,
            depth: outcome.depth,
        })
    }

    fn candidate_moves(&self, board: &GameBoard, root_moves: Option<&[Move]>) -> Vec<Move> {
        let legal = board.legal_moves();
        let Some(allowed) = root_moves else {
            return legal;
        };
        let restricted: Vec<Move> = legal
            .iter()
            .copied()
            .filter(|m| allowed.contains(m))
            .collect();
        if restricted.is_empty() && !legal.is_empty() {
            warn!(
                requested = allowed.len(),
                "restricted move set has no legal move; searching all moves"
            );
            return legal;
        }
        restricted
    }
}
