//! Engine-versus-engine games with real clocks.

use std::fmt;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use shakmaty::Color;
use tracing::{debug, info};

use crate::bot::ChessBot;
use crate::game::board::{GameBoard, GameOutcome};
use crate::game::clock::TimeLimit;
use crate::game::search::SearchConfig;

#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    pub initial_clock: Duration,
    pub increment: Duration,
    /// Random plies played before the engines take over.
    pub random_plies: usize,
    /// Games reaching this many plies are scored as draws.
    pub max_plies: usize,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            initial_clock: Duration::from_secs(60),
            increment: Duration::from_secs(1),
            random_plies: 0,
            max_plies: 200,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameResult::WhiteWin => "1-0",
            GameResult::BlackWin => "0-1",
            GameResult::Draw => "1/2-1/2",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug)]
pub struct GameRecord {
    pub result: GameResult,
    /// SAN movetext, e.g. `1. e4 e5 2. Nf3`.
    pub movetext: String,
    pub plies: usize,
    pub final_fen: String,
}

fn winner(color: Color) -> GameResult {
    match color {
        Color::White => GameResult::WhiteWin,
        Color::Black => GameResult::BlackWin,
    }
}

/// Plays one game between two freshly created bots.
pub fn play_game(
    white: SearchConfig,
    black: SearchConfig,
    settings: &SelfPlayConfig,
    rng: &mut impl Rng,
) -> GameRecord {
    let mut board = GameBoard::new();
    let mut bots = [ChessBot::new(white), ChessBot::new(black)];
    let mut clocks = [settings.initial_clock; 2];
    let mut sans = Vec::new();

    let result = loop {
        match board.outcome() {
            Some(GameOutcome::Decisive(color)) => break winner(color),
            Some(GameOutcome::Draw) => break GameResult::Draw,
            None => {}
        }
        if sans.len() >= settings.max_plies {
            debug!(plies = sans.len(), "move limit reached");
            break GameResult::Draw;
        }

        let turn = board.turn();
        let side = if turn == Color::White { 0 } else { 1 };

        let m = if sans.len() < settings.random_plies {
            match board.legal_moves().choose(rng) {
                Some(&m) => m,
                None => break GameResult::Draw,
            }
        } else {
            let limit = TimeLimit::Clock {
                white: clocks[0],
                black: clocks[1],
                white_inc: settings.increment,
                black_inc: settings.increment,
            };
            let start = Instant::now();
            let Some(played) = bots[side].choose_move(&mut board, Some(&limit), false, false, None)
            else {
                break GameResult::Draw;
            };
            match clocks[side].checked_sub(start.elapsed()) {
                Some(left) => clocks[side] = left + settings.increment,
                None => {
                    info!(?turn, "lost on time");
                    break winner(!turn);
                }
            }
            played.best_move
        };

        sans.push(board.san(m));
        board.push(m);
    };

    let mut movetext = String::new();
    for (i, san) in sans.iter().enumerate() {
        if i % 2 == 0 {
            movetext.push_str(&format!("{}. ", i / 2 + 1));
        }
        movetext.push_str(&format!("{san} "));
    }

    GameRecord {
        result,
        movetext: movetext.trim_end().to_string(),
        plies: sans.len(),
        final_fen: board.fen(),
    }
}
