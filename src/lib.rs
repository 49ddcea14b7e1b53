//! Time-bounded chess engine: iterative-deepening alpha-beta search with a
//! quiescence extension, a persistent transposition table and adaptive time
//! allocation driven by an opponent-strength estimate.

pub mod bot;
pub mod config;
pub mod constants;
pub mod game;
pub mod selfplay;

pub use bot::{ChessBot, PlayResult};
pub use game::board::{BoardError, GameBoard};
pub use game::clock::TimeLimit;
pub use game::search::SearchConfig;
