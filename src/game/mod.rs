// game/mod.rs

pub mod board;
pub mod clock;
pub mod evaluation;
pub mod search;
