//! Discourages the side that is ahead from steering into repetitions.

use shakmaty::Color;

use super::material;
use crate::constants::REPETITION_PENALTY_CAP;
use crate::game::board::GameBoard;

/// Material above which the position still counts as an opening.
const OPENING_MATERIAL: i32 = 6000;
const MIDDLEGAME_MATERIAL: i32 = 3000;

fn advantage_threshold(total_material: i32) -> i32 {
    if total_material > OPENING_MATERIAL {
        150
    } else if total_material > MIDDLEGAME_MATERIAL {
        75
    } else {
        25
    }
}

/// White-perspective correction applied when the current position already
/// occurred earlier in the game.
pub fn evaluate(board: &GameBoard) -> i32 {
    if !board.is_repetition(2) {
        return 0;
    }

    let pieces = board.board();
    let white = material(pieces, Color::White);
    let black = material(pieces, Color::Black);
    let advantage = white - black;

    if advantage.abs() <= advantage_threshold(white + black) {
        return 0;
    }

    let penalty = (advantage.abs() / 2).min(REPETITION_PENALTY_CAP);
    -advantage.signum() * penalty
}
