//! Evaluation of central control.

use shakmaty::{Board, Color, Square};

use super::attackers;
use crate::constants::CENTER_CONTROL_WEIGHT;

const CENTER: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

/// Bonus for every attack `color` has on the four center squares.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let attacks: usize = CENTER
        .iter()
        .map(|&square| attackers(board, color, square).count())
        .sum();
    attacks as i32 * CENTER_CONTROL_WEIGHT
}
