//! Hanging and badly defended pieces.

use shakmaty::{Bitboard, Board, Color, Role};

use super::{attackers, get_piece_value};
use crate::constants::{BAD_TRADE_MARGIN, BAD_TRADE_PENALTY_PERCENT, HANGING_PENALTY_PERCENT};

/// Penalty owed by `color` for pieces the enemy can win.
///
/// A piece attacked more often than it is defended loses most of its value.
/// A defended piece still loses part of the gap when the cheapest attacker
/// is worth much less than it.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let mut penalty = 0;

    for square in board.by_color(color) & !board.kings() {
        let Some(role) = board.role_at(square) else {
            continue;
        };
        let attacking = attackers(board, !color, square);
        if attacking.is_empty() {
            continue;
        }

        let value = get_piece_value(role);
        let defending = attackers(board, color, square);

        if attacking.count() > defending.count() {
            penalty += value * HANGING_PENALTY_PERCENT / 100;
        } else if !defending.is_empty() {
            let cheapest = cheapest_attacker(board, attacking);
            if value > cheapest + BAD_TRADE_MARGIN {
                penalty += (value - cheapest) * BAD_TRADE_PENALTY_PERCENT / 100;
            }
        }
    }

    penalty
}

/// Value of the least valuable piece among `attacking`. A king counts as 0.
pub(crate) fn cheapest_attacker(board: &Board, attacking: Bitboard) -> i32 {
    attacking
        .into_iter()
        .filter_map(|sq| board.role_at(sq))
        .map(|role| if role == Role::King { 0 } else { get_piece_value(role) })
        .min()
        .unwrap_or(0)
}
