// src/game/evaluation/king_safety.rs

use shakmaty::{Bitboard, Board, Color};

use super::attackers;
use crate::constants::{KING_ZONE_ATTACKER_WEIGHT, KING_ZONE_RADIUS};

/// Penalty for enemy pressure around `color`'s king.
///
/// Every square within `KING_ZONE_RADIUS` king steps is checked and each
/// enemy attacker of it counts once per square it hits.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let Some(king_square) = board.king_of(color) else {
        return 0;
    };

    let mut pressure = 0;
    for square in Bitboard::FULL {
        if square.distance(king_square) <= KING_ZONE_RADIUS {
            pressure += attackers(board, !color, square).count() as i32;
        }
    }

    pressure * KING_ZONE_ATTACKER_WEIGHT
}
