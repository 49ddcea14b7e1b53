//! Move ordering.
//!
//! Cheap static guesses at how good a move is, used to search the most
//! promising moves first so alpha-beta cuts off early. The board is pushed
//! and popped to look at the destination square after the move; it is left
//! exactly as it was given.

use std::cmp::Reverse;

use shakmaty::Move;

use crate::constants::{
    BAD_TRADE_MARGIN, BAD_TRADE_MOVE_FACTOR, DEFENDED_CHECK_BONUS, HANGING_MOVE_FACTOR,
    KNIGHT_VALUE, PAWN_VALUE, SAFE_CHECK_BONUS, UNSAFE_CAPTURE_FACTOR,
};
use crate::game::board::{destination, GameBoard};
use crate::game::evaluation::get_piece_value;
use crate::game::evaluation::threats::cheapest_attacker;

/// What the destination square looks like once the move has been played.
struct Landing {
    gives_check: bool,
    attackers: usize,
    defenders: usize,
    cheapest_attacker: i32,
}

fn landing(board: &mut GameBoard, m: Move) -> Landing {
    let us = board.turn();
    let to = destination(&m);
    let after = board.play(m);
    let attacking = after.attackers(!us, to);
    Landing {
        gives_check: after.is_check(),
        attackers: attacking.count(),
        defenders: after.attackers(us, to).count(),
        cheapest_attacker: cheapest_attacker(after.board(), attacking),
    }
}

pub fn score_move(board: &mut GameBoard, m: Move) -> i32 {
    let moving = get_piece_value(m.role());
    let landing = landing(board, m);
    let mut score = 0;

    if let Some(victim) = m.capture() {
        let victim = get_piece_value(victim);
        if victim >= moving - PAWN_VALUE {
            score += victim * 10 - moving;
        } else if landing.attackers > landing.defenders {
            score += victim * 10 - moving * UNSAFE_CAPTURE_FACTOR;
        } else {
            score += victim * 10 - moving;
        }
    }

    if let Some(promotion) = m.promotion() {
        score += (get_piece_value(promotion) - PAWN_VALUE) * 10;
    }

    if landing.gives_check {
        if landing.attackers == 0 {
            score += SAFE_CHECK_BONUS;
        } else if landing.defenders >= landing.attackers && moving <= KNIGHT_VALUE {
            score += DEFENDED_CHECK_BONUS;
        }
    }

    if !m.is_capture() && m.promotion().is_none() {
        if landing.attackers > landing.defenders {
            score -= moving * HANGING_MOVE_FACTOR;
        } else if landing.attackers > 0 && moving > landing.cheapest_attacker + BAD_TRADE_MARGIN {
            score -= (moving - landing.cheapest_attacker) * BAD_TRADE_MOVE_FACTOR;
        }
    }

    score
}

/// Sorts `moves` best first. Ties keep their incoming order.
pub fn order_moves(board: &mut GameBoard, moves: Vec<Move>) -> Vec<Move> {
    let mut scored: Vec<(i32, Move)> = moves
        .into_iter()
        .map(|m| (score_move(board, m), m))
        .collect();
    scored.sort_by_key(|&(score, _)| Reverse(score));
    scored.into_iter().map(|(_, m)| m).collect()
}

/// A check the opponent cannot profitably answer by taking the checker.
pub fn is_safe_check(board: &mut GameBoard, m: Move) -> bool {
    let moving = get_piece_value(m.role());
    let landing = landing(board, m);
    landing.gives_check
        && (landing.attackers == 0
            || (landing.defenders >= landing.attackers && moving <= KNIGHT_VALUE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::uci;

    #[test]
    fn test_winning_capture_first() {
        let mut board =
            GameBoard::from_fen("rnb1kbnr/pppp1ppp/8/4p3/3qP3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 1")
                .unwrap();
        let fen = board.fen();
        let moves = board.legal_moves();
        let ordered = order_moves(&mut board, moves);
        assert_eq!(uci(&ordered[0]), "f3d4");
        assert_eq!(board.fen(), fen);
    }

    #[test]
    fn test_hanging_quiet_move_last() {
        let mut board = GameBoard::from_fen("4k3/8/8/3p4/8/8/1N6/4K3 w - - 0 1").unwrap();
        let m = board.parse_uci("b2c4").unwrap();
        assert_eq!(score_move(&mut board, m), -16000);

        let moves = board.legal_moves();
        let ordered = order_moves(&mut board, moves);
        assert_eq!(ordered.last().map(uci).as_deref(), Some("b2c4"));
    }

    #[test]
    fn test_unsafe_capture() {
        let mut board = GameBoard::from_fen("4k3/8/2p5/3p4/8/8/8/3QK3 w - - 0 1").unwrap();
        let m = board.parse_uci("d1d5").unwrap();
        assert_eq!(score_move(&mut board, m), 100 * 10 - 900 * 25);
    }

    #[test]
    fn test_promotion_bonus() {
        let mut board = GameBoard::from_fen("8/P3k3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let queen = board.parse_uci("a7a8q").unwrap();
        let knight = board.parse_uci("a7a8n").unwrap();
        assert_eq!(score_move(&mut board, queen), 800 * 10);
        assert_eq!(score_move(&mut board, knight), 220 * 10);
    }

    #[test]
    fn test_safe_check() {
        let mut board = GameBoard::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let check = board.parse_uci("a1a8").unwrap();
        let quiet = board.parse_uci("a1a2").unwrap();
        assert!(is_safe_check(&mut board, check));
        assert!(!is_safe_check(&mut board, quiet));
        assert_eq!(score_move(&mut board, check), SAFE_CHECK_BONUS);
    }
}
