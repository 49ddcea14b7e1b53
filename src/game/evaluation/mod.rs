//! Static evaluation of a chess position.
//!
//! Scores are centipawns from White's perspective. Terminal positions score
//! 0 for a draw and `±MATE_SCORE` for a decided game.

pub mod king_safety;
pub mod pst;
pub mod repetition;
pub mod space;
pub mod threats;

use shakmaty::{Bitboard, Board, Color, Role, Square};

use crate::constants::{
    BISHOP_VALUE, ENDGAME_PIECE_COUNT, KNIGHT_VALUE, MATE_SCORE, PAWN_VALUE, QUEEN_VALUE,
    ROOK_VALUE,
};
use crate::game::board::{GameBoard, GameOutcome};
use crate::game::search::SearchConfig;

pub fn get_piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => 0,
    }
}

/// Material of `color`, kings excluded.
pub fn material(board: &Board, color: Color) -> i32 {
    Role::ALL
        .iter()
        .map(|&role| {
            let count = (board.by_role(role) & board.by_color(color)).count() as i32;
            count * get_piece_value(role)
        })
        .sum()
}

/// The position is treated as an endgame once the side with fewer pieces,
/// king included, has at most `ENDGAME_PIECE_COUNT` left.
pub fn is_endgame(board: &Board) -> bool {
    let white = board.by_color(Color::White).count();
    let black = board.by_color(Color::Black).count();
    white.min(black) <= ENDGAME_PIECE_COUNT
}

/// Pieces of `color` attacking `square`.
pub(crate) fn attackers(board: &Board, color: Color, square: Square) -> Bitboard {
    board.attacks_to(square, color, board.occupied()) & board.by_color(color)
}

/// Evaluates the board from White's perspective.
pub fn evaluate(board: &GameBoard, config: &SearchConfig) -> i32 {
    match board.outcome() {
        Some(GameOutcome::Draw) => return 0,
        Some(GameOutcome::Decisive(Color::White)) => return MATE_SCORE,
        Some(GameOutcome::Decisive(Color::Black)) => return -MATE_SCORE,
        None => {}
    }

    let pieces = board.board();
    let endgame = is_endgame(pieces);

    let mut score = material(pieces, Color::White) - material(pieces, Color::Black);
    score += pst::evaluate(pieces, Color::White, endgame)
        - pst::evaluate(pieces, Color::Black, endgame);
    score -= threats::evaluate(pieces, Color::White) - threats::evaluate(pieces, Color::Black);

    if !endgame {
        score -= king_safety::evaluate(pieces, Color::White)
            - king_safety::evaluate(pieces, Color::Black);
        score += space::evaluate(pieces, Color::White) - space::evaluate(pieces, Color::Black);
    }

    if config.anti_repetition {
        score += repetition::evaluate(board);
    }

    score
}
