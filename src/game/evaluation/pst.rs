//! Piece-Square Tables (PSTs) for chess evaluation.
//!
//! Tables are indexed `[rank][file]` from White's side: the first row is
//! rank 1 (a1..h1) and values stay within a few points. Black reads the
//! vertically mirrored table.

use shakmaty::{Board, Color, Piece, Role};

type Pst = [[i32; 8]; 8];

const fn flip(pst: &Pst) -> Pst {
    let mut flipped = [[0; 8]; 8];
    let mut i = 0;
    while i < 8 {
        let mut j = 0;
        while j < 8 {
            flipped[i][j] = pst[7 - i][j];
            j += 1;
        }
        i += 1;
    }
    flipped
}

#[rustfmt::skip]
const PAWN_TABLE: Pst = [
    [ 0,  0,  0,  0,  0,  0,  0,  0],
    [ 5,  5,  5,  5,  5,  5,  5,  5],
    [ 1,  1,  2,  3,  3,  2,  1,  1],
    [ 0,  0,  1,  2,  2,  1,  0,  0],
    [ 0,  0,  0,  2,  2,  0,  0,  0],
    [ 0, -1, -1,  0,  0, -1, -1,  0],
    [ 0,  1,  1, -2, -2,  1,  1,  0],
    [ 0,  0,  0,  0,  0,  0,  0,  0],
];

#[rustfmt::skip]
const KNIGHT_TABLE: Pst = [
    [-5, -4, -3, -3, -3, -3, -4, -5],
    [-4, -2,  0,  0,  0,  0, -2, -4],
    [-3,  0,  1,  2,  2,  1,  0, -3],
    [-3,  0,  2,  3,  3,  2,  0, -3],
    [-3,  0,  2,  3,  3,  2,  0, -3],
    [-3,  0,  1,  2,  2,  1,  0, -3],
    [-4, -2,  0,  0,  0,  0, -2, -4],
    [-5, -4, -3, -3, -3, -3, -4, -5],
];

#[rustfmt::skip]
const BISHOP_TABLE: Pst = [
    [-2, -1, -1, -1, -1, -1, -1, -2],
    [-1,  0,  0,  0,  0,  0,  0, -1],
    [-1,  0,  1,  1,  1,  1,  0, -1],
    [-1,  0,  1,  2,  2,  1,  0, -1],
    [-1,  0,  1,  2,  2,  1,  0, -1],
    [-1,  0,  1,  1,  1,  1,  0, -1],
    [-1,  0,  0,  0,  0,  0,  0, -1],
    [-2, -1, -1, -1, -1, -1, -1, -2],
];

#[rustfmt::skip]
const ROOK_TABLE: Pst = [
    [ 0,  0,  0,  0,  0,  0,  0,  0],
    [ 1,  2,  2,  2,  2,  2,  2,  1],
    [-1,  0,  0,  0,  0,  0,  0, -1],
    [-1,  0,  0,  0,  0,  0,  0, -1],
    [-1,  0,  0,  0,  0,  0,  0, -1],
    [-1,  0,  0,  0,  0,  0,  0, -1],
    [-1,  0,  0,  0,  0,  0,  0, -1],
    [ 0,  0,  0,  1,  1,  0,  0,  0],
];

#[rustfmt::skip]
const QUEEN_TABLE: Pst = [
    [-2, -1, -1,  0,  0, -1, -1, -2],
    [-1,  0,  0,  0,  0,  0,  0, -1],
    [-1,  0,  1,  1,  1,  1,  0, -1],
    [-1,  0,  1,  1,  1,  1,  0, -1],
    [-1,  0,  1,  1,  1,  1,  0, -1],
    [-1,  0,  1,  1,  1,  1,  0, -1],
    [-1,  0,  0,  0,  0,  0,  0, -1],
    [-2, -1, -1,  0,  0, -1, -1, -2],
];

#[rustfmt::skip]
const KING_MIDDLEGAME_TABLE: Pst = [
    [-3, -4, -4, -5, -5, -4, -4, -3],
    [-3, -4, -4, -5, -5, -4, -4, -3],
    [-3, -4, -4, -5, -5, -4, -4, -3],
    [-3, -4, -4, -5, -5, -4, -4, -3],
    [-2, -3, -3, -4, -4, -3, -3, -2],
    [-1, -2, -2, -2, -2, -2, -2, -1],
    [ 2,  2,  0,  0,  0,  0,  2,  2],
    [ 2,  3,  1,  0,  0,  1,  3,  2],
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: Pst = [
    [-5, -4, -3, -2, -2, -3, -4, -5],
    [-3, -2, -1,  0,  0, -1, -2, -3],
    [-3, -1,  2,  3,  3,  2, -1, -3],
    [-3, -1,  3,  4,  4,  3, -1, -3],
    [-3, -1,  3,  4,  4,  3, -1, -3],
    [-3, -1,  2,  3,  3,  2, -1, -3],
    [-3, -3,  0,  0,  0,  0, -3, -3],
    [-5, -3, -3, -3, -3, -3, -3, -5],
];

const BLACK_PAWN_PST: Pst = flip(&PAWN_TABLE);
const BLACK_KNIGHT_PST: Pst = flip(&KNIGHT_TABLE);
const BLACK_BISHOP_PST: Pst = flip(&BISHOP_TABLE);
const BLACK_ROOK_PST: Pst = flip(&ROOK_TABLE);
const BLACK_QUEEN_PST: Pst = flip(&QUEEN_TABLE);
const BLACK_KING_MIDDLEGAME_PST: Pst = flip(&KING_MIDDLEGAME_TABLE);
const BLACK_KING_ENDGAME_PST: Pst = flip(&KING_ENDGAME_TABLE);

fn table(color: Color, role: Role, endgame: bool) -> &'static Pst {
    match (color, role) {
        (Color::White, Role::Pawn) => &PAWN_TABLE,
        (Color::White, Role::Knight) => &KNIGHT_TABLE,
        (Color::White, Role::Bishop) => &BISHOP_TABLE,
        (Color::White, Role::Rook) => &ROOK_TABLE,
        (Color::White, Role::Queen) => &QUEEN_TABLE,
        (Color::White, Role::King) if endgame => &KING_ENDGAME_TABLE,
        (Color::White, Role::King) => &KING_MIDDLEGAME_TABLE,
        (Color::Black, Role::Pawn) => &BLACK_PAWN_PST,
        (Color::Black, Role::Knight) => &BLACK_KNIGHT_PST,
        (Color::Black, Role::Bishop) => &BLACK_BISHOP_PST,
        (Color::Black, Role::Rook) => &BLACK_ROOK_PST,
        (Color::Black, Role::Queen) => &BLACK_QUEEN_PST,
        (Color::Black, Role::King) if endgame => &BLACK_KING_ENDGAME_PST,
        (Color::Black, Role::King) => &BLACK_KING_MIDDLEGAME_PST,
    }
}

/// Sum of table bonuses for every piece of `color`.
pub fn evaluate(board: &Board, color: Color, endgame: bool) -> i32 {
    let mut score = 0;
    for role in Role::ALL {
        let pst = table(color, role, endgame);
        for square in board.by_piece(Piece { role, color }) {
            score += pst[square.rank() as usize][square.file() as usize];
        }
    }
    score
}
