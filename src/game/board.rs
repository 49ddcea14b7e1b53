// src/game/board.rs

//! Push/pop board used by the search.
//!
//! Wraps a `shakmaty::Chess` position with an undo stack so the search can
//! walk the tree in place. Every `push` must be matched by a `pop` before the
//! caller regains control; `GameBoard::play` hands out a [`MoveGuard`] that
//! does the `pop` on drop, which keeps cutoffs and early returns honest.

use std::ops::{Deref, DerefMut};

use shakmaty::fen::{Fen, ParseFenError};
use shakmaty::san::SanPlus;
use shakmaty::uci::{IllegalUciMoveError, ParseUciMoveError, UciMove};
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{
    Bitboard, Board, CastlingMode, Chess, Color, EnPassantMode, File, Move, Piece, Position,
    PositionError, Square,
};
use thiserror::Error;

/// Positions repeated this many times end the game.
const FIVEFOLD_REPETITION: usize = 5;
/// Halfmove clock at which the 75-move rule ends the game.
const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid FEN: {0}")]
    Fen(#[from] ParseFenError),
    #[error("illegal position: {0}")]
    Position(#[from] PositionError<Chess>),
    #[error("invalid UCI move: {0}")]
    UciSyntax(#[from] ParseUciMoveError),
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalUciMoveError),
}

/// Canonical fingerprint of a position.
///
/// Covers placement, side to move, castling rights and a legal en-passant
/// target. Halfmove and fullmove counters are not part of the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey(pub u64);

impl PositionKey {
    pub fn of(pos: &Chess) -> Self {
        let hash: Zobrist64 = pos.zobrist_hash(EnPassantMode::Legal);
        PositionKey(hash.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Decisive(Color),
    Draw,
}

#[derive(Clone, Debug)]
pub struct GameBoard {
    pos: Chess,
    undo: Vec<Chess>,
    history: Vec<PositionKey>,
}

impl Default for GameBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoard {
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    pub fn from_position(pos: Chess) -> Self {
        let key = PositionKey::of(&pos);
        Self {
            pos,
            undo: Vec::new(),
            history: vec![key],
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let fen: Fen = fen.trim().parse()?;
        let pos: Chess = fen.into_position(CastlingMode::Standard)?;
        Ok(Self::from_position(pos))
    }

    pub fn position(&self) -> &Chess {
        &self.pos
    }

    pub fn board(&self) -> &Board {
        self.pos.board()
    }

    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    pub fn key(&self) -> PositionKey {
        self.history
            .last()
            .copied()
            .unwrap_or_else(|| PositionKey::of(&self.pos))
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.pos.legal_moves().to_vec()
    }

    pub fn is_legal(&self, m: &Move) -> bool {
        self.pos.is_legal(*m)
    }

    pub fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    /// Number of pieces on the board, kings included.
    pub fn piece_count(&self) -> usize {
        self.board().occupied().count()
    }

    /// Number of moves currently pushed on top of the root.
    pub fn pushed(&self) -> usize {
        self.undo.len()
    }

    /// Applies `m` in place. The move must be legal.
    pub fn push(&mut self, m: Move) {
        let previous = self.pos.clone();
        self.pos.play_unchecked(m);
        self.undo.push(previous);
        self.history.push(PositionKey::of(&self.pos));
    }

    /// Takes back the last pushed move. Returns `false` at the root.
    pub fn pop(&mut self) -> bool {
        match self.undo.pop() {
            Some(previous) => {
                self.pos = previous;
                self.history.pop();
                true
            }
            None => false,
        }
    }

    /// Pushes `m` and returns a guard that pops it again when dropped.
    pub fn play(&mut self, m: Move) -> MoveGuard<'_> {
        self.push(m);
        MoveGuard { board: self }
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.pos.legal_moves().is_empty() {
            return Some(if self.pos.is_check() {
                GameOutcome::Decisive(!self.pos.turn())
            } else {
                GameOutcome::Draw
            });
        }
        if self.pos.is_insufficient_material()
            || self.pos.halfmoves() >= SEVENTY_FIVE_MOVE_PLIES
            || self.is_repetition(FIVEFOLD_REPETITION)
        {
            return Some(GameOutcome::Draw);
        }
        None
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn is_capture(&self, m: &Move) -> bool {
        m.is_capture()
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board().piece_at(sq)
    }

    /// Pieces of `color` attacking `sq`.
    pub fn attackers(&self, color: Color, sq: Square) -> Bitboard {
        let board = self.board();
        board.attacks_to(sq, color, board.occupied()) & board.by_color(color)
    }

    pub fn gives_check(&mut self, m: Move) -> bool {
        self.play(m).is_check()
    }

    /// True when the current position has occurred at least `count` times,
    /// counting the current occurrence. Only positions since the last
    /// irreversible move are considered.
    pub fn is_repetition(&self, count: usize) -> bool {
        let Some(&current) = self.history.last() else {
            return false;
        };
        let window = self.pos.halfmoves() as usize + 1;
        self.history
            .iter()
            .rev()
            .take(window)
            .filter(|&&key| key == current)
            .count()
            >= count
    }

    pub fn parse_uci(&self, uci: &str) -> Result<Move, BoardError> {
        let uci: UciMove = uci.trim().parse()?;
        Ok(uci.to_move(&self.pos)?)
    }

    pub fn san(&self, m: Move) -> String {
        SanPlus::from_move(self.pos.clone(), m).to_string()
    }
}

/// Keeps a pushed move alive for the guard's scope.
pub struct MoveGuard<'a> {
    board: &'a mut GameBoard,
}

impl Deref for MoveGuard<'_> {
    type Target = GameBoard;

    fn deref(&self) -> &GameBoard {
        self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut GameBoard {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.board.pop();
    }
}

/// UCI text of a move, also used as its canonical sort key.
pub fn uci(m: &Move) -> String {
    m.to_uci(CastlingMode::Standard).to_string()
}

/// Square the moving piece ends up on. Castling is reported as the king's
/// destination rather than the rook square shakmaty uses internally.
pub fn destination(m: &Move) -> Square {
    match *m {
        Move::Castle { king, rook } => {
            let file = if (rook.file() as u8) > (king.file() as u8) {
                File::G
            } else {
                File::C
            };
            Square::from_coords(file, king.rank())
        }
        _ => m.to(),
    }
}
