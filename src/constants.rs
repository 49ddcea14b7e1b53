// --- Piece values ---
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

// Search
pub const MATE_SCORE: i32 = 10_000_000;
/// Scores beyond this magnitude are forced wins.
pub const MATE_THRESHOLD: i32 = 9_000_000;
pub const INFINITY: i32 = 1_000_000_000;

// Hanging-piece evaluation
pub const HANGING_PENALTY_PERCENT: i32 = 70;
pub const BAD_TRADE_PENALTY_PERCENT: i32 = 40;
pub const BAD_TRADE_MARGIN: i32 = 150;

// King safety / center control (middlegame only)
pub const KING_ZONE_RADIUS: u32 = 2;
pub const KING_ZONE_ATTACKER_WEIGHT: i32 = 5;
pub const CENTER_CONTROL_WEIGHT: i32 = 3;

/// Endgame once the side with fewer pieces (king included) is down to this.
pub const ENDGAME_PIECE_COUNT: usize = 5;

// Anti-repetition
pub const REPETITION_PENALTY_CAP: i32 = 500;

// Move ordering
pub const SAFE_CHECK_BONUS: i32 = 50;
pub const DEFENDED_CHECK_BONUS: i32 = 20;
pub const UNSAFE_CAPTURE_FACTOR: i32 = 25;
pub const HANGING_MOVE_FACTOR: i32 = 50;
pub const BAD_TRADE_MOVE_FACTOR: i32 = 10;

// Opponent model
pub const INITIAL_OPPONENT_STRENGTH: f64 = 0.5;
pub const OPPONENT_HISTORY_LEN: usize = 10;
pub const MOVE_QUALITY_WEIGHT: f64 = 0.7;
pub const SPEED_WEIGHT: f64 = 0.3;
pub const STRENGTH_SMOOTHING: f64 = 0.8;
