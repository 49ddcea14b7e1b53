//! Time allocation and opponent modelling.
//!
//! Each move gets a soft budget, after which no new search iteration is
//! started, and a hard budget the search never runs past. Both scale with
//! the remaining clock, the number of pieces on the board and how strong
//! the opponent appears to be.

use std::collections::VecDeque;
use std::time::Duration;

use shakmaty::Color;
use tracing::debug;

use crate::constants::{
    INITIAL_OPPONENT_STRENGTH, MOVE_QUALITY_WEIGHT, OPPONENT_HISTORY_LEN, SPEED_WEIGHT,
    STRENGTH_SMOOTHING,
};

/// Time the opponent may take before we consider matching it.
const OPPONENT_BONUS_CAP_SECS: f64 = 30.0;
/// Remaining time required before we match a slow opponent.
const COMFORTABLE_REMAINING_SECS: f64 = 60.0;
const HARD_DEADLINE_FRACTION: f64 = 0.9;

/// Time limits handed to the engine for one move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeLimit {
    /// Fixed time for this move.
    PerMove(Duration),
    /// Remaining clock time for both sides plus increments.
    Clock {
        white: Duration,
        black: Duration,
        white_inc: Duration,
        black_inc: Duration,
    },
}

impl TimeLimit {
    /// Time available to `color`. A per-move limit counts as the whole clock.
    pub fn remaining_for(&self, color: Color) -> Duration {
        match *self {
            TimeLimit::PerMove(time) => time,
            TimeLimit::Clock { white, black, .. } => match color {
                Color::White => white,
                Color::Black => black,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBudget {
    pub soft: Duration,
    pub hard: Duration,
}

/// Running estimate of opponent strength in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct OpponentModel {
    strength: f64,
    move_times: VecDeque<Duration>,
}

impl Default for OpponentModel {
    fn default() -> Self {
        Self::new()
    }
}

impl OpponentModel {
    pub fn new() -> Self {
        Self {
            strength: INITIAL_OPPONENT_STRENGTH,
            move_times: VecDeque::with_capacity(OPPONENT_HISTORY_LEN),
        }
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn move_times(&self) -> &VecDeque<Duration> {
        &self.move_times
    }

    pub fn last_move_time(&self) -> Option<Duration> {
        self.move_times.back().copied()
    }

    pub fn record_move_time(&mut self, duration: Duration) {
        if self.move_times.len() == OPPONENT_HISTORY_LEN {
            self.move_times.pop_front();
        }
        self.move_times.push_back(duration);
    }

    /// Updates the estimate from our evaluation before and after the
    /// opponent's move, both from our perspective, and how long they took.
    pub fn observe(&mut self, eval_before: i32, eval_after: i32, duration: Duration) {
        let swing = -(eval_after - eval_before) as f64;
        let quality = ((swing + 100.0) / 600.0).clamp(0.0, 1.0);

        let secs = duration.as_secs_f64();
        let speed = if secs < 1.0 {
            1.0
        } else if secs < 3.0 {
            0.7
        } else {
            0.3
        };

        let signal = MOVE_QUALITY_WEIGHT * quality + SPEED_WEIGHT * speed;
        self.strength = STRENGTH_SMOOTHING * self.strength + (1.0 - STRENGTH_SMOOTHING) * signal;
        debug!(
            strength = self.strength,
            quality, speed, "updated opponent strength estimate"
        );
    }
}

/// Splits the remaining clock into per-move budgets.
#[derive(Clone, Debug)]
pub struct TimeManager {
    base_max: f64,
    min_move_time: f64,
    last_move_time: Option<Duration>,
}

impl TimeManager {
    pub fn new(base_max: Duration, min_move_time: Duration) -> Self {
        Self {
            base_max: base_max.as_secs_f64(),
            min_move_time: min_move_time.as_secs_f64(),
            last_move_time: None,
        }
    }

    /// How long our previous search took.
    pub fn record_own_move(&mut self, duration: Duration) {
        self.last_move_time = Some(duration);
    }

    /// `complexity` is the number of pieces on the board.
    pub fn allocate(&self, remaining: Option<Duration>, complexity: usize, opponent: &OpponentModel) -> TimeBudget {
        let Some(remaining) = remaining else {
            let base = Duration::from_secs_f64(self.base_max);
            return TimeBudget { soft: base, hard: base };
        };
        let remaining = remaining.as_secs_f64();

        let strength = opponent.strength();
        let mut ceiling = if strength > 0.7 {
            self.base_max * (1.0 + strength)
        } else if strength > 0.5 {
            self.base_max * 1.3
        } else {
            self.base_max
        };

        if let Some(opponent_time) = opponent.last_move_time() {
            let opponent_time = opponent_time.as_secs_f64();
            if opponent_time > self.base_max && remaining > COMFORTABLE_REMAINING_SECS {
                ceiling = ceiling.max(opponent_time.min(OPPONENT_BONUS_CAP_SECS));
            }
        }

        let mut base = if remaining > 120.0 {
            remaining / 30.0
        } else if remaining > 60.0 {
            remaining / 25.0
        } else if remaining > 20.0 {
            remaining / 20.0
        } else {
            remaining / 10.0
        };

        if complexity > 25 {
            base *= 1.3;
        } else if complexity > 20 {
            base *= 1.1;
        } else if complexity < 10 {
            base *= 0.8;
        }

        if let Some(last) = self.last_move_time {
            let last = last.as_secs_f64();
            if last > base * 1.5 {
                base *= 0.8;
            } else if last < base * 0.5 {
                base *= 1.2;
            }
        }

        let hard = ceiling.min(remaining * HARD_DEADLINE_FRACTION);
        let soft = ceiling.min(base.max(self.min_move_time)).min(hard);

        debug!(remaining, complexity, strength, soft, hard, "allocated move time");

        TimeBudget {
            soft: Duration::from_secs_f64(soft),
            hard: Duration::from_secs_f64(hard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TimeManager {
        TimeManager::new(Duration::from_secs(15), Duration::from_millis(500))
    }

    fn secs(s: f64) -> Option<Duration> {
        Some(Duration::from_secs_f64(s))
    }

    fn assert_secs(actual: Duration, expected: f64) {
        assert!(
            (actual.as_secs_f64() - expected).abs() < 1e-6,
            "expected {expected}s, got {actual:?}"
        );
    }

    #[test]
    fn test_no_clock_uses_base_max() {
        let budget = manager().allocate(None, 32, &OpponentModel::new());
        assert_secs(budget.soft, 15.0);
        assert_secs(budget.hard, 15.0);
    }

    #[test]
    fn test_long_clock_complex_position() {
        let budget = manager().allocate(secs(300.0), 32, &OpponentModel::new());
        assert_secs(budget.soft, 13.0);
        assert_secs(budget.hard, 15.0);
    }

    #[test]
    fn test_short_clock() {
        let budget = manager().allocate(secs(10.0), 15, &OpponentModel::new());
        assert_secs(budget.soft, 1.0);
        assert_secs(budget.hard, 9.0);
    }

    #[test]
    fn test_minimum_move_time() {
        let budget = manager().allocate(secs(2.0), 5, &OpponentModel::new());
        assert_secs(budget.soft, 0.5);
        assert_secs(budget.hard, 1.8);
    }

    #[test]
    fn test_soft_never_exceeds_hard() {
        let budget = manager().allocate(secs(0.4), 5, &OpponentModel::new());
        assert_secs(budget.hard, 0.36);
        assert_secs(budget.soft, 0.36);
    }

    #[test]
    fn test_strong_opponent_raises_ceiling() {
        let mut opponent = OpponentModel::new();
        for _ in 0..10 {
            opponent.observe(0, -600, Duration::from_millis(200));
        }
        assert!(opponent.strength() > 0.7);

        let budget = manager().allocate(secs(1200.0), 32, &opponent);
        let ceiling = 15.0 * (1.0 + opponent.strength());
        assert_secs(budget.soft, ceiling);
        assert_secs(budget.hard, ceiling);
    }

    #[test]
    fn test_matches_slow_opponent() {
        let mut opponent = OpponentModel::new();
        opponent.record_move_time(Duration::from_secs(25));

        let budget = manager().allocate(secs(300.0), 32, &opponent);
        assert_secs(budget.hard, 25.0);

        // Not when our own clock is running low.
        let budget = manager().allocate(secs(50.0), 32, &opponent);
        assert_secs(budget.hard, 15.0);
    }

    #[test]
    fn test_previous_spend_adjusts_base() {
        let mut slow = manager();
        slow.record_own_move(Duration::from_secs(30));
        let budget = slow.allocate(secs(300.0), 32, &OpponentModel::new());
        assert_secs(budget.soft, 13.0 * 0.8);

        let mut fast = manager();
        fast.record_own_move(Duration::from_secs(1));
        let budget = fast.allocate(secs(300.0), 24, &OpponentModel::new());
        assert_secs(budget.soft, 10.0 * 1.1 * 1.2);
    }

    #[test]
    fn test_per_move_and_clock_limits() {
        let per_move = TimeLimit::PerMove(Duration::from_secs(3));
        assert_eq!(per_move.remaining_for(Color::Black), Duration::from_secs(3));

        let clock = TimeLimit::Clock {
            white: Duration::from_secs(60),
            black: Duration::from_secs(45),
            white_inc: Duration::from_secs(1),
            black_inc: Duration::from_secs(1),
        };
        assert_eq!(clock.remaining_for(Color::White), Duration::from_secs(60));
        assert_eq!(clock.remaining_for(Color::Black), Duration::from_secs(45));
    }

    #[test]
    fn test_observe_strong_fast_move() {
        let mut opponent = OpponentModel::new();
        opponent.observe(0, -500, Duration::from_millis(500));
        assert!((opponent.strength() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_observe_weak_slow_move() {
        let mut opponent = OpponentModel::new();
        opponent.observe(0, 200, Duration::from_secs(5));
        assert!((opponent.strength() - 0.418).abs() < 1e-9);
    }

    #[test]
    fn test_move_time_history_is_bounded() {
        let mut opponent = OpponentModel::new();
        for i in 0..15 {
            opponent.record_move_time(Duration::from_secs(i));
        }
        assert_eq!(opponent.move_times().len(), OPPONENT_HISTORY_LEN);
        assert_eq!(opponent.move_times().front(), Some(&Duration::from_secs(5)));
        assert_eq!(opponent.last_move_time(), Some(Duration::from_secs(14)));
    }
}
