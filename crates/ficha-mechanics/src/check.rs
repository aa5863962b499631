//! Roll-under attribute checks.
//!
//! Roll a d20 and compare it against the stat value plus a temporary bonus.
//! A natural 1 always succeeds critically and a natural 20 always fails
//! critically; otherwise the check succeeds if the roll is at or below the
//! target.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dice;

/// Faces on the check die.
pub const CHECK_DIE: u32 = 20;

/// The outcome of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A natural 1.
    CriticalSuccess,
    /// At or below the target.
    Success,
    /// Above the target.
    Failure,
    /// A natural 20.
    CriticalFailure,
}

impl Outcome {
    /// Returns true for either kind of success.
    pub fn is_success(self) -> bool {
        matches!(self, Self::CriticalSuccess | Self::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CriticalSuccess => write!(f, "Critical Success"),
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
            Self::CriticalFailure => write!(f, "Critical Failure"),
        }
    }
}

/// A resolved check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The d20 value.
    pub roll: u32,
    /// The stat value before the bonus.
    pub base: i32,
    /// The temporary bonus.
    pub bonus: i32,
    /// `base + bonus`.
    pub target: i32,
    /// What happened.
    pub outcome: Outcome,
}

/// Interpret a d20 value against a target.
pub fn resolve(roll: u32, target: i32) -> Outcome {
    match roll {
        1 => Outcome::CriticalSuccess,
        CHECK_DIE => Outcome::CriticalFailure,
        _ if i64::from(roll) <= i64::from(target) => Outcome::Success,
        _ => Outcome::Failure,
    }
}

/// Roll a check against `base + bonus`.
pub fn roll_check<R: Rng>(base: i32, bonus: i32, rng: &mut R) -> CheckResult {
    let roll = dice::roll(1, CHECK_DIE, rng).highest();
    let target = base.saturating_add(bonus);
    CheckResult {
        roll,
        base,
        bonus,
        target,
        outcome: resolve(roll, target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn success_at_or_below_target() {
        assert_eq!(resolve(7, 10), Outcome::Success);
        assert_eq!(resolve(10, 10), Outcome::Success);
    }

    #[test]
    fn failure_above_target() {
        assert_eq!(resolve(11, 10), Outcome::Failure);
        assert_eq!(resolve(2, -3), Outcome::Failure);
    }

    #[test]
    fn naturals_override_target() {
        assert_eq!(resolve(1, -5), Outcome::CriticalSuccess);
        assert_eq!(resolve(20, 50), Outcome::CriticalFailure);
    }

    #[test]
    fn rolled_check_is_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let r = roll_check(8, 2, &mut rng);
            assert!((1..=20).contains(&r.roll));
            assert_eq!(r.target, 10);
            assert_eq!(r.outcome, resolve(r.roll, 10));
        }
    }

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::CriticalSuccess.to_string(), "Critical Success");
        assert_eq!(Outcome::Failure.to_string(), "Failure");
        assert!(Outcome::Success.is_success());
        assert!(!Outcome::CriticalFailure.is_success());
    }
}
