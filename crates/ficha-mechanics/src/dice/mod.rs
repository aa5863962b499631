//! Dice formulas and rolling.
//!
//! A formula is `XdY`: roll X dice of Y faces and sum them. Whitespace
//! around either number and around the `d` is allowed, and the `d` is
//! case-insensitive. Both numbers must be at least 1, and at most
//! [`MAX_DICE`] dice are rolled at once.

pub mod roll;

pub use roll::RollResult;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SheetError, SheetResult};

/// Largest dice count a single roll accepts.
pub const MAX_DICE: u32 = 1000;

/// A parsed `XdY` formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formula {
    /// Number of dice.
    pub count: u32,
    /// Faces per die.
    pub faces: u32,
}

impl Formula {
    /// Create a formula, rejecting zero counts or faces and counts above
    /// [`MAX_DICE`].
    pub fn new(count: u32, faces: u32) -> SheetResult<Self> {
        if count == 0 || count > MAX_DICE || faces == 0 {
            return Err(SheetError::InvalidFormula(format!("{count}d{faces}")));
        }
        Ok(Self { count, faces })
    }

    /// Parse a formula like "2d6", " 3 D 8 ".
    pub fn parse(text: &str) -> SheetResult<Self> {
        let invalid = || SheetError::InvalidFormula(text.to_string());
        let lower = text.trim().to_lowercase();
        let (count, faces) = lower.split_once('d').ok_or_else(invalid)?;
        let count = parse_number(count).ok_or_else(invalid)?;
        let faces = parse_number(faces).ok_or_else(invalid)?;
        Self::new(count, faces).map_err(|_| invalid())
    }

    /// Roll every die of the formula.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> RollResult {
        roll(self.count, self.faces, rng)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)
    }
}

/// A run of ASCII digits, with surrounding whitespace.
fn parse_number(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Draw `count` independent values uniformly from `1..=faces`.
///
/// A zero `count` yields an empty result; a zero `faces` is treated as one
/// face so the range is never empty. `count` is capped at [`MAX_DICE`].
/// Use [`Formula`] for validated input.
pub fn roll<R: Rng>(count: u32, faces: u32, rng: &mut R) -> RollResult {
    let faces = faces.max(1);
    let values = (0..count.min(MAX_DICE)).map(|_| rng.random_range(1..=faces)).collect();
    RollResult { values }
}
