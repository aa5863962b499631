//! Rules engine for Ficha.
//!
//! Provides `XdY` dice formulas, the three-denomination currency, the
//! experience and level-up loop, armor bonus transfer, life and stress
//! tracks, roll-under checks, bag capacity counting, and [`Engine`], the
//! facade that applies all of them to characters in a
//! [`CharacterStore`](ficha_core::CharacterStore) one atomic operation at a
//! time.

pub mod check;
pub mod config;
pub mod currency;
pub mod dice;
pub mod engine;
pub mod equipment;
pub mod error;
pub mod input;
pub mod inventory;
pub mod progression;
pub mod vitals;

pub use check::{CheckResult, Outcome};
pub use config::EngineConfig;
pub use currency::{Breakdown, Denomination, format_balance, parse_money_tokens};
pub use dice::{Formula, RollResult};
pub use engine::{Engine, Equipped, SkillEdit, SkillResolution};
pub use equipment::ItemAdjustment;
pub use error::{SheetError, SheetResult};
pub use inventory::Bag;
pub use progression::{LevelOutcome, Progress};
pub use vitals::{LifeChange, StressChange};
