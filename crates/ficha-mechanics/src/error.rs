//! Error types for the rules engine.

use ficha_core::StoreError;

/// Errors that can occur during sheet operations.
///
/// Every variant except [`SheetError::Store`] is a validation failure
/// raised before any state is written.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// A character, weapon, armor, skill or item does not exist.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// What kind of record was looked up.
        kind: &'static str,
        /// The name that was looked up.
        name: String,
    },

    /// A dice formula is not of the form `XdY` with both numbers ≥ 1 and
    /// at most 1000 dice.
    #[error("invalid dice formula: '{0}' (expected XdY, e.g. 2d6)")]
    InvalidFormula(String),

    /// A money token is not `<quantity><code>`.
    #[error("invalid money token: '{0}' (use 1r, 2a, 500v or '500 verde')")]
    InvalidToken(String),

    /// A money code or word is not a known denomination.
    #[error("invalid currency in '{0}' (use verde, azul or vermelha)")]
    InvalidCurrency(String),

    /// No money tokens were given.
    #[error("no amount given")]
    EmptyInput,

    /// The balance does not cover a debit.
    #[error("insufficient funds: balance {balance}, needed {needed}")]
    InsufficientFunds {
        /// Current balance in base units.
        balance: u64,
        /// Requested debit in base units.
        needed: u64,
    },

    /// The relevant point pool is empty.
    #[error("no {0} points available")]
    NoPointsAvailable(&'static str),

    /// A name does not denote an attribute or resistance.
    #[error("invalid attribute: '{0}'")]
    InvalidAttribute(String),

    /// An adjustment or creation would leave a level or dice count invalid.
    #[error("invalid result: {0}")]
    InvalidResult(String),

    /// The bag has no free slot for a new item stack.
    #[error("bag is full ({capacity} slots)")]
    CapacityExceeded {
        /// Bag capacity in slots.
        capacity: u32,
    },

    /// A character with this name already exists for the owner.
    #[error("character '{0}' already exists")]
    DuplicateCharacter(String),

    /// Fewer items are held than requested.
    #[error("only {held} '{item}' held, {requested} requested")]
    InsufficientQuantity {
        /// The item name.
        item: String,
        /// How many are held.
        held: u32,
        /// How many were requested.
        requested: u32,
    },

    /// A skill kind is neither damage nor heal.
    #[error("invalid skill kind: '{0}' (use damage or heal)")]
    InvalidSkillKind(String),

    /// A level outside `1..=20` was requested.
    #[error("level {0} out of range (1-20)")]
    LevelOutOfRange(u32),

    /// The store failed; the operation may have been partially persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SheetError {
    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}

/// Convenience result type for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;
