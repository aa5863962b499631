//! The three-denomination currency.
//!
//! Balances are stored in green, the base unit. Blue is worth 1,000 green
//! and red 100,000 green. Amounts are entered as tokens such as `1r 5a 200v`
//! or the two-token form `500 verde`.

use std::fmt;

use ficha_core::{Character, fold};
use serde::{Deserialize, Serialize};

use crate::error::{SheetError, SheetResult};

/// A currency denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Denomination {
    /// 100,000 green.
    Red,
    /// 1,000 green.
    Blue,
    /// The base unit.
    Green,
}

impl Denomination {
    /// Value of one coin in base units.
    pub fn rate(self) -> u64 {
        match self {
            Self::Red => 100_000,
            Self::Blue => 1_000,
            Self::Green => 1,
        }
    }

    /// Recognize a code or word. Expects lowercase, diacritic-free input.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "r" | "vermelha" | "vermelhas" | "vermelho" | "rv" | "red" => Some(Self::Red),
            "a" | "azul" | "azuis" | "av" | "blue" => Some(Self::Blue),
            "v" | "verde" | "verdes" | "gv" | "green" => Some(Self::Green),
            _ => None,
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Blue => write!(f, "blue"),
            Self::Green => write!(f, "green"),
        }
    }
}

/// A balance split greedily into denominations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Red coins.
    pub red: u64,
    /// Blue coins.
    pub blue: u64,
    /// Green coins, always below 1,000.
    pub green: u64,
}

impl Breakdown {
    /// Split a base-unit amount, largest denomination first.
    pub fn from_base(base: u64) -> Self {
        let red = base / Denomination::Red.rate();
        let rest = base % Denomination::Red.rate();
        Self {
            red,
            blue: rest / Denomination::Blue.rate(),
            green: rest % Denomination::Blue.rate(),
        }
    }

    /// Recombine into base units.
    pub fn total(&self) -> u64 {
        self.red * Denomination::Red.rate()
            + self.blue * Denomination::Blue.rate()
            + self.green
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.red > 0 {
            parts.push(format!("{} {}", self.red, Denomination::Red));
        }
        if self.blue > 0 {
            parts.push(format!("{} {}", self.blue, Denomination::Blue));
        }
        if self.green > 0 || parts.is_empty() {
            parts.push(format!("{} {}", self.green, Denomination::Green));
        }
        write!(f, "{}", parts.join(" | "))
    }
}

/// Render a base-unit balance, e.g. "1 red | 5 blue | 200 green".
/// Zero renders as "0 green".
pub fn format_balance(base: u64) -> String {
    Breakdown::from_base(base).to_string()
}

/// Parse money tokens into a base-unit total.
///
/// Either every token is `<quantity><code>` (`1r`, `5a`, `200verdes`), or
/// there are exactly two tokens `<quantity> <word>`. Any bad token fails
/// the whole parse.
pub fn parse_money_tokens<T: AsRef<str>>(tokens: &[T]) -> SheetResult<u64> {
    if tokens.is_empty() {
        return Err(SheetError::EmptyInput);
    }

    if let [quantity, word] = tokens {
        let quantity = quantity.as_ref().trim();
        if is_digits(quantity) {
            let word = fold(word.as_ref());
            let denomination = Denomination::from_word(&word)
                .ok_or_else(|| SheetError::InvalidCurrency(word.clone()))?;
            return to_base(quantity, denomination, quantity);
        }
    }

    tokens.iter().try_fold(0u64, |total, token| {
        let amount = parse_token(token.as_ref())?;
        total
            .checked_add(amount)
            .ok_or_else(|| SheetError::InvalidToken(token.as_ref().to_string()))
    })
}

/// Parse one `<quantity><code>` token.
fn parse_token(raw: &str) -> SheetResult<u64> {
    let token = fold(raw);
    let split = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let (quantity, code) = token.split_at(split);
    if quantity.is_empty() || code.is_empty() || !code.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(SheetError::InvalidToken(token));
    }
    let denomination =
        Denomination::from_word(code).ok_or_else(|| SheetError::InvalidCurrency(token.clone()))?;
    to_base(quantity, denomination, &token)
}

fn to_base(quantity: &str, denomination: Denomination, token: &str) -> SheetResult<u64> {
    quantity
        .parse::<u64>()
        .ok()
        .and_then(|q| q.checked_mul(denomination.rate()))
        .ok_or_else(|| SheetError::InvalidToken(token.to_string()))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Add to a character's balance. Returns the new balance.
pub fn credit(character: &mut Character, amount: u64) -> u64 {
    character.balance = character.balance.saturating_add(amount);
    character.balance
}

/// Take from a character's balance. Returns the new balance, or
/// `InsufficientFunds` with the balance untouched.
pub fn debit(character: &mut Character, amount: u64) -> SheetResult<u64> {
    if character.balance < amount {
        return Err(SheetError::InsufficientFunds {
            balance: character.balance,
            needed: amount,
        });
    }
    character.balance -= amount;
    Ok(character.balance)
}
