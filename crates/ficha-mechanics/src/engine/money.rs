use ficha_core::{CharacterKey, CharacterStore};

use super::Engine;
use crate::currency;
use crate::error::SheetResult;

impl<S: CharacterStore> Engine<S> {
    /// Add base units to the balance. Returns the new balance.
    pub fn credit(&self, key: &CharacterKey, amount: u64) -> SheetResult<u64> {
        self.update(key, |c| {
            let balance = currency::credit(c, amount);
            tracing::debug!(owner = %key.owner, character = %key.name, amount, balance, "credited");
            Ok(balance)
        })
    }

    /// Take base units from the balance. Fails with `InsufficientFunds`
    /// and leaves the balance untouched if it does not cover `amount`.
    pub fn debit(&self, key: &CharacterKey, amount: u64) -> SheetResult<u64> {
        self.update(key, |c| {
            let balance = currency::debit(c, amount)?;
            tracing::debug!(owner = %key.owner, character = %key.name, amount, balance, "debited");
            Ok(balance)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{engine, kael};
    use crate::currency::parse_money_tokens;
    use crate::error::SheetError;

    #[test]
    fn debit_beyond_balance_is_rejected() {
        let engine = engine();
        let key = kael(&engine);
        engine.credit(&key, 150).unwrap();
        assert!(matches!(
            engine.debit(&key, 200),
            Err(SheetError::InsufficientFunds { .. })
        ));
        assert_eq!(engine.character(&key).unwrap().balance, 150);
    }

    #[test]
    fn parsed_tokens_credit_base_units() {
        let engine = engine();
        let key = kael(&engine);
        let amount = parse_money_tokens(&["1r", "5a", "200v"]).unwrap();
        assert_eq!(engine.credit(&key, amount).unwrap(), 105_200);
        assert_eq!(engine.debit(&key, 5_200).unwrap(), 100_000);
    }
}
