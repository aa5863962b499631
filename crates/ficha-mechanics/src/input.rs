//! Typed parsing and range checks of user-supplied values.

use ficha_core::{Attribute, Attributes, Resistance, Resistances, STAT_MAX, SkillKind, Stat};

use crate::error::{SheetError, SheetResult};

/// Parse an attribute or resistance name.
pub fn parse_stat(s: &str) -> SheetResult<Stat> {
    Stat::parse(s).ok_or_else(|| SheetError::InvalidAttribute(s.to_string()))
}

/// Parse a skill kind.
pub fn parse_skill_kind(s: &str) -> SheetResult<SkillKind> {
    SkillKind::parse(s).ok_or_else(|| SheetError::InvalidSkillKind(s.to_string()))
}

/// Accept a stat value in `0..=STAT_MAX`.
pub fn check_stat_value(stat: Stat, value: i32) -> SheetResult<i32> {
    if !(0..=STAT_MAX).contains(&value) {
        return Err(SheetError::InvalidResult(format!(
            "{stat} must be between 0 and {STAT_MAX}, got {value}"
        )));
    }
    Ok(value)
}

/// Range-check every starting score of a new character.
pub fn check_starting_stats(attributes: &Attributes, resistances: &Resistances) -> SheetResult<()> {
    for a in Attribute::ALL {
        check_stat_value(Stat::Attribute(a), attributes.get(a))?;
    }
    for r in Resistance::ALL {
        check_stat_value(Stat::Resistance(r), resistances.get(r))?;
    }
    Ok(())
}
