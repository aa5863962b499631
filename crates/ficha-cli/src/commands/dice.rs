use colored::Colorize;
use ficha_mechanics::Outcome;
use ficha_mechanics::input::parse_stat;

use super::{Context, fail};

pub fn roll(ctx: &Context, formula: &str) -> Result<(), String> {
    let roll = ctx.engine.roll(formula).map_err(fail)?;
    println!("  {formula}: {roll}");
    Ok(())
}

pub fn check(ctx: &Context, stat: &str, bonus: i32) -> Result<(), String> {
    let key = ctx.active_key()?;
    let stat = parse_stat(stat).map_err(fail)?;
    let result = ctx.engine.check(&key, stat, bonus).map_err(fail)?;
    let label = result.outcome.to_string();
    let outcome = match (result.outcome, result.outcome.is_success()) {
        (Outcome::CriticalSuccess, _) => label.yellow().bold(),
        (Outcome::CriticalFailure, _) => label.red().bold(),
        (_, true) => label.green(),
        (_, false) => label.red(),
    };
    println!(
        "  {stat} check: d20 = {} vs {} ({} {:+})",
        result.roll, result.target, result.base, result.bonus
    );
    println!("  {outcome}");
    Ok(())
}
