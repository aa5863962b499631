use colored::Colorize;
use ficha_core::STRESS_MAX;

use super::{Context, fail};

pub fn damage(ctx: &Context, amount: u32) -> Result<(), String> {
    let key = ctx.active_key()?;
    let change = ctx.engine.apply_damage(&key, amount).map_err(fail)?;
    println!("  life {} -> {}/{}", change.before, change.after, change.max);
    if change.after == 0 {
        println!("  {}", "down!".red().bold());
    }
    Ok(())
}

pub fn heal(ctx: &Context, amount: u32) -> Result<(), String> {
    let key = ctx.active_key()?;
    let change = ctx.engine.apply_heal(&key, amount).map_err(fail)?;
    println!("  life {} -> {}/{}", change.before, change.after, change.max);
    Ok(())
}

pub fn stress(ctx: &Context, delta: i32) -> Result<(), String> {
    let key = ctx.active_key()?;
    let change = ctx.engine.adjust_stress(&key, delta).map_err(fail)?;
    println!("  stress {} -> {}/{STRESS_MAX}", change.before, change.after);
    if change.reached_limit {
        println!("  {}", "stress limit reached!".red().bold());
    }
    Ok(())
}
