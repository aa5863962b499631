use colored::Colorize;
use ficha_core::Stat;
use ficha_mechanics::LevelOutcome;
use ficha_mechanics::input::parse_stat;

use super::{Context, fail};

pub fn xp(ctx: &Context, amount: u32) -> Result<(), String> {
    let key = ctx.active_key()?;
    let progress = ctx.engine.apply_experience(&key, amount).map_err(fail)?;
    match progress.outcome {
        LevelOutcome::LeveledUp { levels } => {
            let c = ctx.engine.character(&key).map_err(fail)?;
            println!(
                "  {} {} reached level {} (+{levels}), life {}/{}",
                "LEVEL UP!".green().bold(),
                c.name,
                progress.level,
                c.life,
                c.max_life()
            );
            println!(
                "  points: {} attribute, {} resistance",
                c.attribute_points, c.resistance_points
            );
        }
        LevelOutcome::NoLevelUp => {
            println!("  +{amount} xp (level {}, xp {})", progress.level, progress.xp);
        }
        LevelOutcome::AlreadyMax => {
            println!("  Already at max level ({})", progress.level);
        }
    }
    Ok(())
}

pub fn train(ctx: &Context, stat: &str) -> Result<(), String> {
    let key = ctx.active_key()?;
    let stat = parse_stat(stat).map_err(fail)?;
    let value = match stat {
        Stat::Attribute(a) => ctx.engine.spend_attribute_point(&key, a),
        Stat::Resistance(r) => ctx.engine.spend_resistance_point(&key, r),
    }
    .map_err(fail)?;
    println!("  {stat} is now {value}");
    Ok(())
}
