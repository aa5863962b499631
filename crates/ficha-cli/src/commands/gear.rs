use comfy_table::{ContentArrangement, Table};
use ficha_core::{Armor, Weapon};
use ficha_mechanics::ItemAdjustment;

use super::{Context, fail};

pub fn equip_weapon(ctx: &Context, name: &str, level: u32, dice: u32) -> Result<(), String> {
    let key = ctx.active_key()?;
    let weapon = Weapon::new(name.trim(), level, dice);
    ctx.engine.equip_weapon(&key, weapon.clone()).map_err(fail)?;
    println!("  Equipped {weapon}");
    Ok(())
}

pub fn remove_weapon(ctx: &Context, name: &str) -> Result<(), String> {
    let key = ctx.active_key()?;
    let weapon = ctx.engine.remove_weapon(&key, name).map_err(fail)?;
    println!("  Removed {}", weapon.name);
    Ok(())
}

pub fn upgrade_weapon(ctx: &Context, name: &str, level: i32, dice: i32) -> Result<(), String> {
    let key = ctx.active_key()?;
    let weapon = ctx
        .engine
        .adjust_weapon(&key, name, ItemAdjustment::new(level, dice))
        .map_err(fail)?;
    println!("  Now {weapon}");
    Ok(())
}

pub fn list_weapons(ctx: &Context) -> Result<(), String> {
    let key = ctx.active_key()?;
    let c = ctx.engine.character(&key).map_err(fail)?;
    let weapons = ctx.engine.weapons(&key).map_err(fail)?;
    if weapons.is_empty() {
        println!("  No weapons.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Weapon", "Level", "Dice"]);
    for w in &weapons {
        let marker = if c.equipped_weapon.as_deref() == Some(w.name.as_str()) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            marker.to_string(),
            w.name.clone(),
            w.level.to_string(),
            format!("{}d6", w.dice),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn equip_armor(
    ctx: &Context,
    name: &str,
    level: u32,
    dice: u32,
    dodge: i32,
    speed: i32,
) -> Result<(), String> {
    let key = ctx.active_key()?;
    let armor = Armor::new(name.trim(), level, dice).with_bonus(dodge, speed);
    let c = ctx.engine.equip_armor(&key, armor.clone()).map_err(fail)?;
    println!("  Equipped {armor}");
    println!("  dodge {}, speed {}", c.attributes.dodge, c.attributes.speed);
    Ok(())
}

pub fn remove_armor(ctx: &Context, name: &str) -> Result<(), String> {
    let key = ctx.active_key()?;
    let armor = ctx.engine.remove_armor(&key, name).map_err(fail)?;
    let c = ctx.engine.character(&key).map_err(fail)?;
    println!("  Removed {}", armor.name);
    println!("  dodge {}, speed {}", c.attributes.dodge, c.attributes.speed);
    Ok(())
}

pub fn upgrade_armor(
    ctx: &Context,
    name: &str,
    level: i32,
    dice: i32,
    dodge: i32,
    speed: i32,
) -> Result<(), String> {
    let key = ctx.active_key()?;
    let adjustment = ItemAdjustment::new(level, dice).with_bonus(dodge, speed);
    let armor = ctx
        .engine
        .adjust_armor(&key, name, adjustment)
        .map_err(fail)?;
    println!("  Now {armor}");
    Ok(())
}

pub fn list_armors(ctx: &Context) -> Result<(), String> {
    let key = ctx.active_key()?;
    let c = ctx.engine.character(&key).map_err(fail)?;
    let armors = ctx.engine.armors(&key).map_err(fail)?;
    if armors.is_empty() {
        println!("  No armor.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Armor", "Level", "Dice", "Dodge", "Speed"]);
    for a in &armors {
        let marker = if c.equipped_armor.as_deref() == Some(a.name.as_str()) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            marker.to_string(),
            a.name.clone(),
            a.level.to_string(),
            format!("{}d6", a.dice),
            format!("{:+}", a.dodge_bonus),
            format!("{:+}", a.speed_bonus),
        ]);
    }
    println!("{table}");
    Ok(())
}
