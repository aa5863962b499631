use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use ficha_core::{Attribute, Attributes, CharacterKey, NewCharacter, Resistance, STRESS_MAX};
use ficha_mechanics::format_balance;
use ficha_mechanics::input::parse_stat;
use ficha_mechanics::progression::threshold;

use super::{Context, fail};

pub fn create(
    ctx: &Context,
    name: &str,
    portrait: Option<String>,
    [force, speed, dodge, constitution]: [i32; 4],
) -> Result<(), String> {
    let mut request = NewCharacter::named(name).with_attributes(Attributes {
        force,
        speed,
        dodge,
        constitution,
    });
    if let Some(url) = portrait {
        request = request.with_portrait(url);
    }
    let c = ctx
        .engine
        .create_character(&ctx.owner, request)
        .map_err(fail)?;
    println!(
        "  {} created (level {}, life {}/{}) and set active",
        c.name.bold(),
        c.level,
        c.life,
        c.max_life()
    );
    Ok(())
}

pub fn list(ctx: &Context) -> Result<(), String> {
    let characters = ctx.engine.characters(&ctx.owner).map_err(fail)?;
    if characters.is_empty() {
        println!("  No characters yet.");
        return Ok(());
    }
    let active = ctx
        .engine
        .active_character(&ctx.owner)
        .map_err(fail)?
        .map(|c| c.name);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Name", "Level", "Life", "Balance"]);
    for c in &characters {
        let marker = if active.as_deref() == Some(c.name.as_str()) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            marker.to_string(),
            c.name.clone(),
            c.level.to_string(),
            format!("{}/{}", c.life, c.max_life()),
            format_balance(c.balance),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} characters", characters.len());
    Ok(())
}

pub fn select(ctx: &Context, name: &str) -> Result<(), String> {
    let c = ctx.engine.set_active(&ctx.owner, name).map_err(fail)?;
    println!("  Active character: {}", c.name.bold());
    Ok(())
}

pub fn delete(ctx: &Context, name: &str) -> Result<(), String> {
    let key = CharacterKey::new(ctx.owner.clone(), name.trim());
    ctx.engine.delete_character(&key).map_err(fail)?;
    println!("  Deleted {}", key.name.bold());
    Ok(())
}

pub fn show(ctx: &Context) -> Result<(), String> {
    let c = ctx.active()?;
    let key = c.key();
    let equipped = ctx.engine.equipped(&key).map_err(fail)?;
    let bag = ctx.engine.inventory(&key).map_err(fail)?;

    println!("  {} [level {}]", c.name.bold(), c.level);
    if let Some(url) = &c.portrait_url {
        println!("  {}", url.dimmed());
    }
    println!();
    if c.is_max_level() {
        println!("  xp:          {} (max level)", c.xp);
    } else {
        println!("  xp:          {}/{}", c.xp, threshold(c.level));
    }
    println!("  life:        {}/{}", c.life.to_string().red(), c.max_life());
    println!("  stress:      {}/{STRESS_MAX}", c.stress);
    println!("  balance:     {}", format_balance(c.balance));
    println!(
        "  points:      {} attribute, {} resistance",
        c.attribute_points, c.resistance_points
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Attribute", "Value", "Resistance", "Value"]);
    for (i, r) in Resistance::ALL.iter().enumerate() {
        let (a, av) = match Attribute::ALL.get(i) {
            Some(a) => (a.to_string(), c.attributes.get(*a).to_string()),
            None => (String::new(), String::new()),
        };
        table.add_row(vec![a, av, r.to_string(), c.resistances.get(*r).to_string()]);
    }
    println!("{table}");
    println!();

    match &equipped.weapon {
        Some(w) => println!("  weapon:      {w}"),
        None => println!("  weapon:      {}", "none".dimmed()),
    }
    match &equipped.armor {
        Some(a) => println!("  armor:       {a}"),
        None => println!("  armor:       {}", "none".dimmed()),
    }
    println!("  bag:         {}/{} slots", bag.occupied(), bag.capacity);
    Ok(())
}

pub fn edit(ctx: &Context, field: &str, value: &str) -> Result<(), String> {
    let key = ctx.active_key()?;
    match field.trim().to_lowercase().as_str() {
        "level" | "nivel" => {
            let level: u32 = value
                .parse()
                .map_err(|_| format!("invalid level: '{value}'"))?;
            let c = ctx.engine.set_level(&key, level).map_err(fail)?;
            println!("  {} is now level {}", c.name.bold(), c.level);
        }
        "name" | "nome" => {
            let c = ctx.engine.rename_character(&key, value).map_err(fail)?;
            println!("  {} renamed to {}", key.name, c.name.bold());
        }
        "portrait" | "foto" => {
            let url = (!value.trim().is_empty()).then(|| value.trim().to_string());
            ctx.engine.set_portrait(&key, url).map_err(fail)?;
            println!("  Portrait updated");
        }
        other => {
            let stat = parse_stat(other).map_err(fail)?;
            let value: i32 = value
                .parse()
                .map_err(|_| format!("invalid value: '{value}'"))?;
            let c = ctx.engine.edit_stat(&key, stat, value).map_err(fail)?;
            println!(
                "  {} {} = {} (life {}/{})",
                c.name.bold(),
                stat,
                c.stat(stat),
                c.life,
                c.max_life()
            );
        }
    }
    Ok(())
}
