use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use ficha_core::Skill;
use ficha_mechanics::input::parse_skill_kind;
use ficha_mechanics::{SkillEdit, SkillResolution};

use super::{Context, fail};

fn formula_label(skill: &Skill) -> &str {
    if skill.formula.is_empty() { "-" } else { &skill.formula }
}

pub fn add(ctx: &Context, name: &str, formula: &str, kind: &str, description: &str) -> Result<(), String> {
    let key = ctx.active_key()?;
    let kind = parse_skill_kind(kind).map_err(fail)?;
    let skill = ctx
        .engine
        .add_skill(&key, name, formula, kind, description)
        .map_err(fail)?;
    println!("  Learned {} ({}, {})", skill.name.bold(), skill.kind, formula_label(&skill));
    Ok(())
}

pub fn edit(
    ctx: &Context,
    name: &str,
    formula: Option<String>,
    description: Option<String>,
    kind: Option<&str>,
) -> Result<(), String> {
    let key = ctx.active_key()?;
    let kind = kind.map(parse_skill_kind).transpose().map_err(fail)?;
    let edit = SkillEdit {
        formula,
        description,
        kind,
    };
    let skill = ctx.engine.edit_skill(&key, name, edit).map_err(fail)?;
    println!("  Updated {} ({}, {})", skill.name.bold(), skill.kind, formula_label(&skill));
    Ok(())
}

pub fn remove(ctx: &Context, name: &str) -> Result<(), String> {
    let key = ctx.active_key()?;
    let skill = ctx.engine.remove_skill(&key, name).map_err(fail)?;
    println!("  Forgot {}", skill.name);
    Ok(())
}

pub fn list(ctx: &Context, filter: Option<&str>) -> Result<(), String> {
    let key = ctx.active_key()?;
    let skills = ctx.engine.skills(&key, filter).map_err(fail)?;
    if skills.is_empty() {
        println!("  No skills.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Skill", "Kind", "Formula", "Description"]);
    for s in &skills {
        table.add_row(vec![
            s.name.clone(),
            s.kind.to_string(),
            formula_label(s).to_string(),
            s.description.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn info(ctx: &Context, name: &str) -> Result<(), String> {
    let key = ctx.active_key()?;
    let skill = ctx.engine.skill(&key, name).map_err(fail)?;
    println!("  {}", skill.name.bold());
    println!("  kind: {}", skill.kind);
    println!("  formula: {}", formula_label(&skill));
    if !skill.description.is_empty() {
        println!("  {}", skill.description);
    }
    Ok(())
}

pub fn use_skill(ctx: &Context, name: &str, target: Option<&str>) -> Result<(), String> {
    let key = ctx.active_key()?;
    match ctx.engine.resolve_skill(&key, name, target).map_err(fail)? {
        SkillResolution::Damage { skill, roll } => match roll {
            Some(roll) => println!(
                "  {} ({}): {} = {}",
                skill.name.bold(),
                skill.formula,
                roll.breakdown(),
                roll.total()
            ),
            None => println!("  {} used", skill.name.bold()),
        },
        SkillResolution::Heal {
            skill,
            target,
            roll,
            life,
        } => {
            println!(
                "  {} ({}): {} = {}",
                skill.name.bold(),
                skill.formula,
                roll.breakdown(),
                roll.total()
            );
            println!(
                "  {} healed: life {} -> {}/{}",
                target.name,
                life.before,
                life.after,
                life.max
            );
        }
    }
    Ok(())
}
