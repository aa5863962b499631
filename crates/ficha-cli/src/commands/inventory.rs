use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::{Context, fail};

pub fn list(ctx: &Context) -> Result<(), String> {
    let key = ctx.active_key()?;
    let bag = ctx.engine.inventory(&key).map_err(fail)?;
    if bag.items.is_empty() {
        println!("  Bag is empty.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Item", "Quantity"]);
        for item in &bag.items {
            table.add_row(vec![item.name.clone(), item.quantity.to_string()]);
        }
        println!("{table}");
    }
    let room = if bag.is_full() {
        "full".red().to_string()
    } else {
        format!("{} free", bag.free())
    };
    println!("  {}/{} slots used ({room})", bag.occupied(), bag.capacity);
    Ok(())
}

pub fn add(ctx: &Context, item: &str, quantity: u32) -> Result<(), String> {
    let key = ctx.active_key()?;
    let stack = ctx.engine.add_item(&key, item, quantity).map_err(fail)?;
    println!("  {} x{}", stack.name, stack.quantity);
    Ok(())
}

pub fn use_item(ctx: &Context, item: &str, quantity: u32) -> Result<(), String> {
    let key = ctx.active_key()?;
    let left = ctx.engine.use_item(&key, item, quantity).map_err(fail)?;
    println!("  used {quantity} {}, {left} left", item.trim().to_lowercase());
    Ok(())
}

pub fn expand(ctx: &Context, slots: u32) -> Result<(), String> {
    let key = ctx.active_key()?;
    let capacity = ctx.engine.expand_bag(&key, slots).map_err(fail)?;
    println!("  bag now has {capacity} slots");
    Ok(())
}
