use ficha_mechanics::{format_balance, parse_money_tokens};

use super::{Context, fail};

pub fn receive(ctx: &Context, tokens: &[String]) -> Result<(), String> {
    let key = ctx.active_key()?;
    let amount = parse_money_tokens(tokens).map_err(fail)?;
    let balance = ctx.engine.credit(&key, amount).map_err(fail)?;
    println!("  +{}", format_balance(amount));
    println!("  balance: {}", format_balance(balance));
    Ok(())
}

pub fn spend(ctx: &Context, tokens: &[String]) -> Result<(), String> {
    let key = ctx.active_key()?;
    let amount = parse_money_tokens(tokens).map_err(fail)?;
    let balance = ctx.engine.debit(&key, amount).map_err(fail)?;
    println!("  -{}", format_balance(amount));
    println!("  balance: {}", format_balance(balance));
    Ok(())
}

pub fn balance(ctx: &Context) -> Result<(), String> {
    let c = ctx.active()?;
    println!("  balance: {}", format_balance(c.balance));
    Ok(())
}
