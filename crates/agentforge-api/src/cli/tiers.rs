//! `aforge tiers`: the order catalog.

use anyhow::Result;
use console::style;

use agentforge_core::order::catalog::{
    BOT_TYPES, BuilderOption, FEATURES, PERSONALITIES, TRADING_BOT_TYPE, TRADING_TACTICS,
    pricing_tiers,
};

fn options_json(options: &[BuilderOption]) -> serde_json::Value {
    options
        .iter()
        .map(|o| serde_json::json!({"name": o.name, "description": o.description}))
        .collect()
}

/// Print pricing tiers and builder options.
pub fn show_catalog(json: bool) -> Result<()> {
    let tiers = pricing_tiers();

    if json {
        let catalog = serde_json::json!({
            "tiers": tiers,
            "bot_types": options_json(BOT_TYPES),
            "features": options_json(FEATURES),
            "trading_tactics": options_json(TRADING_TACTICS),
            "personalities": PERSONALITIES,
        });
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("── Pricing Tiers ──").dim());
    for tier in &tiers {
        println!();
        let popular = if tier.is_popular {
            format!(" {}", style("★ most popular").yellow())
        } else {
            String::new()
        };
        println!("  {}{}", style(&tier.name).cyan().bold(), popular);
        println!("  {}", style(&tier.description).dim());
        for feature in &tier.features {
            println!("    {} {}", style("•").dim(), feature);
        }
        println!(
            "  {}",
            style(format!("aforge forge tier {}", tier.id)).yellow()
        );
    }
    println!();

    println!("  {}", style("── Custom Builder ──").dim());
    print_options("Bot types", BOT_TYPES);
    print_options("Features", FEATURES);
    print_options(&format!("Trading tactics ({TRADING_BOT_TYPE} only)"), TRADING_TACTICS);

    println!();
    println!("  {}", style("Personalities").bold());
    for personality in PERSONALITIES {
        println!("    {} {}", style("•").dim(), personality);
    }
    println!();
    println!(
        "  {}",
        style("aforge forge custom --name <NAME> --bot-type <TYPE> [--feature <F>]...").yellow()
    );
    println!();

    Ok(())
}

fn print_options(title: &str, options: &[BuilderOption]) {
    println!();
    println!("  {}", style(title).bold());
    for option in options {
        println!(
            "    {} {:<30} {}",
            style("•").dim(),
            option.name,
            style(option.description).dim()
        );
    }
}
