//! `aforge forge`: order an agent and watch the build log.

use std::time::Duration;

use anyhow::{Result, anyhow};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use agentforge_core::order::catalog::{
    BOT_TYPES, BuilderOption, FEATURES, PERSONALITIES, TRADING_TACTICS, dedup_features,
    find_option, find_tier, pricing_tiers, requires_trading_tactic, validate_custom_build,
};
use agentforge_types::agent::Agent;
use agentforge_types::build_log::{BuildLog, BuildLogLevel, BuildLogLine};
use agentforge_types::error::ForgeError;
use agentforge_types::order::{CustomBuild, Order};

use crate::state::AppState;

/// Resolve a tier id to a tier order.
pub fn tier_order(id: &str) -> Result<Order> {
    find_tier(id).map(Order::Tier).ok_or_else(|| {
        let ids: Vec<String> = pricing_tiers().into_iter().map(|t| t.id).collect();
        anyhow!("unknown tier '{id}'. Available tiers: {}", ids.join(", "))
    })
}

fn canonical_option(kind: &str, options: &[BuilderOption], value: &str) -> Result<String> {
    find_option(options, value)
        .map(|o| o.name.to_string())
        .ok_or_else(|| {
            let names: Vec<&str> = options.iter().map(|o| o.name).collect();
            anyhow!("unknown {kind} '{value}'. Choose one of: {}", names.join(", "))
        })
}

/// Build a custom order from CLI flags, canonicalizing every option against
/// the catalog and applying the builder's rules.
pub fn custom_order(
    name: String,
    bot_type: &str,
    features: &[String],
    personality: Option<&str>,
    tactic: Option<&str>,
) -> Result<Order> {
    let bot_type = canonical_option("bot type", BOT_TYPES, bot_type)?;

    let features = features
        .iter()
        .map(|f| canonical_option("feature", FEATURES, f))
        .collect::<Result<Vec<_>>>()?;

    let personality = personality
        .map(|p| {
            PERSONALITIES
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(p.trim()))
                .map(|candidate| candidate.to_string())
                .ok_or_else(|| {
                    anyhow!(
                        "unknown personality '{p}'. Choose one of: {}",
                        PERSONALITIES.join(", ")
                    )
                })
        })
        .transpose()?;

    let trading_tactic = match tactic {
        Some(_) if !requires_trading_tactic(&bot_type) => {
            return Err(anyhow!("--tactic only applies to trading bots"));
        }
        Some(t) => Some(canonical_option("trading tactic", TRADING_TACTICS, t)?),
        None => None,
    };

    let build = CustomBuild {
        name: name.trim().to_string(),
        bot_type,
        features: dedup_features(features),
        personality,
        trading_tactic,
    };
    validate_custom_build(&build)?;
    Ok(Order::Custom(build))
}

/// Renders build log lines as they arrive, with a spinner while the model works.
struct ProgressRenderer {
    spinner: Option<ProgressBar>,
}

impl ProgressRenderer {
    fn new() -> Self {
        Self { spinner: None }
    }

    fn on_line(&mut self, line: &BuildLogLine) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }

        println!("  {} {}", level_tag(line.level), line.message);

        if line.level == BuildLogLevel::Gen {
            let spinner = ProgressBar::new_spinner();
            if let Ok(spinner_style) =
                ProgressStyle::default_spinner().template("  {spinner:.magenta} {msg}")
            {
                spinner.set_style(spinner_style);
            }
            spinner.set_message("synthesizing project files...");
            spinner.enable_steady_tick(Duration::from_millis(80));
            self.spinner = Some(spinner);
        }
    }
}

impl Drop for ProgressRenderer {
    fn drop(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

fn level_tag(level: BuildLogLevel) -> String {
    let tag = format!("[{level}]");
    match level {
        BuildLogLevel::Info => style(tag).blue().to_string(),
        BuildLogLevel::Gen => style(tag).magenta().to_string(),
        BuildLogLevel::Validate => style(tag).yellow().to_string(),
        BuildLogLevel::Deploy => style(tag).cyan().to_string(),
        BuildLogLevel::Success => style(tag).green().bold().to_string(),
        BuildLogLevel::Error => style(tag).red().bold().to_string(),
    }
}

/// Forge `order`, streaming the build log, and register the agent.
pub async fn forge(state: &AppState, order: Order, json: bool, quiet: bool) -> Result<()> {
    let service = state.forge_service()?;

    if !json && !quiet {
        println!();
        println!(
            "  {} Forging {}",
            style("⚒").bold(),
            style(order.name()).cyan().bold()
        );
        println!();
    }

    let mut log = BuildLog::new();
    let mut renderer = (!json && !quiet).then(ProgressRenderer::new);
    let result = service
        .forge(order, |line| {
            if let Some(renderer) = renderer.as_mut() {
                renderer.on_line(&line);
            }
            log.push(line);
        })
        .await;
    drop(renderer);

    match result {
        Ok(agent) => {
            if json {
                let out = serde_json::json!({
                    "ok": true,
                    "agent": agent_summary(&agent),
                    "log": log.lines(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if quiet {
                println!("{}", agent.id);
            } else {
                print_success(&agent);
            }
            Ok(())
        }
        Err(err) => {
            if json {
                let out = serde_json::json!({
                    "ok": false,
                    "error": error_json(&err),
                    "log": log.lines(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if let ForgeError::Generation(gen_err) = &err {
                if gen_err.is_retryable() {
                    println!();
                    let hint = "This is usually temporary. Re-run the same command to try again.";
                    println!("  {}", style(hint).dim());
                }
            }
            println!();
            Err(err.into())
        }
    }
}

fn agent_summary(agent: &Agent) -> serde_json::Value {
    serde_json::json!({
        "id": agent.id,
        "name": agent.name,
        "status": agent.status,
        "created_at": agent.created_at,
        "files": agent.generated_files.iter().map(|f| f.filename.as_str()).collect::<Vec<_>>(),
    })
}

fn error_json(err: &ForgeError) -> serde_json::Value {
    match err {
        ForgeError::Generation(e) => serde_json::json!({
            "kind": e.kind(),
            "message": e.user_message(),
            "retryable": e.is_retryable(),
        }),
        ForgeError::Registry(e) => serde_json::json!({
            "kind": "registry",
            "message": e.to_string(),
            "retryable": false,
        }),
    }
}

fn print_success(agent: &Agent) {
    println!();
    println!(
        "  {} Agent forged successfully!",
        style("✓").green().bold()
    );
    println!();
    println!("  {}   {}", style("Name:").bold(), style(&agent.name).cyan());
    println!("  {}     {}", style("ID:").bold(), style(agent.id.to_string()).dim());
    println!("  {}  {}", style("Files:").bold(), agent.generated_files.len());
    println!();
    println!(
        "  Open the Command Center: {}",
        style(format!("aforge terminal {}", agent.id.short())).yellow()
    );
    println!();
}
