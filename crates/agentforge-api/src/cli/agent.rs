//! Agent CLI commands: list, show, delete, export.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use agentforge_core::order::normalize;
use agentforge_infra::filesystem::LocalFileSystem;
use agentforge_types::agent::{Agent, AgentStatus};

use crate::state::AppState;

/// Resolve an id or unique id prefix to a registered agent.
pub async fn resolve_agent(state: &AppState, query: &str) -> Result<Agent> {
    Ok(state.registry.find(query).await?)
}

/// List all agents in a table.
pub async fn list_agents(state: &AppState, json: bool) -> Result<()> {
    let agents = state.registry.list().await;

    if json {
        let rows: Vec<serde_json::Value> = agents
            .iter()
            .map(|a| {
                serde_json::json!({
                    "id": a.id,
                    "name": a.name,
                    "status": a.status,
                    "bot_type": normalize(&a.order).bot_type,
                    "files": a.generated_files.len(),
                    "created_at": a.created_at,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if agents.is_empty() {
        println!();
        println!(
            "  {} No agents yet. Forge one with: {}",
            style("i").blue().bold(),
            style("aforge forge tier scout_agent").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Files").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for agent in &agents {
        let details = normalize(&agent.order);
        let status_cell = match agent.status {
            AgentStatus::Active => Cell::new("● active").fg(Color::Green),
            AgentStatus::Inactive => Cell::new("○ inactive").fg(Color::DarkGrey),
        };

        table.add_row(vec![
            Cell::new(agent.id.short()).fg(Color::DarkGrey),
            Cell::new(&agent.name).fg(Color::Cyan),
            Cell::new(details.bot_type),
            status_cell,
            Cell::new(agent.generated_files.len()),
            Cell::new(format_relative_time(&agent.created_at)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} agent{}",
        style(agents.len()).bold(),
        if agents.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show an agent's order and file list.
pub async fn show_agent(state: &AppState, query: &str, json: bool) -> Result<()> {
    let agent = resolve_agent(state, query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agent)?);
        return Ok(());
    }

    let details = normalize(&agent.order);

    println!();
    println!("  {}", style(&agent.name).cyan().bold());
    println!(
        "  {}",
        style(if agent.order.is_custom() { "Custom build" } else { "Pricing tier" }).dim()
    );
    println!();

    println!("  {}", style("── Details ──").dim());
    println!("  {}          {}", style("ID:").bold(), style(agent.id.to_string()).dim());
    println!("  {}      {}", style("Status:").bold(), format_status(agent.status));
    println!("  {}        {}", style("Type:").bold(), details.bot_type);
    if let Some(personality) = &details.personality {
        println!("  {} {}", style("Personality:").bold(), personality);
    }
    if let Some(tactic) = &details.trading_tactic {
        println!("  {}      {}", style("Tactic:").bold(), tactic);
    }
    println!(
        "  {}     {}",
        style("Created:").bold(),
        agent.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();

    if !details.features.is_empty() {
        println!("  {}", style("── Features ──").dim());
        for feature in &details.features {
            println!("    {} {}", style("•").dim(), feature);
        }
        println!();
    }

    println!("  {}", style("── Files ──").dim());
    for file in &agent.generated_files {
        println!(
            "    {} {:<28} {}",
            style("•").dim(),
            file.filename,
            style(format_size(file.content.len())).dim()
        );
    }
    println!();

    Ok(())
}

/// Delete an agent with confirmation.
pub async fn delete_agent(state: &AppState, query: &str, force: bool, json: bool) -> Result<()> {
    let agent = resolve_agent(state, query).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete agent '{}' and its generated project?",
                style(&agent.name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state.registry.remove(&agent.id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": removed, "id": agent.id})
        );
    } else {
        println!(
            "  {} Agent '{}' deleted.",
            style("✓").red().bold(),
            agent.name
        );
    }

    Ok(())
}

/// Write an agent's project files to `out` (or the default export directory).
pub async fn export_agent(
    state: &AppState,
    query: &str,
    out: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let agent = resolve_agent(state, query).await?;
    let out_dir = out.unwrap_or_else(|| {
        state
            .data_dir
            .join("exports")
            .join(format!("{}-{}", slugify(&agent.name), agent.id.short()))
    });

    let written = LocalFileSystem::new()
        .export_project(&out_dir, &agent.generated_files)
        .await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "id": agent.id,
                "out_dir": out_dir,
                "files": written,
            }))?
        );
        return Ok(());
    }

    println!();
    println!(
        "  {} Exported {} file{} to {}",
        style("✓").green().bold(),
        written.len(),
        if written.len() == 1 { "" } else { "s" },
        style(out_dir.display()).cyan()
    );
    println!();

    Ok(())
}

// --- Formatting helpers ---

fn format_status(status: AgentStatus) -> String {
    match status {
        AgentStatus::Active => format!("{}", style("● active").green()),
        AgentStatus::Inactive => format!("{}", style("○ inactive").dim()),
    }
}

fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let diff = now - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Lowercase, dash-separated directory name for an agent.
fn slugify(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() { "agent".to_string() } else { slug }
}
