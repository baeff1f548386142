//! Built-in catalog of pricing tiers and custom-build options.

use agentforge_types::order::{CustomBuild, PricingTier};

/// One selectable option in the custom builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOption {
    pub name: &'static str,
    pub description: &'static str,
}

const fn option(name: &'static str, description: &'static str) -> BuilderOption {
    BuilderOption { name, description }
}

/// Bot type whose custom builds must pick a trading tactic.
pub const TRADING_BOT_TYPE: &str = "Trading Bot";

pub const BOT_TYPES: &[BuilderOption] = &[
    option("Conversational AI", "Holds conversations and answers questions."),
    option("Data Analysis Bot", "Analyzes datasets and produces insights."),
    option("Content Creation Bot", "Writes articles, emails or social media posts."),
    option(TRADING_BOT_TYPE, "Analyzes markets and executes trades."),
    option("Web Scraper Bot", "Extracts structured data from websites."),
    option("Email Automation Bot", "Automates sending emails."),
];

pub const TRADING_TACTICS: &[BuilderOption] = &[
    option("RSI Crossover", "Trades on the Relative Strength Index."),
    option("MACD Strategy", "Uses Moving Average Convergence Divergence."),
    option("Bollinger Bands", "Trades on market volatility."),
    option("Ichimoku Cloud", "Advanced all-in-one indicator."),
];

pub const FEATURES: &[BuilderOption] = &[
    option("Real-time Web Search", "Searches the live web for current information."),
    option("Long-term Memory", "Remembers earlier interactions."),
    option("File Interaction (Read/Write)", "Reads and writes files."),
    option("API Integration", "Connects to external services."),
    option("Tool Use (Calculator)", "Performs basic calculations."),
    option("Scheduled Execution", "Runs tasks at set times."),
];

pub const PERSONALITIES: &[&str] = &[
    "Professional",
    "Friendly & Helpful",
    "Witty & Creative",
    "Direct & To-the-point",
    "Analytical & Data-driven",
];

/// The fixed pricing tiers, in display order.
pub fn pricing_tiers() -> Vec<PricingTier> {
    fn tier(
        id: &str,
        name: &str,
        description: &str,
        popular: bool,
        features: &[&str],
    ) -> PricingTier {
        PricingTier {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            is_popular: popular,
        }
    }

    vec![
        tier(
            "scout_agent",
            "Scout Agent",
            "A capable agent for specific, automated tasks.",
            false,
            &[
                "Choice of all standard bot types",
                "Basic Q&A and command handling",
                "Simple integration",
                "Community & email support",
            ],
        ),
        tier(
            "hunter_agent",
            "Hunter Agent",
            "An advanced agent with proactive skills and tools.",
            true,
            &[
                "All Scout Agent features",
                "Advanced tool use (Web Search)",
                "Long-term memory",
                "Priority email & chat support",
                "Analytics dashboard",
            ],
        ),
        tier(
            "apex_agent",
            "Apex Agent",
            "An elite, fully autonomous agent for complex business processes.",
            false,
            &[
                "All Hunter Agent features",
                "Advanced tool chaining",
                "API integration and file interaction",
                "Scheduled execution",
                "Dedicated account manager",
            ],
        ),
    ]
}

/// Look up a pricing tier by id (case-insensitive).
pub fn find_tier(id: &str) -> Option<PricingTier> {
    pricing_tiers()
        .into_iter()
        .find(|t| t.id.eq_ignore_ascii_case(id))
}

/// Look up a builder option by name (case-insensitive), returning its canonical spelling.
pub fn find_option(options: &[BuilderOption], name: &str) -> Option<BuilderOption> {
    options
        .iter()
        .copied()
        .find(|o| o.name.eq_ignore_ascii_case(name.trim()))
}

/// Whether custom builds of this bot type need a trading tactic.
pub fn requires_trading_tactic(bot_type: &str) -> bool {
    bot_type.eq_ignore_ascii_case(TRADING_BOT_TYPE)
}

/// Keep selection order, dropping repeated features.
pub fn dedup_features<I, S>(features: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for feature in features {
        let feature = feature.into();
        if !out.contains(&feature) {
            out.push(feature);
        }
    }
    out
}

/// Problems with a custom build that the builder rejects before forging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildValidationError {
    #[error("agent name cannot be empty")]
    EmptyName,

    #[error("a trading tactic is required for a {0}")]
    MissingTradingTactic(String),
}

/// Business rules the builder enforces. The forge pipeline accepts any build.
pub fn validate_custom_build(build: &CustomBuild) -> Result<(), BuildValidationError> {
    if build.name.trim().is_empty() {
        return Err(BuildValidationError::EmptyName);
    }
    if requires_trading_tactic(&build.bot_type) && build.trading_tactic.is_none() {
        return Err(BuildValidationError::MissingTradingTactic(
            build.bot_type.clone(),
        ));
    }
    Ok(())
}
