//! Generation prompt for the synthesis collaborator.

use agentforge_types::order::OrderDetails;
use agentforge_types::project::{CORE_LOGIC_FILE, ENTRY_POINT_FILE};

/// Python packages the generated `requirements.txt` must list for these details.
pub fn required_packages(details: &OrderDetails) -> Vec<&'static str> {
    let mut packages = vec!["python-dotenv"];
    let bot_type = details.bot_type.to_lowercase();

    if bot_type == "trading bot" {
        packages.extend(["ccxt", "pandas", "pandas-ta"]);
    }
    let web_search = details
        .features
        .iter()
        .any(|f| f.to_lowercase().contains("web search"));
    if bot_type == "web scraper bot" || web_search {
        packages.extend(["requests", "beautifulsoup4"]);
    }
    if bot_type == "data analysis bot" {
        for pkg in ["pandas", "numpy", "matplotlib"] {
            if !packages.contains(&pkg) {
                packages.push(pkg);
            }
        }
    }
    packages
}

/// Build the natural-language instructions for one order.
pub fn build_generation_prompt(details: &OrderDetails) -> String {
    let mut order = String::new();
    order.push_str(&format!("- Name: {}\n", details.name));
    order.push_str(&format!("- Bot Type: {}\n", details.bot_type));
    if let Some(tactic) = &details.trading_tactic {
        order.push_str(&format!("- Trading Tactic: {tactic}\n"));
    }
    let features = if details.features.is_empty() {
        "None".to_string()
    } else {
        details.features.join(", ")
    };
    order.push_str(&format!("- Additional Features: {features}\n"));
    if let Some(personality) = &details.personality {
        order.push_str(&format!("- Personality: {personality}\n"));
    }

    let personality = details.personality.as_deref().unwrap_or("Professional");
    let packages = required_packages(details)
        .iter()
        .map(|p| format!("'{p}'"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are the AgentForge, a master code-generation AI. Generate a complete, executable \
Python project for a client based on their order.
The output MUST be a JSON array of objects, each with a \"filename\" and a \"content\" key.
The project must be well-structured, documented, and ready to run after installing the \
dependencies from 'requirements.txt'.

Customer's order:
{order}
Generation instructions:
1. Project structure: generate all of 'requirements.txt', 'config.ini', '{core}', '{entry}' and 'README.md'.
2. requirements.txt: list exactly these packages at minimum: {packages}.
3. config.ini: settings for the agent. Use placeholders such as 'YOUR_API_KEY_HERE' for secrets. \
A trading bot includes exchange details, a web scraper includes a default URL.
4. {core}: the core logic as a class-based agent.
   - The personality ('{personality}') shows in code comments and every user-facing print.
   - Implement the main purpose of the bot type{tactic_hint}.
   - Implement every additional feature as a separate, documented method on the agent class.
5. {entry}: the entry point. Load the config, instantiate the agent and run a simple input loop \
that calls the agent's primary method.
6. README.md: project title, short description, setup and usage instructions.
7. All Python code is clean, follows PEP 8 and carries helpful comments.
",
        core = CORE_LOGIC_FILE,
        entry = ENTRY_POINT_FILE,
        tactic_hint = details
            .trading_tactic
            .as_deref()
            .map(|t| format!(" using the {t} strategy"))
            .unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(bot_type: &str, features: &[&str]) -> OrderDetails {
        OrderDetails {
            name: "Probe".to_string(),
            bot_type: bot_type.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            personality: None,
            trading_tactic: None,
        }
    }

    #[test]
    fn test_dotenv_always_required() {
        assert_eq!(required_packages(&details("Conversational AI", &[])), vec!["python-dotenv"]);
    }

    #[test]
    fn test_trading_and_scraper_packages() {
        let trading = required_packages(&details("Trading Bot", &[]));
        assert!(trading.contains(&"ccxt"));
        assert!(trading.contains(&"pandas-ta"));

        let search = required_packages(&details("Conversational AI", &["Real-time Web Search"]));
        assert!(search.contains(&"beautifulsoup4"));
    }

    #[test]
    fn test_data_analysis_packages_not_duplicated() {
        let pkgs = required_packages(&details("Data Analysis Bot", &[]));
        assert_eq!(pkgs.iter().filter(|p| **p == "pandas").count(), 1);
        assert!(pkgs.contains(&"matplotlib"));
    }

    #[test]
    fn test_prompt_lists_order_and_critical_files() {
        let mut d = details("Trading Bot", &["Long-term Memory"]);
        d.trading_tactic = Some("Bollinger Bands".to_string());
        d.personality = Some("Direct & To-the-point".to_string());
        let prompt = build_generation_prompt(&d);

        assert!(prompt.contains("- Bot Type: Trading Bot"));
        assert!(prompt.contains("- Trading Tactic: Bollinger Bands"));
        assert!(prompt.contains("- Additional Features: Long-term Memory"));
        assert!(prompt.contains("- Personality: Direct & To-the-point"));
        assert!(prompt.contains("'agent.py'"));
        assert!(prompt.contains("'main.py'"));
        assert!(prompt.contains("using the Bollinger Bands strategy"));
    }

    #[test]
    fn test_prompt_without_optionals() {
        let prompt = build_generation_prompt(&details("Web Scraper Bot", &[]));
        assert!(prompt.contains("- Additional Features: None"));
        assert!(!prompt.contains("Trading Tactic"));
        assert!(!prompt.contains("- Personality:"));
    }
}
