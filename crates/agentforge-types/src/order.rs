//! Order types: what a user asks the Forge to build.
//!
//! An order is either one of the fixed pricing tiers or a custom build
//! configured option by option. Both shapes normalize into [`OrderDetails`].

use serde::{Deserialize, Serialize};

/// A fixed pricing tier from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Stable catalog identifier (e.g. "scout_agent").
    pub id: String,
    pub name: String,
    pub description: String,
    /// Features included in the tier, in display order.
    pub features: Vec<String>,
    #[serde(default)]
    pub is_popular: bool,
}

/// A custom build assembled in the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomBuild {
    pub name: String,
    pub bot_type: String,
    /// Selected features in selection order.
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_tactic: Option<String>,
}

/// A user's request for an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Order {
    Tier(PricingTier),
    Custom(CustomBuild),
}

impl Order {
    /// Display name of the ordered agent.
    pub fn name(&self) -> &str {
        match self {
            Order::Tier(tier) => &tier.name,
            Order::Custom(build) => &build.name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Order::Custom(_))
    }
}

/// Canonical description of an order, independent of how it was placed.
///
/// Derived once per order and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub name: String,
    pub bot_type: String,
    pub features: Vec<String>,
    pub personality: Option<String>,
    pub trading_tactic: Option<String>,
}
