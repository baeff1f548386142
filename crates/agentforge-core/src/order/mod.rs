//! Order normalization.
//!
//! Tier orders and custom builds reach the forge through one canonical
//! [`OrderDetails`] shape.

pub mod catalog;

use agentforge_types::order::{Order, OrderDetails};

/// Bot type assigned to every fixed-tier order.
pub const DEFAULT_BOT_TYPE: &str = "Conversational AI";

/// Personality used when a tier id has no entry in the personality table.
pub const DEFAULT_PERSONALITY: &str = "Professional";

/// Default personality for a tier id.
pub fn tier_personality(tier_id: &str) -> &'static str {
    match tier_id {
        "scout_agent" => "Helpful",
        "hunter_agent" => "Proactive",
        "apex_agent" => "Strategic",
        _ => DEFAULT_PERSONALITY,
    }
}

/// Map an order to its canonical details. Total over both order shapes.
pub fn normalize(order: &Order) -> OrderDetails {
    match order {
        Order::Custom(build) => OrderDetails {
            name: build.name.clone(),
            bot_type: build.bot_type.clone(),
            features: build.features.clone(),
            personality: build.personality.clone(),
            trading_tactic: build.trading_tactic.clone(),
        },
        Order::Tier(tier) => OrderDetails {
            name: tier.name.clone(),
            bot_type: DEFAULT_BOT_TYPE.to_string(),
            features: tier.features.clone(),
            personality: Some(tier_personality(&tier.id).to_string()),
            trading_tactic: None,
        },
    }
}
