//! Challenge plans sold through checkout.
//!
//! Plans are a closed set with fixed terms; the payment processor only knows
//! them through their price id.
use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Purchasable challenge plan. Parsing is case-sensitive (`starter`, `pro`, `elite`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChallengePlan {
    Starter,
    Pro,
    Elite,
}

/// Terms of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTerms {
    /// Card processor price id.
    pub price_id: &'static str,
    /// Name shown on hosted payment pages.
    pub display_name: &'static str,
    /// Price in whole US dollars, for processors that take a plain amount.
    pub price_usd: u32,
    pub initial_balance: u32,
    pub profit_target_percent: u32,
    pub max_daily_loss_percent: u32,
    pub max_total_loss_percent: u32,
}

impl ChallengePlan {
    pub fn terms(&self) -> PlanTerms {
        match self {
            ChallengePlan::Starter => PlanTerms {
                price_id: "price_1Sjo30RDLrjqQ78sGUcYola7",
                display_name: "Starter Challenge",
                price_usd: 99,
                initial_balance: 5_000,
                profit_target_percent: 10,
                max_daily_loss_percent: 5,
                max_total_loss_percent: 10,
            },
            ChallengePlan::Pro => PlanTerms {
                price_id: "price_1Sjo3WRDLrjqQ78sNVuYkkDJ",
                display_name: "Pro Challenge",
                price_usd: 249,
                initial_balance: 25_000,
                profit_target_percent: 10,
                max_daily_loss_percent: 5,
                max_total_loss_percent: 10,
            },
            ChallengePlan::Elite => PlanTerms {
                price_id: "price_1Sjo3jRDLrjqQ78sJJPcwXvl",
                display_name: "Elite Challenge",
                price_usd: 499,
                initial_balance: 100_000,
                profit_target_percent: 8,
                max_daily_loss_percent: 4,
                max_total_loss_percent: 8,
            },
        }
    }
}
