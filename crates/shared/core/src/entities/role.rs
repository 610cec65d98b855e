use serde::{Deserialize, Serialize};

/// Liquidity role of a child order: Maker posted resting liquidity,
/// Taker removed it. Metrics are reported separately per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidityRole {
    Maker,
    Taker,
}

impl std::fmt::Display for LiquidityRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiquidityRole::Maker => write!(f, "Maker"),
            LiquidityRole::Taker => write!(f, "Taker"),
        }
    }
}
