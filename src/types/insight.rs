//! Heuristic risk assessment types

use serde::{Deserialize, Serialize};

/// Three-way risk classification shared by color and recommendation mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    High,
    Medium,
    Low,
}

impl RiskBand {
    /// Score at or above which a result is high risk.
    pub const HIGH_THRESHOLD: u8 = 70;
    /// Score at or above which a result is medium risk.
    pub const MEDIUM_THRESHOLD: u8 = 40;

    pub fn from_score(score: u8) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            RiskBand::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }

    pub fn color(self) -> RiskColor {
        match self {
            RiskBand::High => RiskColor::Red,
            RiskBand::Medium => RiskColor::Amber,
            RiskBand::Low => RiskColor::Green,
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskBand::High => "🛑 High-risk indicators detected.",
            RiskBand::Medium => "⚠️ Medium risk. Mixed signals.",
            RiskBand::Low => "✅ Low/neutral risk. Looks generally safe.",
        }
    }
}

/// Embed color attached to an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskColor {
    Red,
    Amber,
    Green,
}

impl RiskColor {
    /// RGB value used for chat embeds.
    pub fn rgb(self) -> u32 {
        match self {
            RiskColor::Red => 0xFF0000,
            RiskColor::Amber => 0xFFD000,
            RiskColor::Green => 0x00FF00,
        }
    }
}

/// Risk assessment derived from a set of clusters.
///
/// Computed fresh on every request; only its inputs are cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub summary: String,
    /// Always within `0..=100`.
    pub score: u8,
    pub color: RiskColor,
    pub recommendation: String,
}

impl Insight {
    /// Result for an empty cluster set.
    pub fn neutral() -> Self {
        Self {
            summary: "No data".to_string(),
            score: 50,
            color: RiskColor::Green,
            recommendation: "Neutral".to_string(),
        }
    }
}
