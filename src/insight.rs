//! Keyword-weight risk scoring.
//!
//! A score starts at 50 and moves by the weight of every keyword that occurs
//! (as a substring) in the lower-cased text, clamped to `0..=100`. Each
//! keyword counts once no matter how often it appears. Color and
//! recommendation both derive from [`RiskBand`], so they always agree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Cluster, Insight, RiskBand, RiskColor};

/// Baseline added to the keyword total before clamping.
const BASE_SCORE: i64 = 50;

/// How many cluster labels the insight summary lists.
const SUMMARY_TOPICS: usize = 5;

const DEFAULT_WEIGHTS: &[(&str, i32)] = &[
    ("scam", 25),
    ("rug", 25),
    ("exploit", 20),
    ("hack", 20),
    ("fraud", 20),
    ("ponzi", 20),
    ("phishing", 15),
    ("lawsuit", 10),
    ("crash", 10),
    ("dump", 10),
    ("ban", 10),
    ("delist", 10),
    ("bullish", -10),
    ("partnership", -10),
    ("adoption", -10),
    ("growth", -5),
    ("upgrade", -5),
    ("audit", -5),
];

/// Keyword → weight table used by [`compute_risk_score`].
///
/// Keywords are stored lower-cased; matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, i32>", into = "BTreeMap<String, i32>")]
pub struct RiskKeywords {
    weights: BTreeMap<String, i32>,
}

impl RiskKeywords {
    pub fn new<K: Into<String>>(weights: impl IntoIterator<Item = (K, i32)>) -> Self {
        Self {
            weights: weights
                .into_iter()
                .map(|(k, w)| (k.into().to_lowercase(), w))
                .filter(|(k, _)| !k.is_empty())
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.weights.iter().map(|(k, w)| (k.as_str(), *w))
    }

    /// Score `text` against this table. See [`compute_risk_score`].
    pub fn score(&self, text: &str) -> u8 {
        let text = text.to_lowercase();
        let total: i64 = self
            .weights
            .iter()
            .filter(|(keyword, _)| text.contains(keyword.as_str()))
            .map(|(_, weight)| i64::from(*weight))
            .sum();
        (total + BASE_SCORE).clamp(0, 100) as u8
    }
}

impl Default for RiskKeywords {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHTS.iter().copied())
    }
}

impl From<BTreeMap<String, i32>> for RiskKeywords {
    fn from(weights: BTreeMap<String, i32>) -> Self {
        Self::new(weights)
    }
}

impl From<RiskKeywords> for BTreeMap<String, i32> {
    fn from(keywords: RiskKeywords) -> Self {
        keywords.weights
    }
}

/// Deterministic risk score in `0..=100`. Empty text scores 50.
pub fn compute_risk_score(text: &str, keywords: &RiskKeywords) -> u8 {
    keywords.score(text)
}

/// Red at 70 and above, amber from 40, green below.
pub fn compute_color_from_score(score: u8) -> RiskColor {
    RiskBand::from_score(score).color()
}

/// Recommendation text for the same bands as [`compute_color_from_score`].
pub fn get_recommendation_from_score(score: u8) -> &'static str {
    RiskBand::from_score(score).recommendation()
}

/// Score the combined summaries of `clusters` and list the first five labels.
///
/// An empty slice yields [`Insight::neutral`].
pub fn generate_heuristic_insight(clusters: &[Cluster], keywords: &RiskKeywords) -> Insight {
    if clusters.is_empty() {
        return Insight::neutral();
    }

    let combined = clusters
        .iter()
        .map(|c| c.summary.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let score = compute_risk_score(&combined, keywords);
    let topics = clusters
        .iter()
        .take(SUMMARY_TOPICS)
        .map(|c| c.label.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Insight {
        summary: format!("Topics: {topics}"),
        score,
        color: compute_color_from_score(score),
        recommendation: get_recommendation_from_score(score).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RiskKeywords {
        RiskKeywords::new([("scam", 30), ("hack", 25), ("bullish", -20)])
    }

    #[test]
    fn empty_text_scores_fifty() {
        assert_eq!(compute_risk_score("", &table()), 50);
        assert_eq!(compute_risk_score("", &RiskKeywords::default()), 50);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        assert_eq!(compute_risk_score("Total SCAMMERS everywhere", &table()), 80);
    }

    #[test]
    fn each_keyword_counts_once() {
        assert_eq!(compute_risk_score("scam scam scam", &table()), 80);
    }

    #[test]
    fn weights_sum_and_clamp() {
        assert_eq!(compute_risk_score("scam and hack", &table()), 100);
        assert_eq!(compute_risk_score("bullish", &table()), 30);

        let heavy = RiskKeywords::new([("doom", -500)]);
        assert_eq!(compute_risk_score("doom", &heavy), 0);
        let extreme = RiskKeywords::new([("doom", i32::MAX), ("gloom", i32::MAX)]);
        assert_eq!(compute_risk_score("doom gloom", &extreme), 100);
    }

    #[test]
    fn keywords_are_normalised() {
        let keywords = RiskKeywords::new([("SCAM", 10), ("", 99)]);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords.iter().next(), Some(("scam", 10)));
    }

    #[test]
    fn score_is_deterministic_and_bounded() {
        let keywords = RiskKeywords::default();
        for text in ["", "rug pull scam exploit hack fraud ponzi", "bullish adoption growth", "ünïcödé"] {
            let first = compute_risk_score(text, &keywords);
            assert_eq!(first, compute_risk_score(text, &keywords));
            assert!(first <= 100);
        }
    }

    #[test]
    fn color_and_recommendation_share_bands() {
        for score in 0..=100u8 {
            let color = compute_color_from_score(score);
            let recommendation = get_recommendation_from_score(score);
            match score {
                70..=100 => {
                    assert_eq!(color, RiskColor::Red);
                    assert!(recommendation.contains("High-risk"));
                }
                40..=69 => {
                    assert_eq!(color, RiskColor::Amber);
                    assert!(recommendation.contains("Medium risk"));
                }
                _ => {
                    assert_eq!(color, RiskColor::Green);
                    assert!(recommendation.contains("Low/neutral"));
                }
            }
        }
    }

    #[test]
    fn band_colors() {
        assert_eq!(compute_color_from_score(70).rgb(), 0xFF0000);
        assert_eq!(compute_color_from_score(40).rgb(), 0xFFD000);
        assert_eq!(compute_color_from_score(39).rgb(), 0x00FF00);
    }

    #[test]
    fn empty_clusters_yield_neutral_insight() {
        let insight = generate_heuristic_insight(&[], &table());
        assert_eq!(insight.summary, "No data");
        assert_eq!(insight.score, 50);
        assert_eq!(insight.color, RiskColor::Green);
        assert_eq!(insight.recommendation, "Neutral");
    }

    #[test]
    fn insight_scores_combined_summaries() {
        let clusters = vec![
            Cluster::new("Alpha", "possible scam", 1.0),
            Cluster::new("Beta", "exchange hack", 2.0),
        ];
        let insight = generate_heuristic_insight(&clusters, &table());
        assert_eq!(insight.score, 100);
        assert_eq!(insight.color, RiskColor::Red);
        assert_eq!(insight.summary, "Topics: Alpha, Beta");
        assert_eq!(insight.recommendation, "🛑 High-risk indicators detected.");
    }

    #[test]
    fn insight_lists_first_five_labels() {
        let clusters: Vec<Cluster> = (1..=7)
            .map(|i| Cluster::new(format!("T{i}"), "", 0.0))
            .collect();
        let insight = generate_heuristic_insight(&clusters, &table());
        assert_eq!(insight.summary, "Topics: T1, T2, T3, T4, T5");
        assert_eq!(insight.score, 50);
        assert_eq!(insight.color, RiskColor::Amber);
    }

    #[test]
    fn keyword_table_round_trips_through_toml_shape() {
        let map: BTreeMap<String, i32> = table().into();
        assert_eq!(map.get("scam"), Some(&30));
        assert_eq!(RiskKeywords::from(map), table());
    }
}
