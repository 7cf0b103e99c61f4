//! Token tables and thresholds that drive column-role and locality inference.
//!
//! The defaults reproduce the built-in behavior; a YAML file with any subset
//! of the fields overrides them:
//!
//! ```yaml
//! price_tokens: [price, rate, psf]
//! sample_rows: 100
//! ```

use std::{fs, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{InsightError, InsightResult};

const PRICE_TOKENS: &[&str] = &[
    "price",
    "cost",
    "amount",
    "rate",
    "value",
    "total_sales",
    "sales",
    "total",
];
const DEMAND_TOKENS: &[&str] = &["demand", "interest", "search", "vol", "queries"];
const LOCALITY_TOKENS: &[&str] = &[
    "area",
    "location",
    "locality",
    "city",
    "final location",
    "neighbour",
    "neighborhood",
    "town",
];
const QUERY_FILLERS: &[&str] = &[
    "analyze",
    "analyse",
    "show",
    "compare",
    "compare:",
    "compare ",
    "give",
    "give me analysis of",
    "search",
    "show me",
    "find",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Heuristics {
    pub price_tokens: Vec<String>,
    pub demand_tokens: Vec<String>,
    pub locality_tokens: Vec<String>,
    /// Phrases removed from free-text queries, in order, to leave the area.
    pub query_fillers: Vec<String>,
    pub sample_rows: usize,
    pub fallback_min_numeric: usize,
    pub max_area_length: usize,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            price_tokens: owned(PRICE_TOKENS),
            demand_tokens: owned(DEMAND_TOKENS),
            locality_tokens: owned(LOCALITY_TOKENS),
            query_fillers: owned(QUERY_FILLERS),
            sample_rows: 50,
            fallback_min_numeric: 3,
            max_area_length: 120,
        }
    }
}

impl Heuristics {
    pub fn load(path: &Path) -> InsightResult<Self> {
        let raw = fs::read_to_string(path)?;
        let parsed = Self::from_yaml(&raw)
            .map_err(|err| InsightError::Config(format!("{path:?}: {err}")))?;
        debug!("Loaded heuristics from {path:?}");
        Ok(parsed)
    }

    pub fn from_yaml(input: &str) -> InsightResult<Self> {
        let parsed: Heuristics =
            serde_yaml::from_str(input).map_err(|err| InsightError::Config(err.to_string()))?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn to_yaml(&self) -> InsightResult<String> {
        serde_yaml::to_string(self).map_err(|err| InsightError::Config(err.to_string()))
    }

    fn validate(&self) -> InsightResult<()> {
        if self.sample_rows == 0 {
            return Err(InsightError::Config(
                "sample_rows must be positive".to_string(),
            ));
        }
        let blank = [
            ("price_tokens", &self.price_tokens),
            ("demand_tokens", &self.demand_tokens),
            ("locality_tokens", &self.locality_tokens),
        ]
        .into_iter()
        .find(|(_, tokens)| tokens.iter().any(|t| t.trim().is_empty()));
        if let Some((name, _)) = blank {
            return Err(InsightError::Config(format!(
                "{name} must not contain blank tokens"
            )));
        }
        Ok(())
    }

    pub fn is_price_like(&self, key: &str) -> bool {
        contains_any(key, &self.price_tokens)
    }

    pub fn is_demand_like(&self, key: &str) -> bool {
        contains_any(key, &self.demand_tokens)
    }

    pub fn is_locality_like(&self, key: &str) -> bool {
        contains_any(key, &self.locality_tokens)
    }
}

fn contains_any(key: &str, tokens: &[String]) -> bool {
    let lowered = key.to_lowercase();
    tokens
        .iter()
        .any(|token| lowered.contains(token.to_lowercase().as_str()))
}

fn owned(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}
