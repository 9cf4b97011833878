//! Extraction policy: which strategies the extractor tries, and in what order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One way of turning PDF bytes into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Embedded text layer, read page by page with `lopdf`.
    TextLayer,
    /// Render each page to PNG and ask the model to transcribe it.
    Vision,
    /// Embedded text layer read by `pdf-extract`.
    FallbackTextLayer,
}

impl ExtractionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStrategy::TextLayer => "text_layer",
            ExtractionStrategy::Vision => "vision",
            ExtractionStrategy::FallbackTextLayer => "fallback_text_layer",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("unknown extraction strategy '{0}'")]
    Unknown(String),

    #[error("extraction policy must name at least one strategy")]
    Empty,
}

impl FromStr for ExtractionStrategy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "text_layer" | "text" => Ok(ExtractionStrategy::TextLayer),
            "vision" | "ocr" => Ok(ExtractionStrategy::Vision),
            "fallback_text_layer" | "fallback" => Ok(ExtractionStrategy::FallbackTextLayer),
            other => Err(PolicyError::Unknown(other.to_string())),
        }
    }
}

/// Ordered, duplicate-free list of strategies. The first one that yields
/// non-empty text wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPolicy(Vec<ExtractionStrategy>);

impl ExtractionPolicy {
    pub fn new(strategies: impl IntoIterator<Item = ExtractionStrategy>) -> Result<Self, PolicyError> {
        let mut ordered = Vec::new();
        for strategy in strategies {
            if !ordered.contains(&strategy) {
                ordered.push(strategy);
            }
        }
        if ordered.is_empty() {
            return Err(PolicyError::Empty);
        }
        Ok(Self(ordered))
    }

    pub fn strategies(&self) -> &[ExtractionStrategy] {
        &self.0
    }

    pub fn uses(&self, strategy: ExtractionStrategy) -> bool {
        self.0.contains(&strategy)
    }
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self(vec![
            ExtractionStrategy::TextLayer,
            ExtractionStrategy::FallbackTextLayer,
        ])
    }
}

impl FromStr for ExtractionPolicy {
    type Err = PolicyError;

    /// Parses a comma-separated list, e.g. `vision,text_layer`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let strategies = s
            .split(',')
            .filter(|token| !token.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<ExtractionStrategy>, _>>()?;
        Self::new(strategies)
    }
}

impl fmt::Display for ExtractionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|s| s.as_str()).collect();
        f.write_str(&names.join(","))
    }
}
