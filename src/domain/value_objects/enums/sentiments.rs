use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which strategy produced a stored sentiment label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Model,
    Fallback,
}

impl ClassificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationSource::Model => "model",
            ClassificationSource::Fallback => "fallback",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "model" => ClassificationSource::Model,
            _ => ClassificationSource::Fallback,
        }
    }
}

impl Display for ClassificationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence buckets used for filtering and stats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub const HIGH_THRESHOLD: f64 = 0.8;
    pub const MEDIUM_THRESHOLD: f64 = 0.5;

    pub fn of(confidence: f64) -> Self {
        if confidence >= Self::HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if confidence >= Self::MEDIUM_THRESHOLD {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    /// Half-open `[min, max)` range; `max` is `None` for the top bucket.
    pub fn bounds(&self) -> (f64, Option<f64>) {
        match self {
            ConfidenceLevel::High => (Self::HIGH_THRESHOLD, None),
            ConfidenceLevel::Medium => (Self::MEDIUM_THRESHOLD, Some(Self::HIGH_THRESHOLD)),
            ConfidenceLevel::Low => (0.0, Some(Self::MEDIUM_THRESHOLD)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_buckets_split_on_thresholds() {
        assert_eq!(ConfidenceLevel::of(0.95), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::of(0.8), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::of(0.79), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::of(0.5), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::of(0.49), ConfidenceLevel::Low);
    }

    #[test]
    fn sentiment_parsing_is_case_insensitive() {
        assert_eq!(Sentiment::from_str("Positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_str("unknown"), None);
    }
}
