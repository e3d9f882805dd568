use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl FeedbackPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackPriority::Low => "low",
            FeedbackPriority::Medium => "medium",
            FeedbackPriority::High => "high",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "low" => Some(FeedbackPriority::Low),
            "medium" => Some(FeedbackPriority::Medium),
            "high" => Some(FeedbackPriority::High),
            _ => None,
        }
    }
}

impl Display for FeedbackPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    #[default]
    General,
    Bug,
    FeatureRequest,
    Content,
    Payment,
    Other,
}

impl FeedbackCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCategory::General => "general",
            FeedbackCategory::Bug => "bug",
            FeedbackCategory::FeatureRequest => "feature_request",
            FeedbackCategory::Content => "content",
            FeedbackCategory::Payment => "payment",
            FeedbackCategory::Other => "other",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "general" => Some(FeedbackCategory::General),
            "bug" => Some(FeedbackCategory::Bug),
            "feature_request" => Some(FeedbackCategory::FeatureRequest),
            "content" => Some(FeedbackCategory::Content),
            "payment" => Some(FeedbackCategory::Payment),
            "other" => Some(FeedbackCategory::Other),
            _ => None,
        }
    }
}

impl Display for FeedbackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
