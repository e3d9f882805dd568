pub mod keyword;
pub mod python_classifier;

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::value_objects::enums::sentiments::{ClassificationSource, Sentiment};

use keyword::KeywordSentimentClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScore {
    pub label: Sentiment,
    pub confidence: f64,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
    #[error("classifier returned invalid output: {0}")]
    InvalidOutput(String),
}

#[automock]
#[async_trait]
pub trait SentimentClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentScore, ClassifierError>;
}

/// Label attached to a feedback record together with the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub score: SentimentScore,
    pub source: ClassificationSource,
}

/// Runs the primary classifier and degrades to keyword matching when it fails.
pub struct SentimentAnalyzer<C>
where
    C: SentimentClassifier + Send + Sync,
{
    primary: Arc<C>,
    fallback: KeywordSentimentClassifier,
}

impl<C> SentimentAnalyzer<C>
where
    C: SentimentClassifier + Send + Sync,
{
    pub fn new(primary: Arc<C>) -> Self {
        Self {
            primary,
            fallback: KeywordSentimentClassifier::default(),
        }
    }

    pub async fn analyze(&self, text: &str) -> Classification {
        match self.primary.classify(text).await {
            Ok(score) => {
                info!(
                    sentiment = %score.label,
                    confidence = score.confidence,
                    "sentiment: classified by model"
                );
                Classification {
                    score: SentimentScore {
                        label: score.label,
                        confidence: score.confidence.clamp(0.0, 1.0),
                    },
                    source: ClassificationSource::Model,
                }
            }
            Err(err) => {
                warn!(error = %err, "sentiment: model failed, using keyword fallback");
                Classification {
                    score: self.fallback.score(text),
                    source: ClassificationSource::Fallback,
                }
            }
        }
    }
}
