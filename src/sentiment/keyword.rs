use crate::domain::value_objects::enums::sentiments::Sentiment;

use super::SentimentScore;

pub const FALLBACK_CONFIDENCE: f64 = 0.5;

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "love",
    "like",
    "enjoy",
    "happy",
    "positive",
    "nice",
    "beautiful",
    "awesome",
    "helpful",
    "useful",
    "best",
    "perfect",
    "thanks",
    "thank",
];

/// Word-membership heuristic: any known positive word makes the text positive.
#[derive(Debug, Clone)]
pub struct KeywordSentimentClassifier {
    positive_words: &'static [&'static str],
}

impl Default for KeywordSentimentClassifier {
    fn default() -> Self {
        Self {
            positive_words: POSITIVE_WORDS,
        }
    }
}

impl KeywordSentimentClassifier {
    pub fn score(&self, text: &str) -> SentimentScore {
        let lowered = text.to_lowercase();
        let is_positive = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| self.positive_words.contains(&word));

        SentimentScore {
            label: if is_positive {
                Sentiment::Positive
            } else {
                Sentiment::Negative
            },
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}
