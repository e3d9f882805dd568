use std::{path::PathBuf, process::Stdio, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, error};

use crate::{
    config::config_model::SentimentConfig,
    domain::value_objects::enums::sentiments::Sentiment,
};

use super::{ClassifierError, SentimentClassifier, SentimentScore};

#[derive(Debug, Deserialize)]
struct ScriptOutput {
    sentiment: String,
    confidence: f64,
    #[serde(default)]
    prediction_raw: Option<String>,
}

/// Shells out to the trained model script once per request.
pub struct PythonSentimentClassifier {
    python_bin: String,
    script_path: PathBuf,
    timeout: Duration,
}

impl PythonSentimentClassifier {
    pub fn new(config: &SentimentConfig) -> Self {
        Self {
            python_bin: config.python_bin.clone(),
            script_path: PathBuf::from(&config.script_path),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl SentimentClassifier for PythonSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentScore, ClassifierError> {
        let child = Command::new(&self.python_bin)
            .arg(&self.script_path)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| ClassifierError::Unavailable(format!("failed to spawn: {err}")))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                ClassifierError::Unavailable(format!(
                    "timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|err| ClassifierError::Unavailable(err.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(
                script = %self.script_path.display(),
                status = %output.status,
                stderr = %stderr.trim(),
                "sentiment: classifier script failed"
            );
            return Err(ClassifierError::Unavailable(format!(
                "script exited with {}",
                output.status
            )));
        }

        parse_classifier_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extracts the JSON object the script prints and validates its label.
pub fn parse_classifier_output(stdout: &str) -> Result<SentimentScore, ClassifierError> {
    let start = stdout.find('{');
    let end = stdout.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &stdout[start..=end],
        _ => return Err(ClassifierError::InvalidOutput("no JSON object in output".to_string())),
    };

    let parsed: ScriptOutput = serde_json::from_str(json)
        .map_err(|err| ClassifierError::InvalidOutput(err.to_string()))?;
    debug!(
        sentiment = %parsed.sentiment,
        confidence = parsed.confidence,
        prediction_raw = ?parsed.prediction_raw,
        "sentiment: classifier output parsed"
    );

    // "unknown" means the model produced a class outside the trained pair.
    let label = Sentiment::from_str(&parsed.sentiment).ok_or_else(|| {
        ClassifierError::Unavailable(format!("unusable label {:?}", parsed.sentiment))
    })?;

    if !parsed.confidence.is_finite() {
        return Err(ClassifierError::InvalidOutput("confidence is not finite".to_string()));
    }

    Ok(SentimentScore {
        label,
        confidence: parsed.confidence.clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pretty_printed_output() {
        let stdout = "{\n  \"sentiment\": \"positive\",\n  \"confidence\": 0.87,\n  \"prediction_raw\": \"1\"\n}\n";
        let score = parse_classifier_output(stdout).unwrap();
        assert_eq!(score.label, Sentiment::Positive);
        assert_eq!(score.confidence, 0.87);
    }

    #[test]
    fn ignores_noise_around_json() {
        let stdout = "loading model...\n{\"sentiment\": \"negative\", \"confidence\": 0.66}\n";
        let score = parse_classifier_output(stdout).unwrap();
        assert_eq!(score.label, Sentiment::Negative);
    }

    #[test]
    fn clamps_confidence() {
        let stdout = r#"{"sentiment": "negative", "confidence": -0.2, "prediction_raw": "0"}"#;
        let score = parse_classifier_output(stdout).unwrap();
        assert_eq!(score.confidence, 0.0);
    }

    #[test]
    fn unknown_label_is_unavailable() {
        let stdout = r#"{"sentiment": "unknown", "confidence": 0.9, "prediction_raw": "2"}"#;
        assert!(matches!(
            parse_classifier_output(stdout),
            Err(ClassifierError::Unavailable(_))
        ));
    }

    #[test]
    fn garbage_is_invalid_output() {
        assert!(matches!(
            parse_classifier_output("Traceback (most recent call last)"),
            Err(ClassifierError::InvalidOutput(_))
        ));
        assert!(matches!(
            parse_classifier_output("{not json}"),
            Err(ClassifierError::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn missing_interpreter_is_unavailable() {
        let classifier = PythonSentimentClassifier::new(&SentimentConfig {
            python_bin: "definitely-not-a-python-binary".to_string(),
            script_path: "scripts/sentiment_analysis.py".to_string(),
            timeout_secs: 1,
        });
        assert!(matches!(
            classifier.classify("some text").await,
            Err(ClassifierError::Unavailable(_))
        ));
    }
}
