use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        entities::feedback::InsertFeedbackEntity,
        repositories::feedback::FeedbackRepository,
        value_objects::{
            enums::feedback_tags::{FeedbackCategory, FeedbackPriority},
            feedback::{
                FeedbackFilter, FeedbackModel, FeedbackSort, MAX_FEEDBACK_CHARS,
                MIN_FEEDBACK_CHARS, MyFeedbackQuery, SubmitFeedbackRequest,
                normalize_feedback_text,
            },
            pagination::{PageRequest, Paginated},
        },
    },
    sentiment::{SentimentAnalyzer, SentimentClassifier},
};

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback text must be between 3 and 10000 characters")]
    InvalidText,
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("no changes supplied")]
    EmptyUpdate,
    #[error("feedback not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl FeedbackError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            FeedbackError::InvalidText
            | FeedbackError::InvalidQuery(_)
            | FeedbackError::EmptyUpdate => StatusCode::BAD_REQUEST,
            FeedbackError::NotFound => StatusCode::NOT_FOUND,
            FeedbackError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, FeedbackError>;

pub struct FeedbackUseCase<F, C>
where
    F: FeedbackRepository + Send + Sync + 'static,
    C: SentimentClassifier + Send + Sync + 'static,
{
    feedback_repo: Arc<F>,
    analyzer: SentimentAnalyzer<C>,
}

impl<F, C> FeedbackUseCase<F, C>
where
    F: FeedbackRepository + Send + Sync + 'static,
    C: SentimentClassifier + Send + Sync + 'static,
{
    pub fn new(feedback_repo: Arc<F>, classifier: Arc<C>) -> Self {
        Self {
            feedback_repo,
            analyzer: SentimentAnalyzer::new(classifier),
        }
    }

    /// Stores feedback with a sentiment label. Classifier failures degrade to the
    /// keyword fallback and never fail the submission.
    pub async fn submit(
        &self,
        user_id: Uuid,
        request: SubmitFeedbackRequest,
    ) -> UseCaseResult<FeedbackModel> {
        let text = normalize_feedback_text(&request.text);
        let length = text.chars().count();
        if !(MIN_FEEDBACK_CHARS..=MAX_FEEDBACK_CHARS).contains(&length) {
            warn!(%user_id, length, "feedback: rejected text length");
            return Err(FeedbackError::InvalidText);
        }

        let classification = self.analyzer.analyze(&text).await;

        let entity = self
            .feedback_repo
            .insert(InsertFeedbackEntity {
                user_id,
                text,
                sentiment: classification.score.label.to_string(),
                confidence: classification.score.confidence,
                classification_source: classification.source.to_string(),
                is_active: true,
                is_reviewed: false,
                is_addressed: false,
                priority: FeedbackPriority::default().to_string(),
                category: FeedbackCategory::default().to_string(),
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "feedback: failed to store feedback");
                FeedbackError::Internal(err)
            })?;

        info!(
            %user_id,
            feedback_id = %entity.id,
            sentiment = %entity.sentiment,
            confidence = entity.confidence,
            source = %entity.classification_source,
            "feedback: submitted"
        );
        Ok(FeedbackModel::try_from(entity)?)
    }

    pub async fn list_mine(
        &self,
        user_id: Uuid,
        query: MyFeedbackQuery,
    ) -> UseCaseResult<Paginated<FeedbackModel>> {
        let page = PageRequest::new(query.page, query.limit);
        let filter = FeedbackFilter {
            user_id: Some(user_id),
            ..Default::default()
        };

        let (rows, total) = self
            .feedback_repo
            .list(filter, FeedbackSort::default(), page)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "feedback: failed to list own feedback");
                FeedbackError::Internal(err)
            })?;

        let items = rows
            .into_iter()
            .map(FeedbackModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Paginated::new(items, total, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            entities::feedback::FeedbackEntity,
            repositories::feedback::MockFeedbackRepository,
            value_objects::enums::sentiments::{ClassificationSource, Sentiment},
        },
        sentiment::{
            ClassifierError, MockSentimentClassifier, SentimentScore, keyword::FALLBACK_CONFIDENCE,
        },
    };
    use chrono::Utc;

    fn stored(insert: InsertFeedbackEntity) -> FeedbackEntity {
        let now = Utc::now();
        FeedbackEntity {
            id: Uuid::new_v4(),
            user_id: insert.user_id,
            text: insert.text,
            sentiment: insert.sentiment,
            confidence: insert.confidence,
            classification_source: insert.classification_source,
            is_active: insert.is_active,
            is_reviewed: insert.is_reviewed,
            is_addressed: insert.is_addressed,
            admin_response: None,
            responded_by: None,
            reviewed_at: None,
            addressed_at: None,
            priority: insert.priority,
            category: insert.category,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn submit_stores_model_classification() {
        let user_id = Uuid::new_v4();

        let mut classifier = MockSentimentClassifier::new();
        classifier
            .expect_classify()
            .withf(|text| text == "The past papers are really helpful")
            .returning(|_| {
                Ok(SentimentScore {
                    label: Sentiment::Positive,
                    confidence: 0.93,
                })
            });

        let mut repo = MockFeedbackRepository::new();
        repo.expect_insert()
            .withf(move |insert| {
                insert.user_id == user_id
                    && insert.sentiment == "positive"
                    && insert.classification_source == "model"
                    && insert.is_active
                    && insert.priority == "medium"
                    && insert.category == "general"
            })
            .times(1)
            .returning(|insert| Ok(stored(insert)));

        let model = FeedbackUseCase::new(Arc::new(repo), Arc::new(classifier))
            .submit(
                user_id,
                SubmitFeedbackRequest {
                    text: "  The past papers   are really helpful\n".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(model.sentiment, Sentiment::Positive);
        assert_eq!(model.confidence, 0.93);
        assert_eq!(model.classification_source, ClassificationSource::Model);
        assert_eq!(model.text, "The past papers are really helpful");
    }

    #[tokio::test]
    async fn submit_survives_classifier_outage() {
        let mut classifier = MockSentimentClassifier::new();
        classifier
            .expect_classify()
            .returning(|_| Err(ClassifierError::Unavailable("spawn failed".to_string())));

        let mut repo = MockFeedbackRepository::new();
        repo.expect_insert()
            .withf(|insert| {
                insert.sentiment == "negative"
                    && insert.confidence == FALLBACK_CONFIDENCE
                    && insert.classification_source == "fallback"
            })
            .times(1)
            .returning(|insert| Ok(stored(insert)));

        let model = FeedbackUseCase::new(Arc::new(repo), Arc::new(classifier))
            .submit(
                Uuid::new_v4(),
                SubmitFeedbackRequest {
                    text: "video lessons keep buffering".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(model.sentiment, Sentiment::Negative);
        assert_eq!(model.confidence, 0.5);
        assert_eq!(model.classification_source, ClassificationSource::Fallback);
    }

    #[tokio::test]
    async fn submit_rejects_too_short_text_without_classifying() {
        let mut classifier = MockSentimentClassifier::new();
        classifier.expect_classify().never();
        let mut repo = MockFeedbackRepository::new();
        repo.expect_insert().never();

        let err = FeedbackUseCase::new(Arc::new(repo), Arc::new(classifier))
            .submit(
                Uuid::new_v4(),
                SubmitFeedbackRequest {
                    text: "  ok   ".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FeedbackError::InvalidText));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submit_rejects_too_long_text() {
        let mut repo = MockFeedbackRepository::new();
        repo.expect_insert().never();

        let err = FeedbackUseCase::new(Arc::new(repo), Arc::new(MockSentimentClassifier::new()))
            .submit(
                Uuid::new_v4(),
                SubmitFeedbackRequest {
                    text: "a".repeat(MAX_FEEDBACK_CHARS + 1),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FeedbackError::InvalidText));
    }

    #[tokio::test]
    async fn list_mine_scopes_to_caller() {
        let user_id = Uuid::new_v4();

        let mut repo = MockFeedbackRepository::new();
        repo.expect_list()
            .withf(move |filter, sort, page| {
                filter.user_id == Some(user_id)
                    && *sort == FeedbackSort::default()
                    && page.page == 1
                    && page.limit == 10
            })
            .returning(|_, _, _| Ok((Vec::new(), 0)));

        let page = FeedbackUseCase::new(Arc::new(repo), Arc::new(MockSentimentClassifier::new()))
            .list_mine(user_id, MyFeedbackQuery::default())
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
