use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{
    entities::feedback::FeedbackEntity,
    value_objects::{
        enums::sentiments::{ConfidenceLevel, Sentiment},
        feedback::TrendInterval,
    },
};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ConfidenceDistribution {
    pub high: i64,
    pub medium: i64,
    pub low: i64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FeedbackStats {
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub average_confidence: f64,
    pub confidence_distribution: ConfidenceDistribution,
    pub reviewed: i64,
    pub addressed: i64,
}

impl FeedbackStats {
    pub fn from_entries(entries: &[FeedbackEntity]) -> Self {
        let mut stats = FeedbackStats::default();
        let mut confidence_sum = 0.0;

        for entry in entries {
            stats.total += 1;
            match Sentiment::from_str(&entry.sentiment) {
                Some(Sentiment::Positive) => stats.positive += 1,
                Some(Sentiment::Negative) => stats.negative += 1,
                None => {}
            }
            match ConfidenceLevel::of(entry.confidence) {
                ConfidenceLevel::High => stats.confidence_distribution.high += 1,
                ConfidenceLevel::Medium => stats.confidence_distribution.medium += 1,
                ConfidenceLevel::Low => stats.confidence_distribution.low += 1,
            }
            if entry.is_reviewed {
                stats.reviewed += 1;
            }
            if entry.is_addressed {
                stats.addressed += 1;
            }
            confidence_sum += entry.confidence;
        }

        let labelled = stats.positive + stats.negative;
        if labelled > 0 {
            stats.positive_percentage = percentage(stats.positive, labelled);
            // Derived from the complement so the pair always sums to 100.
            stats.negative_percentage = round_to(100.0 - stats.positive_percentage, 1);
        }
        if stats.total > 0 {
            stats.average_confidence = round_to(confidence_sum / stats.total as f64, 4);
        }

        stats
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPoint {
    pub period: String,
    pub period_start: NaiveDate,
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
    pub average_confidence: f64,
}

/// Groups entries into UTC calendar buckets, oldest first.
pub fn build_trends(entries: &[FeedbackEntity], interval: TrendInterval) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<NaiveDate, (i64, i64, i64, f64)> = BTreeMap::new();

    for entry in entries {
        let start = period_start(entry.created_at.date_naive(), interval);
        let bucket = buckets.entry(start).or_insert((0, 0, 0, 0.0));
        bucket.0 += 1;
        match Sentiment::from_str(&entry.sentiment) {
            Some(Sentiment::Positive) => bucket.1 += 1,
            Some(Sentiment::Negative) => bucket.2 += 1,
            None => {}
        }
        bucket.3 += entry.confidence;
    }

    buckets
        .into_iter()
        .map(|(start, (total, positive, negative, confidence_sum))| TrendPoint {
            period: period_label(start, interval),
            period_start: start,
            total,
            positive,
            negative,
            average_confidence: round_to(confidence_sum / total as f64, 4),
        })
        .collect()
}

fn period_start(date: NaiveDate, interval: TrendInterval) -> NaiveDate {
    match interval {
        TrendInterval::Day => date,
        TrendInterval::Week => {
            date - Duration::days(date.weekday().num_days_from_monday().into())
        }
        TrendInterval::Month => date.with_day(1).unwrap_or(date),
    }
}

fn period_label(start: NaiveDate, interval: TrendInterval) -> String {
    match interval {
        TrendInterval::Day => start.format("%Y-%m-%d").to_string(),
        TrendInterval::Week => {
            let week = start.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        TrendInterval::Month => start.format("%Y-%m").to_string(),
    }
}

fn percentage(part: i64, whole: i64) -> f64 {
    round_to(part as f64 * 100.0 / whole as f64, 1)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn entry(sentiment: &str, confidence: f64, y: i32, m: u32, d: u32) -> FeedbackEntity {
        let created_at = Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap();
        FeedbackEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            text: "sample".to_string(),
            sentiment: sentiment.to_string(),
            confidence,
            classification_source: "model".to_string(),
            is_active: true,
            is_reviewed: false,
            is_addressed: false,
            admin_response: None,
            responded_by: None,
            reviewed_at: None,
            addressed_at: None,
            priority: "medium".to_string(),
            category: "general".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn stats_count_and_percentages() {
        let mut entries = vec![
            entry("positive", 0.9, 2024, 3, 1),
            entry("positive", 0.6, 2024, 3, 1),
            entry("negative", 0.3, 2024, 3, 2),
        ];
        entries[0].is_reviewed = true;

        let stats = FeedbackStats::from_entries(&entries);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.positive, 2);
        assert_eq!(stats.negative, 1);
        assert_eq!(stats.positive_percentage, 66.7);
        assert_eq!(stats.negative_percentage, 33.3);
        assert_eq!(stats.average_confidence, 0.6);
        assert_eq!(
            stats.confidence_distribution,
            ConfidenceDistribution { high: 1, medium: 1, low: 1 }
        );
        assert_eq!(stats.reviewed, 1);
        assert_eq!(stats.addressed, 0);
    }

    #[test]
    fn percentages_sum_to_one_hundred_on_half_way_rounding() {
        let mut entries = vec![entry("positive", 0.9, 2024, 3, 1)];
        entries.extend((0..15).map(|_| entry("negative", 0.9, 2024, 3, 1)));

        let stats = FeedbackStats::from_entries(&entries);

        assert_eq!(stats.positive_percentage + stats.negative_percentage, 100.0);
    }

    #[test]
    fn empty_stats_are_zeroed() {
        assert_eq!(FeedbackStats::from_entries(&[]), FeedbackStats::default());
    }

    #[test]
    fn daily_trends_are_sorted_ascending() {
        let entries = vec![
            entry("negative", 0.4, 2024, 3, 2),
            entry("positive", 0.8, 2024, 3, 1),
            entry("positive", 0.6, 2024, 3, 1),
        ];

        let trends = build_trends(&entries, TrendInterval::Day);

        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].period, "2024-03-01");
        assert_eq!(trends[0].total, 2);
        assert_eq!(trends[0].positive, 2);
        assert_eq!(trends[0].average_confidence, 0.7);
        assert_eq!(trends[1].period, "2024-03-02");
        assert_eq!(trends[1].negative, 1);
    }

    #[test]
    fn weekly_trends_start_on_monday() {
        // 2024-03-04 is a Monday, 2024-03-10 the following Sunday.
        let entries = vec![
            entry("positive", 0.9, 2024, 3, 4),
            entry("negative", 0.9, 2024, 3, 10),
            entry("negative", 0.9, 2024, 3, 11),
        ];

        let trends = build_trends(&entries, TrendInterval::Week);

        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].period, "2024-W10");
        assert_eq!(trends[0].period_start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(trends[0].total, 2);
        assert_eq!(trends[1].period, "2024-W11");
    }

    #[test]
    fn monthly_trends_group_by_calendar_month() {
        let entries = vec![
            entry("positive", 0.9, 2024, 1, 31),
            entry("positive", 0.9, 2024, 2, 1),
            entry("negative", 0.9, 2024, 2, 29),
        ];

        let trends = build_trends(&entries, TrendInterval::Month);

        assert_eq!(
            trends.iter().map(|t| t.period.as_str()).collect::<Vec<_>>(),
            vec!["2024-01", "2024-02"]
        );
        assert_eq!(trends[1].total, 2);
    }
}
