use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analysis::recommendations::{recommend, RecommendationInputs};
use crate::diagnostics::{DiagnosticEvent, DiagnosticObserver};
use crate::{round2, RecordStatus, ResponseRecord, Sentiment};

/// Mutually exclusive rank buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionDistribution {
    pub top_3: usize,
    pub top_10: usize,
    pub beyond_10: usize,
}

impl PositionDistribution {
    pub fn from_positions(positions: &[usize]) -> Self {
        let mut distribution = Self::default();
        for &position in positions {
            if position <= 3 {
                distribution.top_3 += 1;
            } else if position <= 10 {
                distribution.top_10 += 1;
            } else {
                distribution.beyond_10 += 1;
            }
        }
        distribution
    }

    pub fn total(&self) -> usize {
        self.top_3 + self.top_10 + self.beyond_10
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn from_labels(labels: impl IntoIterator<Item = Sentiment>) -> Self {
        let mut distribution = Self::default();
        for label in labels {
            match label {
                Sentiment::Positive => distribution.positive += 1,
                Sentiment::Negative => distribution.negative += 1,
                Sentiment::Neutral => distribution.neutral += 1,
            }
        }
        distribution
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Net positive share in [-1, 1]; 0 when nothing was labelled.
    pub fn score(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.positive as f64 - self.negative as f64) / total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformBreakdown {
    pub total_queries: usize,
    pub mentions: usize,
    pub visibility_rate: f64,
    pub mention_count: usize,
    pub citation_count: usize,
    pub avg_position: Option<f64>,
    pub avg_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Ascending, so the breakdown does not depend on record order.
    pub individual_scores: Vec<f64>,
    pub min_score: f64,
    pub max_score: f64,
    pub score_variance: f64,
}

impl ScoreBreakdown {
    pub fn from_sorted(scores: Vec<f64>) -> Self {
        Self {
            min_score: scores.first().copied().unwrap_or(0.0),
            max_score: scores.last().copied().unwrap_or(0.0),
            score_variance: population_variance(&scores),
            individual_scores: scores,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandMetrics {
    pub brand_name: String,
    pub total_prompts: usize,
    pub mentions: usize,
    pub no_data_records: usize,
    pub visibility_percentage: f64,
    pub total_mention_count: usize,
    pub total_citation_count: usize,
    pub sentiment_score: f64,
    pub sentiment_distribution: SentimentDistribution,
    pub average_position: Option<f64>,
    pub position_distribution: PositionDistribution,
    pub platform_breakdown: BTreeMap<String, PlatformBreakdown>,
    pub score_breakdown: ScoreBreakdown,
    pub recommendations: Vec<String>,
}

impl BrandMetrics {
    /// Copy with every float rounded to two decimals, for presentation.
    pub fn rounded(&self) -> Self {
        let mut metrics = self.clone();
        metrics.visibility_percentage = round2(metrics.visibility_percentage);
        metrics.sentiment_score = round2(metrics.sentiment_score);
        metrics.average_position = metrics.average_position.map(round2);
        for breakdown in metrics.platform_breakdown.values_mut() {
            breakdown.visibility_rate = round2(breakdown.visibility_rate);
            breakdown.avg_position = breakdown.avg_position.map(round2);
            breakdown.avg_score = round2(breakdown.avg_score);
        }
        let scores = &mut metrics.score_breakdown;
        scores.individual_scores = scores.individual_scores.iter().map(|s| round2(*s)).collect();
        scores.min_score = round2(scores.min_score);
        scores.max_score = round2(scores.max_score);
        scores.score_variance = round2(scores.score_variance);
        metrics
    }
}

pub fn aggregate(brand: &str, records: &[ResponseRecord]) -> BrandMetrics {
    let scores = sorted_scores(records.iter());
    let overall_score = mean(&scores);

    let positions: Vec<usize> = records.iter().filter_map(|record| record.position).collect();
    let sentiment_distribution = SentimentDistribution::from_labels(
        records
            .iter()
            .filter(|record| record.brand_mentioned)
            .map(|record| record.sentiment),
    );
    let sentiment_score = sentiment_distribution.score();
    let platform_breakdown = platform_breakdown(records);

    let total_mention_count = records.iter().map(|record| record.mention_count).sum();
    let total_citation_count = records.iter().map(|record| record.citation_count).sum();

    let recommendations = recommend(&RecommendationInputs {
        overall_score,
        sentiment_score,
        platform_breakdown: &platform_breakdown,
        total_mentions: total_mention_count,
        total_citations: total_citation_count,
    });

    BrandMetrics {
        brand_name: brand.to_string(),
        total_prompts: records.len(),
        mentions: records.iter().filter(|record| record.brand_mentioned).count(),
        no_data_records: records
            .iter()
            .filter(|record| record.status == RecordStatus::NoData)
            .count(),
        visibility_percentage: overall_score,
        total_mention_count,
        total_citation_count,
        sentiment_score,
        sentiment_distribution,
        average_position: mean_position(&positions),
        position_distribution: PositionDistribution::from_positions(&positions),
        platform_breakdown,
        score_breakdown: ScoreBreakdown::from_sorted(scores),
        recommendations,
    }
}

/// Same as [`aggregate`], reporting progress to `observer` before and after
/// the computation.
pub fn aggregate_observed(
    brand: &str,
    records: &[ResponseRecord],
    observer: &dyn DiagnosticObserver,
) -> BrandMetrics {
    observer.observe(&DiagnosticEvent::AggregationStarted {
        brand,
        records: records.len(),
    });

    let metrics = aggregate(brand, records);

    for (platform, summary) in &metrics.platform_breakdown {
        observer.observe(&DiagnosticEvent::PlatformSummarized { platform, summary });
    }
    observer.observe(&DiagnosticEvent::AggregationFinished {
        brand,
        overall_score: metrics.visibility_percentage,
        mentions: metrics.mentions,
        no_data_records: metrics.no_data_records,
    });

    metrics
}

pub fn platform_breakdown(records: &[ResponseRecord]) -> BTreeMap<String, PlatformBreakdown> {
    let mut groups: BTreeMap<&str, Vec<&ResponseRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.platform.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(platform, group)| {
            let total_queries = group.len();
            let mentions = group.iter().filter(|record| record.brand_mentioned).count();
            let positions: Vec<usize> = group.iter().filter_map(|record| record.position).collect();
            let scores = sorted_scores(group.iter().copied());

            let breakdown = PlatformBreakdown {
                total_queries,
                mentions,
                visibility_rate: mentions as f64 / total_queries as f64 * 100.0,
                mention_count: group.iter().map(|record| record.mention_count).sum(),
                citation_count: group.iter().map(|record| record.citation_count).sum(),
                avg_position: mean_position(&positions),
                avg_score: mean(&scores),
            };
            (platform.to_string(), breakdown)
        })
        .collect()
}

fn sorted_scores<'a>(records: impl Iterator<Item = &'a ResponseRecord>) -> Vec<f64> {
    let mut scores: Vec<f64> = records.map(|record| record.visibility_score).collect();
    scores.sort_by(|a, b| a.total_cmp(b));
    scores
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mean_position(positions: &[usize]) -> Option<f64> {
    if positions.is_empty() {
        return None;
    }
    let mut ranks: Vec<f64> = positions.iter().map(|&position| position as f64).collect();
    ranks.sort_by(|a, b| a.total_cmp(b));
    Some(mean(&ranks))
}

fn population_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let center = mean(values);
    values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>()
        / values.len() as f64
}
