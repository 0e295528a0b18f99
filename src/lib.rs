pub mod analysis;
pub mod config;
pub mod content;
pub mod diagnostics;
pub mod error;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::analysis::{aggregate_observed, recommend, RecommendationInputs, ResponseEvaluator};
use crate::diagnostics::{DiagnosticObserver, NoopObserver};

pub use crate::analysis::{BrandMetrics, PlatformBreakdown, VisibilityTier};
pub use crate::error::{AnalysisError, ConfigError, FetchError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Whether a record was scored or stands in for a pair whose runs all failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Scored,
    NoData,
}

/// Verdict for one prompt on one platform, over all of its runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub record_id: String,
    pub platform: String,
    pub prompt: String,
    pub status: RecordStatus,
    pub brand_mentioned: bool,
    pub mention_count: usize,
    pub position: Option<usize>,
    pub sentiment: Sentiment,
    pub citation_count: usize,
    pub runs_completed: usize,
    pub visibility_score: f64,
    /// Truncated combined answer text.
    pub response: String,
    pub response_length: usize,
}

impl ResponseRecord {
    pub fn is_data_absent(&self) -> bool {
        self.status == RecordStatus::NoData
    }

    pub fn error(&self) -> Option<&'static str> {
        match self.status {
            RecordStatus::NoData => Some("All runs failed"),
            RecordStatus::Scored => None,
        }
    }
}

/// Loosely typed record as supplied by callers (JSON files, API bodies).
/// Convert with [`RecordInput::into_record`] to validate it. `citation_count`
/// and `runs_completed` are always required; a mentioned record also needs a
/// positive `mention_count` and a `sentiment`. An absent `status` means scored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordInput {
    pub record_id: Option<String>,
    pub platform: Option<String>,
    pub prompt: Option<String>,
    pub status: Option<RecordStatus>,
    pub brand_mentioned: Option<bool>,
    pub mention_count: Option<usize>,
    pub position: Option<usize>,
    pub sentiment: Option<Sentiment>,
    pub citation_count: Option<usize>,
    pub runs_completed: Option<usize>,
    pub visibility_score: Option<f64>,
    pub response: Option<String>,
    pub response_length: Option<usize>,
}

impl RecordInput {
    pub fn into_record(self, index: usize) -> Result<ResponseRecord, AnalysisError> {
        let platform = self
            .platform
            .filter(|platform| !platform.trim().is_empty())
            .ok_or_else(|| AnalysisError::missing_field(index, "platform"))?;
        let prompt = self
            .prompt
            .ok_or_else(|| AnalysisError::missing_field(index, "prompt"))?;
        let brand_mentioned = self
            .brand_mentioned
            .ok_or_else(|| AnalysisError::missing_field(index, "brand_mentioned"))?;
        let visibility_score = self
            .visibility_score
            .ok_or_else(|| AnalysisError::missing_field(index, "visibility_score"))?;

        if !visibility_score.is_finite() || !(0.0..=100.0).contains(&visibility_score) {
            return Err(AnalysisError::invalid(
                index,
                format!("visibility_score {} is outside 0-100", visibility_score),
            ));
        }
        if self.position == Some(0) {
            return Err(AnalysisError::invalid(index, "position must be positive"));
        }

        let citation_count = self
            .citation_count
            .ok_or_else(|| AnalysisError::missing_field(index, "citation_count"))?;
        let runs_completed = self
            .runs_completed
            .ok_or_else(|| AnalysisError::missing_field(index, "runs_completed"))?;
        let status = self.status.unwrap_or_default();

        let (mention_count, sentiment) = if brand_mentioned {
            let mention_count = self
                .mention_count
                .ok_or_else(|| AnalysisError::missing_field(index, "mention_count"))?;
            let sentiment = self
                .sentiment
                .ok_or_else(|| AnalysisError::missing_field(index, "sentiment"))?;
            if mention_count == 0 {
                return Err(AnalysisError::invalid(
                    index,
                    "mentioned record must have a positive mention_count",
                ));
            }
            if status == RecordStatus::NoData {
                return Err(AnalysisError::invalid(
                    index,
                    "no_data record cannot carry a brand mention",
                ));
            }
            (mention_count, sentiment)
        } else {
            let mention_count = self.mention_count.unwrap_or(0);
            if mention_count > 0 || self.position.is_some() || visibility_score > 0.0 {
                return Err(AnalysisError::invalid(
                    index,
                    "record without a brand mention carries mention data",
                ));
            }
            (0, self.sentiment.unwrap_or_default())
        };

        if status == RecordStatus::NoData && runs_completed > 0 {
            return Err(AnalysisError::invalid(
                index,
                "no_data record cannot report completed runs",
            ));
        }

        let response = self.response.unwrap_or_default();
        Ok(ResponseRecord {
            record_id: self
                .record_id
                .unwrap_or_else(|| record_id(&platform, &prompt)),
            status,
            brand_mentioned,
            mention_count,
            position: self.position,
            sentiment,
            citation_count,
            runs_completed,
            visibility_score,
            response_length: self
                .response_length
                .unwrap_or_else(|| response.chars().count()),
            response,
            platform,
            prompt,
        })
    }
}

/// Scores one prompt's raw answers on one platform. Empty `raw_answers`
/// yields a [`RecordStatus::NoData`] record.
pub fn evaluate_response(
    prompt: &str,
    brand: &str,
    platform: &str,
    raw_answers: &[String],
) -> ResponseRecord {
    ResponseEvaluator::default().evaluate(prompt, brand, platform, raw_answers)
}

pub fn aggregate_metrics(brand: &str, records: &[ResponseRecord]) -> BrandMetrics {
    aggregate_observed(brand, records, &NoopObserver)
}

pub fn aggregate_metrics_observed(
    brand: &str,
    records: &[ResponseRecord],
    observer: &dyn DiagnosticObserver,
) -> BrandMetrics {
    aggregate_observed(brand, records, observer)
}

/// Validates caller-supplied records, failing on the first malformed one,
/// then aggregates them.
pub fn aggregate_record_inputs(
    brand: &str,
    inputs: Vec<RecordInput>,
    observer: &dyn DiagnosticObserver,
) -> Result<BrandMetrics, AnalysisError> {
    let records = inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| input.into_record(index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(aggregate_observed(brand, &records, observer))
}

pub fn generate_recommendations(metrics: &BrandMetrics) -> Vec<String> {
    recommend(&RecommendationInputs::from_metrics(metrics))
}

pub fn record_id(platform: &str, prompt: &str) -> String {
    let hash = stable_hash64(&format!("{}\n{}", platform, prompt));
    format!("rec_{:016x}", hash)
}

fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `value` is already a percentage (0-100).
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

pub fn format_position(position: Option<f64>) -> String {
    match position {
        Some(value) => format!("#{}", format_float(value, 1)),
        None => "unranked".to_string(),
    }
}
