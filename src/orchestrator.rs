use futures::future::join_all;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast;
use tracing::{info, warn};

use ai_visibility::analysis::ResponseEvaluator;
use ai_visibility::config::VisibilityConfig;
use ai_visibility::content::ContentSource;
use ai_visibility::diagnostics::TracingObserver;
use ai_visibility::prompts::{brand_category_keywords, fallback_keywords, fallback_prompts};
use ai_visibility::{aggregate_metrics_observed, BrandMetrics, ResponseRecord};

use crate::llm::QueryEngine;

#[derive(Clone, Serialize)]
pub struct StreamEvent {
    pub event: String,
    pub message: String,
    pub timestamp_ms: u128,
}

pub type ProgressSender = broadcast::Sender<StreamEvent>;

pub fn send_event(sender: Option<&ProgressSender>, event: &str, message: impl Into<String>) {
    if let Some(sender) = sender {
        let _ = sender.send(StreamEvent {
            event: event.to_string(),
            message: message.into(),
            timestamp_ms: now_ms(),
        });
    }
}

pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct AnalysisPlan {
    pub brand: String,
    pub prompts: Vec<String>,
    pub platforms: Vec<String>,
    pub runs: usize,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub records: Vec<ResponseRecord>,
    pub metrics: BrandMetrics,
}

/// Queries every (prompt, platform) pair concurrently and aggregates the
/// resulting records. A pair whose runs all fail still yields a no-data
/// record.
pub async fn run_analysis(
    engine: &QueryEngine,
    evaluator: &ResponseEvaluator,
    plan: &AnalysisPlan,
    progress: Option<&ProgressSender>,
) -> AnalysisReport {
    send_event(
        progress,
        "start",
        format!(
            "Querying {} prompts on {} platforms ({} runs each)",
            plan.prompts.len(),
            plan.platforms.len(),
            plan.runs
        ),
    );

    let tasks = plan.prompts.iter().flat_map(move |prompt| {
        plan.platforms.iter().map(move |platform| async move {
            send_event(progress, "query", format!("{}: {}", platform, prompt));
            let answers = engine.query(prompt, platform, plan.runs).await;
            if answers.len() < plan.runs {
                warn!(
                    platform = platform.as_str(),
                    completed = answers.len(),
                    requested = plan.runs,
                    "partial query results"
                );
            }
            let record =
                evaluator.evaluate(prompt, &plan.brand, &display_platform(platform), &answers);
            info!(
                platform = record.platform.as_str(),
                score = record.visibility_score,
                mentioned = record.brand_mentioned,
                position = ?record.position,
                "response evaluated"
            );
            send_event(
                progress,
                "evaluated",
                format!("{}: score {:.1}", record.platform, record.visibility_score),
            );
            record
        })
    });

    let records: Vec<ResponseRecord> = join_all(tasks).await;

    send_event(progress, "aggregate", "Aggregating visibility metrics");
    let metrics = aggregate_metrics_observed(&plan.brand, &records, &TracingObserver);
    send_event(progress, "done", "Analysis complete");

    AnalysisReport { records, metrics }
}

/// Keywords for a brand: model extraction from the page, else word
/// frequency, else a category guess from the brand name.
pub async fn prepare_keywords(
    engine: Option<&QueryEngine>,
    content: &ContentSource,
    brand: &str,
    domain: &str,
    count: usize,
) -> Vec<String> {
    let text = match content.fetch(domain).await {
        Ok(text) => text,
        Err(err) => {
            warn!(domain, error = %err, "content fetch failed, using brand keywords");
            return brand_category_keywords(brand);
        }
    };

    if let Some(engine) = engine {
        match engine.extract_keywords(&text, brand, count).await {
            Ok(keywords) if !keywords.is_empty() => return keywords,
            Ok(_) => warn!(brand, "keyword extraction returned nothing"),
            Err(err) => warn!(brand, error = %err, "keyword extraction failed"),
        }
    }

    let keywords = fallback_keywords(&text, brand, count);
    if keywords.is_empty() {
        return brand_category_keywords(brand);
    }
    keywords
}

/// One generated prompt per keyword, capped at `max_prompts`.
pub async fn prepare_prompts(
    engine: &QueryEngine,
    brand: &str,
    keywords: &[String],
    config: &VisibilityConfig,
) -> Vec<String> {
    let mut prompts = Vec::new();
    for keyword in keywords.iter().take(config.analysis.max_keywords) {
        match engine.generate_prompts(brand, keyword, 1).await {
            Ok(generated) if !generated.is_empty() => prompts.extend(generated),
            Ok(_) => prompts.extend(fallback_prompts(keyword)),
            Err(err) => {
                warn!(keyword = keyword.as_str(), error = %err, "prompt generation failed");
                prompts.extend(fallback_prompts(keyword));
            }
        }
    }
    prompts.truncate(config.analysis.max_prompts);
    prompts
}

/// "chatgpt" -> "Chatgpt"
pub fn display_platform(platform: &str) -> String {
    let lower = platform.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Unknown".to_string(),
    }
}
