use crate::analysis::citations::count_citations;
use crate::analysis::mention::detect_mention;
use crate::analysis::score::{visibility_score, ScoreInputs};
use crate::analysis::sentiment::classify_sentiment;
use crate::{record_id, RecordStatus, ResponseRecord, Sentiment};

pub const DEFAULT_PREVIEW_CHARS: usize = 500;
const PREVIEW_ELLIPSIS: &str = "...";

/// Turns the raw answers for one prompt on one platform into a record.
#[derive(Debug, Clone)]
pub struct ResponseEvaluator {
    preview_chars: usize,
}

impl Default for ResponseEvaluator {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl ResponseEvaluator {
    pub fn new(preview_chars: usize) -> Self {
        Self { preview_chars }
    }

    pub fn evaluate(
        &self,
        prompt: &str,
        brand: &str,
        platform: &str,
        raw_answers: &[String],
    ) -> ResponseRecord {
        if raw_answers.is_empty() {
            return no_data_record(prompt, platform);
        }

        let combined = raw_answers.join(" ");
        let runs_completed = raw_answers
            .iter()
            .filter(|answer| !answer.is_empty())
            .count();

        let mention = detect_mention(&combined, brand);
        let citation_count = count_citations(&combined);
        let sentiment = classify_sentiment(&combined, brand);
        let score = visibility_score(&ScoreInputs {
            mentioned: mention.mentioned,
            position: mention.position,
            mention_count: mention.count,
            citation_count,
            sentiment,
            runs_completed,
        });

        ResponseRecord {
            record_id: record_id(platform, prompt),
            platform: platform.to_string(),
            prompt: prompt.to_string(),
            status: RecordStatus::Scored,
            brand_mentioned: mention.mentioned,
            mention_count: mention.count,
            position: mention.position,
            sentiment,
            citation_count,
            runs_completed,
            visibility_score: score,
            response: preview(&combined, self.preview_chars),
            response_length: combined.chars().count(),
        }
    }
}

fn no_data_record(prompt: &str, platform: &str) -> ResponseRecord {
    ResponseRecord {
        record_id: record_id(platform, prompt),
        platform: platform.to_string(),
        prompt: prompt.to_string(),
        status: RecordStatus::NoData,
        brand_mentioned: false,
        mention_count: 0,
        position: None,
        sentiment: Sentiment::Neutral,
        citation_count: 0,
        runs_completed: 0,
        visibility_score: 0.0,
        response: String::new(),
        response_length: 0,
    }
}

pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], PREVIEW_ELLIPSIS),
        None => text.to_string(),
    }
}
