use serde::{Deserialize, Serialize};

use ai_visibility::prompts::{classify_intent, PromptIntent};
use ai_visibility::{BrandMetrics, RecordInput, ResponseRecord};

#[derive(Debug, Deserialize)]
pub struct ApiEvaluateRequest {
    pub brand_name: Option<String>,
    pub prompt: Option<String>,
    pub platform: Option<String>,
    #[serde(default)]
    pub answers: Vec<String>,
}

impl ApiEvaluateRequest {
    pub fn validate(self) -> Result<(String, String, String, Vec<String>), String> {
        let brand = required_text(self.brand_name, "brand_name")?;
        let prompt = required_text(self.prompt, "prompt")?;
        let platform = required_text(self.platform, "platform")?;
        Ok((brand, prompt, platform, self.answers))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiRecordResponse {
    #[serde(flatten)]
    pub record: ResponseRecord,
    pub error: Option<&'static str>,
}

impl ApiRecordResponse {
    pub fn from_record(record: ResponseRecord) -> Self {
        Self {
            error: record.error(),
            record,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiMetricsRequest {
    pub brand_name: Option<String>,
    #[serde(default)]
    pub records: Vec<RecordInput>,
}

#[derive(Debug, Serialize)]
pub struct ApiMetricsResponse {
    #[serde(flatten)]
    pub metrics: BrandMetrics,
    pub warnings: Vec<String>,
}

impl ApiMetricsResponse {
    /// Rounds every metric to two decimals for the wire.
    pub fn from_metrics(metrics: &BrandMetrics, mut warnings: Vec<String>) -> Self {
        if metrics.no_data_records > 0 {
            warnings.push(format!(
                "{} of {} queries returned no data",
                metrics.no_data_records, metrics.total_prompts
            ));
        }
        Self {
            metrics: metrics.rounded(),
            warnings,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiCustomPromptsRequest {
    pub brand_name: Option<String>,
    #[serde(default)]
    pub custom_prompts: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiPromptItem {
    pub keyword: String,
    pub prompt: String,
    pub intent_type: PromptIntent,
}

#[derive(Debug, Serialize)]
pub struct ApiPromptsResponse {
    pub brand_name: String,
    pub prompts: Vec<ApiPromptItem>,
    pub total_prompts: usize,
}

impl ApiPromptsResponse {
    pub fn from_custom(request: ApiCustomPromptsRequest) -> Result<Self, String> {
        let brand_name = required_text(request.brand_name, "brand_name")?;
        let prompts: Vec<ApiPromptItem> = request
            .custom_prompts
            .into_iter()
            .map(|prompt| prompt.trim().to_string())
            .filter(|prompt| !prompt.is_empty())
            .map(|prompt| ApiPromptItem {
                keyword: "custom".to_string(),
                intent_type: classify_intent(&prompt, &brand_name),
                prompt,
            })
            .collect();
        Ok(Self {
            total_prompts: prompts.len(),
            brand_name,
            prompts,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiKeywordsRequest {
    pub brand_name: Option<String>,
    pub domain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiKeywordsResponse {
    pub brand_name: String,
    pub domain: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiAnalyzeRequest {
    pub brand_name: Option<String>,
    pub request_id: Option<String>,
    pub domain: Option<String>,
    #[serde(default)]
    pub prompts: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub runs: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ApiAnalyzeResponse {
    pub request_id: String,
    pub metrics: ApiMetricsResponse,
    pub results: Vec<ApiRecordResponse>,
}

pub fn required_text(value: Option<String>, field: &str) -> Result<String, String> {
    let text = value.unwrap_or_default().trim().to_string();
    if text.is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(text)
}
