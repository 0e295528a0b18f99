use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

use ai_visibility::config::QueryEngineConfig;
use ai_visibility::prompts::parse_string_list;

/// OpenAI-compatible chat client used as the query engine.
#[derive(Clone)]
pub struct QueryEngine {
    client: reqwest::Client,
    api_key: String,
    config: QueryEngineConfig,
}

impl QueryEngine {
    pub fn from_env(config: &QueryEngineConfig) -> Option<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .ok()?;
        Some(Self {
            client,
            api_key,
            config: config.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Asks the same prompt `runs` times. Runs that keep failing after the
    /// configured retries are dropped, so the result may be shorter than
    /// `runs` or empty.
    pub async fn query(&self, prompt: &str, platform: &str, runs: usize) -> Vec<String> {
        let messages = vec![
            ChatMessage::new("system", list_system_prompt(platform)),
            ChatMessage::new("user", format!("List the top brands for: {}", prompt)),
        ];

        let mut answers = Vec::with_capacity(runs);
        for run in 1..=runs {
            match self
                .complete_with_retries(&messages, self.config.temperature, self.config.max_tokens)
                .await
            {
                Ok(answer) => answers.push(answer),
                Err(err) => warn!(platform, run, error = %err, "query run failed"),
            }
        }
        answers
    }

    pub async fn extract_keywords(
        &self,
        text: &str,
        brand: &str,
        count: usize,
    ) -> Result<Vec<String>, String> {
        let excerpt: String = text.chars().take(2_000).collect();
        let prompt = format!(
            "Extract {count} core keywords from this text about {brand}.\n\n\
             Focus on:\n- Main products/services\n- Key features\n- Industry terms\n- Brand attributes\n\n\
             Text: {excerpt}\n\n\
             Return ONLY JSON array: [\"keyword1\", \"keyword2\", \"keyword3\"]"
        );
        let content = self
            .complete_with_retries(&[ChatMessage::new("user", prompt)], 0.7, 200)
            .await?;
        let mut keywords =
            parse_string_list(&content).ok_or_else(|| "keyword response missing JSON array".to_string())?;
        keywords.truncate(count);
        Ok(keywords)
    }

    pub async fn generate_prompts(
        &self,
        brand: &str,
        keyword: &str,
        count: usize,
    ) -> Result<Vec<String>, String> {
        let prompt = format!(
            "Generate {count} detailed search queries about \"{keyword}\" that would return comprehensive lists of brand names.\n\n\
             CRITICAL: DO NOT mention \"{brand}\". Focus on queries that return detailed brand lists.\n\n\
             Make queries specific and longer, such as:\n\
             - \"What are the top {keyword} companies and platforms?\"\n\
             - \"Best {keyword} brands for enterprise businesses\"\n\
             - \"Leading {keyword} providers with advanced features\"\n\n\
             Return ONLY JSON array: [\"query1\", \"query2\", \"query3\"]"
        );
        let content = self
            .complete_with_retries(&[ChatMessage::new("user", prompt)], 0.7, 200)
            .await?;
        parse_string_list(&content).ok_or_else(|| "prompt response missing JSON array".to_string())
    }

    async fn complete_with_retries(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, String> {
        let attempts = self.config.max_retries + 1;
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            match self.complete(messages, temperature, max_tokens).await {
                Ok(content) => return Ok(content),
                Err(err) => {
                    debug!(attempt, error = %err, "chat completion attempt failed");
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, String> {
        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| format!("chat request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("chat API error: {}", status));
            }
            return Err(format!("chat API error: {} {}", status, detail));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| format!("chat response parse failed: {}", err))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();
        let content = content.trim();
        if content.is_empty() {
            return Err("chat response was empty".to_string());
        }
        Ok(content.to_string())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn new(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content,
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: String,
}

fn list_system_prompt(platform: &str) -> String {
    let mut prompt = r#"You are a helpful assistant that provides ONLY numbered lists of brand names.

CRITICAL RULES:
1. Return ONLY a numbered list (1. BrandName, 2. BrandName, etc.)
2. NO introductory text, NO explanations, NO conclusions
3. NO bold formatting, NO markdown, NO extra characters
4. Each line must start with a number followed by a period and space
5. Brand names only - no descriptions or additional text

Example format:
1. BrandOne
2. BrandTwo
3. BrandThree"#
        .to_string();
    if platform.eq_ignore_ascii_case("perplexity") {
        prompt.push_str("\n6. Include sources and citations when possible.");
    }
    prompt
}
