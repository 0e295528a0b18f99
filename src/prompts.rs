use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static KEYWORD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-z]{3,15}\b").expect("keyword token pattern"));

const STOP_WORDS: [&str; 13] = [
    "the", "and", "for", "with", "this", "that", "from", "have", "been", "will", "are", "our",
    "your",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptIntent {
    Comparison,
    Review,
    BrandSpecific,
    Category,
    Informational,
}

impl PromptIntent {
    pub fn label(self) -> &'static str {
        match self {
            PromptIntent::Comparison => "comparison",
            PromptIntent::Review => "review",
            PromptIntent::BrandSpecific => "brand-specific",
            PromptIntent::Category => "category",
            PromptIntent::Informational => "informational",
        }
    }
}

pub fn classify_intent(prompt: &str, brand: &str) -> PromptIntent {
    let prompt_lower = prompt.to_lowercase();
    let brand_lower = brand.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|word| prompt_lower.contains(word));

    if !brand_lower.is_empty() && prompt_lower.contains(&brand_lower) {
        if has_any(&["vs", "versus", "compare"]) {
            PromptIntent::Comparison
        } else if has_any(&["review", "rating"]) {
            PromptIntent::Review
        } else {
            PromptIntent::BrandSpecific
        }
    } else if has_any(&["best", "top", "leading"]) {
        PromptIntent::Category
    } else {
        PromptIntent::Informational
    }
}

/// Most frequent page words, excluding stop words and fragments of the brand.
/// Ties keep first-appearance order.
pub fn fallback_keywords(text: &str, brand: &str, top_n: usize) -> Vec<String> {
    let lowercase = text.to_lowercase();
    let brand_lower = brand.to_lowercase();

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (order, token) in KEYWORD_TOKEN.find_iter(&lowercase).enumerate() {
        let word = token.as_str();
        if STOP_WORDS.contains(&word) || brand_lower.contains(word) {
            continue;
        }
        counts.entry(word).or_insert((0, order)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, _, _)| word.to_string())
        .collect()
}

/// Keyword set guessed from the brand name alone.
pub fn brand_category_keywords(brand: &str) -> Vec<String> {
    let brand_lower = brand.to_lowercase();
    let matches = |words: &[&str]| words.iter().any(|word| brand_lower.contains(word));

    let keywords: [&str; 5] = if matches(&["pay", "payment", "stripe"]) {
        [
            "Payments",
            "Billing",
            "Financial services",
            "E-commerce",
            "Online transactions",
        ]
    } else if matches(&["tech", "software", "app"]) {
        [
            "Software",
            "Technology",
            "Applications",
            "Digital solutions",
            "Platform",
        ]
    } else if matches(&["university", "education", "school"]) {
        [
            "Education",
            "Learning",
            "Academic services",
            "Student platform",
            "Online learning",
        ]
    } else if matches(&["bank", "finance", "money"]) {
        [
            "Banking",
            "Financial services",
            "Money management",
            "Investment",
            "Fintech",
        ]
    } else {
        [
            "Business solutions",
            "Technology services",
            "Digital platform",
            "Enterprise software",
            "Online services",
        ]
    };

    keywords.iter().map(|keyword| keyword.to_string()).collect()
}

pub fn fallback_prompts(keyword: &str) -> Vec<String> {
    vec![
        format!("Top {} tools", keyword),
        format!("Best {} platforms", keyword),
    ]
}

/// Reads a JSON string array out of model output that may be wrapped in
/// code fences or prose.
pub fn parse_string_list(content: &str) -> Option<Vec<String>> {
    let mut body = content.trim().to_string();
    if body.starts_with("```") {
        body = body.replace("```json", "").replace("```", "").trim().to_string();
    }
    if !body.starts_with('[') {
        let start = body.find('[')?;
        let end = body.rfind(']')?;
        if start >= end {
            return None;
        }
        body = body[start..=end].to_string();
    }

    let values: Vec<String> = serde_json::from_str(&body).ok()?;
    Some(
        values
            .into_iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect(),
    )
}
