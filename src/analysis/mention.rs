use regex::Regex;
use serde::{Deserialize, Serialize};

/// Presence, frequency and inferred list rank of a brand inside one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionSummary {
    pub mentioned: bool,
    pub count: usize,
    pub position: Option<usize>,
}

impl MentionSummary {
    pub fn absent() -> Self {
        Self {
            mentioned: false,
            count: 0,
            position: None,
        }
    }
}

/// Extracts a positive rank for `brand` from `text`, or nothing.
pub type PositionStrategy = fn(&str, &str) -> Option<usize>;

/// Tried in order; the first strategy returning a rank wins.
pub const POSITION_STRATEGIES: [(&str, PositionStrategy); 4] = [
    ("leading_number_line", leading_number_line),
    ("emphasized_number", emphasized_number),
    ("adjacent_number", adjacent_number),
    ("line_index", line_index),
];

pub fn detect_mention(text: &str, brand: &str) -> MentionSummary {
    if brand.is_empty() {
        return MentionSummary::absent();
    }

    let brand_lower = brand.to_lowercase();
    let count = text.to_lowercase().matches(brand_lower.as_str()).count();
    if count == 0 {
        return MentionSummary::absent();
    }

    MentionSummary {
        mentioned: true,
        count,
        position: infer_position(text, brand),
    }
}

pub fn infer_position(text: &str, brand: &str) -> Option<usize> {
    POSITION_STRATEGIES
        .iter()
        .find_map(|(_, strategy)| strategy(text, brand))
}

/// Name of the strategy that produced the rank, for display and debugging.
pub fn position_source(text: &str, brand: &str) -> Option<&'static str> {
    POSITION_STRATEGIES
        .iter()
        .find(|(_, strategy)| strategy(text, brand).is_some())
        .map(|(name, _)| *name)
}

/// `7. Brand` style lines: the first brand line that starts with digits.
pub fn leading_number_line(text: &str, brand: &str) -> Option<usize> {
    let brand_lower = brand.to_lowercase();
    text.split('\n')
        .map(str::trim)
        .filter(|line| line.to_lowercase().contains(&brand_lower))
        .find_map(leading_integer)
}

/// `**3. Brand**`
pub fn emphasized_number(text: &str, brand: &str) -> Option<usize> {
    let pattern = format!(r"(?i)\*\*([0-9]+)\.\s*{}\*\*", regex::escape(brand));
    first_capture(&pattern, text)
}

/// `3. Brand`, then `3 Brand`, then `3: Brand`.
pub fn adjacent_number(text: &str, brand: &str) -> Option<usize> {
    let escaped = regex::escape(brand);
    let patterns = [
        format!(r"(?i)([0-9]+)\.\s*{}", escaped),
        format!(r"(?i)([0-9]+)\s+{}", escaped),
        format!(r"(?i)([0-9]+):\s*{}", escaped),
    ];
    patterns
        .iter()
        .find_map(|pattern| first_capture(pattern, text))
}

/// 1-based index of the first line mentioning the brand.
pub fn line_index(text: &str, brand: &str) -> Option<usize> {
    let brand_lower = brand.to_lowercase();
    text.split('\n')
        .position(|line| line.to_lowercase().contains(&brand_lower))
        .map(|index| index + 1)
}

fn leading_integer(line: &str) -> Option<usize> {
    let end = line
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(line.len());
    positive(&line[..end])
}

fn first_capture(pattern: &str, text: &str) -> Option<usize> {
    let regex = Regex::new(pattern).ok()?;
    let captures = regex.captures(text)?;
    positive(captures.get(1)?.as_str())
}

/// Rank from a run of ASCII digits. Overlong runs saturate at `usize::MAX`.
/// 0 is not a rank, so the caller falls through to the next strategy.
fn positive(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let value = digits.bytes().fold(0usize, |rank, byte| {
        rank.saturating_mul(10)
            .saturating_add(usize::from(byte - b'0'))
    });
    (value > 0).then_some(value)
}
