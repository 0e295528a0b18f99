use std::cmp::Ordering;

use crate::Sentiment;

pub const POSITIVE_TERMS: [&str; 11] = [
    "best",
    "great",
    "excellent",
    "leading",
    "top",
    "innovative",
    "reliable",
    "trusted",
    "popular",
    "recommended",
    "preferred",
];

pub const NEGATIVE_TERMS: [&str; 9] = [
    "poor",
    "bad",
    "worst",
    "lacking",
    "limited",
    "disappointing",
    "inferior",
    "weak",
    "problematic",
];

const SENTENCE_BREAKS: &[char] = &['.', '!', '?'];

/// Lexicon vote over the sentences that mention the brand. Ties are neutral.
pub fn classify_sentiment(text: &str, brand: &str) -> Sentiment {
    if brand.is_empty() {
        return Sentiment::Neutral;
    }

    let segments = brand_segments(text, brand);
    if segments.is_empty() {
        return Sentiment::Neutral;
    }

    let positive = lexicon_hits(&segments, &POSITIVE_TERMS);
    let negative = lexicon_hits(&segments, &NEGATIVE_TERMS);

    match positive.cmp(&negative) {
        Ordering::Greater => Sentiment::Positive,
        Ordering::Less => Sentiment::Negative,
        Ordering::Equal => Sentiment::Neutral,
    }
}

/// Lower-cased sentence segments containing the brand. Punctuation inside a
/// brand occurrence ("Yahoo!", "Booking.com") does not end a sentence.
pub fn brand_segments(text: &str, brand: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let brand_lower = brand.to_lowercase();
    if brand_lower.is_empty() {
        return Vec::new();
    }

    let occurrences: Vec<(usize, usize)> = lower
        .match_indices(brand_lower.as_str())
        .map(|(start, found)| (start, start + found.len()))
        .collect();
    let inside_brand =
        |index: usize| occurrences.iter().any(|&(start, end)| index >= start && index < end);

    let mut segments = Vec::new();
    let mut segment_start = 0;
    for (index, ch) in lower.char_indices() {
        if SENTENCE_BREAKS.contains(&ch) && !inside_brand(index) {
            segments.push(&lower[segment_start..index]);
            segment_start = index + ch.len_utf8();
        }
    }
    segments.push(&lower[segment_start..]);

    segments
        .into_iter()
        .filter(|segment| segment.contains(brand_lower.as_str()))
        .map(str::to_string)
        .collect()
}

fn lexicon_hits(segments: &[String], lexicon: &[&str]) -> usize {
    lexicon
        .iter()
        .filter(|term| segments.iter().any(|segment| segment.contains(*term)))
        .count()
}
