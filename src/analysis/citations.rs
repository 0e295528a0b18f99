use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)https?://\S+").expect("url pattern"),
        Regex::new(r"(?i)www\.\S+").expect("www pattern"),
        Regex::new(r"(?i)\[.*?\]\(https?://[^)]+\)").expect("markdown link pattern"),
    ]
});

static MARKER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\[Source:\s*[^\]]+\]").expect("bracket source pattern"),
        Regex::new(r"\[[0-9]+\]").expect("numeric marker pattern"),
        Regex::new(r"(?i)\(Source: [^)]+\)").expect("paren source pattern"),
    ]
});

/// Link and citation-marker occurrences. Pattern classes overlap and are
/// counted independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationCounts {
    pub urls: usize,
    pub markers: usize,
}

impl CitationCounts {
    pub fn total(&self) -> usize {
        self.urls + self.markers
    }
}

pub fn citation_breakdown(text: &str) -> CitationCounts {
    CitationCounts {
        urls: count_matches(&URL_PATTERNS, text),
        markers: count_matches(&MARKER_PATTERNS, text),
    }
}

pub fn count_citations(text: &str) -> usize {
    citation_breakdown(text).total()
}

fn count_matches(patterns: &[Regex], text: &str) -> usize {
    patterns
        .iter()
        .map(|pattern| pattern.find_iter(text).count())
        .sum()
}
