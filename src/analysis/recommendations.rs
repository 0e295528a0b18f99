use std::collections::BTreeMap;

use crate::analysis::metrics::{BrandMetrics, PlatformBreakdown};

pub const IMPROVEMENT_THRESHOLD: f64 = 60.0;
pub const NEGATIVE_SENTIMENT_THRESHOLD: f64 = -0.2;
pub const POSITIVE_SENTIMENT_THRESHOLD: f64 = 0.3;
pub const WEAK_PLATFORM_SCORE: f64 = 40.0;
pub const STRONG_PLATFORM_SCORE: f64 = 80.0;

const IMPROVEMENT_STEPS: [&str; 3] = [
    "Create more brand-focused content and thought leadership.",
    "Build authoritative backlinks and citations.",
    "Optimize for AI search platforms with structured data.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityTier {
    Excellent,
    Good,
    Moderate,
    Low,
    Critical,
}

impl VisibilityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            VisibilityTier::Excellent
        } else if score >= 60.0 {
            VisibilityTier::Good
        } else if score >= 40.0 {
            VisibilityTier::Moderate
        } else if score >= 20.0 {
            VisibilityTier::Low
        } else {
            VisibilityTier::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VisibilityTier::Excellent => "Excellent",
            VisibilityTier::Good => "Good",
            VisibilityTier::Moderate => "Moderate",
            VisibilityTier::Low => "Low",
            VisibilityTier::Critical => "Critical",
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            VisibilityTier::Excellent => {
                "EXCELLENT visibility! You're dominating AI search results."
            }
            VisibilityTier::Good => "Good visibility! You're well-positioned in AI search.",
            VisibilityTier::Moderate => {
                "Moderate visibility. Focus on improving your AI presence."
            }
            VisibilityTier::Low => {
                "Low visibility. Urgent action needed to improve AI search presence."
            }
            VisibilityTier::Critical => {
                "CRITICAL: Very low visibility. Immediate strategy overhaul required."
            }
        }
    }
}

/// Everything the recommendation rules look at.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInputs<'a> {
    pub overall_score: f64,
    pub sentiment_score: f64,
    pub platform_breakdown: &'a BTreeMap<String, PlatformBreakdown>,
    pub total_mentions: usize,
    pub total_citations: usize,
}

impl<'a> RecommendationInputs<'a> {
    pub fn from_metrics(metrics: &'a BrandMetrics) -> Self {
        Self {
            overall_score: metrics.visibility_percentage,
            sentiment_score: metrics.sentiment_score,
            platform_breakdown: &metrics.platform_breakdown,
            total_mentions: metrics.total_mention_count,
            total_citations: metrics.total_citation_count,
        }
    }
}

pub fn recommend(inputs: &RecommendationInputs<'_>) -> Vec<String> {
    let mut recommendations = Vec::new();

    recommendations.push(
        VisibilityTier::from_score(inputs.overall_score)
            .headline()
            .to_string(),
    );

    if inputs.overall_score < IMPROVEMENT_THRESHOLD {
        recommendations.extend(IMPROVEMENT_STEPS.iter().map(|step| step.to_string()));
    }

    if inputs.sentiment_score < NEGATIVE_SENTIMENT_THRESHOLD {
        recommendations.push("Negative sentiment detected. Address customer concerns.".to_string());
    }
    if inputs.sentiment_score > POSITIVE_SENTIMENT_THRESHOLD {
        recommendations.push("Positive sentiment! Leverage this in marketing.".to_string());
    }

    for (platform, breakdown) in inputs.platform_breakdown {
        if breakdown.avg_score < WEAK_PLATFORM_SCORE {
            recommendations.push(format!(
                "Low performance on {} (Score: {:.1}). Optimize for this platform.",
                platform, breakdown.avg_score
            ));
        }
        if breakdown.avg_score > STRONG_PLATFORM_SCORE {
            recommendations.push(format!(
                "Strong performance on {} (Score: {:.1})! Use as competitive advantage.",
                platform, breakdown.avg_score
            ));
        }
    }

    recommendations
}
