pub mod citations;
pub mod evaluator;
pub mod mention;
pub mod metrics;
pub mod recommendations;
pub mod score;
pub mod sentiment;

pub use citations::{citation_breakdown, count_citations, CitationCounts};
pub use evaluator::{ResponseEvaluator, DEFAULT_PREVIEW_CHARS};
pub use mention::{detect_mention, infer_position, MentionSummary, POSITION_STRATEGIES};
pub use metrics::{
    aggregate, aggregate_observed, BrandMetrics, PlatformBreakdown, PositionDistribution,
    ScoreBreakdown, SentimentDistribution,
};
pub use recommendations::{recommend, RecommendationInputs, VisibilityTier};
pub use score::{visibility_score, ScoreComponents, ScoreInputs};
pub use sentiment::classify_sentiment;
