use serde::{Deserialize, Serialize};

use crate::Sentiment;

pub const PRESENCE_POINTS: f64 = 15.0;
pub const MENTION_POINTS_PER_OCCURRENCE: f64 = 3.0;
pub const MENTION_POINTS_CAP: f64 = 15.0;
pub const CITATION_POINTS_PER_LINK: f64 = 1.5;
pub const CITATION_POINTS_CAP: f64 = 8.0;
pub const POSITIVE_SENTIMENT_POINTS: f64 = 8.0;
pub const NEGATIVE_SENTIMENT_POINTS: f64 = -4.0;
pub const RELIABILITY_POINTS_PER_RUN: f64 = 1.0;
pub const RELIABILITY_POINTS_CAP: f64 = 4.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub mentioned: bool,
    pub position: Option<usize>,
    pub mention_count: usize,
    pub citation_count: usize,
    pub sentiment: Sentiment,
    pub runs_completed: usize,
}

/// Individual terms of the visibility formula, before clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub presence: f64,
    pub position: f64,
    pub mentions: f64,
    pub citations: f64,
    pub sentiment: f64,
    pub reliability: f64,
}

impl ScoreComponents {
    pub fn from_inputs(inputs: &ScoreInputs) -> Self {
        if !inputs.mentioned {
            return Self::default();
        }

        Self {
            presence: PRESENCE_POINTS,
            position: position_points(inputs.position),
            mentions: (inputs.mention_count as f64 * MENTION_POINTS_PER_OCCURRENCE)
                .min(MENTION_POINTS_CAP),
            citations: (inputs.citation_count as f64 * CITATION_POINTS_PER_LINK)
                .min(CITATION_POINTS_CAP),
            sentiment: sentiment_points(inputs.sentiment),
            reliability: (inputs.runs_completed as f64 * RELIABILITY_POINTS_PER_RUN)
                .min(RELIABILITY_POINTS_CAP),
        }
    }

    pub fn total(&self) -> f64 {
        let sum = self.presence
            + self.position
            + self.mentions
            + self.citations
            + self.sentiment
            + self.reliability;
        sum.max(0.0).min(MAX_SCORE)
    }
}

pub fn visibility_score(inputs: &ScoreInputs) -> f64 {
    if !inputs.mentioned {
        return 0.0;
    }
    ScoreComponents::from_inputs(inputs).total()
}

pub fn position_points(position: Option<usize>) -> f64 {
    match position {
        None => 0.0,
        Some(rank) if rank <= 3 => 50.0,
        Some(rank) if rank <= 5 => 40.0,
        Some(rank) if rank <= 10 => 30.0,
        Some(rank) if rank <= 20 => 20.0,
        Some(_) => 10.0,
    }
}

pub fn sentiment_points(sentiment: Sentiment) -> f64 {
    match sentiment {
        Sentiment::Positive => POSITIVE_SENTIMENT_POINTS,
        Sentiment::Negative => NEGATIVE_SENTIMENT_POINTS,
        Sentiment::Neutral => 0.0,
    }
}
