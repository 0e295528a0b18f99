use ai_visibility::analysis::score::position_points;
use ai_visibility::analysis::{visibility_score, ScoreComponents, ScoreInputs};
use ai_visibility::Sentiment;

fn inputs(position: Option<usize>) -> ScoreInputs {
    ScoreInputs {
        mentioned: true,
        position,
        mention_count: 1,
        citation_count: 0,
        sentiment: Sentiment::Neutral,
        runs_completed: 3,
    }
}

#[test]
fn single_mention_at_rank_four_scores_sixty_one() {
    // 15 presence + 40 rank + 3 mention + 0 + 0 + 3 runs
    let score = visibility_score(&inputs(Some(4)));
    assert!((score - 61.0).abs() < 1e-6);
}

#[test]
fn top_three_rank_earns_full_position_points() {
    let score = visibility_score(&inputs(Some(2)));
    assert!((score - 71.0).abs() < 1e-6);
}

#[test]
fn unmentioned_brand_scores_zero() {
    let score = visibility_score(&ScoreInputs {
        mentioned: false,
        position: Some(1),
        mention_count: 4,
        citation_count: 6,
        sentiment: Sentiment::Positive,
        runs_completed: 3,
    });
    assert_eq!(score, 0.0);
}

#[test]
fn position_bands_match_the_rank_table() {
    let cases = [
        (None, 0.0),
        (Some(1), 50.0),
        (Some(3), 50.0),
        (Some(4), 40.0),
        (Some(5), 40.0),
        (Some(6), 30.0),
        (Some(10), 30.0),
        (Some(11), 20.0),
        (Some(20), 20.0),
        (Some(21), 10.0),
        (Some(500), 10.0),
    ];
    for (position, expected) in cases {
        assert!(
            (position_points(position) - expected).abs() < 1e-6,
            "position {:?}",
            position
        );
    }
}

#[test]
fn capped_terms_stop_growing() {
    let components = ScoreComponents::from_inputs(&ScoreInputs {
        mentioned: true,
        position: None,
        mention_count: 10,
        citation_count: 10,
        sentiment: Sentiment::Neutral,
        runs_completed: 10,
    });

    assert!((components.mentions - 15.0).abs() < 1e-6);
    assert!((components.citations - 8.0).abs() < 1e-6);
    assert!((components.reliability - 4.0).abs() < 1e-6);
}

#[test]
fn citations_earn_partial_points_below_cap() {
    let components = ScoreComponents::from_inputs(&ScoreInputs {
        citation_count: 3,
        ..inputs(None)
    });
    assert!((components.citations - 4.5).abs() < 1e-6);
}

#[test]
fn negative_sentiment_subtracts_points() {
    let score = visibility_score(&ScoreInputs {
        mentioned: true,
        position: None,
        mention_count: 1,
        citation_count: 0,
        sentiment: Sentiment::Negative,
        runs_completed: 0,
    });
    assert!((score - 14.0).abs() < 1e-6);
}

#[test]
fn best_possible_answer_reaches_one_hundred() {
    let score = visibility_score(&ScoreInputs {
        mentioned: true,
        position: Some(1),
        mention_count: 10,
        citation_count: 10,
        sentiment: Sentiment::Positive,
        runs_completed: 10,
    });
    assert!((score - 100.0).abs() < 1e-6);
}

#[test]
fn components_sum_to_the_score() {
    let scored = ScoreInputs {
        mentioned: true,
        position: Some(7),
        mention_count: 2,
        citation_count: 1,
        sentiment: Sentiment::Positive,
        runs_completed: 2,
    };
    let components = ScoreComponents::from_inputs(&scored);

    assert!((components.total() - visibility_score(&scored)).abs() < 1e-6);
    assert!((components.total() - 62.5).abs() < 1e-6);
}

#[test]
fn better_rank_never_scores_lower() {
    let mut previous = visibility_score(&inputs(Some(1)));
    for rank in 2..=40 {
        let current = visibility_score(&inputs(Some(rank)));
        assert!(current <= previous, "rank {} scored above rank {}", rank, rank - 1);
        previous = current;
    }
}

#[test]
fn scores_stay_within_bounds() {
    let sentiments = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];
    for mentioned in [false, true] {
        for position in [None, Some(1), Some(8), Some(30)] {
            for count in [0, 1, 9] {
                for sentiment in sentiments {
                    let score = visibility_score(&ScoreInputs {
                        mentioned,
                        position,
                        mention_count: count,
                        citation_count: count,
                        sentiment,
                        runs_completed: count,
                    });
                    assert!((0.0..=100.0).contains(&score));
                }
            }
        }
    }
}
