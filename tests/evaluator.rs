use ai_visibility::analysis::evaluator::preview;
use ai_visibility::analysis::ResponseEvaluator;
use ai_visibility::{evaluate_response, record_id, RecordStatus, Sentiment};

fn answers(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|text| text.to_string()).collect()
}

#[test]
fn no_answers_yield_a_no_data_record() {
    let record = evaluate_response("best crm", "Acme", "ChatGPT", &[]);

    assert_eq!(record.status, RecordStatus::NoData);
    assert!(record.is_data_absent());
    assert_eq!(record.error(), Some("All runs failed"));
    assert!(!record.brand_mentioned);
    assert_eq!(record.visibility_score, 0.0);
    assert_eq!(record.runs_completed, 0);
    assert_eq!(record.position, None);
    assert!(record.response.is_empty());
}

#[test]
fn runs_are_combined_before_scoring() {
    let record = evaluate_response(
        "best crm",
        "Acme",
        "ChatGPT",
        &answers(&["1. Acme\n2. Globex", "1. Acme\n2. Globex", "1. Acme\n2. Globex"]),
    );

    assert_eq!(record.status, RecordStatus::Scored);
    assert_eq!(record.error(), None);
    assert!(record.brand_mentioned);
    assert_eq!(record.mention_count, 3);
    assert_eq!(record.position, Some(1));
    assert_eq!(record.sentiment, Sentiment::Neutral);
    assert_eq!(record.citation_count, 0);
    assert_eq!(record.runs_completed, 3);
    assert!((record.visibility_score - 77.0).abs() < 1e-6);
}

#[test]
fn empty_runs_do_not_count_as_completed() {
    let record = evaluate_response("best crm", "Acme", "ChatGPT", &answers(&["1. Acme", ""]));

    assert_eq!(record.runs_completed, 1);
    assert!((record.visibility_score - 69.0).abs() < 1e-6);
}

#[test]
fn only_empty_runs_are_scored_but_unmentioned() {
    let record = evaluate_response("best crm", "Acme", "ChatGPT", &answers(&[""]));

    assert_eq!(record.status, RecordStatus::Scored);
    assert!(!record.brand_mentioned);
    assert_eq!(record.runs_completed, 0);
    assert_eq!(record.visibility_score, 0.0);
}

#[test]
fn unmentioned_brand_carries_no_mention_data() {
    let record = evaluate_response(
        "best crm",
        "Acme",
        "Perplexity",
        &answers(&["1. Globex\n2. Initech https://globex.com"]),
    );

    assert!(!record.brand_mentioned);
    assert_eq!(record.mention_count, 0);
    assert_eq!(record.position, None);
    assert_eq!(record.visibility_score, 0.0);
    assert_eq!(record.citation_count, 1);
}

#[test]
fn response_preview_is_truncated_by_characters() {
    let evaluator = ResponseEvaluator::new(10);
    let record = evaluator.evaluate("q", "Acme", "ChatGPT", &answers(&["Acme ".repeat(10).as_str()]));

    assert_eq!(record.response, "Acme Acme ...");
    assert_eq!(record.response_length, 50);
    assert_eq!(record.mention_count, 10);
}

#[test]
fn default_preview_keeps_five_hundred_characters() {
    let long = format!("Acme {}", "x".repeat(600));
    let record = evaluate_response("q", "Acme", "ChatGPT", &answers(&[long.as_str()]));

    assert_eq!(record.response.chars().count(), 503);
    assert!(record.response.ends_with("..."));
    assert_eq!(record.response_length, 605);
}

#[test]
fn preview_respects_multibyte_characters() {
    assert_eq!(preview(&"é".repeat(20), 5), "ééééé...");
    assert_eq!(preview("short", 10), "short");
}

#[test]
fn evaluation_is_idempotent() {
    let raw = answers(&["**2. Acme** is trusted [1]", "Acme https://acme.com"]);
    let first = evaluate_response("best crm", "Acme", "ChatGPT", &raw);
    let second = evaluate_response("best crm", "Acme", "ChatGPT", &raw);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn record_ids_are_stable_per_platform_and_prompt() {
    let record = evaluate_response("best crm", "Acme", "ChatGPT", &answers(&["Acme"]));

    assert_eq!(record.record_id, record_id("ChatGPT", "best crm"));
    assert!(record.record_id.starts_with("rec_"));
    assert_eq!(record.record_id.len(), 4 + 16);
    assert_ne!(record_id("ChatGPT", "best crm"), record_id("Perplexity", "best crm"));
}

#[test]
fn punctuated_brand_keeps_its_sentiment_points() {
    let record = evaluate_response(
        "best search engine",
        "Yahoo!",
        "ChatGPT",
        &answers(&["1. Yahoo! is the best and most trusted"]),
    );

    assert_eq!(record.sentiment, Sentiment::Positive);
    assert_eq!(record.position, Some(1));
    // 15 presence + 50 rank + 3 mention + 8 sentiment + 1 run
    assert!((record.visibility_score - 77.0).abs() < 1e-6);
}
