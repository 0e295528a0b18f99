use ai_visibility::analysis::mention::{
    adjacent_number, emphasized_number, leading_number_line, line_index, position_source,
};
use ai_visibility::analysis::score::position_points;
use ai_visibility::analysis::{detect_mention, infer_position, MentionSummary};

#[test]
fn numbered_list_reports_leading_rank() {
    let summary = detect_mention("1. Acme\n2. Globex\n3. Initech", "Acme");

    assert_eq!(
        summary,
        MentionSummary {
            mentioned: true,
            count: 1,
            position: Some(1),
        }
    );
}

#[test]
fn missing_brand_is_absent() {
    let summary = detect_mention("1. Globex\n2. Initech", "Acme");
    assert_eq!(summary, MentionSummary::absent());
}

#[test]
fn empty_brand_is_never_mentioned() {
    assert_eq!(detect_mention("anything at all", ""), MentionSummary::absent());
}

#[test]
fn matching_ignores_case_and_counts_every_occurrence() {
    let summary = detect_mention("ACME is fast. People pick acme. Acme wins.", "Acme");

    assert!(summary.mentioned);
    assert_eq!(summary.count, 3);
    assert_eq!(summary.position, Some(1));
}

#[test]
fn occurrences_do_not_overlap() {
    assert_eq!(detect_mention("aaaa", "aa").count, 2);
}

#[test]
fn leading_number_skips_unnumbered_brand_lines() {
    let text = "Acme is good\n  5. Acme Corp\n6. Globex";
    assert_eq!(leading_number_line(text, "acme"), Some(5));
    assert_eq!(infer_position(text, "Acme"), Some(5));
}

#[test]
fn emphasized_number_is_used_when_lines_are_not_numbered() {
    let text = "Top picks: **3. Acme** and a few others";

    assert_eq!(leading_number_line(text, "Acme"), None);
    assert_eq!(emphasized_number(text, "acme"), Some(3));
    assert_eq!(position_source(text, "Acme"), Some("emphasized_number"));
}

#[test]
fn brand_is_matched_literally_in_patterns() {
    let text = "Options: **2. C++** then Rust";
    assert_eq!(infer_position(text, "C++"), Some(2));
}

#[test]
fn adjacent_number_patterns_are_tried_in_order() {
    assert_eq!(adjacent_number("Rankings: 7 Acme, then others", "Acme"), Some(7));
    assert_eq!(adjacent_number("Pick 4:Acme today", "Acme"), Some(4));
    assert_eq!(adjacent_number("Ranked 9. Acme, or 2 Acme", "Acme"), Some(9));
    assert_eq!(
        position_source("Rankings: 7 Acme, then others", "Acme"),
        Some("adjacent_number")
    );
}

#[test]
fn line_index_is_the_last_resort() {
    let text = "Intro line\nWe like Acme\nOther";

    assert_eq!(line_index(text, "acme"), Some(2));
    assert_eq!(infer_position(text, "Acme"), Some(2));
    assert_eq!(position_source(text, "Acme"), Some("line_index"));
}

#[test]
fn zero_is_not_a_rank() {
    assert_eq!(leading_number_line("0. Acme", "Acme"), None);
    assert_eq!(infer_position("0. Acme", "Acme"), Some(1));
}

#[test]
fn unnumbered_repeated_mentions_fall_back_to_line_index() {
    let text = "Acme is a solid choice.\nMany teams use Acme.\nAcme integrates well.";
    let summary = detect_mention(text, "Acme");

    assert!(summary.mentioned);
    assert_eq!(summary.count, 3);
    assert_eq!(summary.position, Some(1));
}

#[test]
fn detection_is_deterministic() {
    let text = "Best tools:\n**4. Acme**\n5. Globex";
    assert_eq!(detect_mention(text, "Acme"), detect_mention(text, "Acme"));
}

#[test]
fn overlong_rank_saturates_instead_of_falling_back() {
    let text = "99999999999999999999. Acme";

    assert_eq!(leading_number_line(text, "Acme"), Some(usize::MAX));
    assert_eq!(infer_position(text, "Acme"), Some(usize::MAX));
    assert!((position_points(infer_position(text, "Acme")) - 10.0).abs() < 1e-6);
}
