use ai_visibility::analysis::sentiment::brand_segments;
use ai_visibility::analysis::{citation_breakdown, classify_sentiment, count_citations, CitationCounts};
use ai_visibility::Sentiment;

#[test]
fn bare_urls_and_www_hosts_are_counted() {
    let counts = citation_breakdown("See https://acme.com and www.acme.com for details");
    assert_eq!(counts, CitationCounts { urls: 2, markers: 0 });
}

#[test]
fn markdown_links_count_under_both_url_patterns() {
    let counts = citation_breakdown("Read [Acme](https://acme.com) first");

    assert_eq!(counts.urls, 2);
    assert_eq!(counts.markers, 0);
    assert_eq!(count_citations("Read [Acme](https://acme.com) first"), 2);
}

#[test]
fn source_markers_are_counted() {
    let text = "Acme leads [1] per [Source: Gartner] and (Source: Forrester)";
    let counts = citation_breakdown(text);

    assert_eq!(counts.markers, 3);
    assert_eq!(counts.urls, 0);
    assert_eq!(counts.total(), 3);
}

#[test]
fn citation_patterns_ignore_case() {
    assert_eq!(count_citations("HTTPS://ACME.COM [source: analyst]"), 2);
}

#[test]
fn plain_text_has_no_citations() {
    assert_eq!(count_citations("Acme is a popular choice."), 0);
}

#[test]
fn positive_terms_near_brand_win() {
    assert_eq!(
        classify_sentiment("Acme is the best and most reliable option.", "Acme"),
        Sentiment::Positive
    );
}

#[test]
fn negative_terms_near_brand_win() {
    assert_eq!(
        classify_sentiment("Acme has poor support. Acme is weak.", "Acme"),
        Sentiment::Negative
    );
}

#[test]
fn tied_votes_are_neutral() {
    assert_eq!(
        classify_sentiment("Acme is the best but has limited features.", "Acme"),
        Sentiment::Neutral
    );
}

#[test]
fn sentences_without_the_brand_are_ignored() {
    assert_eq!(
        classify_sentiment("Globex is the best. Acme exists.", "Acme"),
        Sentiment::Neutral
    );
    assert_eq!(
        classify_sentiment("Globex is the best! Acme is fine", "Acme"),
        Sentiment::Neutral
    );
}

#[test]
fn each_term_votes_once() {
    assert_eq!(
        classify_sentiment("Acme best best best. Acme is poor and bad.", "Acme"),
        Sentiment::Negative
    );
}

#[test]
fn missing_or_empty_brand_is_neutral() {
    assert_eq!(classify_sentiment("Globex is great.", "Acme"), Sentiment::Neutral);
    assert_eq!(classify_sentiment("Everything is great.", ""), Sentiment::Neutral);
}

#[test]
fn segments_split_on_sentence_punctuation() {
    let segments = brand_segments("Acme ships fast! Globex? Try ACME today.", "acme");
    assert_eq!(segments, vec!["acme ships fast".to_string(), " try acme today".to_string()]);
}

#[test]
fn punctuation_inside_the_brand_does_not_split_sentences() {
    assert_eq!(
        classify_sentiment("Yahoo! is the best and most trusted search engine.", "Yahoo!"),
        Sentiment::Positive
    );
    assert_eq!(
        brand_segments("Booking.com is reliable. Others exist.", "Booking.com"),
        vec!["booking.com is reliable".to_string()]
    );
}
