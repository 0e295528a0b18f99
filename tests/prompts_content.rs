use ai_visibility::content::extract_page_text;
use ai_visibility::prompts::{
    brand_category_keywords, classify_intent, fallback_keywords, fallback_prompts,
    parse_string_list, PromptIntent,
};

#[test]
fn intent_depends_on_brand_and_wording() {
    assert_eq!(classify_intent("Acme vs Globex", "Acme"), PromptIntent::Comparison);
    assert_eq!(classify_intent("Acme reviews 2024", "Acme"), PromptIntent::Review);
    assert_eq!(classify_intent("What is Acme", "Acme"), PromptIntent::BrandSpecific);
    assert_eq!(classify_intent("best crm tools", "Acme"), PromptIntent::Category);
    assert_eq!(classify_intent("how do crms work", "Acme"), PromptIntent::Informational);
}

#[test]
fn intent_serializes_in_kebab_case() {
    assert_eq!(
        serde_json::to_string(&PromptIntent::BrandSpecific).unwrap(),
        "\"brand-specific\""
    );
    assert_eq!(PromptIntent::BrandSpecific.label(), "brand-specific");
}

#[test]
fn fallback_keywords_rank_by_frequency_then_first_use() {
    let text = "Payments platform. Payments API for payments teams. Platform tools.";

    assert_eq!(
        fallback_keywords(text, "Stripe", 3),
        vec!["payments", "platform", "api"]
    );
}

#[test]
fn fallback_keywords_skip_brand_fragments() {
    let text = "Payments platform. Payments API for payments teams. Platform tools.";

    assert_eq!(
        fallback_keywords(text, "Acme Payments", 2),
        vec!["platform", "api"]
    );
}

#[test]
fn brand_name_picks_a_keyword_family() {
    assert_eq!(brand_category_keywords("PayFlow")[0], "Payments");
    assert_eq!(brand_category_keywords("Acme University")[0], "Education");
    assert_eq!(brand_category_keywords("Globex")[0], "Business solutions");
    assert_eq!(brand_category_keywords("Globex").len(), 5);
}

#[test]
fn fallback_prompts_wrap_the_keyword() {
    assert_eq!(
        fallback_prompts("CRM"),
        vec!["Top CRM tools".to_string(), "Best CRM platforms".to_string()]
    );
}

#[test]
fn string_lists_are_read_from_model_output() {
    assert_eq!(
        parse_string_list("```json\n[\"crm\", \" sales \"]\n```"),
        Some(vec!["crm".to_string(), "sales".to_string()])
    );
    assert_eq!(
        parse_string_list("Here you go: [\"crm\"] hope that helps"),
        Some(vec!["crm".to_string()])
    );
    assert_eq!(parse_string_list("no list here"), None);
}

const PAGE: &str = r#"<html>
<head>
  <title>Acme Corp</title>
  <meta name="description" content="Best CRM for teams">
  <script>var tracking = 1;</script>
</head>
<body>
  <nav><h2>Menu</h2><p>Home</p></nav>
  <h1>Welcome</h1>
  <main>
    <p>First paragraph.</p>
    <p>Second
       paragraph.</p>
  </main>
  <footer><p>Copyright</p></footer>
</body>
</html>"#;

#[test]
fn page_text_keeps_title_description_headings_and_main_paragraphs() {
    assert_eq!(
        extract_page_text(PAGE, 10),
        "Acme Corp Best CRM for teams Welcome First paragraph. Second paragraph."
    );
}

#[test]
fn page_text_limits_paragraphs() {
    assert_eq!(
        extract_page_text(PAGE, 1),
        "Acme Corp Best CRM for teams Welcome First paragraph."
    );
}

#[test]
fn body_paragraphs_skip_navigation_and_footer() {
    let html = "<html><body><nav><p>Menu</p></nav><p>One</p><footer><p>Foot</p></footer></body></html>";
    assert_eq!(extract_page_text(html, 10), "One");
}
