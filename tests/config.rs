use std::collections::HashMap;
use std::path::PathBuf;

use ai_visibility::config::VisibilityConfig;
use ai_visibility::ConfigError;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("ai-visibility-{}-{}", name, std::process::id()))
        .join("visibility.toml")
}

#[test]
fn defaults_match_documented_values() {
    let config = VisibilityConfig::default();

    assert_eq!(config.analysis.runs_per_prompt, 3);
    assert_eq!(config.analysis.preview_chars, 500);
    assert_eq!(config.analysis.max_keywords, 5);
    assert_eq!(config.analysis.max_prompts, 10);
    assert_eq!(config.analysis.platforms, vec!["chatgpt", "perplexity"]);
    assert_eq!(config.query_engine.model, "gpt-4o-mini");
    assert_eq!(config.query_engine.max_retries, 3);
    assert!((config.query_engine.temperature - 0.3).abs() < 1e-6);
    assert_eq!(config.content.max_paragraphs, 10);
}

#[test]
fn overrides_replace_parsed_values() {
    let vars: HashMap<&str, &str> = [
        ("VISIBILITY_RUNS", "5"),
        ("VISIBILITY_PLATFORMS", " chatgpt, gemini ,,"),
        ("OPENAI_MODEL", "gpt-4o"),
        ("OPENAI_TEMPERATURE", "0.7"),
        ("CONTENT_TIMEOUT_MS", "1500"),
    ]
    .into_iter()
    .collect();

    let mut config = VisibilityConfig::default();
    config.apply_overrides(|key| vars.get(key).map(|value| value.to_string()));

    assert_eq!(config.analysis.runs_per_prompt, 5);
    assert_eq!(config.analysis.platforms, vec!["chatgpt", "gemini"]);
    assert_eq!(config.query_engine.model, "gpt-4o");
    assert!((config.query_engine.temperature - 0.7).abs() < 1e-6);
    assert_eq!(config.content.timeout_ms, 1500);
    assert_eq!(config.analysis.max_prompts, 10);
}

#[test]
fn unparseable_or_blank_overrides_are_ignored() {
    let vars: HashMap<&str, &str> = [
        ("VISIBILITY_RUNS", "many"),
        ("OPENAI_MODEL", "   "),
        ("VISIBILITY_PLATFORMS", " , "),
    ]
    .into_iter()
    .collect();

    let mut config = VisibilityConfig::default();
    config.apply_overrides(|key| vars.get(key).map(|value| value.to_string()));

    assert_eq!(config, VisibilityConfig::default());
}

#[test]
fn written_config_loads_back() {
    let path = scratch_path("roundtrip");
    let mut config = VisibilityConfig::default();
    config.analysis.max_keywords = 7;
    config.content.max_paragraphs = 4;
    config.write(&path).unwrap();

    let (loaded, loaded_path) = VisibilityConfig::load(Some(path.clone())).unwrap();
    assert_eq!(loaded_path, Some(path.clone()));
    assert_eq!(loaded.analysis.max_keywords, 7);
    assert_eq!(loaded.content.max_paragraphs, 4);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn partial_file_keeps_defaults_elsewhere() {
    let path = scratch_path("partial");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "[analysis]\nmax_keywords = 2\n").unwrap();

    let (loaded, _) = VisibilityConfig::load(Some(path.clone())).unwrap();
    assert_eq!(loaded.analysis.max_keywords, 2);
    assert_eq!(loaded.content.max_paragraphs, 10);
    assert_eq!(loaded.content.max_chars, 2000);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = scratch_path("missing");
    let (loaded, _) = VisibilityConfig::load(Some(path)).unwrap();
    assert_eq!(loaded.analysis.max_keywords, 5);
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let path = scratch_path("invalid");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "[analysis\nmax_keywords = ").unwrap();

    let result = VisibilityConfig::load(Some(path.clone()));
    assert!(matches!(result, Err(ConfigError::Parse(_))));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
