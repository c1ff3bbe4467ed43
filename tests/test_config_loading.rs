// Config file loading, profiles and validation
use logsage::analysis::Segmenter;
use logsage::config::Config;
use logsage::error::LogsageError;
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = r#"
[_meta]
schema_version = "1.0.0"

[llm]
provider = "ollama"
base_url = "http://localhost:11434/v1"
model = "llama3"
temperature = 0.3

[analysis]
segment_max_chars = 4000
overlap_lines = 2

[profiles.long]
model = "llama3:70b"
segment_max_chars = 12000
"#;

fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, content).unwrap();
    (temp, path)
}

#[test]
fn test_partial_file_keeps_defaults() {
    let (_temp, path) = write_config(SAMPLE);
    let config = Config::load(&path).unwrap();

    assert_eq!(config.llm.provider, "ollama");
    assert_eq!(config.llm.max_tokens, 2000);
    assert_eq!(config.analysis.segment_max_chars, 4000);
    assert_eq!(config.analysis.overlap_lines, 2);
    assert_eq!(config.analysis.segmentation_threshold, 10_000);

    let segmenter = Segmenter::from_config(&config.analysis);
    assert_eq!(segmenter.max_chars(), 4000);
    assert_eq!(segmenter.overlap_lines(), 2);
}

#[test]
fn test_partial_analysis_section() {
    let (_temp, path) = write_config("[analysis]\nsegment_max_chars = 4000\n");
    let config = Config::load(&path).unwrap();

    assert_eq!(config.analysis.segment_max_chars, 4000);
    assert_eq!(config.analysis.segmentation_threshold, 10_000);
    assert_eq!(config.analysis.overlap_lines, 5);
    assert_eq!(config.analysis.context_max_lines, 3);
    assert_eq!(config.llm.model, "gpt-4o");
}

#[test]
fn test_partial_llm_section() {
    let (_temp, path) = write_config("[llm]\nmodel = \"llama3\"\n");
    let config = Config::load(&path).unwrap();

    assert_eq!(config.llm.model, "llama3");
    assert_eq!(config.llm.provider, "openai");
    assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
    assert_eq!(config.llm.max_tokens, 2000);
}

#[test]
fn test_profile_applied_on_load() {
    let (_temp, path) = write_config(SAMPLE);
    let config = Config::load_with_profile(&path, "long").unwrap();

    assert_eq!(config.llm.model, "llama3:70b");
    assert_eq!(config.analysis.segment_max_chars, 12_000);
    assert_eq!(config.llm.temperature, 0.3);
}

#[test]
fn test_unknown_profile_rejected() {
    let (_temp, path) = write_config(SAMPLE);
    let err = Config::load_with_profile(&path, "missing").unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_invalid_values_rejected() {
    let (_temp, path) = write_config(
        r#"
[llm]
temperature = 3.5

[analysis]
segment_max_chars = 0
"#,
    );

    match Config::load(&path).unwrap_err() {
        LogsageError::ConfigValidation { errors } => {
            let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
            assert!(paths.contains(&"llm.temperature"));
            assert!(paths.contains(&"analysis.segment_max_chars"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_malformed_toml() {
    let (_temp, path) = write_config("[llm\nmodel = ");
    assert!(matches!(
        Config::load(&path).unwrap_err(),
        LogsageError::Toml(_)
    ));
}

#[test]
fn test_saved_default_reloads() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");

    Config::default().save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();

    assert_eq!(loaded.meta.schema_version, "1.0.0");
    assert_eq!(loaded.analysis, Config::default().analysis);
}
