use logsage::analysis::{AnalysisKind, LogType, Pipeline, Segmenter};
use logsage::cli::{Cli, Commands, ConfigAction};
use logsage::config::{Config, ConfigValidator};
use anyhow::{Context, Result};
use logsage::llm::{self, OpenAiClient};
use logsage::report;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            file,
            log_type,
            kind,
            json,
            output,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_analyze(
                &config,
                &file,
                LogType::from_tag(&log_type),
                kind.into(),
                json,
                output.as_deref(),
            )?;
        }
        Commands::Segment {
            file,
            max_chars,
            overlap,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_segment(&config, &file, max_chars, overlap)?;
        }
        Commands::Ping => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_ping(&config)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, cli.profile, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "logsage=debug" } else { "logsage=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to create tokio runtime")
}

fn read_log(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read log file: {:?}", path))?;

    // Device logs are not guaranteed to be valid UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn cmd_analyze(
    config: &Config,
    file: &Path,
    log_type: LogType,
    kind: AnalysisKind,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let content = read_log(file)?;
    let client = OpenAiClient::from_config(&config.llm)
        .context("Failed to set up the completion client")?;
    let pipeline = Pipeline::new(Arc::new(client), config.analysis);

    tracing::info!(
        "Analyzing {} ({} chars, type: {}, mode: {:?})",
        file.display(),
        content.chars().count(),
        log_type,
        kind
    );

    let outcome = runtime()?.block_on(pipeline.run(kind, &content, log_type));

    let rendered = if json {
        report::render_json(&outcome)?
    } else {
        report::render_text(&outcome)
    };

    println!("{}", rendered);

    if let Some(path) = output {
        report::write_output(path, &rendered)?;
        println!("✓ Report written to: {}", path.display());
    }

    if let Some(counts) = outcome.segment_counts() {
        tracing::info!(
            "Segments: {} total, {} successful, {} failed",
            counts.total,
            counts.successful,
            counts.failed
        );
    }

    if !outcome.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_segment(
    config: &Config,
    file: &Path,
    max_chars: Option<usize>,
    overlap: Option<usize>,
) -> Result<()> {
    let content = read_log(file)?;
    let segmenter = Segmenter::new(
        max_chars.unwrap_or(config.analysis.segment_max_chars),
        overlap.unwrap_or(config.analysis.overlap_lines),
    );
    let segments = segmenter.segment(&content)?;
    let length = content.chars().count();

    println!("Log length: {} chars", length);
    println!(
        "Segmented path: {}",
        if length > config.analysis.segmentation_threshold {
            "yes"
        } else {
            "no (single pass)"
        }
    );
    println!(
        "Segments: {} (budget {} chars, overlap {} lines)",
        segments.len(),
        segmenter.max_chars(),
        segmenter.overlap_lines()
    );

    for segment in &segments {
        println!(
            "\n  Segment {}: lines {}..{} ({} overlap), {} chars",
            segment.index,
            segment.start_line + 1,
            segment.end_line,
            segment.overlap_lines,
            segment.char_len()
        );
        println!("    starts: {}", preview(segment.text.lines().next()));
        println!("    ends:   {}", preview(segment.text.lines().last()));
    }

    Ok(())
}

fn preview(line: Option<&str>) -> String {
    let line = line.unwrap_or_default();
    if line.chars().count() > 80 {
        format!("{}...", line.chars().take(80).collect::<String>())
    } else {
        line.to_string()
    }
}

fn cmd_ping(config: &Config) -> Result<()> {
    let client = OpenAiClient::from_config(&config.llm)
        .context("Failed to set up the completion client")?;

    println!("Testing connection to {} ...", config.llm.base_url);
    let check = runtime()?.block_on(llm::check_connection(&client));

    if check.ok {
        println!("✓ {}", check.message);
        Ok(())
    } else {
        println!("✗ {}", check.message);
        std::process::exit(1);
    }
}

fn cmd_config(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, profile)?;
            let content = toml::to_string_pretty(&config)?;
            println!("{}", content);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
            println!("  Model: {} via {}", config.llm.model, config.llm.base_url);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {:?}", parent)
                })?;
            }

            Config::default().save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
            println!("  Set {} before running analyses", Config::default().llm.api_key_env);
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::warn!(
            "Config file not found, using defaults. Run 'logsage config init' to create one."
        );
        let mut config = Config::default();
        if let Some(profile) = profile {
            config.apply_profile(&profile)?;
        }
        config.apply_env_overrides();
        ConfigValidator::validate(&config)?;
        return Ok(config);
    }

    if let Some(profile) = profile {
        Ok(Config::load_with_profile(&path, &profile)?)
    } else {
        Ok(Config::load(&path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_log_missing_file_has_context() {
        let err = read_log(Path::new("/nonexistent/device.log")).unwrap_err();
        assert!(err.to_string().contains("Failed to read log file"));
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_read_log_lossy_utf8() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("bin.log");
        std::fs::write(&path, b"E/Audio: \xff underrun").unwrap();

        let content = read_log(&path).unwrap();
        assert!(content.contains("underrun"));
    }
}
