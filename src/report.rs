//! Rendering of analysis outcomes for the terminal and output files
use crate::analysis::{AnalysisOutcome, ReportStatus, SegmentResult};
use crate::error::{LogsageError, Result};
use std::path::Path;

/// Render an outcome as human-readable text
pub fn render_text(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::SinglePass(result) => match (&result.analysis, &result.error) {
            (Some(analysis), _) => format!(
                "# {} log analysis ({})\n\n{}\n",
                result.log_type,
                result.timestamp.format("%Y-%m-%d %H:%M:%S"),
                analysis.trim()
            ),
            (None, Some(error)) => format!("✗ Analysis failed: {}\n", error),
            (None, None) => "✗ Analysis produced no output\n".to_string(),
        },
        AnalysisOutcome::Segmented(report) => match &report.status {
            ReportStatus::Complete { narrative } => narrative.clone(),
            ReportStatus::AllSegmentsFailed => format!(
                "✗ Analysis failed: all {} segments failed\n{}",
                report.failed_segments,
                render_failures(&report.segments)
            ),
            ReportStatus::IntegrationFailed {
                error,
                partial_results,
            } => {
                let mut out = format!(
                    "⚠ {}\n  Showing {} of {} raw segment analyses\n",
                    error,
                    partial_results.len(),
                    report.total_segments
                );
                for result in partial_results {
                    if let SegmentResult::Success {
                        index,
                        total,
                        analysis,
                    } = result
                    {
                        out.push_str(&format!(
                            "\n## Segment {}/{}\n\n{}\n",
                            index,
                            total,
                            analysis.trim()
                        ));
                    }
                }
                out
            }
        },
        AnalysisOutcome::Failed { error, .. } => format!("✗ Analysis failed: {}\n", error),
    }
}

fn render_failures(results: &[SegmentResult]) -> String {
    results
        .iter()
        .filter_map(|r| {
            r.error()
                .map(|e| format!("  - Segment {}: {}\n", r.index(), e))
        })
        .collect()
}

/// Render an outcome as pretty JSON
pub fn render_json(outcome: &AnalysisOutcome) -> Result<String> {
    serde_json::to_string_pretty(outcome).map_err(|e| LogsageError::Json {
        source: e,
        context: "Failed to serialize analysis outcome".to_string(),
    })
}

/// Write rendered output to `path`, creating parent directories
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| LogsageError::Io {
            source: e,
            context: format!("Failed to create output directory: {:?}", parent),
        })?;
    }

    std::fs::write(path, content).map_err(|e| LogsageError::Io {
        source: e,
        context: format!("Failed to write report: {:?}", path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AggregatedReport, AnalysisKind, LogType, SingleResult};
    use chrono::Local;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn report(status: ReportStatus, segments: Vec<SegmentResult>) -> AggregatedReport {
        let failed = segments.iter().filter(|s| !s.is_success()).count();
        AggregatedReport {
            run_id: Uuid::new_v4(),
            log_type: LogType::Audio,
            total_segments: segments.len(),
            successful_segments: segments.len() - failed,
            failed_segments: failed,
            segments,
            status,
            generated_at: Local::now(),
        }
    }

    #[test]
    fn test_single_pass_text() {
        let outcome = AnalysisOutcome::SinglePass(SingleResult::succeeded(
            LogType::Display,
            AnalysisKind::Comprehensive,
            "All quiet.".to_string(),
        ));
        let text = render_text(&outcome);
        assert!(text.starts_with("# display log analysis"));
        assert!(text.contains("All quiet."));
    }

    #[test]
    fn test_all_failed_lists_segments() {
        let outcome = AnalysisOutcome::Segmented(report(
            ReportStatus::AllSegmentsFailed,
            vec![
                SegmentResult::failure(1, "timeout"),
                SegmentResult::failure(2, "401"),
            ],
        ));
        let text = render_text(&outcome);
        assert!(text.contains("all 2 segments failed"));
        assert!(text.contains("Segment 2: 401"));
    }

    #[test]
    fn test_integration_failure_shows_partials() {
        let ok = SegmentResult::success(1, 2, "first half fine");
        let outcome = AnalysisOutcome::Segmented(report(
            ReportStatus::IntegrationFailed {
                error: "integration failed: 500".to_string(),
                partial_results: vec![ok.clone()],
            },
            vec![ok, SegmentResult::failure(2, "x")],
        ));
        let text = render_text(&outcome);
        assert!(text.contains("integration failed: 500"));
        assert!(text.contains("## Segment 1/2"));
        assert!(text.contains("first half fine"));
    }

    #[test]
    fn test_json_has_counts() {
        let outcome = AnalysisOutcome::Segmented(report(
            ReportStatus::Complete {
                narrative: "n".to_string(),
            },
            vec![SegmentResult::success(1, 1, "a")],
        ));
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&outcome).unwrap()).unwrap();
        assert_eq!(value["path"], "segmented");
        assert_eq!(value["status"], "complete");
        assert_eq!(value["total_segments"], 1);
        assert_eq!(value["segments"][0]["success"], true);
    }

    #[test]
    fn test_write_output_creates_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("reports").join("out.md");
        write_output(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
