// Shared types for the analysis pipeline
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of device log being analyzed
///
/// Parsing is infallible: unknown tags fall back to [`LogType::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Audio,
    Display,
    #[default]
    General,
}

impl LogType {
    /// Map a free-form tag onto the closed set of log types
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "audio" => LogType::Audio,
            "display" => LogType::Display,
            _ => LogType::General,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogType::Audio => "audio",
            LogType::Display => "display",
            LogType::General => "general",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis mode requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Full pipeline: single pass or segmented, depending on size
    #[default]
    Comprehensive,
    /// Single call focused on error types, frequency and root causes
    ErrorPatterns,
    /// Single call producing a prioritized issue list
    IssueSummary,
}

/// Contiguous run of log lines bounded by a character budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 1-based position among all segments of the same log
    pub index: usize,
    /// First line (0-based, inclusive), including overlap lines
    pub start_line: usize,
    /// Last line (0-based, exclusive)
    pub end_line: usize,
    /// Leading lines duplicated from the previous segment
    pub overlap_lines: usize,
    /// Segment body with trailing whitespace trimmed
    pub text: String,
}

impl Segment {
    /// First line that did not appear in the previous segment
    pub fn fresh_start(&self) -> usize {
        self.start_line + self.overlap_lines
    }

    /// Character length of the segment body
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Outcome of analyzing one segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentResult {
    Success {
        index: usize,
        total: usize,
        analysis: String,
    },
    Failure {
        index: usize,
        error: String,
    },
}

impl Serialize for SegmentResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        match self {
            SegmentResult::Success {
                index,
                total,
                analysis,
            } => {
                let mut state = serializer.serialize_struct("SegmentResult", 4)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("index", index)?;
                state.serialize_field("total", total)?;
                state.serialize_field("analysis", analysis)?;
                state.end()
            }
            SegmentResult::Failure { index, error } => {
                let mut state = serializer.serialize_struct("SegmentResult", 3)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("index", index)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}

impl SegmentResult {
    pub fn success(index: usize, total: usize, analysis: impl Into<String>) -> Self {
        SegmentResult::Success {
            index,
            total,
            analysis: analysis.into(),
        }
    }

    pub fn failure(index: usize, error: impl Into<String>) -> Self {
        SegmentResult::Failure {
            index,
            error: error.into(),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SegmentResult::Success { index, .. } | SegmentResult::Failure { index, .. } => *index,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SegmentResult::Success { .. })
    }

    /// Analysis text for successful results
    pub fn analysis(&self) -> Option<&str> {
        match self {
            SegmentResult::Success { analysis, .. } => Some(analysis),
            SegmentResult::Failure { .. } => None,
        }
    }

    /// Error message for failed results
    pub fn error(&self) -> Option<&str> {
        match self {
            SegmentResult::Failure { error, .. } => Some(error),
            SegmentResult::Success { .. } => None,
        }
    }
}

/// Short extractive digest carried from one segment's analysis to the next
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextSummary {
    lines: Vec<String>,
}

impl ContextSummary {
    /// Text rendered when no salient line was found
    pub const NO_FINDINGS: &'static str = "no salient findings";

    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Summary text, or the sentinel when empty
    pub fn text(&self) -> String {
        if self.lines.is_empty() {
            Self::NO_FINDINGS.to_string()
        } else {
            self.lines.join("\n")
        }
    }
}

/// Segment counts of a segmented run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentCounts {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Terminal state of the aggregation step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportStatus {
    /// Integration call succeeded
    Complete { narrative: String },
    /// No segment produced an analysis; integration was skipped
    AllSegmentsFailed,
    /// Segments succeeded but the integration call did not
    IntegrationFailed {
        error: String,
        partial_results: Vec<SegmentResult>,
    },
}

/// Final output of the segmented path
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedReport {
    pub run_id: Uuid,
    pub log_type: LogType,
    pub total_segments: usize,
    pub successful_segments: usize,
    pub failed_segments: usize,
    pub segments: Vec<SegmentResult>,
    #[serde(flatten)]
    pub status: ReportStatus,
    pub generated_at: DateTime<Local>,
}

impl AggregatedReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ReportStatus::Complete { .. })
    }

    pub fn narrative(&self) -> Option<&str> {
        match &self.status {
            ReportStatus::Complete { narrative } => Some(narrative),
            _ => None,
        }
    }

    pub fn counts(&self) -> SegmentCounts {
        SegmentCounts {
            total: self.total_segments,
            successful: self.successful_segments,
            failed: self.failed_segments,
        }
    }
}

/// Result of a single collaborator call over a whole log
#[derive(Debug, Clone, Serialize)]
pub struct SingleResult {
    pub success: bool,
    pub log_type: LogType,
    pub kind: AnalysisKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl SingleResult {
    pub fn succeeded(log_type: LogType, kind: AnalysisKind, analysis: String) -> Self {
        Self {
            success: true,
            log_type,
            kind,
            analysis: Some(analysis),
            error: None,
            timestamp: Local::now(),
        }
    }

    pub fn failed(log_type: LogType, kind: AnalysisKind, error: String) -> Self {
        Self {
            success: false,
            log_type,
            kind,
            analysis: None,
            error: Some(error),
            timestamp: Local::now(),
        }
    }
}

/// Uniform result of a pipeline invocation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    SinglePass(SingleResult),
    Segmented(AggregatedReport),
    Failed { log_type: LogType, error: String },
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            AnalysisOutcome::SinglePass(result) => result.success,
            AnalysisOutcome::Segmented(report) => report.is_success(),
            AnalysisOutcome::Failed { .. } => false,
        }
    }

    /// Narrative text when the run produced one
    pub fn narrative(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::SinglePass(result) => result.analysis.as_deref(),
            AnalysisOutcome::Segmented(report) => report.narrative(),
            AnalysisOutcome::Failed { .. } => None,
        }
    }

    /// Human-readable failure reason when the run did not succeed
    pub fn error(&self) -> Option<String> {
        match self {
            AnalysisOutcome::SinglePass(result) => result.error.clone(),
            AnalysisOutcome::Segmented(report) => match &report.status {
                ReportStatus::Complete { .. } => None,
                ReportStatus::AllSegmentsFailed => Some(format!(
                    "all {} segments failed to analyze",
                    report.failed_segments
                )),
                ReportStatus::IntegrationFailed { error, .. } => Some(error.clone()),
            },
            AnalysisOutcome::Failed { error, .. } => Some(error.clone()),
        }
    }

    /// Segment counts, present only for the segmented path
    pub fn segment_counts(&self) -> Option<SegmentCounts> {
        match self {
            AnalysisOutcome::Segmented(report) => Some(report.counts()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_type_fallback() {
        assert_eq!(LogType::from_tag("audio"), LogType::Audio);
        assert_eq!(LogType::from_tag(" Display "), LogType::Display);
        assert_eq!(LogType::from_tag("kernel"), LogType::General);
        assert_eq!(LogType::from_tag(""), LogType::General);
    }

    #[test]
    fn test_segment_result_serializes_success_flag() {
        let ok = serde_json::to_value(SegmentResult::success(1, 3, "fine")).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["total"], 3);

        let err = serde_json::to_value(SegmentResult::failure(2, "timeout")).unwrap();
        assert_eq!(err["success"], false);
        assert_eq!(err["index"], 2);
        assert!(err.get("total").is_none());
    }

    #[test]
    fn test_context_summary_sentinel() {
        assert_eq!(ContextSummary::default().text(), ContextSummary::NO_FINDINGS);
        let summary = ContextSummary::new(vec!["a".into(), "b".into()]);
        assert_eq!(summary.text(), "a\nb");
    }

    #[test]
    fn test_failed_outcome_has_no_counts() {
        let outcome = AnalysisOutcome::Failed {
            log_type: LogType::General,
            error: "boom".to_string(),
        };
        assert!(!outcome.is_success());
        assert!(outcome.segment_counts().is_none());
        assert_eq!(outcome.error().as_deref(), Some("boom"));
    }
}
