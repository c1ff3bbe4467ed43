//! Prompt construction
//!
//! System roles are selected through a fixed table keyed on [`LogType`];
//! every user prompt the pipeline sends is built here.

use crate::analysis::types::{AnalysisKind, ContextSummary, LogType, SegmentResult};

/// System role per log type
const SYSTEM_ROLES: [(LogType, &str); 3] = [
    (
        LogType::Audio,
        "You are an expert in audio subsystems who analyzes device logs. \
         Focus on playback, recording, codecs, routing and effects processing.",
    ),
    (
        LogType::Display,
        "You are an expert in display subsystems who analyzes device logs. \
         Focus on screen output, graphics rendering, resolution and refresh rate.",
    ),
    (
        LogType::General,
        "You are an expert in system log analysis. You identify problems in \
         any kind of system log and propose concrete fixes.",
    ),
];

const ERROR_PATTERN_ROLE: &str =
    "You are a log analysis expert who specializes in identifying and explaining system error patterns.";

const ISSUE_SUMMARY_ROLE: &str =
    "You are a systems operations expert who summarizes and prioritizes the key problems found in logs.";

/// System prompt for a log type, falling back to the general role
pub fn system_prompt(log_type: LogType) -> &'static str {
    SYSTEM_ROLES
        .iter()
        .find(|(t, _)| *t == log_type)
        .or_else(|| SYSTEM_ROLES.iter().find(|(t, _)| *t == LogType::General))
        .map(|(_, role)| *role)
        .unwrap_or_default()
}

/// System prompt for an analysis kind
pub fn system_prompt_for(kind: AnalysisKind, log_type: LogType) -> &'static str {
    match kind {
        AnalysisKind::Comprehensive => system_prompt(log_type),
        AnalysisKind::ErrorPatterns => ERROR_PATTERN_ROLE,
        AnalysisKind::IssueSummary => ISSUE_SUMMARY_ROLE,
    }
}

/// Where a piece of log text sits in the full log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The complete log in one piece (single-pass path)
    Whole,
    /// Segment `index` of `total`
    Segment { index: usize, total: usize },
}

/// Build the analysis prompt for a segment or a whole log
pub fn segment_prompt(
    text: &str,
    log_type: LogType,
    position: Position,
    prior_context: &ContextSummary,
) -> String {
    let mut prompt = String::new();

    match position {
        Position::Whole => {
            prompt.push_str(&format!(
                "Analyze the following {} log. This is the complete log.\n\n",
                log_type
            ));
        }
        Position::Segment { index, total } => {
            prompt.push_str(&format!(
                "Analyze the following {} log. This is segment {} of {}.\n\n",
                log_type, index, total
            ));
        }
    }

    if !prior_context.is_empty() {
        prompt.push_str("Key findings from the preceding segments:\n");
        prompt.push_str(&prior_context.text());
        prompt.push_str("\n\n");
    }

    prompt.push_str("Log content:\n```\n");
    prompt.push_str(text);
    prompt.push_str("\n```\n\n");

    prompt.push_str("Report:\n");
    prompt.push_str("1. Issues and anomalies found in this log content\n");
    if prior_context.is_empty() {
        prompt.push_str("2. How these issues relate to each other\n");
    } else {
        prompt.push_str("2. How these issues relate to the preceding findings\n");
    }
    prompt.push_str("3. Key facts extracted (components, timestamps, error codes, values)\n");
    prompt.push_str("4. A short recap of this content");

    prompt
}

/// Build the second-pass prompt over all successful segment analyses
///
/// `results` must be in segment order; failed results are skipped.
pub fn integration_prompt(results: &[SegmentResult], log_type: LogType) -> String {
    let mut prompt = format!(
        "Below are analyses of consecutive segments of one {} log. \
         Integrate them into a single report.\n\n",
        log_type
    );

    for result in results {
        if let SegmentResult::Success {
            index, analysis, ..
        } = result
        {
            prompt.push_str(&format!("### Segment {}\n{}\n\n", index, analysis.trim()));
        }
    }

    prompt.push_str(
        "Produce:\n\
         1. Overall problem summary\n\
         2. Consolidated list of all errors and exceptions\n\
         3. Correlation of findings across segments\n\
         4. Recommended remediation\n\
         5. A complete diagnostic narrative\n\n\
         Do not drop information from any segment, and keep the narrative \
         continuous across segment boundaries.",
    );

    prompt
}

/// Build the user prompt for a focused (single-call) analysis
pub fn focused_prompt(kind: AnalysisKind, log_content: &str, log_type: LogType) -> String {
    match kind {
        AnalysisKind::Comprehensive => {
            segment_prompt(log_content, log_type, Position::Whole, &ContextSummary::default())
        }
        AnalysisKind::ErrorPatterns => format!(
            "Analyze the error patterns in the following log:\n\n{}\n\n\
             Provide:\n\
             1. Error types found and their severity\n\
             2. How often and in what pattern the errors occur\n\
             3. Likely root causes\n\
             4. Suggested fixes",
            log_content
        ),
        AnalysisKind::IssueSummary => format!(
            "Summarize the key problems in the following log:\n\n{}\n\n\
             Provide:\n\
             1. Main problems, ordered by priority\n\
             2. Impact of each problem\n\
             3. Suggested handling priority\n\
             4. Preventive measures",
            log_content
        ),
    }
}
