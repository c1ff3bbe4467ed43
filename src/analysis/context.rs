// Extractive context summary carried between segments
use crate::analysis::types::ContextSummary;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Default number of lines kept in a context summary
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Markers that make an analysis line worth carrying forward
pub const SALIENCE_MARKERS: &[&str] = &[
    "error",
    "exception",
    "failure",
    "issue",
    "critical",
    "important",
    "错误",
    "异常",
    "失败",
    "问题",
    "严重",
    "重要",
];

static SALIENCE: OnceLock<Regex> = OnceLock::new();

fn salience_regex() -> &'static Regex {
    SALIENCE.get_or_init(|| {
        let alternation = SALIENCE_MARKERS
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        // Built from escaped literals, so compilation cannot fail
        RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()
            .expect("salience markers form a valid pattern")
    })
}

/// Whether a line mentions any salience marker (case-insensitive)
pub fn is_salient(line: &str) -> bool {
    salience_regex().is_match(line)
}

/// Extract up to [`DEFAULT_CONTEXT_LINES`] salient lines from an analysis
pub fn extract_context(analysis: &str) -> ContextSummary {
    extract_context_with_limit(analysis, DEFAULT_CONTEXT_LINES)
}

/// Extract up to `max_lines` salient lines, in order, trimmed
pub fn extract_context_with_limit(analysis: &str, max_lines: usize) -> ContextSummary {
    let lines = analysis
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && is_salient(line))
        .take(max_lines)
        .map(str::to_string)
        .collect();

    ContextSummary::new(lines)
}
