// Long-log analysis pipeline
//
// Segmenter -> Context Extractor -> Segment Analyzer -> Aggregator,
// driven by the Pipeline orchestrator.

pub mod aggregator;
pub mod analyzer;
pub mod context;
pub mod focused;
pub mod pipeline;
pub mod prompts;
pub mod segmenter;
mod types;

pub use aggregator::Aggregator;
pub use analyzer::SegmentAnalyzer;
pub use context::{extract_context, extract_context_with_limit};
pub use pipeline::Pipeline;
pub use segmenter::Segmenter;
pub use types::{
    AggregatedReport, AnalysisKind, AnalysisOutcome, ContextSummary, LogType, ReportStatus,
    Segment, SegmentCounts, SegmentResult, SingleResult,
};
