// Pipeline orchestrator: single-pass or segmented analysis
//
// START -> SEGMENTING -> ANALYZING(1..N) -> AGGREGATING -> DONE
//
// Segments are analyzed strictly in order because each prompt carries the
// context extracted from the previous segment's analysis.

use crate::analysis::aggregator::Aggregator;
use crate::analysis::analyzer::SegmentAnalyzer;
use crate::analysis::context::extract_context_with_limit;
use crate::analysis::focused::run_single;
use crate::analysis::segmenter::Segmenter;
use crate::analysis::types::{
    AggregatedReport, AnalysisKind, AnalysisOutcome, ContextSummary, LogType,
};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::llm::Completion;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Entry point for log analysis
///
/// Each call owns its segment list, context and results; a `Pipeline` can be
/// shared and reused across invocations.
pub struct Pipeline {
    completion: Arc<dyn Completion>,
    config: AnalysisConfig,
}

impl Pipeline {
    pub fn new(completion: Arc<dyn Completion>, config: AnalysisConfig) -> Self {
        Self { completion, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Whether `log_content` is long enough to take the segmented path
    pub fn needs_segmentation(&self, log_content: &str) -> bool {
        log_content.chars().count() > self.config.segmentation_threshold
    }

    /// Run an analysis of the requested kind
    ///
    /// Only [`AnalysisKind::Comprehensive`] goes through segmentation; the
    /// focused kinds are always a single call.
    pub async fn run(
        &self,
        kind: AnalysisKind,
        log_content: &str,
        log_type: LogType,
    ) -> AnalysisOutcome {
        match kind {
            AnalysisKind::Comprehensive => self.analyze(log_content, log_type).await,
            _ => AnalysisOutcome::SinglePass(
                run_single(self.completion.as_ref(), kind, log_content, log_type).await,
            ),
        }
    }

    /// Comprehensive analysis of a log
    ///
    /// Never returns an error: anything escaping either path becomes
    /// [`AnalysisOutcome::Failed`].
    pub async fn analyze(&self, log_content: &str, log_type: LogType) -> AnalysisOutcome {
        if !self.needs_segmentation(log_content) {
            info!(
                "Single-pass analysis of {} log ({} chars)",
                log_type,
                log_content.chars().count()
            );
            return AnalysisOutcome::SinglePass(
                run_single(
                    self.completion.as_ref(),
                    AnalysisKind::Comprehensive,
                    log_content,
                    log_type,
                )
                .await,
            );
        }

        match self.analyze_segmented(log_content, log_type).await {
            Ok(report) => AnalysisOutcome::Segmented(report),
            Err(e) => {
                tracing::error!("Segmented analysis aborted: {}", e);
                AnalysisOutcome::Failed {
                    log_type,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn analyze_segmented(
        &self,
        log_content: &str,
        log_type: LogType,
    ) -> Result<AggregatedReport> {
        let run_id = Uuid::new_v4();
        let start = Instant::now();

        let segments = Segmenter::from_config(&self.config).segment(log_content)?;
        let total = segments.len();

        info!(
            "[{}] Segmented {} log ({} chars) into {} segments",
            run_id,
            log_type,
            log_content.chars().count(),
            total
        );

        let analyzer = SegmentAnalyzer::new(self.completion.as_ref());
        let mut context = ContextSummary::default();
        let mut results = Vec::with_capacity(total);

        for (i, segment) in segments.iter().enumerate() {
            let index = i + 1;
            let result = analyzer
                .analyze_segment(segment, log_type, index, total, &context)
                .await;

            // A failed segment leaves the previous context in place
            if let Some(analysis) = result.analysis() {
                context = extract_context_with_limit(analysis, self.config.context_max_lines);
            }

            info!(
                "[{}] Segment {}/{} {}",
                run_id,
                index,
                total,
                if result.is_success() { "analyzed" } else { "failed" }
            );
            results.push(result);
        }

        let report = Aggregator::new(self.completion.as_ref())
            .aggregate(run_id, results, log_type)
            .await;

        info!(
            "[{}] Analysis finished in {}ms: {} succeeded, {} failed",
            run_id,
            start.elapsed().as_millis(),
            report.successful_segments,
            report.failed_segments
        );

        Ok(report)
    }
}
