// Second-pass synthesis of per-segment analyses
use crate::analysis::prompts;
use crate::analysis::types::{AggregatedReport, LogType, ReportStatus, SegmentResult};
use crate::llm::Completion;
use chrono::{DateTime, Local};
use tracing::{info, warn};
use uuid::Uuid;

/// Combines segment results into the final report
pub struct Aggregator<'a> {
    completion: &'a dyn Completion,
}

impl<'a> Aggregator<'a> {
    pub fn new(completion: &'a dyn Completion) -> Self {
        Self { completion }
    }

    /// Aggregate `results` (in segment order) into a report
    ///
    /// The collaborator is called once, and only if at least one segment
    /// succeeded.
    pub async fn aggregate(
        &self,
        run_id: Uuid,
        results: Vec<SegmentResult>,
        log_type: LogType,
    ) -> AggregatedReport {
        let (successes, failures): (Vec<&SegmentResult>, Vec<&SegmentResult>) =
            results.iter().partition(|r| r.is_success());

        let total = results.len();
        let successful = successes.len();
        let failed = failures.len();
        let generated_at = Local::now();

        let status = if successes.is_empty() {
            warn!("[{}] All {} segments failed, skipping integration", run_id, failed);
            ReportStatus::AllSegmentsFailed
        } else {
            info!(
                "[{}] Integrating {} of {} segment analyses",
                run_id, successful, total
            );

            let system = prompts::system_prompt(log_type);
            let user = prompts::integration_prompt(&results, log_type);

            match self.completion.complete(system, &user).await {
                Ok(integrated) => ReportStatus::Complete {
                    narrative: render_narrative(
                        total,
                        successful,
                        &failures,
                        &integrated,
                        generated_at,
                    ),
                },
                Err(e) => {
                    warn!("[{}] Integration call failed: {}", run_id, e);
                    ReportStatus::IntegrationFailed {
                        error: format!("integration failed: {}", e),
                        partial_results: successes.into_iter().cloned().collect(),
                    }
                }
            }
        };

        AggregatedReport {
            run_id,
            log_type,
            total_segments: total,
            successful_segments: successful,
            failed_segments: failed,
            segments: results,
            status,
            generated_at,
        }
    }
}

/// Header block, integrated narrative, then the failure appendix if any
fn render_narrative(
    total: usize,
    successful: usize,
    failures: &[&SegmentResult],
    integrated: &str,
    generated_at: DateTime<Local>,
) -> String {
    let mut out = String::new();

    out.push_str("# Segmented Log Analysis\n\n");
    out.push_str(&format!("- Total segments: {}\n", total));
    out.push_str(&format!("- Analyzed successfully: {}\n", successful));
    out.push_str(&format!("- Failed: {}\n", failures.len()));
    out.push_str(&format!(
        "- Generated: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str(integrated.trim());
    out.push('\n');

    if !failures.is_empty() {
        out.push_str("\n## Appendix: Failed Segments\n\n");
        for failure in failures {
            out.push_str(&format!(
                "- Segment {}: {}\n",
                failure.index(),
                failure.error().unwrap_or_default()
            ));
        }
    }

    out
}
