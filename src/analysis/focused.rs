// Single-call analysis modes
use crate::analysis::prompts;
use crate::analysis::types::{AnalysisKind, LogType, SingleResult};
use crate::llm::Completion;

/// Run one collaborator call over the whole log for `kind`
///
/// Used by the single-pass path and by the error-pattern and issue-summary
/// modes. Failures come back as an unsuccessful [`SingleResult`].
pub async fn run_single(
    completion: &dyn Completion,
    kind: AnalysisKind,
    log_content: &str,
    log_type: LogType,
) -> SingleResult {
    let system = prompts::system_prompt_for(kind, log_type);
    let user = prompts::focused_prompt(kind, log_content, log_type);

    match completion.complete(system, &user).await {
        Ok(analysis) => SingleResult::succeeded(log_type, kind, analysis),
        Err(e) => {
            tracing::warn!("{:?} analysis failed: {}", kind, e);
            SingleResult::failed(log_type, kind, format!("analysis failed: {}", e))
        }
    }
}
