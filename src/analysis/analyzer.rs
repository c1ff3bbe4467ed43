// Per-segment analysis against the completion collaborator
use crate::analysis::prompts::{self, Position};
use crate::analysis::types::{ContextSummary, LogType, Segment, SegmentResult};
use crate::llm::Completion;
use tracing::{debug, warn};

/// Analyzes one segment at a time
///
/// Never fails: every collaborator error is folded into a
/// [`SegmentResult::Failure`] so the caller can move on to the next segment.
pub struct SegmentAnalyzer<'a> {
    completion: &'a dyn Completion,
}

impl<'a> SegmentAnalyzer<'a> {
    pub fn new(completion: &'a dyn Completion) -> Self {
        Self { completion }
    }

    /// Analyze `segment` as segment `index` of `total`
    pub async fn analyze_segment(
        &self,
        segment: &Segment,
        log_type: LogType,
        index: usize,
        total: usize,
        prior_context: &ContextSummary,
    ) -> SegmentResult {
        let system = prompts::system_prompt(log_type);
        let user = prompts::segment_prompt(
            &segment.text,
            log_type,
            Position::Segment { index, total },
            prior_context,
        );

        debug!(
            "Analyzing segment {}/{} ({} chars, lines {}..{})",
            index,
            total,
            segment.char_len(),
            segment.start_line,
            segment.end_line
        );

        match self.completion.complete(system, &user).await {
            Ok(analysis) => SegmentResult::success(index, total, analysis),
            Err(e) => {
                warn!("Segment {}/{} analysis failed: {}", index, total, e);
                SegmentResult::failure(index, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        reply: Option<&'static str>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Completion for Recording {
        async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            self.reply
                .map(str::to_string)
                .ok_or(LlmError::EmptyResponse)
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn segment(text: &str) -> Segment {
        Segment {
            index: 2,
            start_line: 10,
            end_line: 20,
            overlap_lines: 5,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_carries_position() {
        let completion = Recording {
            reply: Some("looks fine"),
            prompts: Mutex::new(Vec::new()),
        };
        let analyzer = SegmentAnalyzer::new(&completion);
        let context = ContextSummary::new(vec!["Critical: HWC timeout".to_string()]);

        let result = analyzer
            .analyze_segment(&segment("vsync lost"), LogType::Display, 2, 4, &context)
            .await;

        assert_eq!(result, SegmentResult::success(2, 4, "looks fine"));

        let prompts = completion.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, prompts::system_prompt(LogType::Display));
        assert!(prompts[0].1.contains("segment 2 of 4"));
        assert!(prompts[0].1.contains("Critical: HWC timeout"));
        assert!(prompts[0].1.contains("vsync lost"));
    }

    #[tokio::test]
    async fn test_failure_is_captured() {
        let completion = Recording {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        };
        let analyzer = SegmentAnalyzer::new(&completion);

        let result = analyzer
            .analyze_segment(&segment("x"), LogType::General, 3, 3, &ContextSummary::default())
            .await;

        assert!(!result.is_success());
        assert_eq!(result.index(), 3);
        assert_eq!(result.error(), Some("Endpoint returned no usable content"));
    }
}
