// Shared test doubles for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use logsage::llm::{Completion, LlmError};
use std::sync::Mutex;

/// Completion double that records every call and decides replies from the
/// user prompt
pub struct FakeCompletion {
    /// Prompts containing any of these substrings fail
    pub fail_on: Vec<String>,
    /// Fail every call
    pub always_fail: bool,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeCompletion {
    pub fn healthy() -> Self {
        Self {
            fail_on: Vec::new(),
            always_fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: vec![pattern.to_string()],
            ..Self::healthy()
        }
    }

    pub fn broken() -> Self {
        Self {
            always_fail: true,
            ..Self::healthy()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn user_prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, user)| user.clone())
            .collect()
    }
}

#[async_trait]
impl Completion for FakeCompletion {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((system.to_string(), user.to_string()));
            calls.len()
        };

        if self.always_fail || self.fail_on.iter().any(|p| user.contains(p.as_str())) {
            return Err(LlmError::Status {
                status: 429,
                body: "rate limited".to_string(),
            });
        }

        Ok(format!("Analysis #{}: Important: buffer underrun observed", n))
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

/// Log made of fixed-width lines, `width` chars each including the newline
pub fn fixed_width_log(total_chars: usize, width: usize) -> String {
    let lines = total_chars / width;
    (0..lines)
        .map(|i| {
            let prefix = format!("{:06} E/AudioTrack: ", i);
            format!("{}{}", prefix, "x".repeat(width - 1 - prefix.len()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
