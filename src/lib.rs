//! logsage - device log analysis with LLM assistance
//!
//! Splits oversized logs into overlapping segments, analyzes each one while
//! carrying a rolling context summary forward, tolerates per-segment failures,
//! and synthesizes everything into a single diagnostic report.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod report;

pub use error::{LogsageError, Result};
