// Line-preserving segmentation of oversized logs
//
// Segments are cut on line boundaries only. Each new segment is seeded with
// the tail of the lines already emitted so the model sees cross-boundary
// context.
use crate::analysis::types::Segment;
use crate::config::AnalysisConfig;
use crate::error::{LogsageError, Result};

/// Splits log text into ordered, overlapping segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    /// Character budget per segment (line terminators included)
    max_chars: usize,
    /// Lines repeated from the previous segment
    overlap_lines: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            max_chars: 8_000,
            overlap_lines: 5,
        }
    }
}

impl Segmenter {
    pub fn new(max_chars: usize, overlap_lines: usize) -> Self {
        Self {
            max_chars,
            overlap_lines,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.segment_max_chars, config.overlap_lines)
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn overlap_lines(&self) -> usize {
        self.overlap_lines
    }

    /// Split `text` into segments
    ///
    /// Empty or whitespace-only input yields no segments. A single line longer
    /// than the budget becomes its own (oversized) segment rather than being
    /// split.
    pub fn segment(&self, text: &str) -> Result<Vec<Segment>> {
        if self.max_chars == 0 {
            return Err(LogsageError::InvalidConfigValue {
                path: "analysis.segment_max_chars".to_string(),
                message: "Segment budget must be greater than 0".to_string(),
            });
        }

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let lines: Vec<&str> = text.lines().collect();
        let mut segments = Vec::new();

        let mut buffer = SegmentBuffer::new(0, 0);

        for (i, line) in lines.iter().enumerate() {
            let line_chars = line.chars().count() + 1;

            if buffer.has_fresh_lines() && buffer.chars + line_chars > self.max_chars {
                // Whitespace-only runs never become segments of their own
                if buffer.has_content(&lines, i) {
                    segments.push(buffer.close(&lines, segments.len() + 1, i));
                }

                let overlap_start = i.saturating_sub(self.overlap_lines);
                buffer = SegmentBuffer::new(overlap_start, i - overlap_start);
                buffer.chars = lines[overlap_start..i]
                    .iter()
                    .map(|l| l.chars().count() + 1)
                    .sum();
            }

            buffer.fresh += 1;
            buffer.chars += line_chars;
        }

        if buffer.has_fresh_lines() {
            let end = lines.len();
            if buffer.has_content(&lines, end) {
                segments.push(buffer.close(&lines, segments.len() + 1, end));
            }
        }

        tracing::debug!(
            "Segmented {} lines into {} segments (budget {} chars, overlap {} lines)",
            lines.len(),
            segments.len(),
            self.max_chars,
            self.overlap_lines
        );

        Ok(segments)
    }
}

/// Accumulator for the segment under construction
struct SegmentBuffer {
    start: usize,
    overlap: usize,
    fresh: usize,
    chars: usize,
}

impl SegmentBuffer {
    fn new(start: usize, overlap: usize) -> Self {
        Self {
            start,
            overlap,
            fresh: 0,
            chars: 0,
        }
    }

    fn has_fresh_lines(&self) -> bool {
        self.fresh > 0
    }

    /// Whether any fresh line up to `end` holds non-whitespace text
    fn has_content(&self, lines: &[&str], end: usize) -> bool {
        lines[self.start + self.overlap..end]
            .iter()
            .any(|line| !line.trim().is_empty())
    }

    fn close(&self, lines: &[&str], index: usize, end: usize) -> Segment {
        Segment {
            index,
            start_line: self.start,
            end_line: end,
            overlap_lines: self.overlap,
            text: lines[self.start..end].join("\n").trim_end().to_string(),
        }
    }
}
