/// Transcript: the append-only record of prompts and command output, plus
/// the one live prompt line that is still being edited.
///
/// Committed lines are never rewritten. When the scrollback cap is reached
/// the oldest lines fall off the front.

use crate::security::sanitize_output;
use std::collections::VecDeque;

pub const DEFAULT_SCROLLBACK: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Prompt,
    Output,
    Error,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub kind: LineKind,
    pub text: String,
}

/// One visual row after wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine {
    pub kind: LineKind,
    pub text: String,
}

pub struct Transcript {
    lines: VecDeque<TranscriptLine>,
    live: Option<String>,
    max_lines: usize,
}

impl Transcript {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            live: None,
            max_lines: max_lines.max(1),
        }
    }

    /// Append `text`, one committed line per `\n`. A trailing newline does not
    /// produce an empty last line.
    pub fn push(&mut self, kind: LineKind, text: &str) {
        let text = text.strip_suffix('\n').unwrap_or(text);
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            self.push_line(TranscriptLine {
                kind,
                text: sanitize_output(line),
            });
        }
    }

    fn push_line(&mut self, line: TranscriptLine) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    pub fn set_live(&mut self, text: impl Into<String>) {
        self.live = Some(text.into());
    }

    /// Freeze the live line into the committed record.
    pub fn commit_live(&mut self, kind: LineKind) {
        if let Some(text) = self.live.take() {
            self.push_line(TranscriptLine {
                kind,
                text: sanitize_output(&text),
            });
        }
    }

    pub fn live(&self) -> Option<&str> {
        self.live.as_deref()
    }

    pub fn lines(&self) -> impl Iterator<Item = &TranscriptLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.live.is_none()
    }

    /// Total visual rows when wrapped to `cols`.
    pub fn wrapped_row_count(&self, cols: usize) -> usize {
        let cols = cols.max(1);
        let committed: usize = self.lines.iter().map(|l| rows_for(&l.text, cols)).sum();
        committed + self.live.as_deref().map_or(0, |l| rows_for(l, cols))
    }

    /// The `rows` visual rows ending `scroll_back` rows above the bottom.
    /// `scroll_back` is clamped so the top of the transcript is the limit.
    pub fn viewport(&self, cols: usize, rows: usize, scroll_back: usize) -> Vec<ViewLine> {
        let cols = cols.max(1);
        if rows == 0 {
            return Vec::new();
        }
        let total = self.wrapped_row_count(cols);
        let scroll_back = scroll_back.min(total.saturating_sub(rows));
        let wanted = rows + scroll_back;

        // Walk from the bottom, wrapping only as much as is visible.
        let live = self.live.as_deref().map(|text| (LineKind::Prompt, text));
        let committed = self.lines.iter().rev().map(|l| (l.kind, l.text.as_str()));
        let mut collected: Vec<ViewLine> = Vec::with_capacity(wanted);
        for (kind, text) in live.into_iter().chain(committed) {
            let wrapped = wrap(text, cols);
            for segment in wrapped.into_iter().rev() {
                collected.push(ViewLine { kind, text: segment });
            }
            if collected.len() >= wanted {
                break;
            }
        }

        collected.truncate(wanted);
        collected.reverse();
        let end = collected.len().saturating_sub(scroll_back);
        let start = end.saturating_sub(rows);
        collected.drain(start..end).collect()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLLBACK)
    }
}

fn rows_for(text: &str, cols: usize) -> usize {
    text.chars().count().div_ceil(cols).max(1)
}

fn wrap(text: &str, cols: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(cols).map(|c| c.iter().collect()).collect()
}
