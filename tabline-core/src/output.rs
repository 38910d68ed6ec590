//! Text sink for console output and suggestion listings.

use std::collections::VecDeque;

/// Accepts display lines. Fire-and-forget.
pub trait TextSink {
    fn push_line(&mut self, line: &str);

    fn extend_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        Self: Sized,
    {
        for line in lines {
            self.push_line(line.as_ref());
        }
    }
}

impl TextSink for Vec<String> {
    fn push_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Bounded scrollback, newest line first.
#[derive(Debug, Clone)]
pub struct OutputLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl OutputLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Up to `count` lines, newest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &str> {
        self.lines.iter().take(count).map(String::as_str)
    }

    /// All retained lines, newest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn newest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for OutputLog {
    fn default() -> Self {
        Self::new(256)
    }
}

impl TextSink for OutputLog {
    fn push_line(&mut self, line: &str) {
        if self.lines.len() == self.capacity {
            self.lines.pop_back();
        }
        self.lines.push_front(line.to_string());
    }
}
