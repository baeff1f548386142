//! Bounded input history with cursor navigation.

use std::collections::VecDeque;

/// Ring buffer of submitted inputs, most recent first.
///
/// The cursor is `None` while not browsing; `Some(0)` is the newest entry.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    capacity: usize,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            cursor: None,
        }
    }

    /// Record an input, evicting the oldest past capacity. Stops browsing.
    pub fn push(&mut self, input: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(input.into());
        self.entries.truncate(self.capacity);
        self.cursor = None;
    }

    /// Step toward older entries. `None` when there is nothing older.
    pub fn older(&mut self) -> Option<String> {
        let next = self.cursor.map_or(0, |c| c + 1);
        let entry = self.entries.get(next)?.clone();
        self.cursor = Some(next);
        Some(entry)
    }

    /// Step toward newer entries.
    ///
    /// Moving past the newest entry stops browsing and yields an empty input.
    pub fn newer(&mut self) -> String {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.entries[c - 1].clone()
            }
            _ => {
                self.cursor = None;
                String::new()
            }
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
