//! Event log — ring buffer of recent connection, publish and error events.

use std::collections::VecDeque;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct EventEntry {
    pub timestamp: SystemTime,
    pub level: EventLevel,
    pub message: String,
}

/// Bounded log, oldest entries evicted first.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<EventEntry>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(EventLevel::Info, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(EventLevel::Error, message.into());
    }

    fn push(&mut self, level: EventLevel, message: String) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(EventEntry {
            timestamp: SystemTime::now(),
            level,
            message,
        });
    }

    /// The `n` most recent entries, newest last.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &EventEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn entries(&self) -> impl Iterator<Item = &EventEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&EventEntry> {
        self.entries.back()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.info(format!("event {i}"));
        }
        assert_eq!(log.len(), 3);
        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["event 2", "event 3", "event 4"]);
    }

    #[test]
    fn recent_returns_newest_last() {
        let mut log = EventLog::default();
        log.info("connected");
        log.error("write failed");
        let recent: Vec<_> = log.recent(1).collect();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].message, "write failed");
        assert_eq!(recent[0].level, EventLevel::Error);
    }

    #[test]
    fn recent_more_than_len() {
        let mut log = EventLog::default();
        log.info("one");
        assert_eq!(log.recent(10).count(), 1);
    }

    #[test]
    fn default_capacity_is_fifty() {
        let mut log = EventLog::default();
        for i in 0..60 {
            log.info(i.to_string());
        }
        assert_eq!(log.len(), 50);
        assert_eq!(log.latest().unwrap().message, "59");
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut log = EventLog::new(0);
        log.info("a");
        log.info("b");
        assert_eq!(log.len(), 1);
    }
}
