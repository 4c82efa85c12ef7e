//! Notifier implementations.

use std::sync::{Arc, Mutex};

use crate::ports::{Notice, Notifier};

/// Collects notices in memory so tests can assert on them.
#[derive(Debug, Default, Clone)]
pub struct MemoryNotifier {
    notices: Arc<Mutex<Vec<(Notice, String)>>>,
}

impl MemoryNotifier {
    pub fn notices(&self) -> Vec<(Notice, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.texts().iter().any(|text| text.contains(fragment))
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, kind: Notice, text: &str) {
        self.notices.lock().unwrap().push((kind, text.to_string()));
    }
}

/// Prints notices to stdout with a bracketed prefix, the way the reference
/// host renders them in chat.
#[derive(Debug, Clone)]
pub struct StdoutNotifier {
    prefix: String,
}

impl StdoutNotifier {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Notifier for StdoutNotifier {
    fn notify(&self, kind: Notice, text: &str) {
        match kind {
            Notice::Error => println!("[{}] Error: {}", self.prefix, text),
            _ => println!("[{}] {}", self.prefix, text),
        }
    }
}
