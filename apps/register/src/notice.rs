//! Blocking notices (the cashier must acknowledge them).

use std::sync::{Mutex, PoisonError};

use tracing::warn;

/// Shows a modal notice. Returns once it has been shown.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Writes notices to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        warn!(notice = %message, "Showing notice");
        eprintln!("!! {}", message);
    }
}

/// Keeps notices in memory.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<String>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for NoticeLog {
    fn alert(&self, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
