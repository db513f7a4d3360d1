use std::time::{Duration, Instant};

/// A transient message that dismisses itself after a fixed lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub shown_at: Instant,
    pub lifetime: Duration,
}

impl Notice {
    pub fn new(text: impl Into<String>, lifetime: Duration) -> Self {
        Notice {
            text: text.into(),
            shown_at: Instant::now(),
            lifetime,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.lifetime
    }
}

/// Shown when the store could not be written
pub const SAVE_FAILED_TEXT: &str = "Could not save changes (see log)";

/// Text of the capacity notice
pub fn limit_reached_text(max_tasks: usize) -> String {
    format!("Task limit reached (max {})", max_tasks)
}
