//! Status line: broker session events verbatim plus local notices

use crate::domain::SessionEvent;

#[derive(Debug, Clone)]
pub struct StatusPanel {
    /// Last session event, rendered as received
    message: String,
    /// Dashboard-side notice (loading, fetch failures)
    notice: Option<String>,
}

impl StatusPanel {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            message: initial.into(),
            notice: None,
        }
    }

    pub fn on_session_event(&mut self, event: &SessionEvent) {
        self.message = event.to_string();
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self::new("logging in...")
    }
}
