use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    shown_at: Instant,
}

/// One transient banner. A new alert replaces the current one and restarts
/// the dismissal timer.
#[derive(Debug, Clone)]
pub struct AlertSlot {
    timeout: Duration,
    current: Option<Alert>,
}

impl AlertSlot {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            current: None,
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show_at(AlertKind::Success, message.into(), Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show_at(AlertKind::Error, message.into(), Instant::now());
    }

    pub fn show_at(&mut self, kind: AlertKind, message: String, now: Instant) {
        log::debug!("alert {kind:?}: {message}");
        self.current = Some(Alert {
            kind,
            message,
            shown_at: now,
        });
    }

    /// Drops the alert once its time is up and returns what is still visible.
    pub fn visible_at(&mut self, now: Instant) -> Option<&Alert> {
        if self
            .current
            .as_ref()
            .is_some_and(|alert| now.saturating_duration_since(alert.shown_at) >= self.timeout)
        {
            self.current = None;
        }
        self.current.as_ref()
    }

    pub fn visible(&mut self) -> Option<&Alert> {
        self.visible_at(Instant::now())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
