//! Callback payloads delivered by the tour renderer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution phase of a tour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourStatus {
    /// Registered, never run
    #[default]
    Ready,
    /// Steps are being shown
    Running,
    /// The user went through every step
    Finished,
    /// The user left before the end
    Skipped,
    /// The renderer reported a failure
    Error,
}

impl TourStatus {
    /// Whether this status ends a run
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Skipped | Self::Error)
    }
}

impl fmt::Display for TourStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Skipped => "skipped",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// One callback from the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourEvent {
    /// Reported status
    pub status: TourStatus,

    /// Reported step index
    #[serde(default)]
    pub index: usize,

    /// User action that triggered the callback (`next`, `prev`, `close`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Renderer lifecycle phase (`tooltip`, `complete`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<String>,
}

impl TourEvent {
    /// Create event with status and step index
    #[inline]
    #[must_use]
    pub fn new(status: TourStatus, index: usize) -> Self {
        Self {
            status,
            index,
            action: None,
            lifecycle: None,
        }
    }

    /// `Running` at `index`
    #[inline]
    #[must_use]
    pub fn running(index: usize) -> Self {
        Self::new(TourStatus::Running, index)
    }

    /// `Finished`
    #[inline]
    #[must_use]
    pub fn finished(index: usize) -> Self {
        Self::new(TourStatus::Finished, index)
    }

    /// `Skipped`
    #[inline]
    #[must_use]
    pub fn skipped(index: usize) -> Self {
        Self::new(TourStatus::Skipped, index)
    }

    /// `Error`
    #[inline]
    #[must_use]
    pub fn error(index: usize) -> Self {
        Self::new(TourStatus::Error, index)
    }

    /// With action
    #[inline]
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Kind of notification produced by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    /// Tour entered `Running`
    Started,
    /// A `Running` event was received
    StepChanged,
    /// Tour entered `Finished`
    Finished,
    /// Tour entered `Skipped`
    Skipped,
    /// Tour entered `Error`
    Errored,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Started => "started",
            Self::StepChanged => "stepChanged",
            Self::Finished => "finished",
            Self::Skipped => "skipped",
            Self::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// Notification emitted by a tour, carrying the triggering payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourNotification {
    /// What happened
    pub kind: NotificationKind,
    /// Event that caused it
    pub event: TourEvent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_from_renderer_json() {
        let event: TourEvent = serde_json::from_value(json!({
            "status": "running",
            "index": 2,
            "action": "next",
            "lifecycle": "complete",
            "type": "step:after"
        }))
        .unwrap();

        assert_eq!(event.status, TourStatus::Running);
        assert_eq!(event.index, 2);
        assert_eq!(event.action.as_deref(), Some("next"));
    }

    #[test]
    fn missing_index_defaults_to_zero() {
        let event: TourEvent = serde_json::from_value(json!({ "status": "finished" })).unwrap();
        assert_eq!(event, TourEvent::finished(0));
    }

    #[test]
    fn terminal_statuses() {
        assert!(TourStatus::Finished.is_terminal());
        assert!(TourStatus::Skipped.is_terminal());
        assert!(TourStatus::Error.is_terminal());
        assert!(!TourStatus::Running.is_terminal());
        assert!(!TourStatus::Ready.is_terminal());
    }
}
