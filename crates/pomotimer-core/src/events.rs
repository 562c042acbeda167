use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::IntervalType;

/// Every state change in a session produces an Event.
///
/// Hosts subscribe to events for side effects -- rendering, scheduling a
/// notification per the configured policy, logging. Observers receive the
/// event together with an immutable snapshot and must never mutate timer
/// state themselves; the only mutation path is dispatching through
/// [`Session`](crate::Session).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Started {
        interval: IntervalType,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    Stopped {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    Ticked {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    Reset {
        at: DateTime<Utc>,
    },
    /// Automatic progression after a countdown reached zero, or an explicit
    /// `advance()` call. `auto_started` reports whether the new interval
    /// began counting immediately per the auto-start configuration.
    Advanced {
        from: IntervalType,
        to: IntervalType,
        completed_pomodoros: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    /// Manual interval change; always leaves the session paused.
    TypeChanged {
        to: IntervalType,
        at: DateTime<Utc>,
    },
    ConfigChanged {
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Stable lowercase tag, handy for logs and test assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Started { .. } => "started",
            Event::Stopped { .. } => "stopped",
            Event::Ticked { .. } => "ticked",
            Event::Reset { .. } => "reset",
            Event::Advanced { .. } => "advanced",
            Event::TypeChanged { .. } => "typeChanged",
            Event::ConfigChanged { .. } => "configChanged",
        }
    }
}
