//! Interval types and timer configuration.
//!
//! `Config` is a value object: immutable once applied to a state. Partial
//! updates go through [`ConfigPatch`], which merges over an existing config
//! and is validated before being dispatched.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimerError};

/// Which configured duration applies to the current interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntervalType {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl IntervalType {
    pub fn is_break(self) -> bool {
        matches!(self, IntervalType::ShortBreak | IntervalType::LongBreak)
    }

    pub fn label(self) -> &'static str {
        match self {
            IntervalType::Pomodoro => "Pomodoro",
            IntervalType::ShortBreak => "Short Break",
            IntervalType::LongBreak => "Long Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMode {
    /// Notify once, `lead_time_secs` before the interval ends.
    Last,
    /// Notify on every interval boundary.
    Every,
}

/// Describes when a notification should fire relative to interval end.
///
/// Delivery is the host's business: observers see the events and this policy
/// and decide what to do. The core never fires anything itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    pub mode: NotificationMode,
    pub lead_time_secs: u32,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            mode: NotificationMode::Last,
            lead_time_secs: 5 * 60,
        }
    }
}

/// Timer configuration.
///
/// Invariant: all durations are positive and `long_break_interval >= 1`,
/// enforced by [`Config::validate`] at construction and merge time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Pomodoro duration in seconds.
    pub pomodoro_secs: u32,
    /// Short break duration in seconds.
    pub short_break_secs: u32,
    /// Long break duration in seconds.
    pub long_break_secs: u32,
    /// Whether entering a break auto-resumes counting.
    pub auto_start_breaks: bool,
    /// Whether entering a pomodoro auto-resumes counting.
    pub auto_start_pomodoros: bool,
    /// Completed pomodoros before a long break is inserted.
    pub long_break_interval: u32,
    pub notification: NotificationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pomodoro_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            auto_start_breaks: false,
            auto_start_pomodoros: false,
            long_break_interval: 4,
            notification: NotificationPolicy::default(),
        }
    }
}

impl Config {
    /// The configured duration for `interval`, in seconds.
    pub fn duration_for(&self, interval: IntervalType) -> u32 {
        match interval {
            IntervalType::Pomodoro => self.pomodoro_secs,
            IntervalType::ShortBreak => self.short_break_secs,
            IntervalType::LongBreak => self.long_break_secs,
        }
    }

    /// Whether transitioning into `interval` should resume counting
    /// without an explicit start.
    pub fn should_auto_start(&self, interval: IntervalType) -> bool {
        if interval.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_pomodoros
        }
    }

    /// Fail fast on a zero-length interval or a long-break cycle that could
    /// never complete.
    pub fn validate(&self) -> Result<()> {
        fn positive(field: &'static str, value: u32) -> Result<()> {
            if value == 0 {
                return Err(TimerError::InvalidConfig {
                    field,
                    message: "duration must be positive".into(),
                });
            }
            Ok(())
        }

        positive("pomodoro_secs", self.pomodoro_secs)?;
        positive("short_break_secs", self.short_break_secs)?;
        positive("long_break_secs", self.long_break_secs)?;
        if self.long_break_interval < 1 {
            return Err(TimerError::InvalidConfig {
                field: "long_break_interval",
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Partial configuration for merge-style updates.
///
/// Unset fields keep the value of the config being merged into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub pomodoro_secs: Option<u32>,
    pub short_break_secs: Option<u32>,
    pub long_break_secs: Option<u32>,
    pub auto_start_breaks: Option<bool>,
    pub auto_start_pomodoros: Option<bool>,
    pub long_break_interval: Option<u32>,
    pub notification: Option<NotificationPolicy>,
}

impl ConfigPatch {
    /// Merge this patch over `base`, field by field.
    pub fn apply_to(&self, base: &Config) -> Config {
        Config {
            pomodoro_secs: self.pomodoro_secs.unwrap_or(base.pomodoro_secs),
            short_break_secs: self.short_break_secs.unwrap_or(base.short_break_secs),
            long_break_secs: self.long_break_secs.unwrap_or(base.long_break_secs),
            auto_start_breaks: self.auto_start_breaks.unwrap_or(base.auto_start_breaks),
            auto_start_pomodoros: self
                .auto_start_pomodoros
                .unwrap_or(base.auto_start_pomodoros),
            long_break_interval: self.long_break_interval.unwrap_or(base.long_break_interval),
            notification: self.notification.unwrap_or(base.notification),
        }
    }
}
