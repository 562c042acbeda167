//! Read-only projections of [`TimerState`].
//!
//! Recomputed on every read, never stored as authoritative.

use serde::{Deserialize, Serialize};

use super::config::IntervalType;
use super::state::{predict_next, TimerState};
use crate::error::{Result, TimerError};

/// Format whole seconds as zero-padded `MM:SS`.
///
/// Minutes are unbounded ("125:00" is valid output, no hour rollover). A
/// negative input is a reducer or configuration bug and is surfaced, not
/// swallowed.
pub fn format_time(seconds: i64) -> Result<String> {
    if seconds < 0 {
        return Err(TimerError::InvalidDuration { seconds });
    }
    let minutes = seconds / 60;
    let secs = seconds % 60;
    Ok(format!("{minutes:02}:{secs:02}"))
}

/// Derived values for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedView {
    /// `MM:SS`, zero-padded, minutes unbounded.
    pub formatted_time: String,
    /// Elapsed fraction in `[0, 1]`, rounded to 3 decimals.
    pub progress: f64,
    /// `progress` as a percentage string, e.g. `"25.00%"`.
    pub progress_percent: String,
    /// The interval an automatic advance would move into, computed from
    /// current (not hypothetical post-advance) state.
    pub next_type: IntervalType,
}

impl DerivedView {
    pub fn project(state: &TimerState) -> Result<Self> {
        let total = state.config.duration_for(state.current_type);
        let raw = if total == 0 {
            1.0
        } else {
            1.0 - f64::from(state.remaining_secs) / f64::from(total)
        };
        let progress = (raw * 1000.0).round() / 1000.0;
        Ok(Self {
            formatted_time: format_time(i64::from(state.remaining_secs))?,
            progress,
            progress_percent: format!("{:.2}%", progress * 100.0),
            next_type: predict_next(
                state.current_type,
                state.completed_pomodoros,
                state.config.long_break_interval,
            ),
        })
    }
}

/// One immutable per-update read unit: raw state plus its projection.
///
/// Consumers only ever see snapshots; the live state is owned by the session
/// and mutated exclusively through dispatched actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: TimerState,
    pub view: DerivedView,
}

impl Snapshot {
    pub fn of(state: &TimerState) -> Result<Self> {
        Ok(Self {
            state: state.clone(),
            view: DerivedView::project(state)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{initialize, Config};

    #[test]
    fn format_time_pads_both_fields() {
        assert_eq!(format_time(125).unwrap(), "02:05");
        assert_eq!(format_time(0).unwrap(), "00:00");
        assert_eq!(format_time(59).unwrap(), "00:59");
        assert_eq!(format_time(60).unwrap(), "01:00");
    }

    #[test]
    fn format_time_minutes_are_unbounded() {
        assert_eq!(format_time(7500).unwrap(), "125:00");
    }

    #[test]
    fn format_time_rejects_negative() {
        assert!(matches!(
            format_time(-1),
            Err(TimerError::InvalidDuration { seconds: -1 })
        ));
    }

    #[test]
    fn project_quarter_elapsed() {
        let mut state = initialize(Config::default(), IntervalType::Pomodoro).unwrap();
        state.remaining_secs = 1125;
        let view = DerivedView::project(&state).unwrap();
        assert_eq!(view.formatted_time, "18:45");
        assert_eq!(view.progress, 0.25);
        assert_eq!(view.progress_percent, "25.00%");
    }

    #[test]
    fn progress_rounds_to_three_decimals() {
        let mut state = initialize(Config::default(), IntervalType::Pomodoro).unwrap();
        state.remaining_secs = 1000; // 1 - 1000/1500 = 0.3333...
        let view = DerivedView::project(&state).unwrap();
        assert_eq!(view.progress, 0.333);
        assert_eq!(view.progress_percent, "33.30%");
    }

    #[test]
    fn fresh_state_has_zero_progress() {
        let state = initialize(Config::default(), IntervalType::Pomodoro).unwrap();
        let view = DerivedView::project(&state).unwrap();
        assert_eq!(view.progress, 0.0);
        assert_eq!(view.progress_percent, "0.00%");
        assert_eq!(view.next_type, IntervalType::ShortBreak);
    }

    #[test]
    fn next_type_reflects_cycle_position() {
        let mut state = initialize(Config::default(), IntervalType::Pomodoro).unwrap();
        state.completed_pomodoros = 3;
        let view = DerivedView::project(&state).unwrap();
        assert_eq!(view.next_type, IntervalType::LongBreak);
    }

    #[test]
    fn snapshot_carries_state_and_view() {
        let state = initialize(Config::default(), IntervalType::Pomodoro).unwrap();
        let snap = Snapshot::of(&state).unwrap();
        assert_eq!(snap.state, state);
        assert_eq!(snap.view.formatted_time, "25:00");
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let state = initialize(Config::default(), IntervalType::Pomodoro).unwrap();
        let snap = Snapshot::of(&state).unwrap();
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["view"]["formatted_time"], "25:00");
        assert_eq!(json["state"]["current_type"], "pomodoro");
    }
}
