//! The timer reducer: a pure transition function over [`TimerState`].
//!
//! `apply` is total and side-effect free. It knows nothing about wall-clock
//! time or cycle-counting policy beyond incrementing the pomodoro counter --
//! "what is the next interval" is resolved by the caller (see
//! [`predict_next`] and the session controller) and handed in via
//! [`Action::Advance`].

use serde::{Deserialize, Serialize};

use super::config::{Config, ConfigPatch, IntervalType};
use crate::error::Result;

/// The mutable core entity. Mutated exclusively through [`apply`].
///
/// Invariants:
/// - `remaining_secs` is always within `[0, config.duration_for(current_type)]`
/// - `completed_pomodoros` only increments when leaving a pomodoro via
///   [`Action::Advance`], never via manual type change or reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub config: Config,
    pub current_type: IntervalType,
    pub remaining_secs: u32,
    pub paused: bool,
    pub completed_pomodoros: u32,
}

/// Dispatched actions and their tabled effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// One elapsed second: decrement `remaining_secs`, floored at 0.
    Tick,
    /// Deadline-corrected tick: set `remaining_secs` to an absolute value
    /// recomputed from the wall-clock deadline, clamped to the current
    /// interval's duration.
    SyncRemaining(u32),
    Start,
    Stop,
    /// Back to a fresh pomodoro; clears the long-break cycle counter.
    Reset,
    /// Automatic progression into the resolved next interval. The counter
    /// increments iff the interval being left is a pomodoro.
    Advance(IntervalType),
    /// Manual override: full duration of the chosen interval, paused. The
    /// cycle counter is deliberately untouched.
    ChangeType(IntervalType),
    /// Merge a partial config, then reset to a paused pomodoro at the
    /// (possibly new) pomodoro duration.
    ChangeConfig(ConfigPatch),
}

/// Build the initial state for a session.
///
/// `remaining_secs` is the full duration of `initial_type`; the state starts
/// paused unless the config auto-starts that interval kind.
pub fn initialize(config: Config, initial_type: IntervalType) -> Result<TimerState> {
    config.validate()?;
    let remaining_secs = config.duration_for(initial_type);
    let paused = !config.should_auto_start(initial_type);
    Ok(TimerState {
        config,
        current_type: initial_type,
        remaining_secs,
        paused,
        completed_pomodoros: 0,
    })
}

/// Apply one action. Pure, deterministic, never fails.
pub fn apply(state: &TimerState, action: &Action) -> TimerState {
    let mut next = state.clone();
    match action {
        Action::Tick => {
            next.remaining_secs = next.remaining_secs.saturating_sub(1);
        }
        Action::SyncRemaining(secs) => {
            next.remaining_secs = (*secs).min(next.config.duration_for(next.current_type));
        }
        Action::Start => {
            next.paused = false;
        }
        Action::Stop => {
            next.paused = true;
        }
        Action::Reset => {
            next.current_type = IntervalType::Pomodoro;
            next.remaining_secs = next.config.pomodoro_secs;
            next.paused = true;
            next.completed_pomodoros = 0;
        }
        Action::Advance(to) => {
            if next.current_type == IntervalType::Pomodoro {
                next.completed_pomodoros += 1;
            }
            next.current_type = *to;
            next.remaining_secs = next.config.duration_for(*to);
            next.paused = !next.config.should_auto_start(*to);
        }
        Action::ChangeType(to) => {
            next.current_type = *to;
            next.remaining_secs = next.config.duration_for(*to);
            next.paused = true;
        }
        Action::ChangeConfig(patch) => {
            next.config = patch.apply_to(&next.config);
            next.current_type = IntervalType::Pomodoro;
            next.remaining_secs = next.config.pomodoro_secs;
            next.paused = true;
        }
    }
    next
}

/// Resolve the interval that follows `current`.
///
/// Must be called on pre-advance state: the pomodoro currently finishing is
/// not yet counted in `completed_pomodoros`, hence the `+ 1`.
pub fn predict_next(
    current: IntervalType,
    completed_pomodoros: u32,
    long_break_interval: u32,
) -> IntervalType {
    match current {
        IntervalType::ShortBreak | IntervalType::LongBreak => IntervalType::Pomodoro,
        IntervalType::Pomodoro => {
            if completed_pomodoros > 0 && (completed_pomodoros + 1) % long_break_interval == 0 {
                IntervalType::LongBreak
            } else {
                IntervalType::ShortBreak
            }
        }
    }
}
