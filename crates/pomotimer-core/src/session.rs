//! Session controller: wall-clock deadline tracking and automatic interval
//! progression.
//!
//! The session does not own a thread or a timer primitive. The host supplies
//! a repeating-callback scheduler: after every mutating call it re-reads
//! [`Session::cadence`] and (re)schedules its callback at that interval --
//! `None` means stop the scheduler. Each callback invokes [`Session::tick`].
//!
//! ## Elapsed-time strategy
//!
//! Deadline-based: starting captures `deadline = now + remaining`, and every
//! tick recomputes the remaining time directly from that deadline rather
//! than decrementing a counter. The displayed countdown is therefore
//! self-correcting against scheduler jitter and missed callbacks -- remaining
//! time is a function of the wall-clock deadline, not of how many ticks
//! happened to arrive.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;

use crate::error::Result;
use crate::events::Event;
use crate::timer::{
    apply, initialize, predict_next, Action, Config, ConfigPatch, IntervalType, Snapshot,
    TimerState,
};

/// Scheduler callback cadence while the timer is running.
pub const TICK_CADENCE: Duration = Duration::from_millis(1000);

/// Injectable time source for the deadline arithmetic.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Production clock backed by `SystemTime`.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Manually advanced clock for tests and simulations.
///
/// Clones share the same underlying instant, so a copy kept outside the
/// session can drive the one inside it.
#[derive(Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

type Observer = Box<dyn FnMut(&Event, &Snapshot)>;

/// Owns the [`TimerState`] and dispatches actions into it.
///
/// Single-writer: observers and snapshot readers only ever see immutable
/// data; the session is the sole mutation path.
pub struct Session {
    state: TimerState,
    /// Wall-clock end of the running interval (ms since epoch). Armed while
    /// running, disarmed on stop/reset/manual change.
    deadline_ms: Option<u64>,
    clock: Box<dyn Clock>,
    observers: Vec<Observer>,
}

impl Session {
    /// Create a session by merging `patch` over the default config.
    ///
    /// Starts on a pomodoro; starts counting immediately iff
    /// `auto_start_pomodoros` is set.
    pub fn new(patch: ConfigPatch) -> Result<Self> {
        Self::with_clock(patch, Box::new(SystemClock))
    }

    /// Like [`Session::new`] with an injected time source.
    pub fn with_clock(patch: ConfigPatch, clock: Box<dyn Clock>) -> Result<Self> {
        let config = patch.apply_to(&Config::default());
        config.validate()?;
        let state = initialize(config, IntervalType::Pomodoro)?;
        let mut session = Self {
            state,
            deadline_ms: None,
            clock,
            observers: Vec::new(),
        };
        if !session.state.paused {
            session.arm_deadline();
        }
        Ok(session)
    }

    // ── Read surface ─────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// One immutable snapshot per update: raw state plus derived view.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Snapshot::of(&self.state)
    }

    /// The interval the host's scheduler should fire at; `None` = stopped.
    ///
    /// Hosts must re-read this after every mutating call so pause-state
    /// changes stop or restart the scheduler synchronously.
    pub fn cadence(&self) -> Option<Duration> {
        if self.state.paused {
            None
        } else {
            Some(TICK_CADENCE)
        }
    }

    /// Register an observer for host-side side effects. Observers receive
    /// immutable borrows and cannot dispatch back into the session.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Event, &Snapshot) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    // ── Dispatch surface ─────────────────────────────────────────────

    /// Resume counting. No-op if already running.
    pub fn start(&mut self) -> Option<Event> {
        if !self.state.paused {
            return None;
        }
        self.state = apply(&self.state, &Action::Start);
        self.arm_deadline();
        let event = Event::Started {
            interval: self.state.current_type,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        };
        self.emit(&event);
        Some(event)
    }

    /// Pause counting. No-op if already paused.
    pub fn stop(&mut self) -> Option<Event> {
        if self.state.paused {
            return None;
        }
        self.state = apply(&self.state, &Action::Stop);
        self.deadline_ms = None;
        let event = Event::Stopped {
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        };
        self.emit(&event);
        Some(event)
    }

    /// Start if paused, stop otherwise.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.state.paused {
            self.start()
        } else {
            self.stop()
        }
    }

    /// Back to a fresh paused pomodoro; clears the cycle counter.
    pub fn reset(&mut self) -> Event {
        self.state = apply(&self.state, &Action::Reset);
        self.deadline_ms = None;
        let event = Event::Reset { at: Utc::now() };
        self.emit(&event);
        event
    }

    /// Manual interval override: full duration, paused, counter untouched.
    pub fn change_type(&mut self, to: IntervalType) -> Event {
        self.state = apply(&self.state, &Action::ChangeType(to));
        self.deadline_ms = None;
        let event = Event::TypeChanged { to, at: Utc::now() };
        self.emit(&event);
        event
    }

    /// Merge a partial config. Fails fast on an invalid merged result
    /// without touching the state; on success the session resets to a
    /// paused pomodoro at the new duration.
    pub fn change_config(&mut self, patch: ConfigPatch) -> Result<Event> {
        let merged = patch.apply_to(&self.state.config);
        merged.validate()?;
        self.state = apply(&self.state, &Action::ChangeConfig(patch));
        self.deadline_ms = None;
        let event = Event::ConfigChanged { at: Utc::now() };
        self.emit(&event);
        Ok(event)
    }

    /// Move into the predicted next interval now, as if the countdown had
    /// finished. Also the internal path taken on zero-crossing.
    pub fn advance(&mut self) -> Event {
        let from = self.state.current_type;
        let to = predict_next(
            from,
            self.state.completed_pomodoros,
            self.state.config.long_break_interval,
        );
        self.state = apply(&self.state, &Action::Advance(to));
        if self.state.paused {
            self.deadline_ms = None;
        } else {
            self.arm_deadline();
        }
        let event = Event::Advanced {
            from,
            to,
            completed_pomodoros: self.state.completed_pomodoros,
            auto_started: !self.state.paused,
            at: Utc::now(),
        };
        self.emit(&event);
        event
    }

    /// Scheduler callback entry point.
    ///
    /// Recomputes the remaining time from the captured deadline and, on the
    /// edge where it crosses from positive to exactly zero, advances into
    /// the next interval exactly once. Returns the `Advanced` event when
    /// that happens. Stale callbacks into a paused session are no-ops.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state.paused {
            return None;
        }
        let deadline = self.deadline_ms?;
        let before = self.state.remaining_secs;
        let remaining = remaining_secs_at(deadline, self.clock.now_ms());
        self.state = apply(&self.state, &Action::SyncRemaining(remaining));
        let event = Event::Ticked {
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        };
        self.emit(&event);
        if before > 0 && self.state.remaining_secs == 0 {
            return Some(self.advance());
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn arm_deadline(&mut self) {
        self.deadline_ms =
            Some(self.clock.now_ms() + u64::from(self.state.remaining_secs) * 1000);
    }

    fn emit(&mut self, event: &Event) {
        if self.observers.is_empty() {
            return;
        }
        if let Ok(snapshot) = Snapshot::of(&self.state) {
            for observer in &mut self.observers {
                observer(event, &snapshot);
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("deadline_ms", &self.deadline_ms)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Round-half-up seconds left until `deadline_ms`, saturating at 0.
fn remaining_secs_at(deadline_ms: u64, now_ms: u64) -> u32 {
    let diff = deadline_ms.saturating_sub(now_ms);
    ((diff + 500) / 1000) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn session_with(patch: ConfigPatch) -> (Session, ManualClock) {
        let clock = ManualClock::new();
        let session = Session::with_clock(patch, Box::new(clock.clone())).unwrap();
        (session, clock)
    }

    fn tick_seconds(session: &mut Session, clock: &ManualClock, secs: u32) {
        for _ in 0..secs {
            clock.advance(1000);
            session.tick();
        }
    }

    #[test]
    fn five_second_pomodoro_runs_to_short_break() {
        let (mut session, clock) = session_with(ConfigPatch {
            pomodoro_secs: Some(5),
            ..ConfigPatch::default()
        });
        assert!(session.start().is_some());
        tick_seconds(&mut session, &clock, 5);

        let state = session.state();
        assert_eq!(state.current_type, IntervalType::ShortBreak);
        assert_eq!(state.remaining_secs, state.config.short_break_secs);
        assert!(state.paused); // no auto-start by default
        assert_eq!(state.completed_pomodoros, 1);
        assert_eq!(session.cadence(), None);
    }

    #[test]
    fn auto_start_runs_from_construction_and_chains() {
        let (mut session, clock) = session_with(ConfigPatch {
            pomodoro_secs: Some(2),
            short_break_secs: Some(1),
            auto_start_breaks: Some(true),
            auto_start_pomodoros: Some(true),
            ..ConfigPatch::default()
        });
        // No explicit start() needed.
        assert!(!session.state().paused);
        assert_eq!(session.cadence(), Some(TICK_CADENCE));

        tick_seconds(&mut session, &clock, 2);
        assert_eq!(session.state().current_type, IntervalType::ShortBreak);
        assert!(!session.state().paused);

        tick_seconds(&mut session, &clock, 1);
        assert_eq!(session.state().current_type, IntervalType::Pomodoro);
        assert_eq!(session.state().completed_pomodoros, 1);
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let (mut session, clock) = session_with(ConfigPatch {
            pomodoro_secs: Some(5),
            ..ConfigPatch::default()
        });
        let before = session.state().clone();
        clock.advance(10_000);
        assert!(session.tick().is_none());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn late_callback_resyncs_from_deadline() {
        let (mut session, clock) = session_with(ConfigPatch {
            pomodoro_secs: Some(10),
            ..ConfigPatch::default()
        });
        session.start();
        // One callback arrives 3 seconds late; the countdown self-corrects
        // instead of losing the missed decrements.
        clock.advance(3000);
        session.tick();
        assert_eq!(session.state().remaining_secs, 7);
    }

    #[test]
    fn overshoot_past_deadline_advances_exactly_once() {
        let (mut session, clock) = session_with(ConfigPatch {
            pomodoro_secs: Some(3),
            ..ConfigPatch::default()
        });
        session.start();
        // Host process was suspended well past the deadline.
        clock.advance(60_000);
        let advanced = session.tick();
        assert!(matches!(advanced, Some(Event::Advanced { .. })));
        assert_eq!(session.state().completed_pomodoros, 1);
        assert_eq!(session.state().current_type, IntervalType::ShortBreak);

        // Paused at the fresh break; further callbacks change nothing.
        clock.advance(60_000);
        assert!(session.tick().is_none());
        assert_eq!(session.state().completed_pomodoros, 1);
    }

    #[test]
    fn stop_disarms_and_start_rearms_from_remaining() {
        let (mut session, clock) = session_with(ConfigPatch {
            pomodoro_secs: Some(5),
            ..ConfigPatch::default()
        });
        session.start();
        tick_seconds(&mut session, &clock, 2);
        assert_eq!(session.state().remaining_secs, 3);

        session.stop();
        assert_eq!(session.cadence(), None);

        // Wall time passing while stopped must not count.
        clock.advance(60_000);
        session.start();
        tick_seconds(&mut session, &clock, 1);
        assert_eq!(session.state().remaining_secs, 2);
    }

    #[test]
    fn toggle_alternates() {
        let (mut session, _clock) = session_with(ConfigPatch::default());
        assert!(matches!(session.toggle(), Some(Event::Started { .. })));
        assert!(!session.state().paused);
        assert!(matches!(session.toggle(), Some(Event::Stopped { .. })));
        assert!(session.state().paused);
    }

    #[test]
    fn start_is_noop_while_running() {
        let (mut session, _clock) = session_with(ConfigPatch::default());
        assert!(session.start().is_some());
        assert!(session.start().is_none());
    }

    #[test]
    fn reset_restores_fresh_pomodoro() {
        let (mut session, clock) = session_with(ConfigPatch {
            pomodoro_secs: Some(5),
            ..ConfigPatch::default()
        });
        session.start();
        tick_seconds(&mut session, &clock, 3);
        session.reset();
        let state = session.state();
        assert_eq!(state.remaining_secs, 5);
        assert!(state.paused);
        assert_eq!(state.completed_pomodoros, 0);
        assert_eq!(session.cadence(), None);
    }

    #[test]
    fn change_config_rejects_invalid_merge_untouched() {
        let (mut session, _clock) = session_with(ConfigPatch::default());
        let before = session.state().clone();
        let result = session.change_config(ConfigPatch {
            pomodoro_secs: Some(0),
            ..ConfigPatch::default()
        });
        assert!(result.is_err());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn change_config_resets_to_new_pomodoro_duration() {
        let (mut session, _clock) = session_with(ConfigPatch::default());
        session.change_type(IntervalType::ShortBreak);
        session
            .change_config(ConfigPatch {
                pomodoro_secs: Some(100),
                ..ConfigPatch::default()
            })
            .unwrap();
        let state = session.state();
        assert_eq!(state.current_type, IntervalType::Pomodoro);
        assert_eq!(state.remaining_secs, 100);
        assert!(state.paused);
    }

    #[test]
    fn observers_see_events_in_dispatch_order() {
        let (mut session, clock) = session_with(ConfigPatch {
            pomodoro_secs: Some(1),
            ..ConfigPatch::default()
        });
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(move |event, snapshot| {
            sink.borrow_mut().push(format!(
                "{}:{}",
                event.kind(),
                snapshot.state.remaining_secs
            ));
        });
        session.start();
        tick_seconds(&mut session, &clock, 1);
        assert_eq!(
            *seen.borrow(),
            vec!["started:1", "ticked:0", "advanced:300"]
        );
    }

    #[test]
    fn manual_advance_uses_predicted_type() {
        let (mut session, _clock) = session_with(ConfigPatch {
            long_break_interval: Some(2),
            ..ConfigPatch::default()
        });
        // First pomodoro ends in a short break, second earns the long one.
        session.advance();
        assert_eq!(session.state().current_type, IntervalType::ShortBreak);
        session.advance();
        assert_eq!(session.state().current_type, IntervalType::Pomodoro);
        session.advance();
        assert_eq!(session.state().current_type, IntervalType::LongBreak);
        assert_eq!(session.state().completed_pomodoros, 2);
    }

    #[test]
    fn rounding_keeps_display_within_half_second() {
        let (mut session, clock) = session_with(ConfigPatch {
            pomodoro_secs: Some(10),
            ..ConfigPatch::default()
        });
        session.start();
        clock.advance(1400); // jittery callback, 0.4s late
        session.tick();
        assert_eq!(session.state().remaining_secs, 9);
        clock.advance(600); // next callback early; total elapsed 2.0s
        session.tick();
        assert_eq!(session.state().remaining_secs, 8);
    }
}
