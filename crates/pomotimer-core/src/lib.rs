//! # Pomotimer Core Library
//!
//! An embeddable Pomodoro timer state machine: alternating focus intervals
//! ("pomodoro") and break intervals ("shortBreak"/"longBreak") counting down
//! in real time, with configurable durations, auto-advance behavior, and a
//! derived-state projection for presentation layers to consume.
//!
//! ## Architecture
//!
//! - **Reducer**: a pure, total transition function over [`TimerState`].
//!   Applying an [`Action`] never fails and has no side effects.
//! - **Session controller**: bridges wall-clock time to discrete tick
//!   actions using a captured deadline, and resolves automatic interval
//!   progression when the countdown reaches zero. The session has no
//!   internal thread -- the host schedules a repeating callback at the
//!   interval reported by [`Session::cadence`] and calls [`Session::tick`].
//! - **Derived view**: `MM:SS` formatting, progress fraction, and
//!   next-interval prediction, recomputed from state on every read.
//! - **Events**: every state change produces an [`Event`] delivered to
//!   subscribed observers for host-side side effects.
//!
//! ## Key Components
//!
//! - [`Session`]: owns the state and dispatches actions
//! - [`TimerState`] / [`Snapshot`]: raw and projected state
//! - [`Config`] / [`ConfigPatch`]: durations and auto-start policy
//! - [`SessionContext`]: optional shared slot for host embedding

pub mod context;
pub mod error;
pub mod events;
pub mod session;
pub mod timer;

pub use context::SessionContext;
pub use error::{Result, TimerError};
pub use events::Event;
pub use session::{Clock, ManualClock, Session, SystemClock};
pub use timer::{
    apply, format_time, initialize, predict_next, Action, Config, ConfigPatch, DerivedView,
    IntervalType, NotificationMode, NotificationPolicy, Snapshot, TimerState,
};
