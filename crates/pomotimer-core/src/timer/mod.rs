mod config;
mod state;
mod view;

pub use config::{Config, ConfigPatch, IntervalType, NotificationMode, NotificationPolicy};
pub use state::{apply, initialize, predict_next, Action, TimerState};
pub use view::{format_time, DerivedView, Snapshot};
