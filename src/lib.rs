//! Leave-time reminder core: decides when to tell the user their work day is
//! over and remembers when they dismissed it.

pub mod clock;
pub mod db;
pub mod dismissal;
pub mod error;
pub mod leave;
pub mod models;
pub mod notification;
pub mod preferences;

pub use error::{Error, Result};
pub use leave::{LeaveDecision, LeaveNotification, LeaveNotifier, NotifierConfig, SkipReason};
