//! Decides whether the "time to leave" reminder is due right now.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::clock::{Clock, format_date};
use crate::dismissal::DismissalTracker;
use crate::error::Result;
use crate::notification::{
    DISMISS_ACTION, HostActivation, NotificationPayload, NotificationText, Platform, UserResponse,
};
use crate::preferences::PreferencesProvider;

pub const PRODUCT_TITLE: &str = "Time to Leave";

/// How long after the leave time a reminder still fires with repetition off.
pub const DEFAULT_GRACE_MINUTES: i64 = 10;

/// A configured time of day to leave, parsed from "HH:MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveTime {
    pub hour: u32,
    pub minute: u32,
}

impl LeaveTime {
    /// Parse "HH:MM" with hour in 0-23 and minute in 0-59. Anything else is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let (h, m) = input.split_once(':')?;
        if h.len() != 2 || m.len() != 2 {
            return None;
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hour: u32 = h.parse().ok()?;
        let minute: u32 = m.parse().ok()?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    fn as_time(self) -> NaiveTime {
        // Ranges were checked in parse
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default()
    }
}

impl fmt::Display for LeaveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Why no reminder was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    InvalidLeaveTime,
    AlreadyDismissed,
    NotYetDue,
    Stale,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::Disabled => "notifications are disabled",
            SkipReason::InvalidLeaveTime => "leave time is not a valid HH:MM",
            SkipReason::AlreadyDismissed => "already dismissed today",
            SkipReason::NotYetDue => "leave time has not been reached",
            SkipReason::Stale => "leave time passed and repetition is off",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub enum LeaveDecision {
    Suppressed(SkipReason),
    Due(LeaveNotification),
}

impl LeaveDecision {
    pub fn is_due(&self) -> bool {
        matches!(self, LeaveDecision::Due(_))
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            LeaveDecision::Suppressed(reason) => Some(*reason),
            LeaveDecision::Due(_) => None,
        }
    }

    pub fn into_notification(self) -> Option<LeaveNotification> {
        match self {
            LeaveDecision::Suppressed(_) => None,
            LeaveDecision::Due(n) => Some(n),
        }
    }
}

/// A reminder that is due. Present the payload, then feed back what the user did.
///
/// `on_action`, `on_close` and `on_click` consume the notification: a reminder
/// ends with exactly one of them.
pub struct LeaveNotification {
    payload: NotificationPayload,
    day: String,
    dismissal: Arc<dyn DismissalTracker>,
    activation: Arc<dyn HostActivation>,
}

impl fmt::Debug for LeaveNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeaveNotification")
            .field("payload", &self.payload)
            .field("day", &self.day)
            .finish_non_exhaustive()
    }
}

impl LeaveNotification {
    pub fn payload(&self) -> &NotificationPayload {
        &self.payload
    }

    /// Day key the reminder was raised for; dismissals are recorded against it.
    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn on_show(&self) {
        tracing::debug!(day = %self.day, "leave reminder shown");
    }

    /// Only the dismiss action suppresses further reminders.
    pub fn on_action(self, action: &str) -> Result<()> {
        if action != DISMISS_ACTION {
            tracing::debug!(action, "ignoring leave reminder action");
            return Ok(());
        }
        self.dismiss()
    }

    pub fn on_close(self) -> Result<()> {
        self.dismiss()
    }

    pub fn on_click(self) {
        self.activation.activate();
    }

    /// Route a presenter's response to the matching continuation.
    pub fn respond(self, response: UserResponse) -> Result<()> {
        match response {
            UserResponse::Action(action) => self.on_action(&action),
            UserResponse::Closed => self.on_close(),
            UserResponse::Clicked => {
                self.on_click();
                Ok(())
            }
        }
    }

    fn dismiss(self) -> Result<()> {
        self.dismissal.update_dismiss(Some(self.day.as_str()))?;
        tracing::info!(day = %self.day, "leave reminder dismissed for today");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Past the leave time by more than this, a reminder needs repetition enabled.
    pub grace_window: Duration,
    pub platform: Platform,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            grace_window: Duration::minutes(DEFAULT_GRACE_MINUTES),
            platform: Platform::current(),
        }
    }
}

/// Evaluates the leave reminder against the clock, preferences and dismissal state.
pub struct LeaveNotifier {
    config: NotifierConfig,
    clock: Box<dyn Clock>,
    preferences: Arc<dyn PreferencesProvider>,
    dismissal: Arc<dyn DismissalTracker>,
    activation: Arc<dyn HostActivation>,
}

impl LeaveNotifier {
    pub fn new(
        config: NotifierConfig,
        clock: Box<dyn Clock>,
        preferences: Arc<dyn PreferencesProvider>,
        dismissal: Arc<dyn DismissalTracker>,
        activation: Arc<dyn HostActivation>,
    ) -> Self {
        Self {
            config,
            clock,
            preferences,
            dismissal,
            activation,
        }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Decide whether the reminder for `leave_time` is due now.
    ///
    /// Gates run in order and the first one that fails wins: preferences,
    /// input, dismissal, not yet due, stale without repetition.
    pub fn create_leave_notification(&self, leave_time: Option<&str>) -> Result<LeaveDecision> {
        let decision = self.evaluate(leave_time, self.clock.now())?;
        match &decision {
            LeaveDecision::Suppressed(reason) => {
                tracing::debug!(?leave_time, %reason, "no leave reminder")
            }
            LeaveDecision::Due(n) => tracing::debug!(?leave_time, day = n.day(), "leave reminder due"),
        }
        Ok(decision)
    }

    fn evaluate(&self, leave_time: Option<&str>, now: NaiveDateTime) -> Result<LeaveDecision> {
        let prefs = self.preferences.get_preferences()?;
        if !prefs.notification {
            return Ok(LeaveDecision::Suppressed(SkipReason::Disabled));
        }

        let Some(leave) = leave_time.and_then(LeaveTime::parse) else {
            return Ok(LeaveDecision::Suppressed(SkipReason::InvalidLeaveTime));
        };

        let today = format_date(now);
        if self.dismissal.get_dismiss()?.as_deref() == Some(today.as_str()) {
            return Ok(LeaveDecision::Suppressed(SkipReason::AlreadyDismissed));
        }

        let target = now.date().and_time(leave.as_time());
        if now < target {
            return Ok(LeaveDecision::Suppressed(SkipReason::NotYetDue));
        }

        let grace = self.config.grace_window.max(Duration::zero());
        if now - target > grace && !prefs.repetition {
            return Ok(LeaveDecision::Suppressed(SkipReason::Stale));
        }

        let text = NotificationText {
            title: PRODUCT_TITLE.to_string(),
            body: format!("Hey there! I think it's time to leave (planned {}).", leave),
        };
        Ok(LeaveDecision::Due(LeaveNotification {
            payload: NotificationPayload::render(self.config.platform, text),
            day: today,
            dismissal: Arc::clone(&self.dismissal),
            activation: Arc::clone(&self.activation),
        }))
    }
}
