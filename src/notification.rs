//! Leave-reminder payloads and the desktop notification presenter

use std::sync::atomic::{AtomicUsize, Ordering};

use clap::ValueEnum;
use notify_rust::Notification;

use crate::error::{Error, Result};

pub const APP_NAME: &str = "leave-notifier";

/// Action identifier the presenter attaches to its dismiss button.
pub const DISMISS_ACTION: &str = "dismiss";

/// Which payload shape the host's notification system expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    /// Plain title/body notifications (macOS, XDG desktops)
    Desktop,
    /// Windows toast XML
    Toast,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Toast
        } else {
            Platform::Desktop
        }
    }
}

/// The canonical title/body pair every payload is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationText {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationPayload {
    Plain(NotificationText),
    Toast { text: NotificationText, xml: String },
}

impl NotificationPayload {
    pub fn render(platform: Platform, text: NotificationText) -> Self {
        match platform {
            Platform::Desktop => NotificationPayload::Plain(text),
            Platform::Toast => {
                let xml = toast_xml(&text);
                NotificationPayload::Toast { text, xml }
            }
        }
    }

    pub fn text(&self) -> &NotificationText {
        match self {
            NotificationPayload::Plain(text) => text,
            NotificationPayload::Toast { text, .. } => text,
        }
    }

    pub fn toast_xml(&self) -> Option<&str> {
        match self {
            NotificationPayload::Plain(_) => None,
            NotificationPayload::Toast { xml, .. } => Some(xml),
        }
    }
}

fn toast_xml(text: &NotificationText) -> String {
    format!(
        "<toast activationType=\"foreground\" launch=\"{app}\">\
<visual><binding template=\"ToastGeneric\"><text>{title}</text><text>{body}</text></binding></visual>\
<actions><action content=\"Dismiss\" arguments=\"{dismiss}\" activationType=\"foreground\"/></actions>\
</toast>",
        app = APP_NAME,
        title = escape_xml(&text.title),
        body = escape_xml(&text.body),
        dismiss = DISMISS_ACTION,
    )
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// What the user did with a presented notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserResponse {
    /// An action button; the payload is the action identifier
    Action(String),
    Closed,
    Clicked,
}

/// Map an XDG action identifier to the user's response.
#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
fn response_for(action: &str) -> UserResponse {
    match action {
        "__closed" => UserResponse::Closed,
        "default" => UserResponse::Clicked,
        other => UserResponse::Action(other.to_string()),
    }
}

/// Shows a payload to the user.
///
/// Returns the user's response when the platform reports one, `None` when it
/// only fires and forgets.
pub trait NotificationPresenter {
    fn present(&self, payload: &NotificationPayload) -> Result<Option<UserResponse>>;
}

/// System notifications through notify-rust.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopPresenter;

impl NotificationPresenter for DesktopPresenter {
    #[cfg(all(unix, not(target_os = "macos")))]
    fn present(&self, payload: &NotificationPayload) -> Result<Option<UserResponse>> {
        let text = payload.text();
        let handle = Notification::new()
            .appname(APP_NAME)
            .summary(&text.title)
            .body(&text.body)
            .action("default", "Open")
            .action(DISMISS_ACTION, "Dismiss")
            .show()
            .map_err(|e| Error::Notify(e.to_string()))?;

        let mut response = None;
        handle.wait_for_action(|action| response = Some(response_for(action)));
        Ok(response)
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn present(&self, payload: &NotificationPayload) -> Result<Option<UserResponse>> {
        let text = payload.text();
        Notification::new()
            .appname(APP_NAME)
            .summary(&text.title)
            .body(&text.body)
            .show()
            .map_err(|e| Error::Notify(e.to_string()))?;
        Ok(None)
    }
}

/// Receives the "bring the main window forward" signal when a reminder is clicked.
pub trait HostActivation {
    fn activate(&self);
}

/// Activation sink for headless hosts: records the request in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogActivation;

impl HostActivation for LogActivation {
    fn activate(&self) {
        tracing::info!("host activation requested");
    }
}

/// Counts activation signals.
#[derive(Debug, Default)]
pub struct CountingActivation {
    count: AtomicUsize,
}

impl CountingActivation {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl HostActivation for CountingActivation {
    fn activate(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text() -> NotificationText {
        NotificationText {
            title: "Time to Leave".to_string(),
            body: "Leave at 17:30 <now> & go".to_string(),
        }
    }

    #[test]
    fn desktop_payload_is_plain() {
        let payload = NotificationPayload::render(Platform::Desktop, text());
        assert_eq!(payload, NotificationPayload::Plain(text()));
        assert_eq!(payload.toast_xml(), None);
    }

    #[test]
    fn toast_payload_carries_title_and_escaped_body() {
        let payload = NotificationPayload::render(Platform::Toast, text());
        assert_eq!(payload.text(), &text());

        let xml = payload.toast_xml().unwrap();
        assert!(xml.starts_with("<toast"));
        assert!(xml.contains("<text>Time to Leave</text>"));
        assert!(xml.contains("<text>Leave at 17:30 &lt;now&gt; &amp; go</text>"));
        assert!(xml.contains("arguments=\"dismiss\""));
    }

    #[test]
    fn escape_handles_quotes() {
        assert_eq!(escape_xml("a\"b'c"), "a&quot;b&apos;c");
    }

    #[test]
    fn xdg_actions_map_to_responses() {
        assert_eq!(response_for("__closed"), UserResponse::Closed);
        assert_eq!(response_for("default"), UserResponse::Clicked);
        assert_eq!(
            response_for(DISMISS_ACTION),
            UserResponse::Action("dismiss".to_string())
        );
        assert_eq!(response_for(""), UserResponse::Action(String::new()));
    }

    #[test]
    fn counting_activation_counts() {
        let sink = CountingActivation::default();
        sink.activate();
        sink.activate();
        assert_eq!(sink.count(), 2);
    }
}
