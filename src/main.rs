use std::env;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::Parser;

use leave_notifier::clock::{Clock, SystemClock, format_date};
use leave_notifier::db::Db;
use leave_notifier::leave::{LeaveDecision, LeaveNotifier, NotifierConfig};
use leave_notifier::models::Preferences;
use leave_notifier::notification::{DesktopPresenter, LogActivation, NotificationPresenter};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leave_notifier=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // DB lives in the home directory unless overridden
    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => {
            let home = env::var("HOME").context("HOME not set")?;
            let dir = format!("{}/.leave-notifier", home);
            std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir))?;
            format!("{}/db.sqlite", dir)
        }
    };
    let db = Arc::new(Db::new(&db_path).with_context(|| format!("Failed to open {}", db_path))?);

    let mut config = NotifierConfig {
        grace_window: Duration::minutes(i64::from(cli.grace)),
        ..NotifierConfig::default()
    };
    if let Some(platform) = cli.platform {
        config.platform = platform;
    }
    let notifier = LeaveNotifier::new(
        config,
        Box::new(SystemClock),
        db.clone(),
        db.clone(),
        Arc::new(LogActivation),
    );

    match &cli.command {
        Commands::Check { leave, print } => {
            check(&notifier, leave.as_deref(), *print)?;
        }
        Commands::Watch { leave } => loop {
            let wait = poll_once(&notifier, &db, leave);
            thread::sleep(wait);
        },
        Commands::Dismiss => {
            let today = format_date(SystemClock.now());
            db.update_dismiss(Some(today.as_str()))?;
            println!("Leave reminder dismissed for {}", today);
        }
        Commands::Status => {
            let prefs = db.get_preferences()?;
            println!("Reminders: {}", prefs.format_status());
            match db.get_dismiss()? {
                Some(day) => println!("Last dismissed: {}", day),
                None => println!("Last dismissed: never"),
            }
        }
        Commands::Prefs {
            enable,
            disable,
            repeat,
            no_repeat,
            interval,
        } => {
            let mut prefs = db.get_preferences()?;
            if *enable {
                prefs.notification = true;
            }
            if *disable {
                prefs.notification = false;
            }
            if *repeat {
                prefs.repetition = true;
            }
            if *no_repeat {
                prefs.repetition = false;
            }
            if let Some(minutes) = interval {
                prefs.notifications_interval = *minutes;
            }
            db.save_preferences(&prefs)?;
            println!("Reminders: {}", prefs.format_status());
        }
        Commands::Reset => {
            db.save_preferences(&Preferences::default())?;
            db.update_dismiss(None)?;
            println!("Preferences reset and dismissal cleared");
        }
    }

    Ok(())
}

/// One watch iteration. Failures are logged so the loop keeps polling;
/// returns how long to sleep before the next check.
fn poll_once(notifier: &LeaveNotifier, db: &Db, leave: &str) -> std::time::Duration {
    if let Err(err) = check(notifier, Some(leave), false) {
        tracing::warn!(%err, "leave check failed");
    }
    let minutes = match db.get_preferences() {
        Ok(prefs) => prefs.notifications_interval,
        Err(err) => {
            tracing::warn!(%err, "failed to read preferences, using default interval");
            Preferences::default().notifications_interval
        }
    };
    std::time::Duration::from_secs(u64::from(minutes.max(1)) * 60)
}

/// Evaluate once and present the reminder if it is due.
fn check(notifier: &LeaveNotifier, leave: Option<&str>, print: bool) -> Result<()> {
    let notification = match notifier.create_leave_notification(leave)? {
        LeaveDecision::Suppressed(reason) => {
            println!("No reminder: {}", reason);
            return Ok(());
        }
        LeaveDecision::Due(n) => n,
    };

    if print {
        let text = notification.payload().text();
        println!("{}: {}", text.title, text.body);
        if let Some(xml) = notification.payload().toast_xml() {
            println!("{}", xml);
        }
        return Ok(());
    }

    let response = DesktopPresenter
        .present(notification.payload())
        .context("Failed to show notification")?;
    notification.on_show();
    if let Some(response) = response {
        notification.respond(response)?;
    }
    Ok(())
}
