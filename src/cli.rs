use clap::{Parser, Subcommand};

use leave_notifier::notification::Platform;

#[derive(Parser)]
#[command(name = "leave-notifier")]
#[command(about = "Remind yourself when it's time to leave work", long_about = None)]
pub struct Cli {
    /// SQLite database path. Defaults to ~/.leave-notifier/db.sqlite
    #[arg(long, global = true, env = "LEAVE_NOTIFIER_DB")]
    pub db: Option<String>,

    /// Minutes past the leave time a reminder still fires with repetition off
    #[arg(long, global = true, default_value_t = 10, value_parser = clap::value_parser!(u32).range(0..=1440))]
    pub grace: u32,

    /// Payload shape to build (default: this machine's)
    #[arg(long, global = true, value_enum)]
    pub platform: Option<Platform>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check once whether it's time to leave
    Check {
        /// Leave time, HH:MM
        #[arg(short, long)]
        leave: Option<String>,

        /// Print the notification payload instead of showing it
        #[arg(short, long)]
        print: bool,
    },

    /// Keep checking every notifications interval until interrupted
    Watch {
        /// Leave time, HH:MM
        #[arg(short, long)]
        leave: String,
    },

    /// Dismiss the reminder for the rest of today
    Dismiss,

    /// Show preferences and today's dismissal state
    Status,

    /// Configure reminder preferences
    Prefs {
        /// Enable reminders
        #[arg(short, long)]
        enable: bool,

        /// Disable reminders
        #[arg(short, long, conflicts_with = "enable")]
        disable: bool,

        /// Keep reminding after the grace window has passed
        #[arg(short, long)]
        repeat: bool,

        /// Stop reminding once the grace window has passed
        #[arg(long, conflicts_with = "repeat")]
        no_repeat: bool,

        /// Minutes between checks in watch mode (default: 5)
        #[arg(short, long)]
        interval: Option<u32>,
    },

    /// Restore default preferences and clear the dismissal
    Reset,
}
