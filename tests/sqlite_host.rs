use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use leave_notifier::clock::FixedClock;
use leave_notifier::db::Db;
use leave_notifier::dismissal::DismissalTracker;
use leave_notifier::leave::{LeaveNotifier, NotifierConfig, SkipReason};
use leave_notifier::models::Preferences;
use leave_notifier::notification::{CountingActivation, Platform};
use leave_notifier::preferences::PreferencesProvider;
use tempfile::tempdir;

fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn notifier(db: &Arc<Db>, now: NaiveDateTime, activation: &Arc<CountingActivation>) -> LeaveNotifier {
    LeaveNotifier::new(
        NotifierConfig {
            platform: Platform::Desktop,
            ..NotifierConfig::default()
        },
        Box::new(FixedClock(now)),
        db.clone(),
        db.clone(),
        activation.clone(),
    )
}

#[test]
fn dismissal_survives_reopen_and_expires_next_day() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("db.sqlite");
    let path = path.to_str().expect("utf-8 path");
    let activation = Arc::new(CountingActivation::default());

    {
        let db = Arc::new(Db::new(path).expect("open db"));
        let n = notifier(&db, at(8, 18, 0), &activation)
            .create_leave_notification(Some("17:55"))
            .expect("evaluate")
            .into_notification()
            .expect("reminder due");
        n.on_action("dismiss").expect("dismiss");
    }

    let db = Arc::new(Db::new(path).expect("reopen db"));
    assert_eq!(db.get_dismiss().unwrap().as_deref(), Some("2024-03-08"));

    let later = notifier(&db, at(8, 18, 30), &activation)
        .create_leave_notification(Some("17:55"))
        .expect("evaluate");
    assert_eq!(later.skip_reason(), Some(SkipReason::AlreadyDismissed));

    let tomorrow = notifier(&db, at(9, 18, 0), &activation)
        .create_leave_notification(Some("17:55"))
        .expect("evaluate");
    assert!(tomorrow.is_due());
}

#[test]
fn stored_preferences_drive_the_decision() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("db.sqlite");
    let db = Arc::new(Db::new(path.to_str().unwrap()).expect("open db"));
    let activation = Arc::new(CountingActivation::default());

    PreferencesProvider::save_preferences(
        db.as_ref(),
        &Preferences {
            repetition: false,
            ..Preferences::default()
        },
    )
    .unwrap();
    let stale = notifier(&db, at(8, 18, 30), &activation)
        .create_leave_notification(Some("17:30"))
        .unwrap();
    assert_eq!(stale.skip_reason(), Some(SkipReason::Stale));

    PreferencesProvider::save_preferences(
        db.as_ref(),
        &Preferences {
            notification: false,
            ..Preferences::default()
        },
    )
    .unwrap();
    let off = notifier(&db, at(8, 18, 30), &activation)
        .create_leave_notification(Some("17:30"))
        .unwrap();
    assert_eq!(off.skip_reason(), Some(SkipReason::Disabled));
}

#[test]
fn click_and_close_through_the_database() {
    let db = Arc::new(Db::in_memory().expect("open db"));
    let activation = Arc::new(CountingActivation::default());
    let notifier = notifier(&db, at(8, 17, 35), &activation);

    let first = notifier
        .create_leave_notification(Some("17:30"))
        .unwrap()
        .into_notification()
        .unwrap();
    first.on_click();
    assert_eq!(activation.count(), 1);
    assert_eq!(DismissalTracker::get_dismiss(db.as_ref()).unwrap(), None);

    let second = notifier
        .create_leave_notification(Some("17:30"))
        .unwrap()
        .into_notification()
        .unwrap();
    second.on_close().unwrap();
    assert_eq!(
        DismissalTracker::get_dismiss(db.as_ref()).unwrap().as_deref(),
        Some("2024-03-08")
    );
    assert_eq!(activation.count(), 1);
}
