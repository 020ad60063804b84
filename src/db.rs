use rusqlite::{Connection, OptionalExtension, params};

use crate::dismissal::DismissalTracker;
use crate::error::Result;
use crate::models::{self, Preferences};
use crate::preferences::PreferencesProvider;

/// Wrapper around a SQLite connection.
/// The inner `Connection` is intentionally private; use the `conn()` method to obtain
/// a read‑only reference when you need to run custom queries.
pub struct Db {
    conn: Connection,
}

impl Db {
    /// Open the database and make sure both tables exist.  The file is created if it does not exist.
    pub fn new(path: &str) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Throwaway database, mostly for tests.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        models::init_preferences_db(&conn)?;
        models::init_dismissal_db(&conn)?;
        Ok(Self { conn })
    }

    /// Read‑only reference to the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // === Preference Methods ===

    /// Load the preferences row.
    pub fn get_preferences(&self) -> Result<Preferences> {
        let prefs = self.conn.query_row(
            "SELECT notification, repetition, notifications_interval
             FROM preferences WHERE id = 1",
            [],
            |row| {
                Ok(Preferences {
                    notification: row.get::<_, i64>(0)? != 0,
                    repetition: row.get::<_, i64>(1)? != 0,
                    notifications_interval: row.get::<_, i64>(2)?.clamp(0, i64::from(u32::MAX))
                        as u32,
                })
            },
        )?;
        Ok(prefs)
    }

    /// Overwrite the preferences row.
    pub fn save_preferences(&self, prefs: &Preferences) -> Result<()> {
        self.conn.execute(
            "UPDATE preferences SET notification = ?1, repetition = ?2, notifications_interval = ?3
             WHERE id = 1",
            params![
                if prefs.notification { 1 } else { 0 },
                if prefs.repetition { 1 } else { 0 },
                prefs.notifications_interval as i64,
            ],
        )?;
        Ok(())
    }

    // === Dismissal Methods ===

    /// Day key of the last dismissal, if any.
    pub fn get_dismiss(&self) -> Result<Option<String>> {
        let day = self
            .conn
            .query_row("SELECT day FROM dismissal WHERE id = 1", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?;
        Ok(day.flatten())
    }

    /// Set or clear the dismissal day.
    pub fn update_dismiss(&self, day: Option<&str>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO dismissal (id, day) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET day = excluded.day",
            params![day],
        )?;
        Ok(())
    }
}

impl PreferencesProvider for Db {
    fn get_preferences(&self) -> Result<Preferences> {
        Db::get_preferences(self)
    }

    fn save_preferences(&self, prefs: &Preferences) -> Result<()> {
        Db::save_preferences(self, prefs)
    }
}

impl DismissalTracker for Db {
    fn update_dismiss(&self, day: Option<&str>) -> Result<()> {
        Db::update_dismiss(self, day)
    }

    fn get_dismiss(&self) -> Result<Option<String>> {
        Db::get_dismiss(self)
    }
}
