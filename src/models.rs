use rusqlite::{Connection, Result, params};

/// User preferences relevant to the leave reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub notification: bool,          // master switch (default: on)
    pub repetition: bool,            // remind again after the grace window (default: on)
    pub notifications_interval: u32, // minutes between host checks (default: 5)
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notification: true,
            repetition: true,
            notifications_interval: 5,
        }
    }
}

impl Preferences {
    /// Format preferences for display
    pub fn format_status(&self) -> String {
        if self.notification {
            format!(
                "ON (repeat: {}, checking every {}m)",
                if self.repetition { "yes" } else { "no" },
                self.notifications_interval
            )
        } else {
            "OFF".to_string()
        }
    }
}

pub fn init_preferences_db(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS preferences (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            notification INTEGER NOT NULL DEFAULT 1,
            repetition INTEGER NOT NULL DEFAULT 1,
            notifications_interval INTEGER NOT NULL DEFAULT 5
        )",
        params![],
    )?;
    // Insert default row if not exists
    conn.execute(
        "INSERT OR IGNORE INTO preferences (id, notification, repetition, notifications_interval)
         VALUES (1, 1, 1, 5)",
        params![],
    )?;
    Ok(())
}

/// Single-slot table: the day the reminder was last dismissed, NULL when not dismissed.
pub fn init_dismissal_db(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS dismissal (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            day TEXT
        )",
        params![],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO dismissal (id, day) VALUES (1, NULL)",
        params![],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reflects_switches() {
        let prefs = Preferences::default();
        assert_eq!(prefs.format_status(), "ON (repeat: yes, checking every 5m)");

        let off = Preferences {
            notification: false,
            ..Preferences::default()
        };
        assert_eq!(off.format_status(), "OFF");
    }

    #[test]
    fn init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_preferences_db(&conn).unwrap();
        init_preferences_db(&conn).unwrap();
        init_dismissal_db(&conn).unwrap();
        init_dismissal_db(&conn).unwrap();

        let prefs: i64 = conn
            .query_row("SELECT COUNT(*) FROM preferences", [], |row| row.get(0))
            .unwrap();
        let slots: i64 = conn
            .query_row("SELECT COUNT(*) FROM dismissal", [], |row| row.get(0))
            .unwrap();
        assert_eq!((prefs, slots), (1, 1));
    }
}
