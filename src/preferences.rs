use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::models::Preferences;

/// Where the evaluator reads user preferences from.
pub trait PreferencesProvider {
    fn get_preferences(&self) -> Result<Preferences>;
    fn save_preferences(&self, prefs: &Preferences) -> Result<()>;
}

/// Preferences kept in memory.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    prefs: Mutex<Preferences>,
}

impl MemoryPreferences {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }
}

impl PreferencesProvider for MemoryPreferences {
    fn get_preferences(&self) -> Result<Preferences> {
        Ok(self
            .prefs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save_preferences(&self, prefs: &Preferences) -> Result<()> {
        *self.prefs.lock().unwrap_or_else(PoisonError::into_inner) = prefs.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_replaces_whole_record() {
        let store = MemoryPreferences::default();
        assert_eq!(store.get_preferences().unwrap(), Preferences::default());

        let quiet = Preferences {
            notification: false,
            repetition: false,
            notifications_interval: 1,
        };
        store.save_preferences(&quiet).unwrap();
        assert_eq!(store.get_preferences().unwrap(), quiet);
    }
}
