//! Remembers the day the leave reminder was last dismissed.

use std::sync::{Mutex, PoisonError};

use crate::error::Result;

/// Single-slot store for the dismissal day key.
///
/// `None` means the reminder has not been dismissed. Writers hold the slot
/// exclusively; a reader never observes a half-written value.
pub trait DismissalTracker {
    /// Set the dismissal day, or clear it with `None`.
    fn update_dismiss(&self, day: Option<&str>) -> Result<()>;
    fn get_dismiss(&self) -> Result<Option<String>>;
}

/// Process-local dismissal slot.
#[derive(Debug, Default)]
pub struct MemoryDismissal {
    day: Mutex<Option<String>>,
}

impl MemoryDismissal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DismissalTracker for MemoryDismissal {
    fn update_dismiss(&self, day: Option<&str>) -> Result<()> {
        // A poisoned slot still holds a whole Option<String>.
        let mut slot = self.day.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = day.map(str::to_string);
        Ok(())
    }

    fn get_dismiss(&self) -> Result<Option<String>> {
        let slot = self.day.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.clone())
    }
}
