use thiserror::Error;

/// Failures owned by the storage and presentation collaborators.
///
/// A reminder that is simply not due is never an error; see
/// [`crate::leave::LeaveDecision::Suppressed`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("notification error: {0}")]
    Notify(String),
}

pub type Result<T> = std::result::Result<T, Error>;
