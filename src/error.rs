use thiserror::Error;

use crate::api::ApiError;

/// Errors surfaced by the data-access services.
#[derive(Error, Debug)]
pub enum DataError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("User {user_id} is already enrolled in session {session_id}")]
    AlreadyEnrolled { session_id: String, user_id: String },

    #[error("User {user_id} is not enrolled in session {session_id}")]
    NotEnrolled { session_id: String, user_id: String },

    #[error("{0} requires administrative backend access")]
    RequiresAdmin(&'static str),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Cancellation window of {window_hours}h has closed for session {session_id}")]
    CancellationWindowClosed { session_id: String, window_hours: u32 },

    #[error("Credit balance for user {user_id} changed during update")]
    ConcurrentCreditUpdate { user_id: String },

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type DataResult<T> = Result<T, DataError>;

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Decode(err.to_string())
    }
}
