//! Handler error taxonomy and its mapping onto response envelopes.

use event_db::DbError;
use twitch_client::TwitchError;

use crate::envelope::ResponseEnvelope;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Missing or malformed input.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Anything else: database and upstream failures. The message is
    /// returned to the caller as is.
    #[error("{0}")]
    Unhandled(String),
}

impl HandlerError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        HandlerError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HandlerError::NotFound(message.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::BadRequest(_) => 400,
            HandlerError::NotFound(_) => 404,
            HandlerError::MethodNotAllowed => 405,
            HandlerError::Unhandled(_) => 500,
        }
    }

    pub fn into_response(self) -> ResponseEnvelope {
        let status = self.status_code();
        match &self {
            HandlerError::Unhandled(message) => tracing::error!(status, "{message}"),
            other => tracing::warn!(status, "{other}"),
        }
        ResponseEnvelope::error(status, &self.to_string())
    }
}

impl From<DbError> for HandlerError {
    fn from(err: DbError) -> Self {
        HandlerError::Unhandled(err.to_string())
    }
}

impl From<TwitchError> for HandlerError {
    fn from(err: TwitchError) -> Self {
        HandlerError::Unhandled(err.to_string())
    }
}

pub type HandlerResult = Result<ResponseEnvelope, HandlerError>;
