//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The API answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never got a usable answer
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
