//! Error types for the client.

use scrive_model::ScriveError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport could not complete the exchange.
    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Model(#[from] ScriveError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document was never saved on the server, so it has no id.
    #[error("document has no id")]
    NotSaved,
}
