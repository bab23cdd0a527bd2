//! The seam between the client and whatever carries its requests.

use crate::error::Result;
use serde_json::Value as Json;
use std::fmt;

/// Remote operations the client performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    GetDocument,
    CreateDocument,
    UpdateDocument,
}

impl Endpoint {
    /// Path segment under `/api/v1/`.
    pub fn path(self) -> &'static str {
        match self {
            Self::GetDocument => "get",
            Self::CreateDocument => "create",
            Self::UpdateDocument => "update",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Exchanges entity JSON with the service.
///
/// Implementations own the HTTP stack, authentication and retries. A
/// failure to reach the service is reported as
/// [`ClientError::Transport`](crate::ClientError::Transport).
pub trait Transport {
    /// Retrieves the JSON of one entity.
    fn fetch_json(&self, endpoint: Endpoint, id: &str) -> Result<Json>;

    /// Sends entity JSON and returns the server's view of the entity.
    fn push_json(&self, endpoint: Endpoint, id: Option<&str>, body: &Json) -> Result<Json>;
}
