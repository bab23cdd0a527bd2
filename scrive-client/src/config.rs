//! Client configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Where the client sends its requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host name, without scheme.
    pub api_hostname: String,
    pub https: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_hostname: "scrive.com".to_string(),
            https: true,
        }
    }
}

impl ClientConfig {
    pub fn new(api_hostname: impl Into<String>) -> Self {
        Self {
            api_hostname: api_hostname.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON config; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Scheme and host, e.g. `https://scrive.com`.
    pub fn base_url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!("{scheme}://{}", self.api_hostname)
    }
}
