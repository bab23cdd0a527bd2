//! Thin Scrive API client.
//!
//! The client owns no HTTP stack: it talks to the service through a
//! [`Transport`] and turns what comes back into [`scrive_entities`] entities
//! attached to the session.

mod client;
mod config;
mod error;
mod transport;

pub use client::Scrive;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use transport::{Endpoint, Transport};
