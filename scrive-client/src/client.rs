//! Client session and document operations.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::transport::{Endpoint, Transport};
use scrive_entities::{Document, DocumentStatus};
use scrive_model::{ApiHandle, Entity, ScriveError};
use serde_json::Value as Json;
use std::rc::{Rc, Weak};
use tracing::debug;

struct Session<T> {
    config: ClientConfig,
    transport: T,
}

impl<T> ApiHandle for Session<T> {
    fn base_url(&self) -> String {
        self.config.base_url()
    }
}

/// A client session.
///
/// Entities returned by the client hold a weak handle to the session; once
/// the client is dropped, operations that need it fail with `ApiNotSet`.
pub struct Scrive<T: Transport + 'static> {
    session: Rc<Session<T>>,
}

impl<T: Transport + 'static> Scrive<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            session: Rc::new(Session { config, transport }),
        }
    }

    /// A client for the production host.
    pub fn with_transport(transport: T) -> Self {
        Self::new(ClientConfig::default(), transport)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.session.config
    }

    pub fn transport(&self) -> &T {
        &self.session.transport
    }

    fn handle(&self) -> Weak<dyn ApiHandle> {
        let weak: Weak<Session<T>> = Rc::downgrade(&self.session);
        weak
    }

    /// Builds a document from a server response and binds it to this session.
    ///
    /// Only documents still in preparation stay editable.
    fn adopt(&self, endpoint: Endpoint, json: Json) -> Result<Document> {
        let Json::Object(map) = json else {
            return Err(ScriveError::invalid_response(format!(
                "server's JSON response to {endpoint} is not an object"
            ))
            .into());
        };
        let document = Document::from_json_object(&map)?;
        document.as_object().attach_api(&self.handle());
        let status = document.status()?;
        if status != Some(DocumentStatus::Preparation) {
            debug!(%endpoint, ?status, "document is not in preparation, making it read only");
            document.make_read_only();
        }
        Ok(document)
    }

    pub fn get_document(&self, id: &str) -> Result<Document> {
        debug!(id, "fetching document");
        let json = self.session.transport.fetch_json(Endpoint::GetDocument, id)?;
        self.adopt(Endpoint::GetDocument, json)
    }

    /// Creates `document` on the server and returns the saved copy.
    pub fn create_document(&self, document: &Document) -> Result<Document> {
        document.as_object().check_read()?;
        let body = Json::Object(document.to_json_object());
        debug!("creating document");
        let json = self
            .session
            .transport
            .push_json(Endpoint::CreateDocument, None, &body)?;
        self.adopt(Endpoint::CreateDocument, json)
    }

    /// Pushes local changes. The returned document supersedes `document`,
    /// which is invalidated once the server accepted the update.
    pub fn update_document(&self, document: &Document) -> Result<Document> {
        document.as_object().check_read()?;
        let id = document.id()?.ok_or(ClientError::NotSaved)?;
        let body = Json::Object(document.to_json_object());
        debug!(id = %id, "updating document");
        let json = self
            .session
            .transport
            .push_json(Endpoint::UpdateDocument, Some(&id), &body)?;
        let updated = self.adopt(Endpoint::UpdateDocument, json)?;
        document.invalidate();
        Ok(updated)
    }
}
