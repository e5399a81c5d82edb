//! Error types for signing, dispatching and parsing ECS calls.

use std::borrow::Cow;

use thiserror::Error;

/// Errors raised by a single ECS round trip.
///
/// Every variant is terminal for the call that produced it; nothing in the
/// crate retries or falls back.
#[derive(Debug, Error)]
pub enum EcsError {
    /// The service answered with a status other than 200.
    #[error("ECS request failed: {status} {reason}")]
    Response { status: u16, reason: String, body: Vec<u8> },

    /// A credential required for signing was not configured.
    #[error("missing credential: {0}")]
    MissingCredentials(&'static str),

    /// The signing key could not be used.
    #[error("failed to sign request: {0}")]
    Signing(String),

    /// The response body was not well-formed XML.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] wreq::Error),

    /// The endpoint or proxy settings could not be turned into a client.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EcsError {
    /// Returns the HTTP status when the service rejected the call.
    pub fn status(&self) -> Option<u16> {
        match self {
            EcsError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body carried by a rejected call.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            EcsError::Response { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The rejected body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        self.body().map(String::from_utf8_lossy)
    }
}

/// Errors raised while streaming a response document.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// The document ended inside an open element.
    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    #[error("failed to parse value: {0}")]
    ParseError(String),

    /// The document contained no root element at all.
    #[error("missing root element")]
    MissingRoot,
}
