//! Signed request construction.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::ecs::signer::{Params, QuerySigner};
use crate::error::EcsError;

pub const API_VERSION: &str = "2010-09-01";
pub const SIGNATURE_VERSION: &str = "2";

/// Second precision, UTC, no offset suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// HTTP verbs a request can be signed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully signed request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub verb: Verb,
    /// Request target: the path, plus the signed query unless the verb is POST.
    pub target: String,
    /// Form body for POST, empty otherwise.
    pub body: String,
    pub headers: Vec<(String, String)>,
}

/// Injects the protocol parameters, signs, and lays the result out by verb.
pub struct RequestBuilder<S> {
    signer: S,
}

impl<S: QuerySigner> RequestBuilder<S> {
    pub fn new(signer: S) -> Self {
        Self { signer }
    }

    /// Builds a request stamped with the current time.
    pub fn build(
        &self,
        action: &str,
        params: Option<Params>,
        path: &str,
        verb: Verb,
    ) -> Result<SignedRequest, EcsError> {
        self.build_at(action, params, path, verb, Utc::now())
    }

    /// Builds a request stamped with `timestamp`.
    pub fn build_at(
        &self,
        action: &str,
        params: Option<Params>,
        path: &str,
        verb: Verb,
        timestamp: DateTime<Utc>,
    ) -> Result<SignedRequest, EcsError> {
        let mut params = params.unwrap_or_default();
        params.insert("Version".to_string(), API_VERSION.to_string());
        params.insert("AWSAccessKeyId".to_string(), self.signer.access_key_id()?.to_string());
        params.insert("SignatureVersion".to_string(), SIGNATURE_VERSION.to_string());
        params.insert("Timestamp".to_string(), timestamp.format(TIMESTAMP_FORMAT).to_string());

        debug!("Signing {} {} for {} ({} params)", verb, path, action, params.len());

        let signed = self.signer.sign(&params, verb, path)?;
        let signature = urlencoding::encode(&signed.signature);

        let request = if verb == Verb::Post {
            SignedRequest {
                verb,
                target: path.to_string(),
                body: format!("{}&Signature={}", signed.query, signature),
                headers: vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
            }
        } else {
            SignedRequest {
                verb,
                target: format!("{}?{}&Signature={}", path, signed.query, signature),
                body: String::new(),
                headers: Vec::new(),
            }
        };

        Ok(request)
    }
}
