//! Query-string signing, Signature Version 2.
//!
//! The canonical form signed by the service is
//!
//! ```text
//! StringToSign = HTTP-Verb + "\n" +
//!                lowercase(Host[:Port]) + "\n" +
//!                Path + "\n" +
//!                CanonicalizedQuery
//! ```
//!
//! where `CanonicalizedQuery` is every parameter sorted by name, with names
//! and values percent-encoded so that only RFC 3986 unreserved characters
//! remain, joined with `&`. The signature is
//! `Base64(HMAC-SHA256(SecretKey, StringToSign))`.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use tracing::trace;

use crate::ecs::request::Verb;
use crate::error::EcsError;

type HmacSha256 = Hmac<Sha256>;

/// Request parameters, kept sorted by name.
pub type Params = BTreeMap<String, String>;

pub const SIGNATURE_METHOD: &str = "HmacSHA256";

/// A serialized parameter set together with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    /// Canonical `name=value&...` string, already percent-encoded.
    pub query: String,
    /// Base64 signature, not yet percent-encoded.
    pub signature: String,
}

/// Capability to authenticate a parameter set.
pub trait QuerySigner: Send + Sync {
    /// Returns the access key id to embed in every request.
    fn access_key_id(&self) -> Result<&str, EcsError>;

    /// Serializes `params` canonically and signs them for `verb` and `path`.
    fn sign(&self, params: &Params, verb: Verb, path: &str) -> Result<SignedQuery, EcsError>;
}

/// HMAC-SHA256 query signer bound to one endpoint and one key pair.
pub struct SigV2Signer {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    server_name: String,
}

impl SigV2Signer {
    /// Creates a signer for `server_name` (`host` or `host:port`).
    pub fn new(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        server_name: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.filter(|k| !k.is_empty()),
            secret_access_key: secret_access_key.filter(|k| !k.is_empty()),
            server_name: server_name.into().to_lowercase(),
        }
    }

    fn secret_access_key(&self) -> Result<&str, EcsError> {
        self.secret_access_key.as_deref().ok_or(EcsError::MissingCredentials("AWSSecretAccessKey"))
    }
}

impl QuerySigner for SigV2Signer {
    fn access_key_id(&self) -> Result<&str, EcsError> {
        self.access_key_id.as_deref().ok_or(EcsError::MissingCredentials("AWSAccessKeyId"))
    }

    fn sign(&self, params: &Params, verb: Verb, path: &str) -> Result<SignedQuery, EcsError> {
        let secret = self.secret_access_key()?;

        let mut params = params.clone();
        params.insert("SignatureMethod".to_string(), SIGNATURE_METHOD.to_string());

        let query = canonical_query(&params);
        let string_to_sign = string_to_sign(verb, &self.server_name, path, &query);
        trace!(string_to_sign = ?string_to_sign, "Built SigV2 string to sign");

        let signature = compute_signature(secret, &string_to_sign)?;
        Ok(SignedQuery { query, signature })
    }
}

/// Joins sorted, percent-encoded `name=value` pairs with `&`.
pub fn canonical_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn string_to_sign(verb: Verb, server_name: &str, path: &str, query: &str) -> String {
    format!("{verb}\n{server_name}\n{path}\n{query}")
}

fn compute_signature(secret_key: &str, string_to_sign: &str) -> Result<String, EcsError> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| EcsError::Signing(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
