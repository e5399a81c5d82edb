//! Connection to the E-Commerce Service: sign, dispatch, interpret.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, info_span, Instrument, Span};

use crate::config::Config;
use crate::ecs::handler::{parse_result_set, XmlRecord};
use crate::ecs::item::Item;
use crate::ecs::request::{RequestBuilder, Verb};
use crate::ecs::resultset::ResultSet;
use crate::ecs::signer::{Params, SigV2Signer};
use crate::ecs::transport::{HttpTransport, RawResponse, Transport};
use crate::error::EcsError;

pub const API_PATH: &str = "/onca/xml";
pub const SERVICE: &str = "AWSECommerceService";

/// Trait for item searches - enables mocking for tests.
#[async_trait]
pub trait ItemSearch: Send + Sync {
    /// Returns items matching `params` within `search_index`.
    async fn item_search(
        &self,
        search_index: &str,
        params: Params,
    ) -> Result<ResultSet<Item>, EcsError>;
}

/// A signed-request connection to one ECS endpoint.
pub struct EcsConnection<T = HttpTransport> {
    builder: RequestBuilder<SigV2Signer>,
    transport: T,
    api_path: String,
    span: Span,
}

impl EcsConnection<HttpTransport> {
    /// Creates a connection over HTTP using the given configuration.
    pub fn new(config: &Config) -> Result<Self, EcsError> {
        let transport = HttpTransport::new(
            config.base_url(),
            config.proxy.as_deref(),
            Duration::from_secs(config.timeout_secs),
        )?;

        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> EcsConnection<T> {
    /// Creates a connection over a caller-supplied transport.
    pub fn with_transport(config: &Config, transport: T) -> Self {
        let server_name = config.server_name();
        let span = info_span!("ecs", host = %server_name, locale = %config.locale);

        let signer = SigV2Signer::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            server_name,
        );

        Self {
            builder: RequestBuilder::new(signer),
            transport,
            api_path: config.request_path(API_PATH),
            span,
        }
    }

    /// Signs and sends one request, returning the raw exchange.
    pub async fn make_request(
        &self,
        action: &str,
        params: Option<Params>,
        path: &str,
        verb: Verb,
    ) -> Result<RawResponse, EcsError> {
        let request = self.span.in_scope(|| self.builder.build(action, params, path, verb))?;
        self.transport.dispatch(&request).instrument(self.span.clone()).await
    }

    /// Runs `action` and parses every `marker` element of the response into a `R`.
    pub async fn get_response<R: XmlRecord>(
        &self,
        action: &str,
        mut params: Params,
        marker: &str,
    ) -> Result<ResultSet<R>, EcsError> {
        params.insert("Service".to_string(), SERVICE.to_string());
        params.insert("Operation".to_string(), action.to_string());

        let response = self.make_request(action, Some(params), &self.api_path, Verb::Get).await?;

        self.span.in_scope(|| {
            debug!("{}", response.body_text());

            if response.status != 200 {
                error!("{} {}", response.status, response.reason);
                error!("{}", response.body_text());
                return Err(EcsError::Response {
                    status: response.status,
                    reason: response.reason,
                    body: response.body,
                });
            }

            let result_set = parse_result_set(&response.body, marker)?;
            debug!("Parsed {} <{}> records", result_set.len(), marker);
            Ok(result_set)
        })
    }
}

#[async_trait]
impl<T: Transport> ItemSearch for EcsConnection<T> {
    async fn item_search(
        &self,
        search_index: &str,
        mut params: Params,
    ) -> Result<ResultSet<Item>, EcsError> {
        params.insert("SearchIndex".to_string(), search_index.to_string());

        info!(parent: &self.span, "ItemSearch in {}", search_index);
        self.get_response("ItemSearch", params, "Item").await
    }
}
