//! HTTP dispatch of signed requests.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use wreq::{Client, Uri};
use wreq_proto::ext::ReasonPhrase;

use crate::ecs::request::{SignedRequest, Verb};
use crate::error::EcsError;

/// Status line and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Trait for sending a signed request - enables mocking for tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, request: &SignedRequest) -> Result<RawResponse, EcsError>;
}

/// Transport backed by a pooled `wreq` client.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport sending to `base_url` (`scheme://host[:port]`).
    ///
    /// A malformed endpoint or proxy is reported as [`EcsError::Config`].
    pub fn new(
        base_url: impl Into<String>,
        proxy: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, EcsError> {
        let base_url = base_url.into();
        let uri: Uri = base_url
            .parse()
            .map_err(|e| EcsError::Config(format!("invalid endpoint '{}': {}", base_url, e)))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(EcsError::Config(format!("invalid endpoint '{}'", base_url)));
        }

        let mut builder =
            Client::builder().gzip(true).timeout(timeout).connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url)
                .map_err(|e| EcsError::Config(format!("invalid proxy '{}': {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| EcsError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(&self, request: &SignedRequest) -> Result<RawResponse, EcsError> {
        let url = format!("{}{}", self.base_url, request.target);
        debug!("{} {}", request.verb, url);

        let mut builder = match request.verb {
            Verb::Get => self.client.get(&url),
            Verb::Post => self.client.post(&url),
            Verb::Put => self.client.put(&url),
            Verb::Delete => self.client.delete(&url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        // The phrase the server sent, else the canonical one for the status.
        let reason = match response.extensions().get::<ReasonPhrase>() {
            Some(phrase) => String::from_utf8_lossy(phrase.as_ref()).into_owned(),
            None => status.canonical_reason().unwrap_or_default().to_string(),
        };
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status: status.as_u16(), reason, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> HttpTransport {
        HttpTransport::new(server.uri(), None, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_target_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/onca/xml"))
            .and(query_param("Keywords", "rust lang"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = SignedRequest {
            verb: Verb::Get,
            target: "/onca/xml?Keywords=rust%20lang&Signature=x".to_string(),
            body: String::new(),
            headers: Vec::new(),
        };

        let response = transport(&mock_server).dispatch(&request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.reason, "OK");
        assert_eq!(response.body_text(), "<ok/>");
    }

    #[tokio::test]
    async fn test_post_sends_body_and_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/onca/xml"))
            .and(header("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8"))
            .and(body_string("Keywords=test&Signature=x"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = SignedRequest {
            verb: Verb::Post,
            target: "/onca/xml".to_string(),
            body: "Keywords=test&Signature=x".to_string(),
            headers: vec![(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded; charset=UTF-8".to_string(),
            )],
        };

        let response = transport(&mock_server).dispatch(&request).await.unwrap();
        assert_eq!(response.status, 200);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&mock_server)
            .await;

        let request = SignedRequest {
            verb: Verb::Get,
            target: "/onca/xml?A=1".to_string(),
            body: String::new(),
            headers: Vec::new(),
        };

        let response = transport(&mock_server).dispatch(&request).await.unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(response.reason, "Service Unavailable");
        assert_eq!(response.body_text(), "busy");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport =
            HttpTransport::new("http://127.0.0.1:1", None, Duration::from_secs(2)).unwrap();
        let request = SignedRequest {
            verb: Verb::Get,
            target: "/onca/xml".to_string(),
            body: String::new(),
            headers: Vec::new(),
        };

        let result = transport.dispatch(&request).await;
        assert!(matches!(result, Err(EcsError::Transport(_))));
    }

    #[tokio::test]
    async fn test_custom_reason_phrase_is_kept() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(
                    b"HTTP/1.1 599 Slow Down Please\r\nContent-Length: 4\r\nConnection: close\r\n\r\nbusy",
                )
                .await
                .unwrap();
        });

        let transport =
            HttpTransport::new(format!("http://{}", addr), None, Duration::from_secs(5)).unwrap();
        let request = SignedRequest {
            verb: Verb::Get,
            target: "/onca/xml?A=1".to_string(),
            body: String::new(),
            headers: Vec::new(),
        };

        let response = transport.dispatch(&request).await.unwrap();
        assert_eq!(response.status, 599);
        assert_eq!(response.reason, "Slow Down Please");
        assert_eq!(response.body_text(), "busy");
    }

    #[tokio::test]
    async fn test_bad_proxy_is_config_error() {
        let result = HttpTransport::new(
            "https://ecs.amazonaws.com",
            Some("not a url"),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(EcsError::Config(_))));
    }

    #[tokio::test]
    async fn test_bad_endpoint_is_config_error() {
        let result = HttpTransport::new("http://bad host", None, Duration::from_secs(1));
        assert!(matches!(result, Err(EcsError::Config(_))));

        let result = HttpTransport::new("ecs.amazonaws.com", None, Duration::from_secs(1));
        assert!(matches!(result, Err(EcsError::Config(_))));
    }
}
