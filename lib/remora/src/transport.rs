//! Hyper-backed transport implementation.
//!
//! [`HyperTransport`] is the one place where the transport-agnostic
//! [`Request`]/[`Response`] types meet the wire: it converts the request
//! for hyper, runs it under the configured backstop timeout, and buffers
//! the whole response body before handing it back.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderName, HeaderValue};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client as PoolingClient, connect::HttpConnector},
    rt::TokioExecutor,
};
use tracing::debug;

use remora_core::{Error, HttpClient, Request, Response, Result};

use crate::{config::ClientConfig, connector::https_connector};

type Pool = PoolingClient<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Pooled, TLS-capable HTTP transport.
///
/// Calls are single-shot: one request in, one buffered response out,
/// guarded by `config.request_timeout`. Cloning is cheap and shares the
/// underlying connection pool.
#[derive(Clone)]
pub struct HyperTransport {
    pool: Pool,
    config: ClientConfig,
}

impl HyperTransport {
    /// Create a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a transport with custom configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let pool = PoolingClient::builder(TokioExecutor::new())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .build(https_connector(config.connect_timeout));
        Self { pool, config }
    }

    /// The transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpClient for HyperTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        let method = request.method();
        let url = request.url().clone();
        debug!(%method, %url, "executing request");

        let wire_request = into_wire(request)?;

        let wire_response = tokio::time::timeout(
            self.config.request_timeout,
            self.pool.request(wire_request),
        )
        .await
        .map_err(|_| Error::Timeout)?
        .map_err(classify)?;

        let status = wire_response.status().as_u16();
        let headers = collect_headers(wire_response.headers());
        let body = wire_response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        debug!(%method, %url, status, body_len = body.len(), "response received");
        Ok(Response::new(status, headers, body))
    }
}

/// Convert an assembled request into hyper's request type.
fn into_wire(request: Request) -> Result<http::Request<Full<Bytes>>> {
    let (method, url, headers, body) = request.into_parts();

    let mut wire = http::Request::new(body.map_or_else(Full::default, Full::new));
    *wire.method_mut() = method.into();
    *wire.uri_mut() = url
        .as_str()
        .parse()
        .map_err(|e: http::uri::InvalidUri| Error::invalid_request(e.to_string()))?;

    for (name, value) in headers {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| Error::invalid_request(format!("header name {name:?}: {e}")))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| Error::invalid_request(format!("header value for {name}: {e}")))?;
        wire.headers_mut().insert(name, value);
    }

    Ok(wire)
}

/// Flatten hyper's header map; names come out lowercased. Values that
/// are not valid UTF-8 are skipped.
fn collect_headers(wire: &http::HeaderMap) -> HashMap<String, String> {
    let mut headers = HashMap::with_capacity(wire.len());
    for (name, value) in wire {
        if let Ok(value) = value.to_str() {
            headers.insert(name.to_string(), value.to_string());
        }
    }
    headers
}

/// Map a hyper error onto the transport taxonomy.
fn classify(err: hyper_util::client::legacy::Error) -> Error {
    let message = err.to_string();
    let tls_related = ["tls", "ssl", "certificate"]
        .iter()
        .any(|needle| message.contains(needle));

    if tls_related {
        Error::tls(message)
    } else {
        Error::connection(message)
    }
}
