//! HTTP request assembly.
//!
//! Use [`Request::builder`] to construct requests. Four body shapes are
//! supported: none, form-encoded [`FlatParams`], a buffered raw upload
//! with an explicit declared length, and an encoded multipart [`Form`].
//!
//! Header precedence is uniform: headers applied earlier are overridden
//! by later inserts, so callers apply client defaults first, let the
//! body mode set its content type, and finish with call-specific
//! headers (which therefore win on any collision).
//!
//! # Example
//!
//! ```
//! use remora_core::{FlatParams, Method, Request};
//!
//! let mut params = FlatParams::new();
//! params.append("user", "alice");
//!
//! let request = Request::builder(
//!     Method::Post,
//!     "https://api.example.com/login".parse().expect("url"),
//! )
//! .form_params(&params)
//! .build();
//! assert_eq!(
//!     request.header("Content-Type"),
//!     Some("application/x-www-form-urlencoded"),
//! );
//! ```

use std::collections::HashMap;
use std::io::Read;

use bytes::Bytes;

use crate::{FlatParams, Form, Method, Result};

/// Request/response headers as a plain name to value map.
///
/// No case normalization is applied here; the transport layer applies
/// whatever canonicalization the wire format requires.
pub type Header = HashMap<String, String>;

/// A fully assembled HTTP request, immutable once built.
///
/// Owned exclusively by the call that built it until handed to the
/// transport, which consumes it.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: Header,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &Header {
        &self.headers
    }

    /// Single header value by exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Request body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, Header, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: url::Url,
    headers: Header,
    body: Option<Bytes>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: Header::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any previous value for the name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers; later entries win over earlier ones.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets a raw byte body.
    #[must_use]
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Form-encodes `params` as the request body.
    ///
    /// Sets `Content-Type: application/x-www-form-urlencoded`; a header
    /// applied afterwards can still override it.
    #[must_use]
    pub fn form_params(self, params: &FlatParams) -> Self {
        self.header("Content-Type", "application/x-www-form-urlencoded")
            .body(Bytes::from(params.encode().into_bytes()))
    }

    /// Buffers `reader` as the request body, declaring `len` as the
    /// explicit `Content-Length` (no chunked fallback).
    ///
    /// The source is drained to end synchronously and dropped before
    /// this returns. The declared length is sent as given; it is the
    /// caller's contract that it matches the source.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Request`] if reading the source fails;
    /// the partially built request is discarded.
    pub fn read_from(self, mut reader: impl Read, len: u64) -> Result<Self> {
        let mut buf = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
        reader.read_to_end(&mut buf)?;
        Ok(self
            .header("Content-Length", len.to_string())
            .body(Bytes::from(buf)))
    }

    /// Encodes `form` as the request body.
    ///
    /// Sets the `multipart/form-data; boundary=...` content type; a
    /// header applied afterwards can still override it.
    #[must_use]
    pub fn multipart(self, form: Form) -> Self {
        let (content_type, body) = form.into_body();
        self.header("Content-Type", content_type).body(body)
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_url() -> url::Url {
        url::Url::parse("https://api.example.com/upload").expect("valid URL")
    }

    #[test]
    fn builder_basic() {
        let request = Request::builder(Method::Get, test_url())
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://api.example.com/upload");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert!(request.body().is_none());
    }

    #[test]
    fn form_params_sets_body_and_content_type() {
        let mut params = FlatParams::new();
        params.append("user", "alice");
        params.append("tags", "a");
        params.append("tags", "b");

        let request = Request::builder(Method::Post, test_url())
            .form_params(&params)
            .build();

        assert_eq!(
            request.header("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            request.body().map(|b| b.as_ref()),
            Some(&b"user=alice&tags=a&tags=b"[..])
        );
    }

    #[test]
    fn header_precedence_call_wins() {
        // base < content-type-derived < call
        let base = Header::from([("X".to_string(), "1".to_string())]);
        let call = Header::from([
            ("X".to_string(), "2".to_string()),
            ("Content-Type".to_string(), "text/csv".to_string()),
        ]);

        let request = Request::builder(Method::Post, test_url())
            .headers(base)
            .form_params(&FlatParams::new())
            .headers(call)
            .build();

        assert_eq!(request.header("X"), Some("2"));
        assert_eq!(request.header("Content-Type"), Some("text/csv"));
    }

    #[test]
    fn read_from_buffers_and_declares_length() {
        let payload = b"raw upload payload";
        let request = Request::builder(Method::Post, test_url())
            .read_from(&payload[..], payload.len() as u64)
            .expect("read")
            .header("Content-Type", "application/octet-stream")
            .build();

        assert_eq!(request.header("Content-Length"), Some("18"));
        assert_eq!(request.body().map(|b| b.as_ref()), Some(&payload[..]));
    }

    #[test]
    fn read_from_failure_discards_request() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("broken source"))
            }
        }

        let err = Request::builder(Method::Post, test_url())
            .read_from(FailingReader, 10)
            .expect_err("should fail");
        assert!(matches!(err, crate::Error::Request(_)));
    }

    #[test]
    fn multipart_sets_boundary_content_type() {
        let form = Form::with_boundary("b123").text("field", "value");
        let request = Request::builder(Method::Post, test_url())
            .multipart(form)
            .build();

        assert_eq!(
            request.header("Content-Type"),
            Some("multipart/form-data; boundary=b123")
        );
        assert!(request.body().is_some());
    }
}
