//! Single-read HTTP response decoding.
//!
//! [`Response`] wraps a completed response. The read modes consume the
//! value, so exactly one of them can run per response — the single-pass
//! contract of the underlying body, enforced by move semantics.
//!
//! [`Response::json`], [`Response::read_all`], and [`Response::text`]
//! transparently gunzip bodies whose `Content-Encoding` is exactly the
//! literal `gzip` (any other value is treated as identity).
//! [`Response::copy_to`] deliberately does not: it hands out the raw,
//! possibly still compressed bytes. That asymmetry is part of the
//! contract — callers use it to relay a body verbatim.

use std::collections::HashMap;
use std::io::Read;

use bytes::Bytes;
use flate2::read::GzDecoder;

use crate::{Error, Result};

/// HTTP response with status, headers, and a buffered body.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (ASCII case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Decodes the (decompressed) body as JSON into `T`.
    ///
    /// An empty body is not an error: it yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`Error::Decompress`] if a `gzip` body is malformed;
    /// [`Error::Decode`] (with the JSON path) if deserialization fails.
    pub fn json<T: serde::de::DeserializeOwned>(self) -> Result<Option<T>> {
        let body = self.into_decoded_body()?;
        if body.is_empty() {
            return Ok(None);
        }
        let mut deserializer = serde_json::Deserializer::from_slice(&body);
        let value = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| Error::decode(e.path().to_string(), e.inner().to_string()))?;
        Ok(Some(value))
    }

    /// Returns the full (decompressed) body.
    ///
    /// # Errors
    ///
    /// [`Error::Decompress`] if a `gzip` body is malformed.
    pub fn read_all(self) -> Result<Bytes> {
        self.into_decoded_body()
    }

    /// Returns the (decompressed) body as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// [`Error::Decompress`] on malformed gzip, [`Error::Decode`] if the
    /// body is not valid UTF-8.
    pub fn text(self) -> Result<String> {
        let body = self.into_decoded_body()?;
        String::from_utf8(body.to_vec()).map_err(|e| Error::decode("", e.to_string()))
    }

    /// Copies the **raw** body to `sink`, bypassing gzip handling.
    ///
    /// A gzip-encoded body arrives at the sink still compressed; this
    /// is intentional and will not change (see the module docs).
    ///
    /// # Errors
    ///
    /// Returns the sink's I/O error, if any.
    pub fn copy_to<W: std::io::Write>(self, sink: &mut W) -> std::io::Result<u64> {
        sink.write_all(&self.body)?;
        Ok(self.body.len() as u64)
    }

    /// Applies the `Content-Encoding` decision and consumes the body.
    fn into_decoded_body(self) -> Result<Bytes> {
        // An empty body is empty under either encoding; never an error.
        if self.body.is_empty() {
            return Ok(self.body);
        }
        match self.header("content-encoding") {
            // Exactly the literal `gzip`; anything else is identity.
            Some("gzip") => {
                let mut decoder = GzDecoder::new(self.body.as_ref());
                let mut decompressed = Vec::new();
                decoder
                    .read_to_end(&mut decompressed)
                    .map_err(|e| Error::decompress(e.to_string()))?;
                Ok(Bytes::from(decompressed))
            }
            _ => Ok(self.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct User {
        id: u64,
        name: String,
    }

    fn gzip(data: &[u8]) -> Bytes {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).expect("write");
        Bytes::from(encoder.finish().expect("finish"))
    }

    fn gzip_headers() -> HashMap<String, String> {
        HashMap::from([("content-encoding".to_string(), "gzip".to_string())])
    }

    #[test]
    fn json_identity_round_trip() {
        let user = User {
            id: 7,
            name: "Ada".to_string(),
        };
        let body = Bytes::from(serde_json::to_vec(&user).expect("serialize"));
        let response = Response::new(200, HashMap::new(), body);

        let decoded: Option<User> = response.json().expect("decode");
        assert_eq!(decoded, Some(user));
    }

    #[test]
    fn json_gzip_round_trip() {
        let user = User {
            id: 7,
            name: "Ada".to_string(),
        };
        let body = gzip(&serde_json::to_vec(&user).expect("serialize"));
        let response = Response::new(200, gzip_headers(), body);

        let decoded: Option<User> = response.json().expect("decode");
        assert_eq!(decoded, Some(user));
    }

    #[test]
    fn json_empty_body_is_none() {
        let response = Response::new(204, HashMap::new(), Bytes::new());
        let decoded: Option<User> = response.json().expect("decode");
        assert!(decoded.is_none());

        // Empty with a gzip header is still not an error.
        let response = Response::new(204, gzip_headers(), Bytes::new());
        let decoded: Option<User> = response.json().expect("decode");
        assert!(decoded.is_none());
    }

    #[test]
    fn json_malformed_payload_reports_path() {
        let body = Bytes::from(r#"{"id": "not-a-number", "name": "Ada"}"#);
        let response = Response::new(200, HashMap::new(), body);

        let err = response.json::<User>().expect_err("should fail");
        let Error::Decode { path, .. } = err else {
            panic!("expected decode error, got {err:?}");
        };
        assert_eq!(path, "id");
    }

    #[test]
    fn read_all_empty_body_both_encodings() {
        let response = Response::new(200, HashMap::new(), Bytes::new());
        assert!(response.read_all().expect("read").is_empty());

        let response = Response::new(200, gzip_headers(), Bytes::new());
        assert!(response.read_all().expect("read").is_empty());
    }

    #[test]
    fn read_all_decompresses_gzip() {
        let response = Response::new(200, gzip_headers(), gzip(b"hello world"));
        let body = response.read_all().expect("read");
        assert_eq!(body.as_ref(), b"hello world");
    }

    #[test]
    fn read_all_other_encodings_are_identity() {
        // Only the literal `gzip` is special; `x-gzip` is passed through.
        let headers =
            HashMap::from([("content-encoding".to_string(), "x-gzip".to_string())]);
        let compressed = gzip(b"hello world");
        let response = Response::new(200, headers, compressed.clone());

        let body = response.read_all().expect("read");
        assert_eq!(body, compressed);
    }

    #[test]
    fn read_all_malformed_gzip_is_an_error() {
        let response = Response::new(200, gzip_headers(), Bytes::from("not gzip at all"));
        let err = response.read_all().expect_err("should fail");
        assert!(matches!(err, Error::Decompress(_)));
    }

    #[test]
    fn copy_to_leaves_gzip_compressed() {
        let compressed = gzip(b"hello world");
        let response = Response::new(200, gzip_headers(), compressed.clone());

        let mut sink = Vec::new();
        let written = response.copy_to(&mut sink).expect("copy");
        assert_eq!(written, compressed.len() as u64);
        assert_eq!(sink, compressed.to_vec());
    }

    #[test]
    fn text_decodes() {
        let response = Response::new(200, gzip_headers(), gzip("héllo".as_bytes()));
        assert_eq!(response.text().expect("text"), "héllo");
    }

    #[test]
    fn text_invalid_utf8_is_a_decode_error() {
        let response = Response::new(200, HashMap::new(), Bytes::from(vec![0xFF, 0xFE]));
        let err = response.text().expect_err("should fail");
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let headers =
            HashMap::from([("Content-Encoding".to_string(), "gzip".to_string())]);
        let response = Response::new(200, headers, gzip(b"payload"));

        assert_eq!(response.header("content-encoding"), Some("gzip"));
        let body = response.read_all().expect("read");
        assert_eq!(body.as_ref(), b"payload");
    }

    #[test]
    fn status_checks() {
        assert!(Response::new(200, HashMap::new(), Bytes::new()).is_success());
        assert!(Response::new(404, HashMap::new(), Bytes::new()).is_client_error());
        assert!(Response::new(502, HashMap::new(), Bytes::new()).is_server_error());
    }
}
