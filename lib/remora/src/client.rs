//! The client facade: default header/query state plus verb helpers.

use std::io::Read;

use serde::Serialize;
use tracing::debug;

use remora_core::{
    FlatParams, Form, Header, HttpClient, Method, Request, RequestBuilder, Response, Result,
    flatten, resolve,
};

use crate::{
    invoke::{Deadline, invoke},
    transport::HyperTransport,
};

/// Convenience HTTP client over a pluggable transport.
///
/// Owns client-wide defaults merged into every call: call headers
/// override base headers on collision, while call and base query
/// parameters are concatenated (call first, base appended, no dedup).
///
/// Base state mutation takes `&mut self`, so defaults are effectively
/// configuration-time: the borrow checker rules out mutating them while
/// shared references are executing calls. Wrap the client in a lock if
/// runtime reconfiguration is genuinely needed.
///
/// # Example
///
/// ```ignore
/// use remora::{Client, Deadline};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Search {
///     q: String,
/// }
///
/// let mut client = Client::new();
/// client.set_base_header("X-Api-Key", "secret");
///
/// let response = client
///     .get(
///         Deadline::none(),
///         "https://api.example.com/search",
///         Some(&Search { q: "rust".into() }),
///         None,
///     )
///     .await?;
/// let hits: Option<serde_json::Value> = response.json()?;
/// ```
#[derive(Debug, Clone)]
pub struct Client<C = HyperTransport> {
    transport: C,
    base_header: Header,
    base_query: FlatParams,
}

impl Client<HyperTransport> {
    /// Create a client over a default hyper transport.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(HyperTransport::new())
    }
}

impl Default for Client<HyperTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClient> Client<C> {
    /// Create a client over the given transport.
    #[must_use]
    pub fn with_transport(transport: C) -> Self {
        Self {
            transport,
            base_header: Header::new(),
            base_query: FlatParams::new(),
        }
    }

    /// Set a client-wide default header.
    pub fn set_base_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.base_header.insert(name.into(), value.into());
    }

    /// Append a client-wide default query parameter.
    pub fn set_base_query(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.base_query.append(name, value);
    }

    /// Client-wide default headers.
    #[must_use]
    pub const fn base_header(&self) -> &Header {
        &self.base_header
    }

    /// Mutable access to the default headers.
    pub const fn base_header_mut(&mut self) -> &mut Header {
        &mut self.base_header
    }

    /// Client-wide default query parameters.
    #[must_use]
    pub const fn base_query(&self) -> &FlatParams {
        &self.base_query
    }

    /// Mutable access to the default query parameters.
    pub const fn base_query_mut(&mut self) -> &mut FlatParams {
        &mut self.base_query
    }

    /// Issue a GET request; `query` is flattened into the URL.
    ///
    /// # Errors
    ///
    /// Encoding, URL, transport, or deadline errors; non-2xx responses
    /// are returned as responses, not errors.
    pub async fn get<Q: Serialize + Sync>(
        &self,
        deadline: Deadline,
        url: &str,
        query: Option<&Q>,
        header: Option<Header>,
    ) -> Result<Response> {
        self.query_call(Method::Get, deadline, url, query, header)
            .await
    }

    /// Issue a DELETE request; `query` is flattened into the URL.
    ///
    /// # Errors
    ///
    /// Same contract as [`Client::get`].
    pub async fn delete<Q: Serialize + Sync>(
        &self,
        deadline: Deadline,
        url: &str,
        query: Option<&Q>,
        header: Option<Header>,
    ) -> Result<Response> {
        self.query_call(Method::Delete, deadline, url, query, header)
            .await
    }

    /// Issue a POST request; `body` is flattened and form-encoded.
    ///
    /// # Errors
    ///
    /// Same contract as [`Client::get`].
    pub async fn post<B: Serialize + Sync>(
        &self,
        deadline: Deadline,
        url: &str,
        body: Option<&B>,
        header: Option<Header>,
    ) -> Result<Response> {
        self.body_call(Method::Post, deadline, url, body, header)
            .await
    }

    /// Issue a PUT request; `body` is flattened and form-encoded.
    ///
    /// # Errors
    ///
    /// Same contract as [`Client::get`].
    pub async fn put<B: Serialize + Sync>(
        &self,
        deadline: Deadline,
        url: &str,
        body: Option<&B>,
        header: Option<Header>,
    ) -> Result<Response> {
        self.body_call(Method::Put, deadline, url, body, header)
            .await
    }

    /// POST `len` bytes from `reader` with an explicit content length
    /// and the given media type.
    ///
    /// The media type is applied after the base headers and before the
    /// call headers, so a call header can still override it. The URL is
    /// used as given (no base-query merge).
    ///
    /// # Errors
    ///
    /// [`remora_core::Error::Request`] if reading the source fails;
    /// otherwise the same contract as [`Client::get`].
    pub async fn upload(
        &self,
        deadline: Deadline,
        url: &str,
        reader: impl Read + Send,
        len: u64,
        media_type: &str,
        header: Option<Header>,
    ) -> Result<Response> {
        debug!(url, len, media_type, "upload");
        let request = self
            .builder(Method::Post, url)?
            .read_from(reader, len)?
            .header("Content-Type", media_type)
            .headers(header.unwrap_or_default())
            .build();
        invoke(&self.transport, request, deadline).await
    }

    /// POST a multipart form.
    ///
    /// The boundary content type is applied after the base headers and
    /// before the call headers. The URL is used as given (no base-query
    /// merge). Field order is the order parts were added to `form`.
    ///
    /// # Errors
    ///
    /// Same contract as [`Client::get`].
    pub async fn multipart(
        &self,
        deadline: Deadline,
        url: &str,
        form: Form,
        header: Option<Header>,
    ) -> Result<Response> {
        debug!(url, parts = form.parts().len(), "multipart");
        let request = self
            .builder(Method::Post, url)?
            .multipart(form)
            .headers(header.unwrap_or_default())
            .build();
        invoke(&self.transport, request, deadline).await
    }

    async fn query_call<Q: Serialize + Sync>(
        &self,
        method: Method,
        deadline: Deadline,
        url: &str,
        query: Option<&Q>,
        header: Option<Header>,
    ) -> Result<Response> {
        let call_query = match query {
            Some(query) => flatten(query)?,
            None => FlatParams::new(),
        };
        let url = resolve(url, &call_query, &self.base_query)?;
        debug!(%method, url, "query call");
        let request = self
            .builder(method, &url)?
            .headers(header.unwrap_or_default())
            .build();
        invoke(&self.transport, request, deadline).await
    }

    async fn body_call<B: Serialize + Sync>(
        &self,
        method: Method,
        deadline: Deadline,
        url: &str,
        body: Option<&B>,
        header: Option<Header>,
    ) -> Result<Response> {
        let url = resolve(url, &FlatParams::new(), &self.base_query)?;
        debug!(%method, url, has_body = body.is_some(), "body call");
        let builder = self.builder(method, &url)?;
        let builder = match body {
            Some(body) => {
                let params = flatten(body)?;
                builder.form_params(&params)
            }
            None => builder,
        };
        let request = builder.headers(header.unwrap_or_default()).build();
        invoke(&self.transport, request, deadline).await
    }

    /// Start a builder with the base headers applied first, so that
    /// body modes and call headers layered on top override them.
    fn builder(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let url = url::Url::parse(url)?;
        Ok(Request::builder(method, url).headers(self.base_header.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    /// Transport that records the requests it receives.
    #[derive(Default)]
    struct RecordingTransport {
        seen: Mutex<Vec<Request>>,
    }

    impl HttpClient for RecordingTransport {
        async fn execute(&self, request: Request) -> Result<Response> {
            self.seen
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(request);
            Ok(Response::new(200, HashMap::new(), Bytes::new()))
        }
    }

    fn recorded(client: &Client<RecordingTransport>) -> Request {
        client
            .transport
            .seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .first()
            .cloned()
            .expect("one request recorded")
    }

    #[tokio::test]
    async fn get_merges_call_and_base_query() {
        let mut client = Client::with_transport(RecordingTransport::default());
        client.set_base_query("a", "1");

        client
            .get(Deadline::none(), "http://h/p", Some(&json!({"b": 2})), None)
            .await
            .expect("response");

        let request = recorded(&client);
        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "http://h/p?b=2&a=1");
        assert!(request.body().is_none());
    }

    #[tokio::test]
    async fn post_form_encodes_body_and_appends_base_query() {
        let mut client = Client::with_transport(RecordingTransport::default());
        client.set_base_query("v", "2024");

        client
            .post(
                Deadline::none(),
                "http://h/submit",
                Some(&json!({"name": "ada", "tags": ["x", "y"]})),
                None,
            )
            .await
            .expect("response");

        let request = recorded(&client);
        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.url().as_str(), "http://h/submit?v=2024");
        assert_eq!(
            request.header("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            request.body().map(|b| b.as_ref()),
            Some(&b"name=ada&tags=x&tags=y"[..])
        );
    }

    #[tokio::test]
    async fn call_header_overrides_base_header() {
        let mut client = Client::with_transport(RecordingTransport::default());
        client.set_base_header("X", "1");
        client.set_base_header("Keep", "base");

        let call = Header::from([("X".to_string(), "2".to_string())]);
        client
            .get::<serde_json::Value>(Deadline::none(), "http://h/p", None, Some(call))
            .await
            .expect("response");

        let request = recorded(&client);
        assert_eq!(request.header("X"), Some("2"));
        assert_eq!(request.header("Keep"), Some("base"));
    }

    #[tokio::test]
    async fn upload_sets_length_and_media_type_between_base_and_call() {
        let mut client = Client::with_transport(RecordingTransport::default());
        client.set_base_header("Content-Type", "base/overridden");

        let payload = b"binary payload";
        client
            .upload(
                Deadline::none(),
                "http://h/blob",
                &payload[..],
                payload.len() as u64,
                "application/octet-stream",
                None,
            )
            .await
            .expect("response");

        let request = recorded(&client);
        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.header("Content-Length"), Some("14"));
        assert_eq!(
            request.header("Content-Type"),
            Some("application/octet-stream")
        );
        assert_eq!(request.body().map(|b| b.as_ref()), Some(&payload[..]));
    }

    #[tokio::test]
    async fn upload_call_header_can_override_media_type() {
        let client = Client::with_transport(RecordingTransport::default());

        let call = Header::from([("Content-Type".to_string(), "text/csv".to_string())]);
        client
            .upload(
                Deadline::none(),
                "http://h/blob",
                &b"a,b"[..],
                3,
                "application/octet-stream",
                Some(call),
            )
            .await
            .expect("response");

        let request = recorded(&client);
        assert_eq!(request.header("Content-Type"), Some("text/csv"));
    }

    #[tokio::test]
    async fn multipart_posts_encoded_form() {
        let client = Client::with_transport(RecordingTransport::default());

        let form = Form::with_boundary("b42").text("note", "hello");
        client
            .multipart(Deadline::none(), "http://h/files", form, None)
            .await
            .expect("response");

        let request = recorded(&client);
        assert_eq!(
            request.header("Content-Type"),
            Some("multipart/form-data; boundary=b42")
        );
        let body = request.body().expect("body");
        assert!(body.starts_with(b"--b42\r\n"));
    }

    #[tokio::test]
    async fn encoding_error_surfaces_before_transport() {
        let client = Client::with_transport(RecordingTransport::default());

        let err = client
            .get(
                Deadline::none(),
                "http://h/p",
                Some(&json!(["not", "a", "mapping"])),
                None,
            )
            .await
            .expect_err("should fail");
        assert!(err.is_pre_transport());
        assert!(
            client
                .transport
                .seen
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .is_empty()
        );
    }

    #[tokio::test]
    async fn malformed_url_surfaces_before_transport() {
        let client = Client::with_transport(RecordingTransport::default());

        let err = client
            .get::<serde_json::Value>(Deadline::none(), "::nope::", None, None)
            .await
            .expect_err("should fail");
        assert!(matches!(err, remora_core::Error::InvalidUrl(_)));
    }
}
