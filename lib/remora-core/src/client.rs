//! The transport seam.
//!
//! [`HttpClient`] is the capability this crate asks of the outside
//! world: execute one assembled request, return one buffered response.
//! Pooling, TLS, and proxies live behind the trait; request assembly
//! and response decoding live in front of it.

use std::future::Future;

use crate::{Request, Response, Result};

/// Capability to execute a single HTTP request.
///
/// Implementations must honor the request's method, URL, headers, and
/// body as given, and surface transport failures as
/// [`crate::Error::Connection`] / [`crate::Error::Tls`] /
/// [`crate::Error::Timeout`]. Calls are single-shot: no retry is
/// expected of an implementation, and none is performed above it.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be converted for the
    /// wire or the transport call failed.
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}
