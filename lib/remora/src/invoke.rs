//! Deadline-aware transport invocation.
//!
//! [`invoke`] is the single chokepoint between assembled requests and
//! the transport. It classifies failures around a caller-supplied
//! [`Deadline`]: an elapsed deadline is reported as
//! [`Error::Timeout`] even when the aborted transport call surfaced its
//! own error first. The deadline is checked before the call (so an
//! already-expired deadline never touches the network) and re-checked
//! after a transport failure.

use std::time::Duration;

use tokio::time::Instant;

use remora_core::{Error, HttpClient, Request, Response, Result};

/// Cooperative cancellation signal for a single call.
///
/// Wraps an optional point in time after which the call is considered
/// cancelled. `Deadline::none()` (the default) never expires.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// No deadline; the call runs until the transport resolves it.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Deadline at a specific instant.
    #[must_use]
    pub const fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    /// Deadline `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self(Some(Instant::now() + timeout))
    }

    /// Returns `true` if the deadline has passed.
    #[must_use]
    pub fn is_elapsed(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

impl From<Duration> for Deadline {
    fn from(timeout: Duration) -> Self {
        Self::after(timeout)
    }
}

impl From<Instant> for Deadline {
    fn from(instant: Instant) -> Self {
        Self::at(instant)
    }
}

/// Execute `request` on `transport`, honoring `deadline`.
///
/// Single-shot: no retry on any failure. When both a transport error
/// and an elapsed deadline are present, the deadline wins — the caller
/// asked for cancellation and gets [`Error::Timeout`], not whatever the
/// aborted call happened to report.
///
/// # Errors
///
/// [`Error::Timeout`] if the deadline expired before or during the
/// call; otherwise the transport's error, unchanged.
pub async fn invoke<C: HttpClient>(
    transport: &C,
    request: Request,
    deadline: Deadline,
) -> Result<Response> {
    if deadline.is_elapsed() {
        return Err(Error::Timeout);
    }

    let result = match deadline.0 {
        Some(at) => match tokio::time::timeout_at(at, transport.execute(request)).await {
            Ok(result) => result,
            Err(_) => return Err(Error::Timeout),
        },
        None => transport.execute(request).await,
    };

    match result {
        Err(err) if deadline.is_elapsed() && !err.is_timeout() => Err(Error::Timeout),
        other => other,
    }
}
