//! Convenience HTTP client over a hyper transport.
//!
//! This crate pairs the transport-agnostic request/response machinery of
//! [`remora_core`] with a concrete hyper-based transport and a
//! high-level [`Client`] facade:
//!
//! - structured parameters flattened into query strings and form bodies
//!   ([`flatten`], [`FlatParams`])
//! - form, raw-upload, and multipart request assembly ([`Request`],
//!   [`Form`])
//! - client-wide default headers and query parameters merged into every
//!   call ([`Client`])
//! - per-call deadlines with consistent timeout classification
//!   ([`Deadline`], [`invoke`])
//! - gzip-aware single-read response decoding ([`Response`])
//!
//! # Example
//!
//! ```ignore
//! use remora::{Client, Deadline};
//! use std::time::Duration;
//!
//! let client = Client::new();
//! let response = client
//!     .get::<serde_json::Value>(
//!         Deadline::after(Duration::from_secs(5)),
//!         "https://api.example.com/status",
//!         None,
//!         None,
//!     )
//!     .await?;
//! println!("{}", response.status());
//! ```

mod client;
mod config;
mod connector;
mod invoke;
pub mod prelude;
mod transport;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use connector::https_connector;
pub use invoke::{Deadline, invoke};
pub use transport::HyperTransport;

pub use remora_core::{
    Error, FlatParams, Form, Header, HttpClient, KeyJoin, Method, Part, Request, RequestBuilder,
    Response, Result, bracket_join, flatten, flatten_with, resolve,
};
