//! Transport-agnostic building blocks for the remora HTTP convenience
//! client:
//!
//! - [`flatten`] / [`FlatParams`] - recursive flattening of structured
//!   values into the repeated key/value pairs of form/query encodings
//! - [`Request`] and [`RequestBuilder`] - request assembly (form, raw
//!   upload, multipart) with uniform header precedence
//! - [`resolve`] - merging call and client-default query parameters
//! - [`Response`] - single-read, gzip-aware response decoding
//! - [`Error`] and [`Result`] - error handling
//! - [`HttpClient`] - the trait an actual transport implements
//!
//! The `remora` crate layers a hyper-backed transport and a client
//! facade on top of these types.

mod client;
mod error;
mod flatten;
mod method;
mod multipart;
mod params;
pub mod prelude;
mod request;
mod resolve;
mod response;

pub use client::HttpClient;
pub use error::{Error, Result};
pub use flatten::{KeyJoin, bracket_join, flatten, flatten_with};
pub use method::Method;
pub use multipart::{Form, Part};
pub use params::FlatParams;
pub use request::{Header, Request, RequestBuilder};
pub use resolve::resolve;
pub use response::Response;
