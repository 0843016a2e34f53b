//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types and functions for easy glob
//! importing:
//!
//! ```ignore
//! use remora_core::prelude::*;
//! ```

pub use crate::{
    Error, FlatParams, Form, Header, HttpClient, Method, Part, Request, RequestBuilder, Response,
    Result, flatten, flatten_with, resolve,
};
