//! Convenience re-exports for the common surface.
//!
//! ```
//! use remora::prelude::*;
//! ```

pub use crate::{
    Client, ClientConfig, Deadline, Error, FlatParams, Form, Header, HttpClient, HyperTransport,
    Method, Part, Request, Response, Result, flatten, invoke, resolve,
};
