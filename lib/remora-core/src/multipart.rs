//! Multipart form data assembly.
//!
//! [`Form`] collects named [`Part`]s and encodes them into a
//! `multipart/form-data` body. Parts built from readers drain their
//! source synchronously at construction time; the source is dropped
//! (closed) before the constructor returns, whether or not the copy
//! completed.
//!
//! Field order on the wire is the order parts were added. Callers
//! assembling parts from an unordered map must sort keys themselves if
//! they need a deterministic body.
//!
//! # Example
//!
//! ```
//! use remora_core::Form;
//!
//! let form = Form::new()
//!     .text("name", "John Doe")
//!     .file("avatar", "photo.png", vec![0x89, 0x50, 0x4E, 0x47]);
//!
//! let (content_type, body) = form.into_body();
//! assert!(content_type.starts_with("multipart/form-data; boundary="));
//! assert!(!body.is_empty());
//! ```

use std::fmt::Write as _;
use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::{BufMut, Bytes, BytesMut};

use crate::Result;

/// A single part in a multipart form.
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl Part {
    /// Create a part with the given name and data, no content type.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Create a text part (`text/plain; charset=utf-8`).
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Bytes::from(value.into())).with_content_type("text/plain; charset=utf-8")
    }

    /// Create a binary part (`application/octet-stream`).
    #[must_use]
    pub fn bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(name, data).with_content_type("application/octet-stream")
    }

    /// Create a file part with a filename.
    ///
    /// The content type is guessed from the filename extension, falling
    /// back to `application/octet-stream`.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let filename = filename.into();
        let content_type = content_type_for(&filename);
        Self::new(name, data)
            .with_content_type(content_type)
            .with_filename(filename)
    }

    /// Create a plain part by draining `reader` now.
    ///
    /// The source is read to end synchronously and dropped before this
    /// returns (fire-and-forget ownership transfer).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Request`] if reading the source fails.
    pub fn from_reader(name: impl Into<String>, mut reader: impl Read) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::new(name, data))
    }

    /// Create a file part by draining `reader` now.
    ///
    /// Same ownership rules as [`Part::from_reader`]; the content type
    /// is guessed from `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Request`] if reading the source fails.
    pub fn file_from_reader(
        name: impl Into<String>,
        filename: impl Into<String>,
        mut reader: impl Read,
    ) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::file(name, filename, data))
    }

    /// Set the filename for this part.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the content type for this part.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Part name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filename, if this is a file part.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Content type, if set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Part data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Render this part's headers (everything between the boundary line
    /// and the data), including the trailing blank line.
    fn header_block(&self) -> String {
        let mut block = String::new();
        let _ = write!(
            block,
            "Content-Disposition: form-data; name=\"{}\"",
            self.name
        );
        if let Some(filename) = &self.filename {
            let _ = write!(block, "; filename=\"{filename}\"");
        }
        block.push_str("\r\n");
        if let Some(content_type) = &self.content_type {
            let _ = write!(block, "Content-Type: {content_type}\r\n");
        }
        block.push_str("\r\n");
        block
    }
}

/// Media type for a filename, by extension, case-insensitive.
fn content_type_for(filename: &str) -> &'static str {
    let Some((_, extension)) = filename.rsplit_once('.') else {
        return "application/octet-stream";
    };
    match extension.to_ascii_lowercase().as_str() {
        "csv" => "text/csv",
        "gif" => "image/gif",
        "gz" | "gzip" => "application/gzip",
        "htm" | "html" => "text/html",
        "jpeg" | "jpg" => "image/jpeg",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "xml" => "application/xml",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// A multipart form containing multiple parts.
#[derive(Debug, Clone)]
pub struct Form {
    parts: Vec<Part>,
    boundary: String,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create an empty form with a generated boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_boundary(generate_boundary())
    }

    /// Create an empty form with a custom boundary.
    ///
    /// The boundary must not appear in any part's data.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: boundary.into(),
        }
    }

    /// Add a part to the form.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add a text field to the form.
    #[must_use]
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(Part::text(name, value))
    }

    /// Add a file to the form.
    #[must_use]
    pub fn file(
        self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.part(Part::file(name, filename, data))
    }

    /// Boundary string.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Parts in wire order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// `Content-Type` header value for this form.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Consume the form into (content-type header value, encoded body).
    #[must_use]
    pub fn into_body(self) -> (String, Bytes) {
        let content_type = self.content_type();
        (content_type, self.encode())
    }

    fn encode(&self) -> Bytes {
        let delimiter = format!("--{}\r\n", self.boundary);

        let mut buf = BytesMut::new();
        for part in &self.parts {
            buf.put_slice(delimiter.as_bytes());
            buf.put_slice(part.header_block().as_bytes());
            buf.put_slice(&part.data);
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        buf.freeze()
    }
}

/// Boundary unlikely to collide with part data: a fixed tag plus a
/// process-wide counter and the current time.
fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    static SEQ: AtomicU64 = AtomicU64::new(0);

    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    format!("----remora-{nanos:x}-{seq:x}")
}
