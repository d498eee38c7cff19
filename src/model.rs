//! Protocol-agnostic request/response model.
//!
//! These four types are the whole contract between the protocol adapters and
//! the application handler. They are transient values scoped to a single
//! request; nothing here is shared across requests or persisted.

use bytes::Bytes;

/// Wire protocol that produced a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Proto {
    Gemini,
    Http,
}

impl Proto {
    /// URL scheme for this protocol, as recorded on request spans.
    pub fn scheme(self) -> &'static str {
        match self {
            Proto::Gemini => "gemini",
            Proto::Http => "http",
        }
    }
}

/// Abstract outcome of handling a request.
///
/// Each protocol adapter owns a total mapping from this enum to its native
/// status codes; see [`crate::gemini::status_code`] and
/// [`crate::http::status_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    NotFound,
    Error,
    TemporaryRedirection,
    PermanentRedirection,
}

impl Status {
    /// Whether this status belongs to the redirection class.
    ///
    /// For redirection statuses the response content carries the redirect
    /// target instead of a body.
    pub fn is_redirection(self) -> bool {
        matches!(
            self,
            Status::TemporaryRedirection | Status::PermanentRedirection
        )
    }
}

/// One inbound request, built exactly once by a protocol adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub path: String,
    pub proto: Proto,
}

impl Request {
    pub fn new(path: impl Into<String>, proto: Proto) -> Self {
        Self {
            path: path.into(),
            proto,
        }
    }
}

/// The handler's answer to a [`Request`].
///
/// For redirection statuses `content` is reinterpreted as UTF-8 redirect
/// target text and `content_type` is ignored; for everything else `content`
/// is the response body and `content_type` its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub content: Bytes,
    pub content_type: String,
    pub status: Status,
}

impl Response {
    pub fn new(content: impl Into<Bytes>, content_type: impl Into<String>, status: Status) -> Self {
        Self {
            content: content.into(),
            content_type: content_type.into(),
            status,
        }
    }

    /// Redirect target carried in `content`, decoded as UTF-8 text.
    pub fn redirect_target(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
