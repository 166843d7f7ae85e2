//! Wire-level types and the transport contract.
//!
//! # Design
//! Requests and replies are plain data. The core builds `HttpRequest` values
//! and interprets `TransportReply` values without ever touching the network —
//! the actual transfer is behind the `Transport` trait, so any HTTP stack
//! (or a canned in-memory fake) can drive the client. All fields use owned
//! types (`String`, `Vec`) so values can cross thread boundaries freely.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An outgoing HTTP request described as plain data.
///
/// Built by the client's dispatch pipeline and handed to a `Transport` for
/// execution. The body, when present, is raw bytes; the matching
/// `Content-Type` header is already set.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// The HTTP-level metadata of a reply, when the transport produced one.
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

/// A transport-level failure (connection refused, DNS, timeout, ...),
/// opaque to this layer.
#[derive(Debug, Clone)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transport error: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// Everything a transport reports back for one request.
///
/// All three fields are independently optional: a transport error can arrive
/// with or without HTTP metadata, and a body can be absent on any reply.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub body: Option<Vec<u8>>,
    pub metadata: Option<ResponseMetadata>,
    pub error: Option<TransportError>,
}

/// Callback invoked by the transport exactly once per submitted request, on
/// a thread of the transport's choosing.
pub type ResponseCallback = Box<dyn FnOnce(TransportReply) + Send + 'static>;

/// A submitted-but-not-started transfer.
///
/// `submit` performs no network activity; the transfer begins when `start`
/// is called. No cancellation handle is exposed at this layer.
pub trait TransferHandle {
    fn start(self: Box<Self>);
}

/// The external component that executes HTTP transfers.
///
/// Implementations must invoke `on_complete` exactly once per submitted
/// request, after `start` has been called on the returned handle. Ordering
/// between the completions of concurrent requests is not guaranteed.
pub trait Transport {
    fn submit(&self, request: HttpRequest, on_complete: ResponseCallback) -> Box<dyn TransferHandle>;
}
