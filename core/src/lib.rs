//! Declarative HTTP API client core.
//!
//! # Overview
//! Maps an [`Endpoint`] description plus typed payloads into a concrete
//! [`HttpRequest`], hands it to a caller-supplied [`Transport`], and maps the
//! raw reply back into a typed [`Outcome`] delivered through a completion
//! callback. Nothing here performs I/O, blocking, retries, or caching — the
//! transport owns all of that.
//!
//! # Design
//! - [`Endpoint`] values are immutable route descriptors; resolving a
//!   pattern produces a new value.
//! - Requests and replies are plain data, so the whole pipeline is testable
//!   against an in-memory transport.
//! - Every failure a call can produce is one of the closed [`Reason`] set,
//!   delivered via the completion callback; nothing is thrown across the
//!   asynchronous boundary.
//! - Completion callbacks run exactly once per call, on a transport-chosen
//!   thread, with no ordering guarantee between concurrent calls.

pub mod client;
pub mod encode;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod resolve;

pub use client::Client;
pub use endpoint::{Encoding, Endpoint, MultipartPart};
pub use error::{NetworkError, Outcome, Reason};
pub use http::{
    HttpMethod, HttpRequest, ResponseCallback, ResponseMetadata, TransferHandle, Transport,
    TransportError, TransportReply,
};
