//! The client: dispatch pipeline and public call surface.
//!
//! # Design
//! `Client` holds the base URL, the default headers, and the transport —
//! nothing else; no state survives a call. Dispatch is a straight line with
//! early exits: resolve the path, encode query parameters, assemble and
//! re-parse the URL, check the method allow-list, attach headers, encode the
//! body, submit. Every early exit completes the caller's callback with a
//! classified `Failure` and never reaches the transport. Submission is
//! non-blocking; the outcome arrives later on a transport-chosen thread.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::encode;
use crate::endpoint::Endpoint;
use crate::error::{Outcome, Reason};
use crate::http::{HttpMethod, HttpRequest, Transport};
use crate::resolve;

/// The body slot of a dispatched call.
///
/// `Unused` is a call with no body at all (GET and friends). `Used(None)` is
/// a body-bearing call whose payload is missing, which fails as
/// `BuildingPayload` — after the URL and method checks, matching the
/// pipeline's error precedence.
enum BodySlot<'a, B> {
    Unused,
    Used(Option<&'a B>),
}

/// HTTP API client over a caller-supplied transport.
///
/// The base URL and transport are fixed at construction; default headers are
/// mutated only through [`Client::set_default_header`]. A `Client` carries
/// no per-call state, so concurrent calls through a shared reference are
/// safe whenever the transport allows them.
pub struct Client<T: Transport> {
    base_url: Url,
    default_headers: HashMap<String, String>,
    transport: T,
}

impl<T: Transport> Client<T> {
    /// Create a client for `base_url`.
    ///
    /// # Panics
    /// Panics when `base_url` is not a valid absolute URL. Base-URL validity
    /// is a deployment invariant, not a runtime condition, so construction
    /// aborts instead of returning an error.
    pub fn new(base_url: &str, transport: T) -> Self {
        let base_url = Url::parse(base_url).expect("malformed base URL");
        Self {
            base_url,
            default_headers: HashMap::new(),
            transport,
        }
    }

    /// Set a header sent with every request. One value per name; setting an
    /// existing name overwrites it.
    pub fn set_default_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.default_headers.insert(name.into(), value.into());
    }

    /// Issue a request with no query parameters and no body, decoding the
    /// success body into `R`.
    pub fn call<R, F>(
        &self,
        endpoint: &Endpoint,
        args: Option<&HashMap<String, String>>,
        method: HttpMethod,
        completion: F,
    ) where
        R: DeserializeOwned + 'static,
        F: FnOnce(Outcome, Option<R>) + Send + 'static,
    {
        let built =
            self.build_request::<(), ()>(endpoint, args, method, None, BodySlot::Unused);
        self.dispatch(built, completion);
    }

    /// Issue a request carrying `params` as the query string, decoding the
    /// success body into `R`.
    pub fn call_with_params<P, R, F>(
        &self,
        endpoint: &Endpoint,
        args: Option<&HashMap<String, String>>,
        params: &P,
        method: HttpMethod,
        completion: F,
    ) where
        P: Serialize,
        R: DeserializeOwned + 'static,
        F: FnOnce(Outcome, Option<R>) + Send + 'static,
    {
        let built =
            self.build_request::<P, ()>(endpoint, args, method, Some(params), BodySlot::Unused);
        self.dispatch(built, completion);
    }

    /// Issue a body-bearing request, encoding `body` per the endpoint's
    /// declared strategy and decoding the success body into `R`.
    ///
    /// A `None` body completes as `BuildingPayload`: callers that intend no
    /// body use [`Client::call`] instead.
    pub fn post<B, R, F>(
        &self,
        endpoint: &Endpoint,
        args: Option<&HashMap<String, String>>,
        method: HttpMethod,
        body: Option<&B>,
        completion: F,
    ) where
        B: Serialize,
        R: DeserializeOwned + 'static,
        F: FnOnce(Outcome, Option<R>) + Send + 'static,
    {
        let built =
            self.build_request::<(), B>(endpoint, args, method, None, BodySlot::Used(body));
        self.dispatch(built, completion);
    }

    /// Like [`Client::call`] for endpoints whose success response carries no
    /// usable body. The body is never read on success.
    pub fn call_no_content<F>(
        &self,
        endpoint: &Endpoint,
        args: Option<&HashMap<String, String>>,
        method: HttpMethod,
        completion: F,
    ) where
        F: FnOnce(Outcome) + Send + 'static,
    {
        let built =
            self.build_request::<(), ()>(endpoint, args, method, None, BodySlot::Unused);
        self.dispatch_no_content(built, completion);
    }

    /// Like [`Client::post`] for endpoints whose success response carries no
    /// usable body.
    pub fn post_no_content<B, F>(
        &self,
        endpoint: &Endpoint,
        args: Option<&HashMap<String, String>>,
        method: HttpMethod,
        body: Option<&B>,
        completion: F,
    ) where
        B: Serialize,
        F: FnOnce(Outcome) + Send + 'static,
    {
        let built =
            self.build_request::<(), B>(endpoint, args, method, None, BodySlot::Used(body));
        self.dispatch_no_content(built, completion);
    }

    /// Run the pipeline up to a submittable request.
    fn build_request<P: Serialize, B: Serialize>(
        &self,
        endpoint: &Endpoint,
        args: Option<&HashMap<String, String>>,
        method: HttpMethod,
        params: Option<&P>,
        body: BodySlot<'_, B>,
    ) -> Result<HttpRequest, Reason> {
        let path = endpoint.resolve_path(args).ok_or(Reason::InvalidUrl)?;
        let query = match params {
            Some(params) => encode::query_parameters(params)?,
            None => Vec::new(),
        };
        let url = self.assemble_url(&path, &query)?;

        // Method check runs after URL construction: a malformed URL is
        // reported before a disallowed method.
        if !endpoint.allows(method) {
            return Err(Reason::MethodNotAllowed);
        }

        let mut headers: Vec<(String, String)> = self
            .default_headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        headers.sort();

        let mut request_body = None;
        if let BodySlot::Used(payload) = body {
            let payload = payload.ok_or(Reason::BuildingPayload)?;
            let (bytes, content_type) = encode::encode_body(payload, endpoint.encoding())?;
            set_header(&mut headers, "Content-Type", &content_type);
            request_body = Some(bytes);
        }

        Ok(HttpRequest {
            url: url.into(),
            method,
            headers,
            body: request_body,
        })
    }

    /// Join the resolved path onto the base URL, attach the query string,
    /// and re-parse the whole thing so the result is a normalized URL.
    fn assemble_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, Reason> {
        let assembled = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        let mut url = Url::parse(&assembled).map_err(|_| Reason::InvalidUrl)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Url::parse(url.as_str()).map_err(|_| Reason::InvalidUrl)
    }

    fn dispatch<R, F>(&self, built: Result<HttpRequest, Reason>, completion: F)
    where
        R: DeserializeOwned + 'static,
        F: FnOnce(Outcome, Option<R>) + Send + 'static,
    {
        match built {
            Ok(request) => {
                let handle = self.transport.submit(
                    request,
                    Box::new(move |reply| {
                        let (outcome, value) = resolve::resolve::<R>(reply);
                        completion(outcome, value);
                    }),
                );
                handle.start();
            }
            Err(reason) => completion(Outcome::failure(None, reason, None), None),
        }
    }

    fn dispatch_no_content<F>(&self, built: Result<HttpRequest, Reason>, completion: F)
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        match built {
            Ok(request) => {
                let handle = self.transport.submit(
                    request,
                    Box::new(move |reply| completion(resolve::resolve_no_content(reply))),
                );
                handle.start();
            }
            Err(reason) => completion(Outcome::failure(None, reason, None)),
        }
    }
}

/// Set `name` to `value`, replacing any existing header with the same name
/// (ASCII case-insensitive, as header names are).
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value.to_string()));
}
