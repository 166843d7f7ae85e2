//! Immutable route descriptors.
//!
//! # Design
//! An `Endpoint` is either a literal path (`/users/1`) or a pattern with
//! `<key>` placeholders (`/users/<id>`), plus the methods it accepts and the
//! body encoding it expects. Endpoints are values: resolving a pattern
//! produces a new endpoint, never a mutation, so a shared catalog of route
//! constants stays safe to reuse across calls.

use std::collections::{HashMap, HashSet};

use crate::http::HttpMethod;

/// How a request body is encoded for an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoding {
    /// `application/json`, via serde.
    Json,
    /// `application/x-www-form-urlencoded`, string fields only.
    Form,
    /// `multipart/form-data` assembled from the declared parts, in order.
    Multipart(Vec<MultipartPart>),
}

/// One part of a multipart body: opaque bytes tagged for assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartPart {
    pub bytes: Vec<u8>,
    pub field_name: String,
    pub file_name: Option<String>,
    pub mime_type: String,
}

/// An immutable route descriptor: path or pattern, allowed methods, and the
/// body encoding strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    path: Option<String>,
    pattern: Option<String>,
    methods: HashSet<HttpMethod>,
    encoding: Encoding,
}

impl Endpoint {
    /// An endpoint with a fixed, concrete path.
    pub fn literal(
        path: impl Into<String>,
        methods: impl IntoIterator<Item = HttpMethod>,
        encoding: Encoding,
    ) -> Self {
        Self {
            path: Some(path.into()),
            pattern: None,
            methods: methods.into_iter().collect(),
            encoding,
        }
    }

    /// An endpoint whose path contains `<key>` placeholders to be filled at
    /// call time.
    pub fn pattern(
        pattern: impl Into<String>,
        methods: impl IntoIterator<Item = HttpMethod>,
        encoding: Encoding,
    ) -> Self {
        Self {
            path: None,
            pattern: Some(pattern.into()),
            methods: methods.into_iter().collect(),
            encoding,
        }
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Resolve this endpoint to a concrete path.
    ///
    /// A literal path wins unconditionally; args are ignored. Otherwise the
    /// pattern is required and so are args: each `<key>` present in both the
    /// pattern and args is substituted, placeholders without a matching arg
    /// stay as literal `<key>` text, and args without a matching placeholder
    /// are ignored. Returns `None` when neither a literal path nor a
    /// pattern-plus-args combination is available.
    pub fn resolve_path(&self, args: Option<&HashMap<String, String>>) -> Option<String> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }
        let pattern = self.pattern.as_ref()?;
        let args = args?;
        let mut resolved = pattern.clone();
        // Each key substitutes independently, so map iteration order cannot
        // change the result.
        for (key, value) in args {
            resolved = resolved.replace(&format!("<{key}>"), value);
        }
        Some(resolved)
    }

    /// A copy of this endpoint with its pattern resolved into a literal path.
    ///
    /// Fails for endpoints built from a literal path: they cannot be
    /// re-parameterized. Absent or empty args return the endpoint unchanged,
    /// pattern intact.
    pub fn with_args(&self, args: Option<&HashMap<String, String>>) -> Option<Endpoint> {
        self.pattern.as_ref()?;
        match args {
            None => Some(self.clone()),
            Some(args) if args.is_empty() => Some(self.clone()),
            Some(args) => Some(Endpoint {
                path: self.resolve_path(Some(args)),
                pattern: None,
                methods: self.methods.clone(),
                encoding: self.encoding.clone(),
            }),
        }
    }

    /// Whether `method` is in this endpoint's allow-list.
    pub fn allows(&self, method: HttpMethod) -> bool {
        self.methods.contains(&method)
    }
}
