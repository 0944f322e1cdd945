//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;

use crate::context::Context;

/// An incoming HTTP request with its body fully buffered and its route
/// parameters resolved.
pub struct Request {
    body: Bytes,
    params: HashMap<String, String>,
    ctx: Context,
}

impl Request {
    /// Takes the [`Context`] the server attached to `parts`, or a background
    /// one when there is none.
    pub(crate) fn new(
        parts: http::request::Parts,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        let ctx = parts.extensions.get::<Context>().cloned().unwrap_or_default();
        Self { body, params, ctx }
    }

    pub fn body(&self) -> &[u8] { &self.body }

    /// The request's cancellation context. Pass it, unchanged, into every
    /// datastore call made on behalf of this request.
    pub fn ctx(&self) -> &Context { &self.ctx }

    /// Returns a named path parameter.
    ///
    /// For a route `/person/{id}`, `req.param("id")` on `/person/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
