//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router is a
//! [`tower::Service`], so cross-cutting concerns (CORS, default headers) wrap
//! it as tower layers; see [`app::service`](crate::app::service).

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Body;
use matchit::Router as MatchitRouter;
use tower::{BoxError, Service};
use tracing::error;

use crate::controller::{ApiError, encode_error};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Largest request body the router buffers, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A boxed, `Send` future.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// A route target, shared across concurrent requests.
pub type Endpoint = Arc<dyn Fn(Request) -> BoxFuture<Response> + Send + Sync>;

/// The application router.
///
/// Build it once at startup. Every builder method returns `self` so
/// registrations chain naturally. Clones share the route table.
#[derive(Clone)]
pub struct Router {
    routes: Arc<HashMap<Method, MatchitRouter<Endpoint>>>,
    fallback: Option<Endpoint>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Arc::new(HashMap::new()), fallback: None }
    }

    /// Register an endpoint for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, endpoint: Endpoint) -> Self {
        Arc::make_mut(&mut self.routes)
            .entry(method)
            .or_default()
            .insert(path, endpoint)
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, endpoint: Endpoint) -> Self {
        self.on(Method::Get, path, endpoint)
    }

    pub fn post(self, path: &str, endpoint: Endpoint) -> Self {
        self.on(Method::Post, path, endpoint)
    }

    pub fn put(self, path: &str, endpoint: Endpoint) -> Self {
        self.on(Method::Put, path, endpoint)
    }

    pub fn delete(self, path: &str, endpoint: Endpoint) -> Self {
        self.on(Method::Delete, path, endpoint)
    }

    /// Endpoint for paths no route matches. Defaults to a bare `404`.
    pub fn fallback(mut self, endpoint: Endpoint) -> Self {
        self.fallback = Some(endpoint);
        self
    }

    /// Buffers the body (at most [`MAX_BODY_BYTES`]) and routes.
    ///
    /// An unreadable or oversized body is answered like any other malformed
    /// request.
    async fn dispatch<B>(&self, req: http::Request<B>) -> Response
    where
        B: Body<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        let body = match Limited::new(body, MAX_BODY_BYTES).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                error!(error = %err, limit = MAX_BODY_BYTES, "failed to read request body");
                return encode_error(ApiError::RequestMalformed);
            }
        };
        self.route(parts, body).await
    }

    async fn route(&self, parts: http::request::Parts, body: Bytes) -> Response {
        let Ok(method) = Method::try_from(&parts.method) else {
            return Response::status(Status::MethodNotAllowed);
        };

        if let Some((endpoint, params)) = self.lookup(method, parts.uri.path()) {
            return endpoint(Request::new(parts, body, params)).await;
        }
        if self.matches_other_method(method, parts.uri.path()) {
            return Response::status(Status::MethodNotAllowed);
        }
        match &self.fallback {
            Some(endpoint) => endpoint(Request::new(parts, body, HashMap::new())).await,
            None => Response::status(Status::NotFound),
        }
    }

    fn lookup(&self, method: Method, path: &str) -> Option<(Endpoint, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let endpoint = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((endpoint, params))
    }

    fn matches_other_method(&self, method: Method, path: &str) -> bool {
        self.routes
            .iter()
            .any(|(m, tree)| *m != method && tree.at(path).is_ok())
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

impl<B> Service<http::Request<B>> for Router
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = BoxFuture<Result<Self::Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let router = self.clone();
        Box::pin(async move { Ok(router.dispatch(req).await.into_inner()) })
    }
}
