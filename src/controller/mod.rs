//! Controller registry: the composition root between routing and storage.
//!
//! A [`Controller`] is built once at startup from a database handle and the
//! logging span handlers report under. It hands out one [`DataHandler`] per
//! resource; the router binds those to HTTP verbs.

pub mod person;
pub mod responses;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::Span;

use crate::db::Database;
use crate::request::Request;
use crate::response::Response;

pub use person::{PersonBody, PersonHandler};
pub use responses::{ApiError, Envelope, encode_error, encode_ok, encode_success};

/// CRUD handlers for one resource.
#[async_trait]
pub trait DataHandler: Send + Sync + 'static {
    async fn add(&self, req: Request) -> Response;
    async fn get_specific(&self, req: Request) -> Response;
    async fn remove(&self, req: Request) -> Response;
    async fn update(&self, req: Request) -> Response;
}

/// Resolves resources to their handlers.
///
/// Cheap to clone; clones share the database handle.
#[derive(Clone)]
pub struct Controller {
    database: Arc<dyn Database>,
    span: Span,
}

impl Controller {
    /// `span` is the logging context every handler records its events under.
    pub fn new(database: Arc<dyn Database>, span: Span) -> Self {
        Self { database, span }
    }

    pub fn person(&self) -> Arc<dyn DataHandler> {
        Arc::new(PersonHandler::new(self.database.person(), self.span.clone()))
    }
}
