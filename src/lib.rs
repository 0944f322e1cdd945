//! # person-api
//!
//! A layered JSON CRUD API server:
//!
//! ```text
//! Server → tower layers → Router → DataHandler → Datastore<T, I> → Database
//! ```
//!
//! - [`db`] defines the storage contract. [`db::Datastore`] is generic over
//!   the entity and its identifier type, so a new resource plugs in without
//!   a new contract.
//! - [`controller`] turns HTTP requests into datastore calls and datastore
//!   results into the uniform `{success, msg?, data?}` envelope.
//! - [`app`] binds handlers to routes and wraps the [`Router`] in the CORS
//!   and content-type layers; [`Server`] runs the result on hyper with
//!   graceful shutdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use person_api::controller::Controller;
//! use person_api::db::memory::MemoryDb;
//! use person_api::{Server, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), person_api::Error> {
//!     let controls = Controller::new(Arc::new(MemoryDb::new()), tracing::info_span!("api"));
//!     Server::bind("0.0.0.0:8080".parse().unwrap())
//!         .await?
//!         .serve(app::service(&controls))
//!         .await
//! }
//! ```
//!
//! ## Responses
//!
//! | Failure | Status | `msg` |
//! |---|---|---|
//! | body is not the expected JSON, or larger than 1 MiB | 400 | `failed to read request` |
//! | no such record / unparseable path id | 404 | `not found` |
//! | bad `id` or `dob` in the body | 422 | `malformed request data` |
//! | anything else | 500 | `server encountered an error processing the request` |

mod error;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod context;
pub mod controller;
pub mod db;
pub mod health;
pub mod telemetry;

pub use error::Error;
pub use method::{Method, UnknownMethod};
pub use request::Request;
pub use response::{Response, ResponseBuilder};
pub use router::{BoxFuture, Endpoint, MAX_BODY_BYTES, Router};
pub use server::{Server, shutdown_signal};
pub use status::Status;
