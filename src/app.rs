//! Route table and the tower layers around it.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | POST | `/person` | add |
//! | GET | `/person/{id}` | get_specific |
//! | DELETE | `/person/{id}` | remove |
//! | PUT | `/person`, `/person/{id}` | update (id read from the body) |
//! | GET | `/healthz`, `/readyz` | health probes |
//!
//! Every response defaults to `content-type: application/json`. CORS allows
//! any origin.

use std::sync::Arc;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use tower::ServiceBuilder;
use tower_http::cors::{Any, Cors, CorsLayer};
use tower_http::set_header::{SetResponseHeader, SetResponseHeaderLayer};

use crate::controller::{ApiError, Controller, DataHandler, encode_error};
use crate::health;
use crate::request::Request;
use crate::response::Response;
use crate::router::{BoxFuture, Endpoint, Router};

/// The routed service with its layers applied.
pub type App = Cors<SetResponseHeader<Router, HeaderValue>>;

#[derive(Clone, Copy, Debug)]
enum Op {
    Add,
    GetSpecific,
    Remove,
    Update,
}

fn bind(handler: Arc<dyn DataHandler>, op: Op) -> Endpoint {
    Arc::new(move |req: Request| -> BoxFuture<Response> {
        let handler = Arc::clone(&handler);
        Box::pin(async move {
            match op {
                Op::Add => handler.add(req).await,
                Op::GetSpecific => handler.get_specific(req).await,
                Op::Remove => handler.remove(req).await,
                Op::Update => handler.update(req).await,
            }
        })
    })
}

/// Binds the four CRUD verbs of `handler` under `base`.
pub fn mount(router: Router, base: &str, handler: Arc<dyn DataHandler>) -> Router {
    let item = format!("{base}/{{id}}");
    router
        .post(base, bind(Arc::clone(&handler), Op::Add))
        .get(&item, bind(Arc::clone(&handler), Op::GetSpecific))
        .delete(&item, bind(Arc::clone(&handler), Op::Remove))
        .put(base, bind(Arc::clone(&handler), Op::Update))
        .put(&item, bind(handler, Op::Update))
}

fn not_found() -> Endpoint {
    Arc::new(|_req: Request| -> BoxFuture<Response> {
        Box::pin(async { encode_error(ApiError::ResourceNotFound) })
    })
}

fn probe(check: fn(Request) -> Response) -> Endpoint {
    Arc::new(move |req: Request| -> BoxFuture<Response> {
        let res = check(req);
        Box::pin(async move { res })
    })
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
}

/// Builds the full service: routes, JSON content type, CORS.
pub fn service(controls: &Controller) -> App {
    let routes = Router::new()
        .get("/healthz", probe(health::liveness))
        .get("/readyz", probe(health::readiness))
        .fallback(not_found());
    let routes = mount(routes, "/person", controls.person());

    ServiceBuilder::new()
        .layer(cors())
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .service(routes)
}
