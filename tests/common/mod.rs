//! Shared test helpers: an expectation-based mock datastore and a request
//! driver that goes through the full layered service.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use person_api::context::Context;
use person_api::controller::Controller;
use person_api::db::{Database, Datastore, Person, PersonStore, StoreError, StoreResult};
use http_body_util::{BodyExt, Full};
use person_api::app::{self, App};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// What a mocked datastore call answers with.
#[derive(Clone, Debug)]
pub enum Reply {
    Person(Person),
    NotFound,
    Failure(&'static str),
}

impl Reply {
    fn into_result(self) -> StoreResult<Person> {
        match self {
            Self::Person(p) => Ok(p),
            Self::NotFound => Err(StoreError::NotFound),
            Self::Failure(msg) => Err(StoreError::backend(msg)),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
    Get,
    Insert,
    Remove,
    Update,
}

#[derive(Clone, Debug, PartialEq)]
enum Matcher {
    Id(Uuid),
    Item(Person),
}

struct Expectation {
    op: Op,
    matcher: Matcher,
    reply: Reply,
}

/// A recorded call.
#[derive(Clone, Debug)]
pub struct Call {
    pub op: Op,
    pub cancelled: bool,
}

/// Datastore that answers from registered expectations.
///
/// Expectations are matched on operation and argument, like
/// `mock.On("Get", id)`; a call nothing matches panics so the test fails
/// loudly.
#[derive(Default)]
pub struct MockPersonStore {
    expectations: Mutex<Vec<Expectation>>,
    calls: Mutex<Vec<Call>>,
}

impl MockPersonStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn expect(&self, op: Op, matcher: Matcher, reply: Reply) -> &Self {
        self.expectations.lock().unwrap().push(Expectation { op, matcher, reply });
        self
    }

    pub fn on_get(&self, id: Uuid, reply: Reply) -> &Self {
        self.expect(Op::Get, Matcher::Id(id), reply)
    }

    pub fn on_insert(&self, item: Person, reply: Reply) -> &Self {
        self.expect(Op::Insert, Matcher::Item(item), reply)
    }

    pub fn on_remove(&self, id: Uuid, reply: Reply) -> &Self {
        self.expect(Op::Remove, Matcher::Id(id), reply)
    }

    pub fn on_update(&self, item: Person, reply: Reply) -> &Self {
        self.expect(Op::Update, Matcher::Item(item), reply)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, ctx: &Context, op: Op, matcher: Matcher) -> StoreResult<Person> {
        self.calls.lock().unwrap().push(Call { op, cancelled: ctx.is_cancelled() });
        let expectations = self.expectations.lock().unwrap();
        let found = expectations
            .iter()
            .find(|e| e.op == op && e.matcher == matcher)
            .unwrap_or_else(|| panic!("unexpected {op:?} call with {matcher:?}"));
        found.reply.clone().into_result()
    }
}

#[async_trait]
impl Datastore<Person, Uuid> for MockPersonStore {
    async fn get(&self, ctx: &Context, id: Uuid) -> StoreResult<Person> {
        self.answer(ctx, Op::Get, Matcher::Id(id))
    }

    async fn insert(&self, ctx: &Context, item: Person) -> StoreResult<Person> {
        self.answer(ctx, Op::Insert, Matcher::Item(item))
    }

    async fn remove(&self, ctx: &Context, id: Uuid) -> StoreResult<Person> {
        self.answer(ctx, Op::Remove, Matcher::Id(id))
    }

    async fn update(&self, ctx: &Context, item: Person) -> StoreResult<Person> {
        self.answer(ctx, Op::Update, Matcher::Item(item))
    }
}

pub struct MockDb(pub Arc<MockPersonStore>);

impl Database for MockDb {
    fn person(&self) -> PersonStore {
        self.0.clone()
    }
}

/// The full service over `database`.
pub fn service(database: Arc<dyn Database>) -> App {
    let controls = Controller::new(database, tracing::Span::none());
    app::service(&controls)
}

pub fn mock_service(store: &Arc<MockPersonStore>) -> App {
    service(Arc::new(MockDb(Arc::clone(store))))
}

pub fn testy(id: Uuid, removed: Option<bool>) -> Person {
    Person {
        id,
        first_name: "Testy".to_owned(),
        last_name: "McTesterson".to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(1970, 1, 1),
        removed,
    }
}

pub fn request(method: http::Method, uri: &str, body: impl Into<Bytes>) -> http::Request<Full<Bytes>> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Full::new(body.into()))
        .unwrap()
}

/// Runs `req` through `app`; returns the buffered response and its body as
/// JSON (`Null` when empty).
pub async fn dispatch(app: &App, req: http::Request<Full<Bytes>>) -> (http::Response<Bytes>, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let (parts, body) = res.into_parts();
    let body = body.collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("response body is JSON")
    };
    (http::Response::from_parts(parts, body), json)
}

/// Sends one request through `app`.
pub async fn send(
    app: &App,
    method: http::Method,
    uri: &str,
    body: impl Into<Bytes>,
) -> (http::Response<Bytes>, Value) {
    dispatch(app, request(method, uri, body)).await
}
