//! Person resource handler and its wire representation.
//!
//! Every operation is a single pass: decode the body, convert it to the
//! storage model, call the datastore, convert back, encode the envelope. The
//! first stage to fail decides the response.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, Span, debug, error, info_span, warn};
use uuid::Uuid;

use super::DataHandler;
use super::responses::{ApiError, encode_error, encode_ok, encode_success};
use crate::db::{Person, PersonStore, StoreError};
use crate::request::Request;
use crate::response::Response;

/// Date format accepted on input. Only the zero-padded `YYYY-MM-DD` shape is
/// accepted; see [`parse_request_date`].
pub const REQUEST_DATE_FORMAT: &str = "%Y-%m-%d";
/// Date format written on output. Intentionally differs from the input one.
pub const RESPONSE_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Wire shape of a person: `{id, firstName, lastName, dob, removed}`.
///
/// Missing fields decode as empty strings and an unset `removed` flag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonBody {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "dob")]
    pub date_of_birth: String,
    pub removed: Option<bool>,
}

/// A decoded body whose fields do not convert to the storage model.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("failed to parse field 'id': {0}")]
    InvalidId(#[source] uuid::Error),
    #[error("failed to parse field 'dob': expected YYYY-MM-DD, got {0:?}")]
    MalformedDate(String),
    #[error("failed to parse field 'dob': {0}")]
    InvalidDate(#[source] chrono::ParseError),
}

/// Parses a request date.
///
/// chrono's `%Y`, `%m` and `%d` also accept signs, unpadded digits and
/// leading whitespace, so the exact `YYYY-MM-DD` shape is checked first.
pub fn parse_request_date(raw: &str) -> Result<NaiveDate, ConversionError> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(ConversionError::MalformedDate(raw.to_owned()));
    }
    NaiveDate::parse_from_str(raw, REQUEST_DATE_FORMAT).map_err(ConversionError::InvalidDate)
}

impl PersonBody {
    /// Converts to the storage model.
    ///
    /// An empty `id` becomes the nil UUID and an empty `dob` an unset date.
    pub fn into_entity(self) -> Result<Person, ConversionError> {
        let id = if self.id.is_empty() {
            Uuid::nil()
        } else {
            Uuid::parse_str(&self.id).map_err(ConversionError::InvalidId)?
        };

        let date_of_birth = if self.date_of_birth.is_empty() {
            None
        } else {
            Some(parse_request_date(&self.date_of_birth)?)
        };

        Ok(Person {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth,
            removed: self.removed,
        })
    }
}

impl From<Person> for PersonBody {
    fn from(p: Person) -> Self {
        Self {
            id: p.id.to_string(),
            first_name: p.first_name,
            last_name: p.last_name,
            date_of_birth: p
                .date_of_birth
                .map(|d| d.format(RESPONSE_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            removed: Some(p.removed.unwrap_or(false)),
        }
    }
}

/// HTTP handlers for `/person`.
#[derive(Clone)]
pub struct PersonHandler {
    store: PersonStore,
    span: Span,
}

impl PersonHandler {
    pub fn new(store: PersonStore, span: Span) -> Self {
        Self { store, span }
    }

    fn decode(&self, body: &[u8]) -> Result<PersonBody, ApiError> {
        serde_json::from_slice(body).map_err(|err| {
            error!(error = %err, "failed to parse JSON request");
            ApiError::RequestMalformed
        })
    }

    fn convert(&self, body: PersonBody) -> Result<Person, ApiError> {
        body.into_entity().map_err(|err| {
            error!(error = %err, "failed to read request data");
            ApiError::RequestDataInvalid
        })
    }

    fn path_id(&self, req: &Request) -> Result<Uuid, ApiError> {
        let raw = req.param("id").unwrap_or_default();
        Uuid::parse_str(raw).map_err(|err| {
            error!(error = %err, id = raw, "failed to parse UUID from URL parameter");
            ApiError::ResourceNotFound
        })
    }

    fn store_failure(&self, action: &'static str, err: StoreError) -> ApiError {
        if err.is_not_found() {
            warn!(error = %err, action, "person not found");
            ApiError::ResourceNotFound
        } else {
            error!(error = %err, action, "datastore operation failed");
            ApiError::StoreFailure
        }
    }

    async fn try_add(&self, req: &Request) -> Result<PersonBody, ApiError> {
        let person = self.convert(self.decode(req.body())?)?;
        let stored = self
            .store
            .insert(req.ctx(), person)
            .await
            .map_err(|err| self.store_failure("insert", err))?;
        debug!(id = %stored.id, "person inserted");
        Ok(stored.into())
    }

    async fn try_get(&self, req: &Request) -> Result<PersonBody, ApiError> {
        let id = self.path_id(req)?;
        let person = self
            .store
            .get(req.ctx(), id)
            .await
            .map_err(|err| self.store_failure("get", err))?;
        Ok(person.into())
    }

    async fn try_remove(&self, req: &Request) -> Result<(), ApiError> {
        let id = self.path_id(req)?;
        let before = self
            .store
            .remove(req.ctx(), id)
            .await
            .map_err(|err| self.store_failure("remove", err))?;
        debug!(id = %before.id, was_removed = ?before.removed, "person removed");
        Ok(())
    }

    async fn try_update(&self, req: &Request) -> Result<PersonBody, ApiError> {
        let person = self.convert(self.decode(req.body())?)?;
        let stored = self
            .store
            .update(req.ctx(), person)
            .await
            .map_err(|err| self.store_failure("update", err))?;
        Ok(stored.into())
    }
}

fn respond(result: Result<PersonBody, ApiError>) -> Response {
    match result {
        Ok(body) => encode_success(body),
        Err(err) => encode_error(err),
    }
}

#[async_trait]
impl DataHandler for PersonHandler {
    async fn add(&self, req: Request) -> Response {
        let span = info_span!(parent: &self.span, "add");
        respond(self.try_add(&req).instrument(span).await)
    }

    async fn get_specific(&self, req: Request) -> Response {
        let span = info_span!(parent: &self.span, "get_specific");
        respond(self.try_get(&req).instrument(span).await)
    }

    async fn remove(&self, req: Request) -> Response {
        let span = info_span!(parent: &self.span, "remove");
        match self.try_remove(&req).instrument(span).await {
            Ok(()) => encode_ok(),
            Err(err) => encode_error(err),
        }
    }

    /// The identifier comes from the body; any `{id}` path segment is ignored.
    async fn update(&self, req: Request) -> Response {
        let span = info_span!(parent: &self.span, "update");
        respond(self.try_update(&req).instrument(span).await)
    }
}
