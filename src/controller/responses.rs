//! Uniform response envelope.
//!
//! Every body this service writes has the shape
//! `{"success": bool, "msg"?: string, "data"?: T}`. `msg` appears only on
//! failures and `data` only on successes.

use serde::{Deserialize, Serialize};

use crate::response::Response;
use crate::status::Status;

/// The JSON envelope wrapped around every response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(rename = "msg", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// The closed set of failures a handler reports to clients.
///
/// Each class has a fixed status code and a fixed message. Internal error
/// details never reach the client.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApiError {
    /// The body did not decode as the expected shape.
    RequestMalformed,
    /// No matching record, or the path identifier did not parse.
    ResourceNotFound,
    /// The body decoded but carried an invalid identifier or date.
    RequestDataInvalid,
    /// Any other datastore or processing failure.
    StoreFailure,
}

impl ApiError {
    pub fn status(self) -> Status {
        match self {
            Self::RequestMalformed   => Status::BadRequest,
            Self::ResourceNotFound   => Status::NotFound,
            Self::RequestDataInvalid => Status::UnprocessableContent,
            Self::StoreFailure       => Status::InternalServerError,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::RequestMalformed   => "failed to read request",
            Self::ResourceNotFound   => "not found",
            Self::RequestDataInvalid => "malformed request data",
            Self::StoreFailure       => "server encountered an error processing the request",
        }
    }
}

fn write<T: Serialize>(status: Status, envelope: &Envelope<T>) -> Response {
    match serde_json::to_vec(envelope) {
        Ok(body) => Response::builder().status(status).json(body),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode response envelope");
            Response::status(Status::InternalServerError)
        }
    }
}

/// `200` with `{"success":true,"data":…}`.
pub fn encode_success<T: Serialize>(data: T) -> Response {
    write(Status::Ok, &Envelope { success: true, message: None, data: Some(data) })
}

/// `200` with `{"success":true}` and no payload.
pub fn encode_ok() -> Response {
    write::<()>(Status::Ok, &Envelope { success: true, message: None, data: None })
}

/// The error's status with `{"success":false,"msg":…}`.
pub fn encode_error(err: ApiError) -> Response {
    write::<()>(
        err.status(),
        &Envelope { success: false, message: Some(err.message().to_owned()), data: None },
    )
}
