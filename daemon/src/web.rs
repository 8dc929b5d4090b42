pub use actix_web::web::{get, post, resource, Data, Json, JsonConfig, Path, Query};
use actix_web::http::StatusCode;
use debileweb_common::errors;
use std::fmt;

/// Anything a handler fails on becomes a 500; the interesting status codes
/// (404, 400, 403) are returned as responses, not errors.
#[derive(Debug)]
pub struct Error {
    err: errors::Error,
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, w: &mut fmt::Formatter) -> fmt::Result {
        write!(w, "{:#}", self.err)
    }
}

impl actix_web::error::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<errors::Error> for Error {
    fn from(err: errors::Error) -> Error {
        errors::error!("Request handler failed: {err:#}");
        Error { err }
    }
}
