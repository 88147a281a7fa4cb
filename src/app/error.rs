use actix_web::{
  error::ResponseError,
  http::StatusCode,
  HttpResponse
};
use derive_more::Display;
use log::error;
use serde_json::json;

// The messages from DatabaseError and InternalServerError
// never reach the client, they're logged when the response
// is built.
#[derive(Debug, Display)]
pub enum Error {
  #[display(fmt = "Internal Server Error")]
  InternalServerError(String),
  #[display(fmt = "Database Error")]
  DatabaseError(String),
  #[display(fmt = "{}", _0)]
  Conflict(String),
  #[display(fmt = "{}", _0)]
  Unauthorized(String),
  #[display(fmt = "{}", _0)]
  NotFound(String),
  #[display(fmt = "{}", _0)]
  BadRequest(String)
}

// Error bodies look like {"detail": "..."}.
impl ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self {
      Error::InternalServerError(_) | Error::DatabaseError(_) =>
        StatusCode::INTERNAL_SERVER_ERROR,
      // Duplicates are plain bad requests for clients.
      Error::Conflict(_) | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      Error::NotFound(_) => StatusCode::NOT_FOUND
    }
  }

  fn error_response(&self) -> HttpResponse {
    if let Error::InternalServerError(msg) | Error::DatabaseError(msg) = self {
      error!("{} - {}", self, msg);
    }
    HttpResponse::build(self.status_code())
      .json(json!({ "detail": self.to_string() }))
  }
}

pub fn map_db_error(e: eyre::Report) -> Error {
  Error::DatabaseError(format!("{:#}", e))
}
