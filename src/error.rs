//! Error taxonomy for the request pipeline.
//!
//! Every component surfaces failures by kind; this module is the single place
//! where a kind is mapped to a transport status. Only `Internal` carries
//! detail worth logging, the other kinds are expected, user-facing outcomes.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use log::error;
use thiserror::Error;

/// Closed set of request outcomes, one variant per transport status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request is structurally invalid (missing parameter, empty upload).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// No identity was supplied where one would have granted access.
    #[error("Unauthorized")]
    Unauthorized,
    /// An identity was supplied but the permission record denies the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// No route or entity matched the request.
    #[error("Not Found")]
    NotFound,
    /// The declared body type is not accepted by the endpoint.
    #[error("Unsupported Media Type")]
    UnsupportedMediaType,
    /// Collaborator failure or unexpected condition.
    #[error("Internal Server Error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        let body = match self {
            Self::Unauthorized => {
                builder.insert_header(("WWW-Authenticate", "Basic realm=\"Ming\""));
                "Unauthorized".to_string()
            }
            Self::Internal(detail) => {
                error!("internal error: {detail}");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        builder.content_type("text/plain; charset=utf-8").body(body)
    }
}
