use actix_web::{http::StatusCode, HttpResponse};
use dayfuse_api_structs::ErrorResponse;
use thiserror::Error;

/// Errors surfaced by the relay's HTTP handlers. Every use case error
/// converts into one of these.
#[derive(Error, Debug)]
pub enum DayfuseError {
    #[error("The relay failed to complete the request")]
    InternalError,
    #[error("Rejected request: {0}")]
    BadClientData(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Web Push is not configured on this relay")]
    PushNotConfigured,
}

impl actix_web::error::ResponseError for DayfuseError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadClientData(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PushNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        })
    }
}
