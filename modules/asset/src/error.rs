use actix_web::{HttpResponse, ResponseError, body::BoxBody};
use pal_common::error::ErrorInformation;
use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("failed to render page: {0}")]
    Template(#[from] askama::Error),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::NotFound(msg) => {
                HttpResponse::NotFound().json(ErrorInformation::new("NotFound", msg))
            }
            Self::Conflict(msg) => {
                HttpResponse::Conflict().json(ErrorInformation::new("Conflict", msg))
            }
            Self::BadRequest(msg) => {
                HttpResponse::BadRequest().json(ErrorInformation::new("BadRequest", msg))
            }
            Self::Database(err) => {
                log::warn!("database error: {err}");
                HttpResponse::InternalServerError().json(ErrorInformation::new("Database", err))
            }
            Self::Template(err) => {
                HttpResponse::InternalServerError().json(ErrorInformation::new("Template", err))
            }
            Self::Any(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("Internal", format!("{err:#}"))),
        }
    }
}
