use actix_session::{SessionGetError, SessionInsertError};
use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::utils::pictures::PictureError;
use crate::views;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    /// Raised by the `CurrentUser` extractor; answered with a redirect to the login page.
    #[error("login required for {next}")]
    LoginRequired { next: String },

    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Password(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Picture(#[from] PictureError),
    #[error(transparent)]
    SessionGet(#[from] SessionGetError),
    #[error(transparent)]
    SessionInsert(#[from] SessionInsertError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::LoginRequired { .. } => StatusCode::FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::LoginRequired { next } => HttpResponse::Found()
                .insert_header((
                    header::LOCATION,
                    format!("/login?next={}", urlencoding::encode(next)),
                ))
                .finish(),
            Self::NotFound => views::error_page(
                self.status_code(),
                "Page Not Found",
                "That page does not exist. Please try a different location.",
            ),
            Self::Forbidden => views::error_page(
                self.status_code(),
                "You don't have permission to do that (403)",
                "Please check your account and try again.",
            ),
            _ => {
                log::error!("{}", self);
                views::error_page(
                    self.status_code(),
                    "Something went wrong (500)",
                    "We're experiencing some trouble on our end. Please try again in the near future.",
                )
            }
        }
    }
}
