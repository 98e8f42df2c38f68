//! Crate-level error

use crate::auth::AuthError;
use crate::backend::BackendError;
use crate::db::DbError;
use crate::mode::UnknownMode;
use crate::report::ExportError;
use crate::state::StateError;
use crate::upload::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Mode(#[from] UnknownMode),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("analysis failed: {0}")]
    Backend(#[from] BackendError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("database error: {0}")]
    Db(#[from] DbError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Caused by user input rather than by the environment
    pub fn is_user_error(&self) -> bool {
        match self {
            Error::Invalid(_) | Error::Mode(_) => true,
            Error::Auth(e) => !matches!(e, AuthError::Hash(_) | AuthError::Db(_)),
            Error::Export(e) => matches!(e, ExportError::SurfaceNotFound | ExportError::UnknownFormat(_)),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
