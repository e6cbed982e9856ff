use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{debug, error};
use serde::Serialize;

use crate::{extract, group, identity, integration, message};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    _Extract(#[from] extract::Error),
    #[error(transparent)]
    _Identity(#[from] identity::Error),
    #[error(transparent)]
    _Group(#[from] group::Error),
    #[error(transparent)]
    _Message(#[from] message::Error),
    #[error(transparent)]
    _Integration(#[from] integration::Error),
}

impl From<&Error> for StatusCode {
    fn from(e: &Error) -> Self {
        match e {
            Error::_Extract(_) => Self::BAD_REQUEST,
            Error::_Identity(_) => Self::UNAUTHORIZED,
            Error::_Group(e) => e.into(),
            Error::_Message(e) => e.into(),
            Error::_Integration(_) => Self::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let status = StatusCode::from(&self);

        let error = if status.is_server_error() {
            error!("{self:?}");
            "internal server error".to_owned()
        } else {
            debug!("{self}");
            self.to_string()
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
