use std::borrow::Cow;
use log::{debug, error};
use opennote::note_store::NoteStoreError;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde::Serialize;
use crate::app_constants::{INTERNAL_ERROR_MESSAGE, NOTE_NOT_FOUND_MESSAGE, TEXT_NOT_PROVIDED_MESSAGE};
use crate::routes::note_text::NoteTextError;

/// Answered as `{"error": <message>}` with the status.
#[derive(Debug)]
pub struct ApiError {
    status: Status,
    message: Cow<'static, str>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: Status, message: impl Into<Cow<'static, str>>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        ApiError::new(Status::InternalServerError, INTERNAL_ERROR_MESSAGE)
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        (self.status, Json(ErrorBody { error: &self.message })).respond_to(request)
    }
}

impl From<NoteStoreError> for ApiError {
    fn from(value: NoteStoreError) -> Self {
        match value {
            NoteStoreError::NoteNotFound =>
                ApiError::new(Status::NotFound, NOTE_NOT_FOUND_MESSAGE),
            NoteStoreError::EmptyText =>
                ApiError::new(Status::BadRequest, TEXT_NOT_PROVIDED_MESSAGE),
            e => {
                error!("note store failure while serving the api: {e}");
                ApiError::internal()
            },
        }
    }
}

impl From<NoteTextError> for ApiError {
    fn from(value: NoteTextError) -> Self {
        match value {
            NoteTextError::NoConfig => ApiError::internal(),
            e => {
                debug!("rejecting note body: {e}");
                ApiError::new(Status::BadRequest, e.to_string())
            },
        }
    }
}
