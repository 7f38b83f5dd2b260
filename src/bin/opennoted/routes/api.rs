mod errors;

use opennote::data::PublicNote;
use opennote::note_store::NoteStore;
use rocket::http::Status;
use rocket::response::status::NoContent;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, put, routes, Build, Request, Rocket, State};
use crate::app_constants::{API_PREFIX, INTERNAL_ERROR_MESSAGE, NOTE_NOT_FOUND_MESSAGE};
use crate::routes::note_text::{NoteText, NoteTextError};

pub use errors::ApiError;

#[get("/note/<key>")]
async fn read_note(
    key: &str,
    note_store: &State<Box<dyn NoteStore>>,
) -> Result<Json<PublicNote>, ApiError> {
    Ok(Json(note_store.read_by_key(key).await?))
}

#[put("/note/<key>?<text>", data = "<body>")]
async fn write_note(
    key: &str,
    text: Option<String>,
    body: Result<NoteText, NoteTextError>,
    note_store: &State<Box<dyn NoteStore>>,
) -> Result<NoContent, ApiError> {
    let text = body?.or_query(text);
    note_store.write_by_key(key, &text).await?;
    Ok(NoContent)
}

// notes are the only api resource
#[catch(404)]
fn not_found() -> ApiError {
    ApiError::new(Status::NotFound, NOTE_NOT_FOUND_MESSAGE)
}

#[catch(default)]
fn default_catcher(status: Status, _request: &Request<'_>) -> ApiError {
    if status.code >= 500 {
        ApiError::new(status, INTERNAL_ERROR_MESSAGE)
    } else {
        ApiError::new(status, status.reason_lossy())
    }
}

pub trait ApiRocketBuildExt {
    fn install_opennote_api(self) -> Self;
}

impl ApiRocketBuildExt for Rocket<Build> {
    fn install_opennote_api(self) -> Self {
        self
            .mount(
                API_PREFIX,
                routes![
                    read_note,
                    write_note,
                ]
            )
            .register(
                API_PREFIX,
                catchers![
                    not_found,
                    default_catcher,
                ]
            )
    }
}
