use async_trait::async_trait;
use log::{debug, error};
use opennote::config::app_config::AppConfig;
use rocket::data::{FromData, Outcome};
use rocket::form::{Form, Lenient};
use rocket::http::{RawStr, Status};
use rocket::{Data, FromForm, Request};
use serde::Deserialize;
use thiserror::Error;

/// New note text from a request body: a `text` form field, a `{"text": ...}`
/// json object or, for any other content type, the whole non-empty body.
/// `None` when the body carries no text.
#[derive(Debug)]
pub struct NoteText(pub Option<String>);

impl NoteText {
    /// The body text, else the `text` query parameter, else an empty note.
    pub fn or_query(self, query: Option<String>) -> String {
        self.0
            .or(query)
            .unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum NoteTextError {
    #[error("note is larger than {0} bytes")]
    TooLarge(u64),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed form: {0}")]
    Form(String),

    #[error("app config is not available")]
    NoConfig,
}

#[derive(FromForm)]
struct NoteTextForm {
    text: Option<String>,
}

#[derive(Deserialize)]
struct NoteTextJson {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl<'r> FromData<'r> for NoteText {
    type Error = NoteTextError;

    async fn from_data(
        req: &'r Request<'_>,
        data: Data<'r>,
    ) -> Outcome<'r, Self> {
        let Some(config) = req.rocket().state::<AppConfig>() else {
            error!("app config is not managed");
            return Outcome::Error((Status::InternalServerError, NoteTextError::NoConfig));
        };
        let body = match data.open(config.max_note_size.into()).into_string().await {
            Ok(body) if body.is_complete() => body.into_inner(),
            Ok(_) => {
                debug!("note body is over {} bytes", config.max_note_size);
                return Outcome::Error(
                    (Status::BadRequest, NoteTextError::TooLarge(config.max_note_size))
                )
            },
            Err(e) => return Outcome::Error((Status::BadRequest, e.into())),
        };

        let text = match req.content_type() {
            Some(content_type) if content_type.is_json() =>
                serde_json::from_str::<NoteTextJson>(&body)
                    .map(|json| json.text)
                    .map_err(NoteTextError::from),
            Some(content_type) if content_type.is_form() =>
                Form::<Lenient<NoteTextForm>>::parse_encoded(RawStr::new(&body))
                    .map(|form| form.into_inner().text)
                    .map_err(|e| NoteTextError::Form(e.to_string())),
            _ => Ok(Some(body).filter(|body| !body.is_empty())),
        };
        match text {
            Ok(text) => Outcome::Success(NoteText(text)),
            Err(e) => Outcome::Error((Status::BadRequest, e)),
        }
    }
}
