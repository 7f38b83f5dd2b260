mod api;
mod authentication_guard;
mod host_url_guard;
mod note_text;
mod web;

pub use api::ApiRocketBuildExt;
pub use web::WebRocketBuildExt;
