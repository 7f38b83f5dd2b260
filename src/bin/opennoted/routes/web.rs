use log::{error, warn};
use opennote::config::app_config::{AppConfig, NoteSubmitBehavior};
use opennote::data::Note;
use opennote::identity::{IdentityGateway, Principal};
use opennote::note_store::{NoteStore, NoteStoreError};
use opennote::util::StrExt;
use rocket::http::Status;
use rocket::response::Redirect;
use rocket::{get, post, routes, uri, Build, Responder, Rocket, State};
use rocket_dyn_templates::Template;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use crate::app_constants::{ABOUT_TEMPLATE, API_PREFIX, INDEX_TEMPLATE, SETTINGS_TEMPLATE, WEB_PREFIX};
use crate::routes::authentication_guard::MaybeAuthenticated;
use crate::routes::host_url_guard::HostUrl;
use crate::routes::note_text::{NoteText, NoteTextError};

type Gateway = Box<dyn IdentityGateway>;

#[derive(Responder)]
enum PageResponse {
    Page(Template),

    #[response(status = 401)]
    Unauthorized(Template),

    Redirect(Redirect),
}

#[derive(Serialize)]
struct IndexContext {
    user: Option<UserContext>,
    note: Option<NoteContext>,
    login_urls: Vec<LoginLink>,
}

#[derive(Serialize)]
struct SettingsContext {
    user: UserContext,
    secret_key: Option<String>,
    api_url: Option<String>,
    host_url: String,
}

#[derive(Serialize)]
struct AboutContext {
    user: Option<UserContext>,
    host_url: String,
}

#[derive(Serialize)]
struct UserContext {
    nickname: String,
    email: Option<String>,
    federated_identity: Option<String>,
    logout_url: String,
}

#[derive(Serialize)]
struct NoteContext {
    text: String,
    last_modified: String,
}

#[derive(Serialize)]
struct LoginLink {
    name: String,
    url: String,
}

impl UserContext {
    fn new(
        principal: &Principal,
        identity_gateway: &Gateway,
        continue_to: &str,
    ) -> Self {
        UserContext {
            nickname: principal.nickname.clone(),
            email: principal.email.clone(),
            federated_identity: principal.federated_identity.clone(),
            logout_url: identity_gateway.logout_url(continue_to),
        }
    }
}

fn login_page(identity_gateway: &Gateway, config: &AppConfig) -> Template {
    let continue_to = uri!(index).to_string();
    Template::render(
        INDEX_TEMPLATE,
        IndexContext {
            user: None,
            note: None,
            login_urls: config.providers
                .iter()
                .map(|provider| LoginLink {
                    name: provider.name.clone(),
                    url: identity_gateway.login_url(&provider.uri, &continue_to),
                })
                .collect(),
        },
    )
}

fn note_page(
    principal: &Principal,
    note: &Note,
    identity_gateway: &Gateway,
) -> Result<Template, Status> {
    let last_modified = note.last_modified
        .format(&Rfc3339)
        .map_err(|e| {
            error!("cannot format the modification time of a note: {e}");
            Status::InternalServerError
        })?;
    Ok(
        Template::render(
            INDEX_TEMPLATE,
            IndexContext {
                user: Some(
                    UserContext::new(
                        principal,
                        identity_gateway,
                        &uri!(index).to_string(),
                    )
                ),
                note: Some(
                    NoteContext {
                        text: note.text.clone(),
                        last_modified,
                    }
                ),
                login_urls: Vec::new(),
            },
        )
    )
}

fn internal_error(e: NoteStoreError) -> Status {
    error!("note store failure while serving a page: {e}");
    Status::InternalServerError
}

#[get("/")]
async fn index(
    auth: MaybeAuthenticated,
    note_store: &State<Box<dyn NoteStore>>,
    identity_gateway: &State<Gateway>,
    config: &State<AppConfig>,
) -> Result<PageResponse, Status> {
    let MaybeAuthenticated::Authenticated(principal) = auth else {
        return Ok(PageResponse::Page(login_page(identity_gateway, config)));
    };
    let note = note_store.get_or_create(&principal.id)
        .await
        .map_err(internal_error)?;
    Ok(PageResponse::Page(note_page(&principal, &note, identity_gateway)?))
}

#[post("/?<text>", data = "<body>")]
async fn submit_note(
    auth: MaybeAuthenticated,
    text: Option<String>,
    body: Result<NoteText, NoteTextError>,
    note_store: &State<Box<dyn NoteStore>>,
    identity_gateway: &State<Gateway>,
    config: &State<AppConfig>,
) -> Result<PageResponse, Status> {
    let MaybeAuthenticated::Authenticated(principal) = auth else {
        return Ok(PageResponse::Unauthorized(login_page(identity_gateway, config)));
    };
    let text = body
        .map_err(|e| {
            warn!("rejecting note submission of \"{}\": {e}", principal.id);
            Status::BadRequest
        })?
        .or_query(text);
    let note = note_store.write(&principal.id, &text)
        .await
        .map_err(internal_error)?;
    Ok(
        match config.note_submit_behavior {
            NoteSubmitBehavior::Redirect =>
                PageResponse::Redirect(Redirect::found(uri!(index))),
            NoteSubmitBehavior::Render =>
                PageResponse::Page(note_page(&principal, &note, identity_gateway)?),
        }
    )
}

#[get("/useropenid?<idprovider>")]
fn user_openid(
    idprovider: Option<&str>,
    identity_gateway: &State<Gateway>,
) -> Result<Redirect, Status> {
    let provider = idprovider
        .and_then(|provider| provider.nonblank_to_some())
        .ok_or(Status::BadRequest)?;
    Ok(Redirect::found(identity_gateway.login_url(&provider, &uri!(index).to_string())))
}

#[get("/settings")]
async fn settings(
    auth: MaybeAuthenticated,
    host_url: HostUrl,
    note_store: &State<Box<dyn NoteStore>>,
    identity_gateway: &State<Gateway>,
) -> Result<PageResponse, Status> {
    let MaybeAuthenticated::Authenticated(principal) = auth else {
        return Ok(PageResponse::Redirect(Redirect::found(uri!(index))));
    };
    let note = note_store.get_or_create(&principal.id)
        .await
        .map_err(internal_error)?;
    let HostUrl(host_url) = host_url;
    let secret_key = note.secret_key
        .as_ref()
        .map(|key| key.as_str().to_owned());
    Ok(
        PageResponse::Page(
            Template::render(
                SETTINGS_TEMPLATE,
                SettingsContext {
                    user: UserContext::new(
                        &principal,
                        identity_gateway,
                        &uri!(settings).to_string(),
                    ),
                    api_url: secret_key
                        .as_ref()
                        .map(|key| format!("{host_url}{API_PREFIX}/note/{key}")),
                    secret_key,
                    host_url,
                },
            )
        )
    )
}

#[post("/settings")]
async fn rotate_key(
    auth: MaybeAuthenticated,
    note_store: &State<Box<dyn NoteStore>>,
) -> Result<Redirect, Status> {
    let MaybeAuthenticated::Authenticated(principal) = auth else {
        return Ok(Redirect::found(uri!(index)));
    };
    note_store.generate_key(&principal.id)
        .await
        .map_err(internal_error)?;
    Ok(Redirect::found(uri!(settings)))
}

#[get("/about")]
fn about(
    auth: MaybeAuthenticated,
    host_url: HostUrl,
    identity_gateway: &State<Gateway>,
) -> Template {
    let user = match auth {
        MaybeAuthenticated::Authenticated(principal) => Some(
            UserContext::new(&principal, identity_gateway, &uri!(about).to_string())
        ),
        MaybeAuthenticated::Unauthenticated => None,
    };
    let HostUrl(host_url) = host_url;
    Template::render(ABOUT_TEMPLATE, AboutContext { user, host_url })
}

pub trait WebRocketBuildExt {
    fn install_opennote_web(self) -> Self;
}

impl WebRocketBuildExt for Rocket<Build> {
    fn install_opennote_web(self) -> Self {
        self
            .mount(
                WEB_PREFIX,
                routes![
                    index,
                    submit_note,
                    user_openid,
                    settings,
                    rotate_key,
                    about,
                ]
            )
    }
}
