use async_trait::async_trait;
use opennote::config::app_config::AppConfig;
use rocket::{Request, State};
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};

/// Scheme and authority the service is reached at, without a trailing slash.
#[derive(Debug)]
pub struct HostUrl(pub String);

#[async_trait]
impl<'r> FromRequest<'r> for HostUrl {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = try_outcome!(request.guard::<&State<AppConfig>>().await);
        let url = match (&config.public_url, request.host()) {
            (Some(public_url), _) => public_url.trim_end_matches('/').to_owned(),
            (None, Some(host)) => format!("http://{host}"),
            (None, None) => {
                let rocket_config = request.rocket().config();
                format!("http://{}:{}", rocket_config.address, rocket_config.port)
            },
        };
        Outcome::Success(HostUrl(url))
    }
}
