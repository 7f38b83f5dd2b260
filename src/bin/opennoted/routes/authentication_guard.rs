use async_trait::async_trait;
use log::warn;
use opennote::identity::{IdentityGateway, Principal};
use rocket::{Request, State};
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};

#[derive(Debug)]
pub enum MaybeAuthenticated {
    Authenticated(Principal),
    Unauthenticated,
}

#[async_trait]
impl<'r> FromRequest<'r> for MaybeAuthenticated {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let identity_gateway = try_outcome!(
            request.guard::<&State<Box<dyn IdentityGateway>>>().await
        );
        match identity_gateway.current_principal(request.headers()) {
            Ok(Some(principal)) => Outcome::Success(MaybeAuthenticated::Authenticated(principal)),
            Ok(None) => Outcome::Success(MaybeAuthenticated::Unauthenticated),
            Err(e) => {
                warn!("ignoring forwarded principal: {e}");
                Outcome::Success(MaybeAuthenticated::Unauthenticated)
            },
        }
    }
}
