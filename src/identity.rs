//! Who is on the other end of a web request. The federated login itself
//! happens outside of the service, this only reads its outcome.

mod errors;
mod forwarded;

use rocket::http::HeaderMap;
use crate::owner_id::OwnerIdString;

pub use errors::IdentityError;
pub use forwarded::ForwardedIdentityGateway;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Principal {
    pub id: OwnerIdString,
    pub nickname: String,
    pub email: Option<String>,
    pub federated_identity: Option<String>,
}

pub trait IdentityGateway: Send + Sync + 'static {
    /// `Ok(None)` when the request carries no principal at all.
    fn current_principal(
        &self,
        headers: &HeaderMap<'_>,
    ) -> Result<Option<Principal>, IdentityError>;

    /// Where to send the browser to log in with `provider_uri` and come back
    /// to `continue_to` afterwards.
    fn login_url(&self, provider_uri: &str, continue_to: &str) -> String;

    fn logout_url(&self, continue_to: &str) -> String;
}
