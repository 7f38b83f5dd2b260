use std::str::FromStr;
use log::trace;
use rocket::http::{HeaderMap, RawStr};
use crate::config::identity_config::IdentityConfig;
use crate::identity::{IdentityError, IdentityGateway, Principal};
use crate::owner_id::OwnerIdString;
use crate::util::StrExt;

/// Trusts the principal headers set by an authenticating reverse proxy.
/// The service must not be reachable other than through that proxy.
pub struct ForwardedIdentityGateway {
    config: IdentityConfig,
}

impl ForwardedIdentityGateway {
    pub fn new(config: IdentityConfig) -> Self {
        ForwardedIdentityGateway { config }
    }

    fn header(headers: &HeaderMap<'_>, name: &str) -> Option<String> {
        headers.get_one(name)
            .and_then(|value| value.nonblank_to_some())
    }
}

impl IdentityGateway for ForwardedIdentityGateway {
    fn current_principal(
        &self,
        headers: &HeaderMap<'_>,
    ) -> Result<Option<Principal>, IdentityError> {
        let Some(id) = Self::header(headers, &self.config.principal_id_header) else {
            return Ok(None);
        };
        let id = OwnerIdString::from_str(&id)?;
        let principal = Principal {
            nickname: Self::header(headers, &self.config.nickname_header)
                .unwrap_or_else(|| id.to_string()),
            email: Self::header(headers, &self.config.email_header),
            federated_identity: Self::header(headers, &self.config.federated_identity_header),
            id,
        };
        trace!("request by \"{}\"", principal.id);
        Ok(Some(principal))
    }

    fn login_url(&self, provider_uri: &str, continue_to: &str) -> String {
        with_query(
            &self.config.login_url,
            &[("provider", provider_uri), ("rd", continue_to)],
        )
    }

    fn logout_url(&self, continue_to: &str) -> String {
        with_query(&self.config.logout_url, &[("rd", continue_to)])
    }
}

fn with_query(base: &str, params: &[(&str, &str)]) -> String {
    let mut url = base.to_owned();
    let mut separator = if base.contains('?') { '&' } else { '?' };
    for (name, value) in params {
        url.push(separator);
        url.push_str(name);
        url.push('=');
        url.push_str(RawStr::new(value).percent_encode().as_str());
        separator = '&';
    }
    url
}
