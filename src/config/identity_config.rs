use serde::{Deserialize, Serialize};

/// Where the authenticating proxy puts the principal and where its login and
/// logout endpoints live.
///
/// The principal headers are trusted as they arrive. The proxy must strip
/// any client-supplied copies of them, and the service must listen where
/// only the proxy can connect, such as a loopback address or a private
/// network. A startup warning is logged when it listens beyond loopback.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IdentityConfig {
    #[serde(default = "identity_config_default_principal_id_header")]
    pub principal_id_header: String,

    #[serde(default = "identity_config_default_nickname_header")]
    pub nickname_header: String,

    #[serde(default = "identity_config_default_email_header")]
    pub email_header: String,

    #[serde(default = "identity_config_default_federated_identity_header")]
    pub federated_identity_header: String,

    #[serde(default = "identity_config_default_login_url")]
    pub login_url: String,

    #[serde(default = "identity_config_default_logout_url")]
    pub logout_url: String,
}

pub fn identity_config_default_principal_id_header() -> String {
    "X-Forwarded-User".into()
}

pub fn identity_config_default_nickname_header() -> String {
    "X-Forwarded-Preferred-Username".into()
}

pub fn identity_config_default_email_header() -> String {
    "X-Forwarded-Email".into()
}

pub fn identity_config_default_federated_identity_header() -> String {
    "X-Forwarded-Identity-Provider".into()
}

pub fn identity_config_default_login_url() -> String {
    "/oauth2/start".into()
}

pub fn identity_config_default_logout_url() -> String {
    "/oauth2/sign_out".into()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig {
            principal_id_header: identity_config_default_principal_id_header(),
            nickname_header: identity_config_default_nickname_header(),
            email_header: identity_config_default_email_header(),
            federated_identity_header: identity_config_default_federated_identity_header(),
            login_url: identity_config_default_login_url(),
            logout_url: identity_config_default_logout_url(),
        }
    }
}
