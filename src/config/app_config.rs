use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use crate::bin_constants::DEFAULT_DATA_DIR;
use crate::config::identity_config::IdentityConfig;
use crate::lib_constants::DEFAULT_MAX_NOTE_LEN;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AppConfig {
    #[serde(default = "app_config_default_data_directory")]
    pub data_directory: PathBuf,

    #[serde(default = "app_config_default_max_note_size")]
    pub max_note_size: u64,

    #[serde(default)]
    pub note_submit_behavior: NoteSubmitBehavior,

    /// Base url shown on the settings and about pages, `http://<Host>`
    /// when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,

    #[serde(default = "app_config_default_providers")]
    pub providers: Vec<ProviderConfig>,

    #[serde(default)]
    pub identity: IdentityConfig,
}

/// What a successful note submission from the web page responds with.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSubmitBehavior {
    /// 302 back to the main page
    #[default]
    Redirect,

    /// 200 with the page rendered in place
    Render,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ProviderConfig {
    pub name: String,
    pub uri: String,
}

pub fn app_config_default_data_directory() -> PathBuf {
    DEFAULT_DATA_DIR.into()
}

pub fn app_config_default_max_note_size() -> u64 {
    DEFAULT_MAX_NOTE_LEN
}

pub fn app_config_default_providers() -> Vec<ProviderConfig> {
    [
        ("Google", "www.google.com/accounts/o8/id"),
        ("Yahoo", "yahoo.com"),
        ("MyOpenID", "myopenid.com"),
    ]
        .into_iter()
        .map(|(name, uri)| ProviderConfig {
            name: name.into(),
            uri: uri.into(),
        })
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_directory: app_config_default_data_directory(),
            max_note_size: app_config_default_max_note_size(),
            note_submit_behavior: NoteSubmitBehavior::default(),
            public_url: None,
            providers: app_config_default_providers(),
            identity: IdentityConfig::default(),
        }
    }
}
