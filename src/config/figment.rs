use std::path::Path;
use rocket::figment::Figment;
use rocket::figment::providers::{Env, Format, Serialized, Toml};
use crate::bin_constants::APP_CONFIG_ENV_PREFIX;
use crate::config::app_config::AppConfig;

pub trait FigmentExt {
    fn setup_app_config_defaults(self) -> Figment;

    fn setup_app_config(
        self,
        config_file: impl AsRef<Path>,
    ) -> Figment;
}

impl FigmentExt for Figment {
    fn setup_app_config_defaults(self) -> Figment {
        self.merge(Serialized::defaults(AppConfig::default()))
    }

    fn setup_app_config(self, config_file: impl AsRef<Path>) -> Figment {
        self.setup_app_config_defaults()
            .merge(Toml::file_exact(config_file))
            .merge(Env::prefixed(APP_CONFIG_ENV_PREFIX).global())
    }
}
