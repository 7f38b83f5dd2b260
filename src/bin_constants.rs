pub const DEFAULT_CONFIG_FILE: &str = "/etc/opennote/opennote.toml";
pub const DEFAULT_DATA_DIR: &str = "/var/opennote";
pub const APP_CONFIG_ENV_PREFIX: &str = "OPENNOTE_";
