pub const API_PREFIX: &str = "/api";
pub const WEB_PREFIX: &str = "/";

pub const INDEX_TEMPLATE: &str = "index";
pub const SETTINGS_TEMPLATE: &str = "settings";
pub const ABOUT_TEMPLATE: &str = "about";

pub const NOTE_NOT_FOUND_MESSAGE: &str = "Note not found";
pub const TEXT_NOT_PROVIDED_MESSAGE: &str = "text not provided.";
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";
