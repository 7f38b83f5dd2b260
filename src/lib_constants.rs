pub const DEFAULT_MAX_NOTE_LEN: u64 = 128 * 1024;

// relative to the data directory
pub const NOTES_DB_FILE: &str = "notes.toml";
pub const NOTES_LOCK_FILE: &str = "notes.lock";
pub const TMP_FILENAME_INFIX: &str = ".tmp.";

pub const SECRET_KEY_BYTES: usize = 256 / 8;
pub const SECRET_KEY_HEX_LEN: usize = SECRET_KEY_BYTES * 2;
pub const MAX_KEY_GENERATION_ATTEMPTS: usize = 8;

pub const MAX_OWNER_ID_LEN: usize = 256;
