pub mod config;
pub mod data;
pub mod identity;
pub mod logging;
pub mod note_store;
pub mod owner_id;
pub mod rng;
pub mod secret_key;
pub mod util;
pub mod bin_constants;
pub mod lib_constants;
#[cfg(test)] pub mod test;
