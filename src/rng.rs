use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use rand::{CryptoRng, Rng};
use uuid::{Uuid, Variant, Version};

pub fn make_uuid<R: Rng>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random())
        .with_variant(Variant::RFC4122)
        .with_version(Version::Random)
        .into_uuid()
}

/// A cryptographically secure rng shared between request handlers.
pub struct SyncRng<R: CryptoRng + Send> {
    rng: Arc<Mutex<R>>,
}

impl<R: CryptoRng + Send> SyncRng<R> {
    pub fn new(rng: R) -> Self {
        SyncRng {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn get_rng(&self) -> MutexGuard<'_, R> {
        // the rng state stays usable even if a holder panicked
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: CryptoRng + Send> Clone for SyncRng<R> {
    fn clone(&self) -> Self {
        SyncRng {
            rng: self.rng.clone(),
        }
    }
}
