//! Record identifier generation.
//!
//! Every record in the vault is keyed by a 36-character UUID v4 string.
//! Generation prefers the operating system's CSPRNG and degrades to a
//! clock-seeded software generator if the OS source is unavailable, so it
//! never fails.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use uuid::Builder;

/// Generate a new record identifier.
///
/// The result conforms to the UUID v4 layout (the version and variant bits
/// are fixed by [`Builder::from_random_bytes`] regardless of which random
/// source filled the bytes).
pub fn generate() -> String {
    let mut bytes = [0u8; 16];
    if OsRng.try_fill_bytes(&mut bytes).is_err() {
        // No OS randomness exposed. Seed from the clock; uniqueness within
        // a device is what the store needs, not unpredictability.
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        StdRng::seed_from_u64(nanos).fill_bytes(&mut bytes);
    }
    Builder::from_random_bytes(bytes).into_uuid().to_string()
}
