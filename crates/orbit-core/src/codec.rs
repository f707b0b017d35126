//! Record codec: domain records to and from their at-rest form.
//!
//! With an active key, a record is stored as a minimal envelope
//! `{"id": ..., "encryptedBlob": ...}` whose blob is the encrypted
//! canonical JSON of the full record. With no key, the record is stored as
//! plaintext JSON. The store sees one uniform shape either way, and a
//! relocked vault keeps already-stored plaintext records readable until
//! the next write re-wraps them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{OrbitError, Result};
use crate::session::VaultSession;

/// At-rest wrapper replacing a plaintext record when encryption is active.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    id: String,
    encrypted_blob: String,
}

/// A record ready for the store: its key and its serialized body.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: String,
    pub body: String,
}

/// Outcome of decoding one stored record.
///
/// A record that cannot be decrypted or parsed surfaces as `Unreadable`
/// with its raw payload, so enumerating a collection never aborts on one
/// damaged row.
#[derive(Debug, Clone)]
pub enum Decoded<T> {
    Intact(T),
    Unreadable { id: String, payload: String },
}

impl<T> Decoded<T> {
    pub fn into_intact(self) -> Option<T> {
        match self {
            Decoded::Intact(record) => Some(record),
            Decoded::Unreadable { .. } => None,
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, Decoded::Unreadable { .. })
    }
}

/// Serialize a record into its at-rest form under the session's current
/// lock state.
///
/// # Errors
///
/// Returns `OrbitError::InvalidInput` if the record has no string `id`
/// field, and propagates serialization or encryption failures.
pub fn wrap<T: Serialize>(session: &VaultSession, record: &T) -> Result<StoredRecord> {
    let value = serde_json::to_value(record)?;
    let id = value
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| OrbitError::InvalidInput("Record has no id field".to_string()))?
        .to_string();

    let plaintext = value.to_string();
    if !session.is_unlocked() {
        return Ok(StoredRecord { id, body: plaintext });
    }

    let envelope = Envelope {
        id: id.clone(),
        encrypted_blob: session.encrypt(&plaintext)?,
    };
    Ok(StoredRecord {
        id,
        body: serde_json::to_string(&envelope)?,
    })
}

/// Decode one stored body back into a domain record.
///
/// Infallible by contract: anything that cannot be decrypted and parsed
/// comes back as [`Decoded::Unreadable`] carrying the raw payload.
pub fn unwrap<T: DeserializeOwned>(session: &VaultSession, id: &str, body: &str) -> Decoded<T> {
    let payload = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("encryptedBlob").and_then(|v| v.as_str()) {
            Some(blob) => session.decrypt(blob),
            None => body.to_string(),
        },
        // Not JSON at all; treat the row as an opaque damaged payload.
        Err(_) => body.to_string(),
    };

    match serde_json::from_str::<T>(&payload) {
        Ok(record) => Decoded::Intact(record),
        Err(e) => {
            log::warn!("Stored record {} is unreadable: {}", id, e);
            Decoded::Unreadable {
                id: id.to_string(),
                payload,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derive_key;
    use crate::model::Folder;

    fn unlocked(passphrase: &str) -> VaultSession {
        VaultSession::unlocked(derive_key(passphrase, b"codec-test-salt-16bb").unwrap())
    }

    fn folder() -> Folder {
        Folder {
            id: "folder-1".to_string(),
            name: "Airdrops".to_string(),
            order_index: 0,
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_locked_wrap_stores_plaintext() {
        let session = VaultSession::locked();
        let stored = wrap(&session, &folder()).unwrap();

        assert_eq!(stored.id, "folder-1");
        assert!(stored.body.contains("Airdrops"));
        assert!(!stored.body.contains("encryptedBlob"));
    }

    #[test]
    fn test_unlocked_wrap_stores_envelope() {
        let session = unlocked("wrap-pass");
        let stored = wrap(&session, &folder()).unwrap();

        assert_eq!(stored.id, "folder-1");
        assert!(stored.body.contains("encryptedBlob"));
        assert!(!stored.body.contains("Airdrops"));
    }

    #[test]
    fn test_round_trip_locked_and_unlocked() {
        for session in [VaultSession::locked(), unlocked("round-pass")] {
            let stored = wrap(&session, &folder()).unwrap();
            let decoded: Decoded<Folder> = unwrap(&session, &stored.id, &stored.body);
            assert_eq!(decoded.into_intact().unwrap(), folder());
        }
    }

    #[test]
    fn test_plaintext_record_readable_after_unlock() {
        // Written while locked, read back after unlocking: still intact.
        let stored = wrap(&VaultSession::locked(), &folder()).unwrap();
        let decoded: Decoded<Folder> = unwrap(&unlocked("later-pass"), &stored.id, &stored.body);

        assert_eq!(decoded.into_intact().unwrap(), folder());
    }

    #[test]
    fn test_envelope_unreadable_without_key() {
        let stored = wrap(&unlocked("writer-pass"), &folder()).unwrap();
        let decoded: Decoded<Folder> = unwrap(&VaultSession::locked(), &stored.id, &stored.body);

        assert!(decoded.is_unreadable());
    }

    #[test]
    fn test_envelope_unreadable_under_wrong_key() {
        let stored = wrap(&unlocked("writer-pass"), &folder()).unwrap();
        let decoded: Decoded<Folder> = unwrap(&unlocked("other-pass"), &stored.id, &stored.body);

        match decoded {
            Decoded::Unreadable { id, payload } => {
                assert_eq!(id, "folder-1");
                // Degraded, not recovered: payload is the raw blob.
                assert!(!payload.contains("Airdrops"));
            }
            Decoded::Intact(_) => panic!("wrong key must not decode the record"),
        }
    }

    #[test]
    fn test_corrupt_row_is_unreadable_not_fatal() {
        let decoded: Decoded<Folder> = unwrap(&VaultSession::locked(), "x", "not json {{{");
        assert!(decoded.is_unreadable());
    }

    #[test]
    fn test_wrap_rejects_record_without_id() {
        #[derive(Serialize)]
        struct NoId {
            name: String,
        }

        let result = wrap(
            &VaultSession::locked(),
            &NoId {
                name: "anonymous".to_string(),
            },
        );
        assert!(matches!(result, Err(OrbitError::InvalidInput(_))));
    }
}
