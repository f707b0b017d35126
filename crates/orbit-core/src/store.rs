//! Durable on-device record store.
//!
//! Three collections (folders, projects, logs) keyed by record id, each a
//! SQLite table of `(id, record)` rows, plus a `meta` key-value table that
//! houses the persisted key-derivation salt. Every record passes through
//! the codec on read and write; the store itself is encryption-agnostic
//! and only ever sees opaque bodies with an id.
//!
//! Each operation runs in its own implicit transaction: single-record
//! atomicity, no cross-record guarantees.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{self, Decoded};
use crate::crypto::{self, SALT_LENGTH};
use crate::error::{OrbitError, Result};
use crate::session::VaultSession;

/// Fixed meta key the key-derivation salt is persisted under.
const SALT_META_KEY: &str = "vault_salt";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS folders (
        id TEXT PRIMARY KEY,
        record TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY,
        record TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS logs (
        id TEXT PRIMARY KEY,
        record TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
"#;

/// The three record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Folders,
    Projects,
    Logs,
}

impl Collection {
    fn table(self) -> &'static str {
        match self {
            Collection::Folders => "folders",
            Collection::Projects => "projects",
            Collection::Logs => "logs",
        }
    }
}

/// SQLite-backed local store.
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    /// Open (creating if needed) a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory store. Writes do not survive the
    /// process; intended for tests and demos.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the database connection, returning an error if the mutex is
    /// poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| OrbitError::Storage("SQLite connection poisoned".to_string()))
    }

    /// All records in a collection, in no guaranteed order. Callers
    /// re-sort as their semantics require.
    pub fn get_all<T: DeserializeOwned>(
        &self,
        session: &VaultSession,
        collection: Collection,
    ) -> Result<Vec<Decoded<T>>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&format!("SELECT id, record FROM {}", collection.table()))?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, body) = row?;
            records.push(codec::unwrap(session, &id, &body));
        }
        Ok(records)
    }

    /// Look up one record by id.
    pub fn get<T: DeserializeOwned>(
        &self,
        session: &VaultSession,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Decoded<T>>> {
        let conn = self.lock_conn()?;
        let body: Option<String> = conn
            .query_row(
                &format!("SELECT record FROM {} WHERE id = ?1", collection.table()),
                [id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(body.map(|body| codec::unwrap(session, id, &body)))
    }

    /// Insert-or-replace a record by id (idempotent upsert).
    pub fn put<T: Serialize>(
        &self,
        session: &VaultSession,
        collection: Collection,
        record: &T,
    ) -> Result<()> {
        let stored = codec::wrap(session, record)?;
        let conn = self.lock_conn()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (id, record) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET record = excluded.record",
                collection.table()
            ),
            [&stored.id, &stored.body],
        )?;
        Ok(())
    }

    /// Remove a record. Deleting an absent id is a no-op, not an error.
    pub fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", collection.table()),
            [id],
        )?;
        Ok(())
    }

    /// Number of records in a collection.
    pub fn count(&self, collection: Collection) -> Result<usize> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", collection.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// The persisted key-derivation salt, generated and stored on first
    /// use so the same passphrase always re-derives the same key.
    pub fn vault_salt(&self) -> Result<[u8; SALT_LENGTH]> {
        let conn = self.lock_conn()?;
        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                [SALT_META_KEY],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(encoded) = stored {
            let raw = BASE64
                .decode(&encoded)
                .map_err(|e| OrbitError::Crypto(format!("Stored vault salt is corrupt: {}", e)))?;
            return raw.try_into().map_err(|_| {
                OrbitError::Crypto("Stored vault salt has the wrong length".to_string())
            });
        }

        let salt = crypto::generate_salt()?;
        let encoded = BASE64.encode(salt);
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)",
            [SALT_META_KEY, encoded.as_str()],
        )?;
        Ok(salt)
    }
}
