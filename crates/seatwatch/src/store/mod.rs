//! Account store backed by SQLite.

mod password;

use rusqlite::{Connection, OptionalExtension};
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_users.sql");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username {username:?} is already registered")]
    UsernameTaken { username: String },

    #[error("stored credential for {username:?} is not a recognized record")]
    CorruptCredential { username: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Accounts live in a single `users` table keyed by username. The
/// connection sits behind a mutex so the store can be shared freely.
pub struct UserStore {
    db: Mutex<Connection>,
}

impl UserStore {
    /// Opens (creating if needed) the account database at `path` and
    /// ensures the schema exists.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// In-memory store, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// True iff an account with this username exists.
    pub fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare("SELECT COUNT(*) FROM users WHERE username = ?")?;
        let count: i64 = stmt.query_row([username], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Creates an account. The password is stored as a salted PBKDF2
    /// record; registration of a taken username fails without touching the
    /// existing row.
    pub fn register(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let record = password::hash_password(password);
        let db = self.db.lock().unwrap();
        let inserted = db.execute(
            "INSERT OR IGNORE INTO users (username, password) VALUES (?1, ?2)",
            (username, &record),
        )?;
        if inserted == 0 {
            return Err(StoreError::UsernameTaken {
                username: username.to_string(),
            });
        }
        info!(username = %username, "account registered");
        Ok(())
    }

    /// Checks a username/password pair. Unknown usernames verify as
    /// `false`; a stored record that cannot be parsed is an error, not a
    /// mismatch.
    pub fn verify_credential(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let record: Option<String> = {
            let db = self.db.lock().unwrap();
            let mut stmt = db.prepare("SELECT password FROM users WHERE username = ?")?;
            stmt.query_row([username], |row| row.get(0)).optional()?
        };
        match record {
            Some(record) => password::verify_password(password, &record).ok_or_else(|| {
                StoreError::CorruptCredential {
                    username: username.to_string(),
                }
            }),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_verify() {
        let store = UserStore::open_in_memory().unwrap();
        assert!(!store.username_exists("alice").unwrap());

        store.register("alice", "correct horse").unwrap();
        assert!(store.username_exists("alice").unwrap());
        assert!(store.verify_credential("alice", "correct horse").unwrap());
        assert!(!store.verify_credential("alice", "wrong horse").unwrap());
    }

    #[test]
    fn test_unknown_username_verifies_false() {
        let store = UserStore::open_in_memory().unwrap();
        assert!(!store.verify_credential("nobody", "anything").unwrap());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let store = UserStore::open_in_memory().unwrap();
        store.register("bob", "first").unwrap();

        let err = store.register("bob", "second").unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken { username } if username == "bob"));
        // The original credential survives the failed attempt.
        assert!(store.verify_credential("bob", "first").unwrap());
    }

    #[test]
    fn test_corrupt_record_is_an_error_not_a_mismatch() {
        let store = UserStore::open_in_memory().unwrap();
        store
            .db
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO users (username, password) VALUES ('legacy', 'deadbeef')",
                [],
            )
            .unwrap();

        let err = store.verify_credential("legacy", "anything").unwrap_err();
        assert!(matches!(err, StoreError::CorruptCredential { username } if username == "legacy"));
    }
}
