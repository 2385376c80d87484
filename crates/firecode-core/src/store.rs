//! Persistence store: user directory, session marker, and per-user report
//! history over a narrow key/value port.
//!
//! The stored data is convenience history, not a system of record, so every
//! operation degrades gracefully — readers get `None`/empty instead of errors,
//! and write failures are logged and swallowed. Concurrent writers can race
//! and lose updates; that is accepted, not mitigated.
//!
//! ## Key layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `fire_search_users` | JSON map: email -> User (with password) |
//! | `fire_search_session` | JSON public User (current session marker) |
//! | `fire_search_reports_<email>` | JSON Vec<SavedReport>, newest first |

use crate::shared::{SavedReport, User};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Key under which the user directory is stored.
pub const USERS_KEY: &str = "fire_search_users";
/// Key under which the current-session marker is stored.
pub const SESSION_KEY: &str = "fire_search_session";
/// Prefix for per-user report lists; the full key is `<prefix><email>`.
pub const REPORTS_KEY_PREFIX: &str = "fire_search_reports_";

/// Well-known demo credential seeded into fresh stores.
pub const DEMO_EMAIL: &str = "inspector@bfp.gov.ph";
pub const DEMO_PASSWORD: &str = "admin";
pub const DEMO_NAME: &str = "Lead Inspector";

/// Narrow key/value port. Implementations log their own failures; the surface
/// is infallible so the store above it stays storage-agnostic.
pub trait KvPort: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&self, key: &str, value: &[u8]);
    fn remove(&self, key: &str);
}

/// Sled-backed port with a hot cache in front (checked before Sled).
pub struct SledKv {
    db: sled::Db,
    cache: DashMap<String, Vec<u8>>,
}

impl SledKv {
    /// Opens or creates a Sled database at the given path.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, sled::Error> {
        let db = sled::open(path)?;
        Ok(Self { db, cache: DashMap::new() })
    }
}

impl KvPort for SledKv {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        if let Some(v) = self.cache.get(key) {
            return Some(v.clone());
        }
        match self.db.get(key.as_bytes()) {
            Ok(Some(iv)) => {
                let bytes = iv.to_vec();
                self.cache.insert(key.to_string(), bytes.clone());
                Some(bytes)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "sled read failed; treating as absent");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &[u8]) {
        if let Err(e) = self.db.insert(key.as_bytes(), value) {
            tracing::warn!(key, error = %e, "sled write failed; value dropped");
            return;
        }
        self.cache.insert(key.to_string(), value.to_vec());
    }

    fn remove(&self, key: &str) {
        self.cache.remove(key);
        if let Err(e) = self.db.remove(key.as_bytes()) {
            tracing::warn!(key, error = %e, "sled remove failed");
        }
    }
}

/// In-memory port for unit tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryKv {
    map: DashMap<String, Vec<u8>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvPort for MemoryKv {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.map.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &[u8]) {
        self.map.insert(key.to_string(), value.to_vec());
    }

    fn remove(&self, key: &str) {
        self.map.remove(key);
    }
}

/// User directory, session marker, and report history over a [`KvPort`].
pub struct AssistantStore<K: KvPort> {
    kv: K,
}

impl<K: KvPort> AssistantStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.kv.get(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value unreadable; treating as absent");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.kv.set(key, &bytes),
            Err(e) => tracing::warn!(key, error = %e, "serialization failed; value dropped"),
        }
    }

    fn directory(&self) -> BTreeMap<String, User> {
        self.read_json(USERS_KEY).unwrap_or_default()
    }

    fn reports_key(email: &str) -> String {
        format!("{}{}", REPORTS_KEY_PREFIX, email)
    }

    /// Adds a user to the directory. Returns false — and leaves the existing
    /// record untouched — when the email is already registered.
    pub fn register(&self, user: &User) -> bool {
        let mut directory = self.directory();
        if directory.contains_key(&user.email) {
            return false;
        }
        directory.insert(user.email.clone(), user.clone());
        self.write_json(USERS_KEY, &directory);
        true
    }

    /// Exact email + password match. On success records the session marker and
    /// returns the user with the password stripped; otherwise `None`.
    pub fn login(&self, email: &str, password: &str) -> Option<User> {
        let directory = self.directory();
        let stored = directory.get(email)?;
        if stored.password.as_deref() != Some(password) {
            return None;
        }
        let public = stored.public();
        self.write_json(SESSION_KEY, &public);
        Some(public)
    }

    /// Clears the current-session marker. Never fails.
    pub fn logout(&self) {
        self.kv.remove(SESSION_KEY);
    }

    /// Reads the session marker. Fails open to `None` on absent or corrupt
    /// data — never errors.
    pub fn current_user(&self) -> Option<User> {
        self.read_json(SESSION_KEY)
    }

    /// Prepends a report to the user's history (newest first). Storage
    /// failures are non-fatal and logged only.
    pub fn save_report(&self, email: &str, report: &SavedReport) {
        let key = Self::reports_key(email);
        let mut reports: Vec<SavedReport> = self.read_json(&key).unwrap_or_default();
        reports.insert(0, report.clone());
        self.write_json(&key, &reports);
    }

    /// The user's report history, newest first. Empty when none exist or the
    /// stored list is unreadable.
    pub fn reports(&self, email: &str) -> Vec<SavedReport> {
        self.read_json(&Self::reports_key(email)).unwrap_or_default()
    }

    /// Installs the demo credential into the directory without clobbering an
    /// existing registration for that email.
    pub fn seed_demo_user(&self) {
        self.register(&User::new(DEMO_EMAIL, DEMO_NAME, DEMO_PASSWORD));
    }

    /// Access to the underlying port, for callers that need raw keys (tests).
    pub fn kv(&self) -> &K {
        &self.kv
    }
}
