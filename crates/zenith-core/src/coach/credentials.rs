//! Coach API key storage.
//!
//! The key lives in the OS keyring under service `zenith`. Setting
//! `ZENITH_COACH_API_KEY` overrides whatever is stored.

use std::collections::HashMap;

use crate::error::CoachError;

const SERVICE: &str = "zenith";
pub const API_KEY_ENTRY: &str = "coach_api_key";
pub const API_KEY_ENV: &str = "ZENITH_COACH_API_KEY";

/// Secret storage keyed by name.
pub trait SecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoachError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoachError>;
    fn delete(&mut self, key: &str) -> Result<(), CoachError>;
}

/// Thin wrapper around the OS keyring.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringStore;

fn keyring_error(e: keyring::Error) -> CoachError {
    CoachError::Credentials(e.to_string())
}

impl SecretStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoachError> {
        let entry = keyring::Entry::new(SERVICE, key).map_err(keyring_error)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(keyring_error(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoachError> {
        let entry = keyring::Entry::new(SERVICE, key).map_err(keyring_error)?;
        entry.set_password(value).map_err(keyring_error)
    }

    fn delete(&mut self, key: &str) -> Result<(), CoachError> {
        let entry = keyring::Entry::new(SERVICE, key).map_err(keyring_error)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(keyring_error(e)),
        }
    }
}

/// In-process secret store.
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    entries: HashMap<String, String>,
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoachError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoachError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), CoachError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Link state of the coach account.
pub struct Credentials<S: SecretStore> {
    store: S,
    env_override: Option<String>,
}

impl Credentials<KeyringStore> {
    /// OS keyring with the environment override applied.
    pub fn from_env() -> Self {
        Self::new(KeyringStore, std::env::var(API_KEY_ENV).ok())
    }
}

impl<S: SecretStore> Credentials<S> {
    pub fn new(store: S, env_override: Option<String>) -> Self {
        Self {
            store,
            env_override: env_override.filter(|k| !k.trim().is_empty()),
        }
    }

    /// The key to use, or `NotLinked`.
    pub fn api_key(&self) -> Result<String, CoachError> {
        if let Some(key) = &self.env_override {
            return Ok(key.clone());
        }
        self.store
            .get(API_KEY_ENTRY)?
            .filter(|k| !k.is_empty())
            .ok_or(CoachError::NotLinked)
    }

    pub fn is_linked(&self) -> bool {
        self.api_key().is_ok()
    }

    pub fn is_env_override(&self) -> bool {
        self.env_override.is_some()
    }

    pub fn link(&mut self, api_key: &str) -> Result<(), CoachError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(CoachError::Credentials("API key is empty".into()));
        }
        self.store.set(API_KEY_ENTRY, api_key)?;
        tracing::info!("coach account linked");
        Ok(())
    }

    pub fn unlink(&mut self) -> Result<(), CoachError> {
        self.store.delete(API_KEY_ENTRY)?;
        tracing::info!("coach account unlinked");
        Ok(())
    }
}
