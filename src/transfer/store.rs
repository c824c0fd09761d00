//! Persistence of balance and daily limit
//!
//! Only the two settings values are ever written. OTP codes and transfer data
//! stay in memory.

use std::collections::HashMap;

use crate::simple_kv_storage::SledDb;
use crate::transfer::error::TransferError;
use crate::transfer::types::Settings;

pub const KEY_SAVED_BALANCE: &str = "savedBalance";
pub const KEY_DAILY_LIMIT: &str = "dailyLimit";

pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, TransferError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), TransferError>;
}

impl KeyValueStore for SledDb {
    fn load(&self, key: &str) -> Result<Option<String>, TransferError> {
        Ok(self.get_str(key)?)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), TransferError> {
        Ok(self.insert_str(key, value)?)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, TransferError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), TransferError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes `Settings` through a key-value store
pub struct SettingsStore {
    kv: Box<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Saved values override `defaults`; missing or unparsable ones fall back
    pub fn load_settings(&self, defaults: &Settings) -> Result<Settings, TransferError> {
        let balance = self.load_u64(KEY_SAVED_BALANCE)?.unwrap_or(defaults.balance);
        let daily_limit = self
            .load_u64(KEY_DAILY_LIMIT)?
            .filter(|limit| *limit > 0)
            .unwrap_or(defaults.daily_limit);

        Ok(Settings {
            balance,
            daily_limit,
            upfront_checks: defaults.upfront_checks,
        })
    }

    pub fn save_balance(&mut self, balance: u64) -> Result<(), TransferError> {
        self.kv.save(KEY_SAVED_BALANCE, &balance.to_string())
    }

    pub fn save_daily_limit(&mut self, daily_limit: u64) -> Result<(), TransferError> {
        self.kv.save(KEY_DAILY_LIMIT, &daily_limit.to_string())
    }

    pub fn save_settings(&mut self, balance: u64, daily_limit: u64) -> Result<(), TransferError> {
        self.save_balance(balance)?;
        self.save_daily_limit(daily_limit)
    }

    fn load_u64(&self, key: &str) -> Result<Option<u64>, TransferError> {
        let Some(raw) = self.kv.load(key)? else {
            return Ok(None);
        };
        match raw.trim().parse::<u64>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                log::warn!("Ignoring unparsable {} value {:?}", key, raw);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let store = SettingsStore::in_memory();
        let defaults = Settings::default();
        assert_eq!(store.load_settings(&defaults).unwrap(), defaults);
    }

    #[test]
    fn test_saved_values_win() {
        let mut store = SettingsStore::in_memory();
        store.save_settings(2_000_000, 5_000_000).unwrap();

        let loaded = store.load_settings(&Settings::default()).unwrap();
        assert_eq!(loaded.balance, 2_000_000);
        assert_eq!(loaded.daily_limit, 5_000_000);
    }

    #[test]
    fn test_garbage_falls_back() {
        let mut kv = MemoryStore::new();
        kv.save(KEY_SAVED_BALANCE, "banyak").unwrap();
        kv.save(KEY_DAILY_LIMIT, "0").unwrap();
        let store = SettingsStore::new(Box::new(kv));

        let defaults = Settings {
            balance: 7,
            daily_limit: 9,
            upfront_checks: true,
        };
        assert_eq!(store.load_settings(&defaults).unwrap(), defaults);
    }

    #[test]
    fn test_sled_backed_store() {
        let db = SledDb::temporary().unwrap();
        let mut store = SettingsStore::new(Box::new(db));
        store.save_balance(123_456).unwrap();

        let loaded = store.load_settings(&Settings::default()).unwrap();
        assert_eq!(loaded.balance, 123_456);
        assert_eq!(loaded.daily_limit, Settings::default().daily_limit);
    }
}
