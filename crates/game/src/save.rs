//! Session persistence: an opaque string key-value store and the player
//! profile stored in it.
//!
//! The store models browser local storage: `get(key)`/`set(key, value)` on
//! strings, nothing else. The profile is read once at session start and
//! written through on every relevant mutation; malformed stored values
//! degrade to defaults with a warning instead of failing the session.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::{SyncBridge, SyncEvent};

pub const KEY_CREDITS: &str = "aether_credits";
pub const KEY_UPGRADES: &str = "upgrades";
pub const KEY_STATS: &str = "stats";

/// Upgrades cap out at level 10.
pub const UPGRADE_MAX_LEVEL: u8 = 10;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("insufficient credits: have {have}, need {need}")]
    InsufficientCredits { have: u64, need: u64 },
    #[error("upgrade {0} already at max level")]
    UpgradeMaxed(String),
}

/// Opaque string key-value store.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// File-backed store: one ron map on disk, rewritten on every set.
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open (or create) the store at `path`. An unreadable or malformed
    /// file starts empty with a warning.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(data) => match ron::from_str(&data) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Malformed save at {:?}: {}, starting fresh", path, e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, entries }
    }

    fn flush(&self) {
        match ron::ser::to_string_pretty(&self.entries, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&self.path, s) {
                    log::warn!("Could not write save to {:?}: {}", self.path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize save: {}", e),
        }
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush();
    }
}

/// Run statistics carried in the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub minerals_collected: u64,
    pub deaths: u32,
    pub peak_distance: f64,
}

/// The persistent player profile: credits, upgrade levels, stats.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub credits: u64,
    pub upgrades: HashMap<String, u8>,
    pub stats: RunStats,
}

fn parse_or_default<T: Default + for<'de> Deserialize<'de>>(
    store: &dyn KvStore,
    key: &str,
) -> T {
    match store.get(key) {
        Some(raw) => match ron::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Malformed value for {:?}: {}, using default", key, e);
                T::default()
            }
        },
        None => T::default(),
    }
}

impl Profile {
    /// Load the profile at session start.
    pub fn load(store: &dyn KvStore) -> Self {
        Self {
            credits: parse_or_default(store, KEY_CREDITS),
            upgrades: parse_or_default(store, KEY_UPGRADES),
            stats: parse_or_default(store, KEY_STATS),
        }
    }

    /// Add credits and write through, notifying the host.
    pub fn add_credits(
        &mut self,
        amount: u64,
        store: &mut dyn KvStore,
        bridge: &mut dyn SyncBridge,
    ) {
        self.credits = self.credits.saturating_add(amount);
        self.write_credits(store, bridge);
    }

    /// Spend credits if the balance covers it, writing through on success.
    pub fn spend_credits(
        &mut self,
        amount: u64,
        store: &mut dyn KvStore,
        bridge: &mut dyn SyncBridge,
    ) -> Result<(), SaveError> {
        if self.credits < amount {
            return Err(SaveError::InsufficientCredits {
                have: self.credits,
                need: amount,
            });
        }
        self.credits -= amount;
        self.write_credits(store, bridge);
        Ok(())
    }

    /// Purchase one level of an upgrade.
    pub fn purchase_upgrade(
        &mut self,
        id: &str,
        cost: u64,
        store: &mut dyn KvStore,
        bridge: &mut dyn SyncBridge,
    ) -> Result<u8, SaveError> {
        let level = self.upgrades.get(id).copied().unwrap_or(0);
        if level >= UPGRADE_MAX_LEVEL {
            return Err(SaveError::UpgradeMaxed(id.to_string()));
        }
        self.spend_credits(cost, store, bridge)?;
        let level = level + 1;
        self.upgrades.insert(id.to_string(), level);
        if let Ok(s) = ron::ser::to_string(&self.upgrades) {
            store.set(KEY_UPGRADES, &s);
        }
        bridge.send(&SyncEvent::UpgradePurchased {
            id: id.to_string(),
            level,
        });
        Ok(level)
    }

    /// Write stats through after a mutation.
    pub fn save_stats(&self, store: &mut dyn KvStore, bridge: &mut dyn SyncBridge) {
        if let Ok(s) = ron::ser::to_string(&self.stats) {
            store.set(KEY_STATS, &s);
        }
        bridge.send(&SyncEvent::StatsUpdated {
            minerals_collected: self.stats.minerals_collected,
            deaths: self.stats.deaths,
        });
    }

    /// Write everything. Called on session exit.
    pub fn save_all(&self, store: &mut dyn KvStore, bridge: &mut dyn SyncBridge) {
        self.write_credits(store, bridge);
        if let Ok(s) = ron::ser::to_string(&self.upgrades) {
            store.set(KEY_UPGRADES, &s);
        }
        self.save_stats(store, bridge);
    }

    fn write_credits(&self, store: &mut dyn KvStore, bridge: &mut dyn SyncBridge) {
        store.set(KEY_CREDITS, &self.credits.to_string());
        bridge.send(&SyncEvent::CreditsChanged(self.credits));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::LogBridge;

    #[test]
    fn profile_roundtrips_through_store() {
        let mut store = MemoryStore::new();
        let mut bridge = LogBridge;
        let mut profile = Profile::default();
        profile.add_credits(350, &mut store, &mut bridge);
        profile.stats.minerals_collected = 12;
        profile.save_all(&mut store, &mut bridge);

        let loaded = Profile::load(&store);
        assert_eq!(loaded.credits, 350);
        assert_eq!(loaded.stats.minerals_collected, 12);
    }

    #[test]
    fn malformed_values_degrade_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(KEY_CREDITS, "not a number");
        store.set(KEY_STATS, "{{{");
        let profile = Profile::load(&store);
        assert_eq!(profile.credits, 0);
        assert_eq!(profile.stats.minerals_collected, 0);
    }

    #[test]
    fn spend_rejects_overdraft() {
        let mut store = MemoryStore::new();
        let mut bridge = LogBridge;
        let mut profile = Profile::default();
        profile.add_credits(10, &mut store, &mut bridge);
        let err = profile.spend_credits(50, &mut store, &mut bridge);
        assert!(matches!(err, Err(SaveError::InsufficientCredits { .. })));
        assert_eq!(profile.credits, 10);
    }

    #[test]
    fn upgrades_cap_at_max_level() {
        let mut store = MemoryStore::new();
        let mut bridge = LogBridge;
        let mut profile = Profile::default();
        profile.add_credits(10_000, &mut store, &mut bridge);
        for _ in 0..UPGRADE_MAX_LEVEL {
            profile
                .purchase_upgrade("cargo_bay", 100, &mut store, &mut bridge)
                .unwrap();
        }
        let err = profile.purchase_upgrade("cargo_bay", 100, &mut store, &mut bridge);
        assert!(matches!(err, Err(SaveError::UpgradeMaxed(_))));
        assert_eq!(profile.upgrades["cargo_bay"], UPGRADE_MAX_LEVEL);
    }
}
