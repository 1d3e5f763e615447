//! Settings store: current override values on top of catalog defaults
//!
//! Overrides exist only for settings the user explicitly changed. They are
//! persisted as one JSON object under a fixed storage key after every
//! [`SettingsStore::set_value`] and restored on construction. Both directions
//! are best-effort: a broken or unavailable backend degrades to "defaults
//! only", it never fails the caller.
//!
//! The store trusts callers to pass values of the descriptor's kind.
//! Validation happens once at the editor boundary (see
//! [`crate::settings::edit`]); here a mismatch only trips a debug assertion.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

use super::catalog::{Catalog, SettingDescriptor, SettingId, SettingValue};
use super::storage::Storage;
use crate::constants::storage::SETTINGS_KEY;
use crate::gui::ConfigurationSurface;

pub type OverrideMap = HashMap<SettingId, SettingValue>;

/// Serialize overrides to the persisted JSON blob (keys sorted)
///
/// Non-finite numbers have no JSON form and are left out with a warning, so
/// the blob always decodes back to the entries it holds.
pub fn encode_overrides(overrides: &OverrideMap) -> Result<String> {
    let sorted: BTreeMap<&str, &SettingValue> = overrides
        .iter()
        .filter(|(id, value)| match value.as_number() {
            Some(n) if !n.is_finite() => {
                warn!(setting = %id, value = n, "Not persisting non-finite number");
                false
            }
            _ => true,
        })
        .map(|(id, value)| (id.as_str(), value))
        .collect();
    serde_json::to_string(&sorted).context("Failed to serialize settings to JSON")
}

/// Parse a persisted JSON blob into overrides
///
/// Malformed JSON, or a top level that is not an object, is an error.
/// Entries with an unknown id, a value that is not a boolean, number or
/// string, or a kind that does not match the catalog are dropped with a
/// warning; the rest are kept.
pub fn decode_overrides(catalog: &Catalog, blob: &str) -> Result<OverrideMap> {
    let raw: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(blob).context("Failed to parse stored settings JSON")?;

    let mut overrides = OverrideMap::with_capacity(raw.len());
    for (key, raw_value) in raw {
        let id = match key.parse::<SettingId>() {
            Ok(id) => id,
            Err(e) => {
                warn!(key = %key, error = %e, "Ignoring stored value for unknown setting");
                continue;
            }
        };
        let value = match serde_json::from_value::<SettingValue>(raw_value) {
            Ok(value) => value,
            Err(e) => {
                warn!(setting = %id, error = %e, "Ignoring stored value that is not a setting value");
                continue;
            }
        };
        let descriptor = catalog.descriptor(id);
        if !descriptor.accepts(&value) {
            warn!(
                setting = %id,
                expected = %descriptor.kind,
                found = %value.kind(),
                "Ignoring stored value of the wrong type"
            );
            continue;
        }
        overrides.insert(id, value);
    }
    Ok(overrides)
}

/// Owns the override map and its persistence
pub struct SettingsStore {
    catalog: Rc<Catalog>,
    overrides: OverrideMap,
    storage: Box<dyn Storage>,
}

impl SettingsStore {
    /// Build a store, restoring overrides from `storage`
    ///
    /// Missing, unreadable or malformed stored data yields an empty override map.
    pub fn new(catalog: Rc<Catalog>, storage: Box<dyn Storage>) -> Self {
        let overrides = Self::load(&catalog, storage.as_ref());
        Self {
            catalog,
            overrides,
            storage,
        }
    }

    fn load(catalog: &Catalog, storage: &dyn Storage) -> OverrideMap {
        let blob = match storage.get_item(SETTINGS_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("No saved settings, using defaults");
                return OverrideMap::new();
            }
            Err(e) => {
                warn!(error = ?e, "Settings storage unavailable, using defaults");
                return OverrideMap::new();
            }
        };

        match decode_overrides(catalog, &blob) {
            Ok(overrides) => {
                info!(count = overrides.len(), "Loaded saved settings");
                overrides
            }
            Err(e) => {
                warn!(error = ?e, "Saved settings are corrupt, using defaults");
                OverrideMap::new()
            }
        }
    }

    fn save(&self) {
        let result = encode_overrides(&self.overrides)
            .and_then(|blob| self.storage.set_item(SETTINGS_KEY, &blob));
        // Overrides still apply for this session; they just won't survive a restart
        if let Err(e) = result {
            warn!(error = ?e, "Failed to persist settings");
        }
    }

    pub fn catalog(&self) -> &Rc<Catalog> {
        &self.catalog
    }

    pub fn descriptor(&self, id: SettingId) -> &SettingDescriptor {
        self.catalog.descriptor(id)
    }

    /// Current value: the override if one exists, the catalog default otherwise
    pub fn get_value(&self, id: SettingId) -> &SettingValue {
        self.overrides
            .get(&id)
            .unwrap_or(&self.catalog.descriptor(id).default_value)
    }

    /// Store an override and persist the full override map
    pub fn set_value(&mut self, id: SettingId, value: SettingValue) {
        debug_assert!(
            self.catalog.descriptor(id).accepts(&value),
            "setting {id} expects a {} value, got {value:?}",
            self.catalog.descriptor(id).kind
        );
        info!(setting = %id, value = %value, "Setting changed");
        self.overrides.insert(id, value);
        self.save();
    }

    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    pub fn is_overridden(&self, id: SettingId) -> bool {
        self.overrides.contains_key(&id)
    }

    /// Current value of a number setting
    pub fn number(&self, id: SettingId) -> f64 {
        match self.get_value(id).as_number() {
            Some(n) => n,
            None => self.fallback(id, SettingValue::as_number),
        }
    }

    /// Current value of a boolean setting
    pub fn boolean(&self, id: SettingId) -> bool {
        match self.get_value(id).as_bool() {
            Some(b) => b,
            None => self.fallback(id, SettingValue::as_bool),
        }
    }

    /// Current value of an enum setting
    pub fn text(&self, id: SettingId) -> String {
        match self.get_value(id).as_str() {
            Some(s) => s.to_string(),
            None => self.fallback(id, |v| v.as_str().map(str::to_string)),
        }
    }

    /// Catalog default for a typed accessor whose override had the wrong kind,
    /// or whose id was asked for with the wrong accessor
    fn fallback<T: Default>(&self, id: SettingId, extract: impl Fn(&SettingValue) -> Option<T>) -> T {
        let descriptor = self.catalog.descriptor(id);
        error!(
            setting = %id,
            kind = %descriptor.kind,
            value = ?self.get_value(id),
            "Setting read with mismatched type, using default"
        );
        extract(&descriptor.default_value).unwrap_or_default()
    }
}

/// Shared single-threaded handle to a [`SettingsStore`]
///
/// The ad workflow and the configuration surface both hold one. Borrows are
/// never kept across an await point.
#[derive(Clone)]
pub struct SharedSettings(Rc<RefCell<SettingsStore>>);

impl SharedSettings {
    pub fn new(store: SettingsStore) -> Self {
        Self(Rc::new(RefCell::new(store)))
    }

    pub fn catalog(&self) -> Rc<Catalog> {
        Rc::clone(self.0.borrow().catalog())
    }

    pub fn get_value(&self, id: SettingId) -> SettingValue {
        self.0.borrow().get_value(id).clone()
    }

    pub fn set_value(&self, id: SettingId, value: SettingValue) {
        self.0.borrow_mut().set_value(id, value);
    }

    pub fn number(&self, id: SettingId) -> f64 {
        self.0.borrow().number(id)
    }

    pub fn boolean(&self, id: SettingId) -> bool {
        self.0.borrow().boolean(id)
    }

    pub fn text(&self, id: SettingId) -> String {
        self.0.borrow().text(id)
    }

    pub fn is_overridden(&self, id: SettingId) -> bool {
        self.0.borrow().is_overridden(id)
    }

    /// Hand this store to a configuration surface as its data source and sink
    pub fn open_editor(&self, surface: &mut dyn ConfigurationSurface) {
        if let Err(e) = surface.open(self.clone()) {
            error!(error = ?e, "Failed to open settings editor");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::catalog::CatalogProfile;
    use crate::settings::storage::MemoryStorage;

    fn store_with(storage: &MemoryStorage) -> SettingsStore {
        SettingsStore::new(Rc::new(Catalog::default()), Box::new(storage.clone()))
    }

    fn sample_value(id: SettingId) -> SettingValue {
        match id {
            SettingId::FullScreenAdResult => SettingValue::from("adblocker"),
            SettingId::RewardedAdResult => SettingValue::from("user-dismissed"),
            SettingId::FullScreenAdTimeConstraint => SettingValue::Number(5.0),
            SettingId::FullScreenAdTimeConstraintOnPageLoad => SettingValue::Boolean(true),
            SettingId::FullScreenAdPauseDuration => SettingValue::Number(800.0),
            SettingId::FullScreenAdMuteDuration => SettingValue::Number(250.5),
            SettingId::BannerAdsSupported => SettingValue::Boolean(false),
        }
    }

    #[test]
    fn test_get_value_returns_defaults_before_any_set() {
        let store = store_with(&MemoryStorage::new());
        for descriptor in store.catalog().iter() {
            let value = store.get_value(descriptor.id);
            assert_eq!(value, &descriptor.default_value);
            assert_eq!(value.kind(), descriptor.kind);
        }
        assert!(store.overrides().is_empty());
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let mut store = store_with(&MemoryStorage::new());
        for id in SettingId::ALL {
            store.set_value(id, sample_value(id));
            assert_eq!(store.get_value(id), &sample_value(id));
            assert!(store.is_overridden(id));
        }
    }

    #[test]
    fn test_set_value_persists_full_map() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);

        store.set_value(SettingId::FullScreenAdTimeConstraint, SettingValue::Number(5.0));
        store.set_value(SettingId::FullScreenAdResult, SettingValue::from("adblocker"));

        let blob = storage.get(SETTINGS_KEY).unwrap();
        assert_eq!(blob, r#"{"fullScreenAdResult":"adblocker","fullScreenAdTimeConstraint":5.0}"#);
    }

    #[test]
    fn test_overrides_survive_restart() {
        let storage = MemoryStorage::new();
        {
            let mut store = store_with(&storage);
            for id in SettingId::ALL {
                store.set_value(id, sample_value(id));
            }
        }

        let restored = store_with(&storage);
        for id in SettingId::ALL {
            assert_eq!(restored.get_value(id), &sample_value(id));
        }
    }

    #[test]
    fn test_encode_decode_mixed_types_roundtrip() {
        let catalog = Catalog::default();
        let mut overrides = OverrideMap::new();
        overrides.insert(SettingId::FullScreenAdMuteDuration, SettingValue::Number(125.25));
        overrides.insert(SettingId::FullScreenAdTimeConstraintOnPageLoad, SettingValue::Boolean(true));
        overrides.insert(SettingId::RewardedAdResult, SettingValue::from("time-constraint"));

        let blob = encode_overrides(&overrides).unwrap();
        assert_eq!(decode_overrides(&catalog, &blob).unwrap(), overrides);
    }

    #[test]
    fn test_decode_accepts_integer_numbers() {
        let catalog = Catalog::default();
        let overrides = decode_overrides(&catalog, r#"{"fullScreenAdPauseDuration":2000}"#).unwrap();
        assert_eq!(
            overrides.get(&SettingId::FullScreenAdPauseDuration),
            Some(&SettingValue::Number(2000.0))
        );
    }

    #[test]
    fn test_corrupt_storage_yields_defaults() {
        for blob in ["{not json", "[1, 2, 3]", "\"just a string\"", ""] {
            let storage = MemoryStorage::new();
            storage.insert(SETTINGS_KEY, blob);
            let store = store_with(&storage);

            assert!(store.overrides().is_empty(), "blob {blob:?} should load as empty");
            assert_eq!(store.number(SettingId::FullScreenAdPauseDuration), 1500.0);
        }
    }

    #[test]
    fn test_unknown_and_mistyped_entries_are_dropped_on_load() {
        let storage = MemoryStorage::new();
        storage.insert(
            SETTINGS_KEY,
            r#"{"showInterstitialResult":"success","fullScreenAdMuteDuration":"loud","fullScreenAdPauseDuration":900}"#,
        );
        let store = store_with(&storage);

        assert_eq!(store.overrides().len(), 1);
        assert_eq!(store.number(SettingId::FullScreenAdPauseDuration), 900.0);
        assert_eq!(store.number(SettingId::FullScreenAdMuteDuration), 500.0);
    }

    #[test]
    fn test_unrepresentable_entries_do_not_discard_valid_overrides() {
        let blobs = [
            r#"{"fullScreenAdTimeConstraint":5,"futureSetting":{"nested":1}}"#,
            r#"{"fullScreenAdTimeConstraint":5,"fullScreenAdMuteDuration":null}"#,
            r#"{"fullScreenAdTimeConstraint":5,"fullScreenAdResult":["adblocker"]}"#,
            r#"{"fullScreenAdTimeConstraint":5,"rewardedAdResult":{"value":"adblocker"}}"#,
        ];
        for blob in blobs {
            let storage = MemoryStorage::new();
            storage.insert(SETTINGS_KEY, blob);
            let store = store_with(&storage);

            assert_eq!(store.overrides().len(), 1, "blob {blob}");
            assert_eq!(store.number(SettingId::FullScreenAdTimeConstraint), 5.0, "blob {blob}");
        }
    }

    #[test]
    fn test_non_finite_numbers_are_not_persisted() {
        let catalog = Catalog::default();
        let mut overrides = OverrideMap::new();
        overrides.insert(SettingId::FullScreenAdTimeConstraint, SettingValue::Number(5.0));
        overrides.insert(SettingId::FullScreenAdMuteDuration, SettingValue::Number(f64::NAN));
        overrides.insert(SettingId::FullScreenAdPauseDuration, SettingValue::Number(f64::INFINITY));

        let blob = encode_overrides(&overrides).unwrap();
        assert_eq!(blob, r#"{"fullScreenAdTimeConstraint":5.0}"#);

        let decoded = decode_overrides(&catalog, &blob).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(
            decoded.get(&SettingId::FullScreenAdTimeConstraint),
            Some(&SettingValue::Number(5.0))
        );
    }

    #[test]
    fn test_persistence_failure_is_not_surfaced() {
        let storage = MemoryStorage::new();
        storage.set_reject_writes(true);
        let mut store = store_with(&storage);

        store.set_value(SettingId::FullScreenAdTimeConstraint, SettingValue::Number(10.0));

        // Still applies for this session
        assert_eq!(store.number(SettingId::FullScreenAdTimeConstraint), 10.0);
        // But nothing reached storage, so a restart falls back to the default
        assert_eq!(storage.get(SETTINGS_KEY), None);
        assert_eq!(store_with(&storage).number(SettingId::FullScreenAdTimeConstraint), 60.0);
    }

    #[test]
    fn test_typed_accessors() {
        let store = SettingsStore::new(
            Rc::new(Catalog::new(CatalogProfile::Development)),
            Box::new(MemoryStorage::new()),
        );
        assert_eq!(store.number(SettingId::FullScreenAdTimeConstraint), 5.0);
        assert!(!store.boolean(SettingId::FullScreenAdTimeConstraintOnPageLoad));
        assert_eq!(store.text(SettingId::FullScreenAdResult), "success");
    }

    #[test]
    fn test_shared_settings_see_each_others_writes() {
        let shared = SharedSettings::new(store_with(&MemoryStorage::new()));
        let other = shared.clone();

        other.set_value(SettingId::BannerAdsSupported, SettingValue::Boolean(false));
        assert!(!shared.boolean(SettingId::BannerAdsSupported));
        assert!(shared.is_overridden(SettingId::BannerAdsSupported));
    }

    struct CountingSurface {
        opened: usize,
        fail: bool,
    }

    impl ConfigurationSurface for CountingSurface {
        fn open(&mut self, settings: SharedSettings) -> Result<()> {
            self.opened += 1;
            if self.fail {
                anyhow::bail!("no display");
            }
            settings.set_value(SettingId::FullScreenAdMuteDuration, SettingValue::Number(42.0));
            Ok(())
        }
    }

    #[test]
    fn test_open_editor_hands_store_to_surface() {
        let shared = SharedSettings::new(store_with(&MemoryStorage::new()));
        let mut surface = CountingSurface { opened: 0, fail: false };

        shared.open_editor(&mut surface);

        assert_eq!(surface.opened, 1);
        assert_eq!(shared.number(SettingId::FullScreenAdMuteDuration), 42.0);
    }

    #[test]
    fn test_open_editor_swallows_surface_errors() {
        let shared = SharedSettings::new(store_with(&MemoryStorage::new()));
        let mut surface = CountingSurface { opened: 0, fail: true };

        shared.open_editor(&mut surface);

        assert_eq!(surface.opened, 1);
        assert!(!shared.is_overridden(SettingId::FullScreenAdMuteDuration));
    }
}
