//! Settings for the dummy ad provider
//!
//! - **catalog**: immutable descriptors (id, label, kind, default, options)
//! - **storage**: durable key-value backends
//! - **store**: override map with persistence, shared handle for the plugin
//! - **edit**: validation boundary for editor input

pub mod catalog;
pub mod edit;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogProfile, SettingDescriptor, SettingId, SettingKind, SettingValue};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{SettingsStore, SharedSettings};
