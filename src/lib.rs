//! Dummy ad provider for exercising ad integrations during development
//!
//! Simulates full-screen, rewarded and banner ads whose outcomes are chosen
//! through persisted developer settings.

#![forbid(unsafe_code)]

pub mod ads;
pub mod config;
pub mod constants;
pub mod gui;
pub mod settings;

pub use ads::{AdPlugin, HostContext, RejectReason, ShowAdResult};
pub use config::AppConfig;
pub use settings::{Catalog, SettingId, SettingValue, SettingsStore, SharedSettings};
