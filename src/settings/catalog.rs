//! Static description of every configurable setting
//!
//! The catalog is built once per process from a [`CatalogProfile`] and never
//! mutated afterwards. Every [`SettingId`] has exactly one descriptor; the
//! exhaustive match in [`descriptor_for`] keeps that true at compile time.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a setting, persisted as its camelCase key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingId {
    FullScreenAdResult,
    RewardedAdResult,
    FullScreenAdTimeConstraint,
    FullScreenAdTimeConstraintOnPageLoad,
    FullScreenAdPauseDuration,
    FullScreenAdMuteDuration,
    BannerAdsSupported,
}

impl SettingId {
    /// All ids in catalog order (the order the editor lists them)
    pub const ALL: [SettingId; 7] = [
        SettingId::FullScreenAdResult,
        SettingId::RewardedAdResult,
        SettingId::FullScreenAdTimeConstraint,
        SettingId::FullScreenAdTimeConstraintOnPageLoad,
        SettingId::FullScreenAdPauseDuration,
        SettingId::FullScreenAdMuteDuration,
        SettingId::BannerAdsSupported,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingId::FullScreenAdResult => "fullScreenAdResult",
            SettingId::RewardedAdResult => "rewardedAdResult",
            SettingId::FullScreenAdTimeConstraint => "fullScreenAdTimeConstraint",
            SettingId::FullScreenAdTimeConstraintOnPageLoad => "fullScreenAdTimeConstraintOnPageLoad",
            SettingId::FullScreenAdPauseDuration => "fullScreenAdPauseDuration",
            SettingId::FullScreenAdMuteDuration => "fullScreenAdMuteDuration",
            SettingId::BannerAdsSupported => "bannerAdsSupported",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingId {
    type Err = anyhow::Error;

    /// Unknown ids are a caller bug; the error names the offending key
    fn from_str(s: &str) -> Result<Self> {
        match SettingId::ALL.into_iter().find(|id| id.as_str() == s) {
            Some(id) => Ok(id),
            None => bail!("Unknown setting id '{s}'"),
        }
    }
}

/// Declared value type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Number,
    Boolean,
    Enum,
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingKind::Number => "number",
            SettingKind::Boolean => "boolean",
            SettingKind::Enum => "enum",
        };
        f.write_str(name)
    }
}

/// A setting value tagged with its kind
///
/// Serialized untagged so the persisted blob holds plain JSON numbers,
/// booleans and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Boolean(bool),
    Number(f64),
    Enum(String),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Boolean(_) => SettingKind::Boolean,
            SettingValue::Number(_) => SettingKind::Number,
            SettingValue::Enum(_) => SettingKind::Enum,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SettingValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Enum(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Boolean(b) => write!(f, "{b}"),
            SettingValue::Number(n) => write!(f, "{n}"),
            SettingValue::Enum(s) => f.write_str(s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Boolean(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Number(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Enum(value.to_string())
    }
}

/// Immutable metadata for one setting
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDescriptor {
    pub id: SettingId,
    pub label: &'static str,
    pub description: &'static str,
    pub kind: SettingKind,
    pub default_value: SettingValue,
    /// Allowed values for enum settings; `None` means free-form text
    pub options: Option<&'static [&'static str]>,
}

impl SettingDescriptor {
    /// Whether `value` has the kind this descriptor declares
    pub fn accepts(&self, value: &SettingValue) -> bool {
        value.kind() == self.kind
    }
}

/// Which set of defaults the catalog is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogProfile {
    /// Defaults matching a production ad network
    #[default]
    Standard,
    /// Shorter time constraint for quick iteration
    Development,
}

impl CatalogProfile {
    fn full_screen_time_constraint(self) -> f64 {
        match self {
            CatalogProfile::Standard => 60.0,
            CatalogProfile::Development => 5.0,
        }
    }
}

impl FromStr for CatalogProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(CatalogProfile::Standard),
            "development" | "dev" => Ok(CatalogProfile::Development),
            other => bail!("Unknown catalog profile '{other}' (expected 'standard' or 'development')"),
        }
    }
}

const FULL_SCREEN_RESULT_OPTIONS: &[&str] = &["success", "adblocker", "not-supported", "time-constraint"];
const REWARDED_RESULT_OPTIONS: &[&str] = &[
    "success",
    "user-dismissed",
    "adblocker",
    "not-supported",
    "time-constraint",
];

fn descriptor_for(id: SettingId, profile: CatalogProfile) -> SettingDescriptor {
    let (label, description, default_value, options) = match id {
        SettingId::FullScreenAdResult => (
            "showFullScreenAd result",
            "The result that should be returned by a showFullScreenAd() call.\n\
             'success' will result in the call succeeding without any errors.\n\
             Any of the other options will result in an error of that type.\n\
             Additionally, 'not-supported' removes full screen ads from the plugin, but requires a restart.",
            SettingValue::from("success"),
            Some(FULL_SCREEN_RESULT_OPTIONS),
        ),
        SettingId::RewardedAdResult => (
            "showRewardedAd result",
            "The result that should be returned by a showRewardedAd() call.\n\
             'success' will result in the call succeeding without any errors.\n\
             Any of the other options will result in an error of that type.\n\
             Additionally, 'not-supported' removes rewarded ads from the plugin, but requires a restart.",
            SettingValue::from("success"),
            Some(REWARDED_RESULT_OPTIONS),
        ),
        SettingId::FullScreenAdTimeConstraint => (
            "showFullScreenAd time constraint",
            "Time in seconds indicating how frequently full screen ads may be shown.\n\
             If a call to showFullScreenAd() is made before the timer has finished,\n\
             no ad will be shown.",
            SettingValue::Number(profile.full_screen_time_constraint()),
            None,
        ),
        SettingId::FullScreenAdTimeConstraintOnPageLoad => (
            "time constraint on start",
            "Start the showFullScreenAd time constraint timer on startup,\n\
             so the first full screen ad is also rejected until it has finished.",
            SettingValue::Boolean(false),
            None,
        ),
        SettingId::FullScreenAdPauseDuration => (
            "needsPause duration",
            "How long needsPause will be true during ads in milliseconds.",
            SettingValue::Number(1500.0),
            None,
        ),
        SettingId::FullScreenAdMuteDuration => (
            "needsMute duration",
            "How long needsMute will be true during ads in milliseconds.",
            SettingValue::Number(500.0),
            None,
        ),
        SettingId::BannerAdsSupported => (
            "banner ads supported",
            "Whether showBannerAd() is available. Requires a restart.",
            SettingValue::Boolean(true),
            None,
        ),
    };

    SettingDescriptor {
        id,
        label,
        description,
        kind: default_value.kind(),
        default_value,
        options,
    }
}

/// Read-only mapping from [`SettingId`] to its descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    profile: CatalogProfile,
    descriptors: Vec<SettingDescriptor>,
}

impl Catalog {
    pub fn new(profile: CatalogProfile) -> Self {
        let descriptors: Vec<SettingDescriptor> = SettingId::ALL
            .into_iter()
            .map(|id| descriptor_for(id, profile))
            .collect();

        debug_assert!(descriptors.iter().all(|d| {
            d.default_value.kind() == d.kind
                && match (d.options, &d.default_value) {
                    (Some(options), SettingValue::Enum(value)) => options.contains(&value.as_str()),
                    (Some(_), _) => false,
                    (None, _) => true,
                }
        }));

        Self { profile, descriptors }
    }

    pub fn profile(&self) -> CatalogProfile {
        self.profile
    }

    pub fn descriptor(&self, id: SettingId) -> &SettingDescriptor {
        &self.descriptors[id.index()]
    }

    /// Descriptors in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &SettingDescriptor> {
        self.descriptors.iter()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CatalogProfile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_has_matching_descriptor() {
        let catalog = Catalog::default();
        for id in SettingId::ALL {
            assert_eq!(catalog.descriptor(id).id, id);
        }
        assert_eq!(catalog.iter().count(), SettingId::ALL.len());
    }

    #[test]
    fn test_default_kinds_match_declared_kinds() {
        for profile in [CatalogProfile::Standard, CatalogProfile::Development] {
            let catalog = Catalog::new(profile);
            for descriptor in catalog.iter() {
                assert_eq!(descriptor.default_value.kind(), descriptor.kind, "{}", descriptor.id);
                if let Some(options) = descriptor.options {
                    let default = descriptor.default_value.as_str().unwrap();
                    assert!(options.contains(&default), "{} default not in options", descriptor.id);
                }
            }
        }
    }

    #[test]
    fn test_required_defaults() {
        let catalog = Catalog::default();
        let value = |id| catalog.descriptor(id).default_value.clone();

        assert_eq!(value(SettingId::FullScreenAdResult), SettingValue::from("success"));
        assert_eq!(value(SettingId::RewardedAdResult), SettingValue::from("success"));
        assert_eq!(value(SettingId::FullScreenAdTimeConstraint), SettingValue::Number(60.0));
        assert_eq!(value(SettingId::FullScreenAdTimeConstraintOnPageLoad), SettingValue::Boolean(false));
        assert_eq!(value(SettingId::FullScreenAdPauseDuration), SettingValue::Number(1500.0));
        assert_eq!(value(SettingId::FullScreenAdMuteDuration), SettingValue::Number(500.0));
        assert_eq!(value(SettingId::BannerAdsSupported), SettingValue::Boolean(true));
    }

    #[test]
    fn test_development_profile_shortens_time_constraint() {
        let catalog = Catalog::new(CatalogProfile::Development);
        assert_eq!(
            catalog.descriptor(SettingId::FullScreenAdTimeConstraint).default_value,
            SettingValue::Number(5.0)
        );
    }

    #[test]
    fn test_rewarded_options_include_user_dismissed() {
        let catalog = Catalog::default();
        let rewarded = catalog.descriptor(SettingId::RewardedAdResult).options.unwrap();
        let full_screen = catalog.descriptor(SettingId::FullScreenAdResult).options.unwrap();
        assert!(rewarded.contains(&"user-dismissed"));
        assert!(!full_screen.contains(&"user-dismissed"));
    }

    #[test]
    fn test_setting_id_string_roundtrip() {
        for id in SettingId::ALL {
            assert_eq!(id.as_str().parse::<SettingId>().unwrap(), id);
            // serde key must agree with as_str
            assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_unknown_setting_id_fails() {
        let err = "showInterstitial".parse::<SettingId>().unwrap_err();
        assert!(err.to_string().contains("showInterstitial"));
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("Standard".parse::<CatalogProfile>().unwrap(), CatalogProfile::Standard);
        assert_eq!("dev".parse::<CatalogProfile>().unwrap(), CatalogProfile::Development);
        assert!("fast".parse::<CatalogProfile>().is_err());
    }
}
