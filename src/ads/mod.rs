//! Simulated ad calls
//!
//! [`AdPlugin`] decides once, at construction, which capabilities exist:
//! a capability whose result setting is `not-supported` (or, for banners,
//! whose support flag is off) is simply absent. Each call then resolves to
//! [`ShowAdResult::Shown`] after running the mute/pause schedule, or to
//! [`ShowAdResult::Rejected`] immediately. Rejections are values, not errors.

pub mod banner;
pub mod host;
pub mod schedule;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::constants::{overlay, plugin};
use crate::gui::ConfigurationSurface;
use crate::settings::{SettingId, SharedSettings};

pub use banner::BannerSlot;
pub use host::{HostContext, Signal, TracingHost};
pub use schedule::SignalPlan;

/// Why a simulated ad was not shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    UserDismissed,
    Adblocker,
    NotSupported,
    TimeConstraint,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::UserDismissed => "user-dismissed",
            RejectReason::Adblocker => "adblocker",
            RejectReason::NotSupported => "not-supported",
            RejectReason::TimeConstraint => "time-constraint",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome configured for an ad kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredOutcome {
    Success,
    Reject(RejectReason),
}

impl FromStr for DesiredOutcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let outcome = match s {
            "success" => DesiredOutcome::Success,
            "user-dismissed" => DesiredOutcome::Reject(RejectReason::UserDismissed),
            "adblocker" => DesiredOutcome::Reject(RejectReason::Adblocker),
            "not-supported" => DesiredOutcome::Reject(RejectReason::NotSupported),
            "time-constraint" => DesiredOutcome::Reject(RejectReason::TimeConstraint),
            other => anyhow::bail!("Unknown ad outcome '{other}'"),
        };
        Ok(outcome)
    }
}

/// Result of a show call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowAdResult {
    Shown,
    Rejected(RejectReason),
}

impl ShowAdResult {
    pub fn shown(&self) -> bool {
        matches!(self, ShowAdResult::Shown)
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            ShowAdResult::Shown => None,
            ShowAdResult::Rejected(reason) => Some(*reason),
        }
    }
}

/// `{"shown":true}` or `{"shown":false,"reason":"..."}`
impl Serialize for ShowAdResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ShowAdResult::Shown => {
                let mut s = serializer.serialize_struct("ShowAdResult", 1)?;
                s.serialize_field("shown", &true)?;
                s.end()
            }
            ShowAdResult::Rejected(reason) => {
                let mut s = serializer.serialize_struct("ShowAdResult", 2)?;
                s.serialize_field("shown", &false)?;
                s.serialize_field("reason", reason)?;
                s.end()
            }
        }
    }
}

/// State shared by every capability of one plugin instance
struct AdSession {
    settings: SharedSettings,
    host: Rc<dyn HostContext>,
    surface: RefCell<Box<dyn ConfigurationSurface>>,
    /// `None` until an ad was shown: the first call is always allowed
    last_shown: Cell<Option<Instant>>,
    /// Overlays currently on screen; concurrent calls each open one
    overlays_open: Cell<usize>,
}

impl AdSession {
    fn desired_outcome(&self, id: SettingId) -> DesiredOutcome {
        let value = self.settings.text(id);
        match value.parse() {
            Ok(outcome) => outcome,
            Err(e) => {
                let default = self.settings.catalog().descriptor(id).default_value.to_string();
                warn!(setting = %id, value = %value, error = %e, "Unknown ad outcome, using default");
                default.parse().unwrap_or(DesiredOutcome::Success)
            }
        }
    }

    fn time_constraint_active(&self) -> bool {
        let Some(last) = self.last_shown.get() else {
            return false;
        };
        let seconds = self.settings.number(SettingId::FullScreenAdTimeConstraint);
        let constraint = schedule::millis_to_duration(seconds * 1000.0);
        let since = last.elapsed();
        debug!(since_ms = since.as_millis() as u64, constraint_ms = constraint.as_millis() as u64, "Checking time constraint");
        since < constraint
    }

    /// Resolve the configured outcome and, on success, play the ad
    async fn run(&self, id: SettingId, title: &str) -> ShowAdResult {
        match self.desired_outcome(id) {
            DesiredOutcome::Reject(reason) => {
                info!(title, reason = %reason, "Simulated ad rejected");
                ShowAdResult::Rejected(reason)
            }
            DesiredOutcome::Success => {
                let plan = SignalPlan::from_millis(
                    self.settings.number(SettingId::FullScreenAdMuteDuration),
                    self.settings.number(SettingId::FullScreenAdPauseDuration),
                );
                self.overlays_open.set(self.overlays_open.get() + 1);
                schedule::play(self.host.as_ref(), title, plan).await;
                self.overlays_open.set(self.overlays_open.get() - 1);
                self.last_shown.set(Some(Instant::now()));
                info!(title, "Simulated ad shown");
                ShowAdResult::Shown
            }
        }
    }

    /// Open the editor; a no-op while it is already being presented
    fn configure(&self) {
        match self.surface.try_borrow_mut() {
            Ok(mut surface) => self.settings.open_editor(&mut **surface),
            Err(_) => debug!("Settings editor already open"),
        }
    }
}

/// Full-screen (interstitial) ads, subject to the time constraint
pub struct FullScreenAds {
    session: Rc<AdSession>,
}

impl FullScreenAds {
    pub async fn show(&self) -> ShowAdResult {
        if self.session.time_constraint_active() {
            info!("Full screen ad rejected by time constraint");
            return ShowAdResult::Rejected(RejectReason::TimeConstraint);
        }
        self.session
            .run(SettingId::FullScreenAdResult, overlay::FULL_SCREEN_TITLE)
            .await
    }
}

/// Rewarded ads; not subject to the time constraint but restart it when shown
pub struct RewardedAds {
    session: Rc<AdSession>,
}

impl RewardedAds {
    pub async fn show(&self) -> ShowAdResult {
        self.session
            .run(SettingId::RewardedAdResult, overlay::REWARDED_TITLE)
            .await
    }
}

/// Banner placeholders; clicking one opens the settings editor
pub struct BannerAds {
    session: Rc<AdSession>,
    active: RefCell<HashMap<String, BannerSlot>>,
}

impl BannerAds {
    /// Render the placeholder for `slot` and register it for clicks
    pub fn show(&self, slot: &BannerSlot) -> String {
        info!(id = %slot.id, width = slot.width, height = slot.height, "Showing banner ad");
        self.active.borrow_mut().insert(slot.id.clone(), slot.clone());
        banner::render_placeholder(slot)
    }

    /// Unregister a banner; returns whether it was shown
    pub fn destroy(&self, id: &str) -> bool {
        let removed = self.active.borrow_mut().remove(id).is_some();
        if removed {
            info!(id, "Destroyed banner ad");
        } else {
            warn!(id, "Destroy requested for unknown banner");
        }
        removed
    }

    /// Handle a click on a banner; destroyed banners ignore clicks
    pub fn click(&self, id: &str) {
        if self.active.borrow().contains_key(id) {
            self.session.configure();
        } else {
            debug!(id, "Click on inactive banner ignored");
        }
    }

    pub fn active_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.active.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// The dummy ad provider
pub struct AdPlugin {
    session: Rc<AdSession>,
    full_screen: Option<FullScreenAds>,
    rewarded: Option<RewardedAds>,
    banner: Option<BannerAds>,
}

impl AdPlugin {
    /// Build the plugin from the current settings
    ///
    /// Capability availability and the initial time-constraint timestamp are
    /// fixed here; later setting changes don't add or remove capabilities.
    pub fn new(
        settings: SharedSettings,
        host: Rc<dyn HostContext>,
        surface: Box<dyn ConfigurationSurface>,
    ) -> Self {
        let last_shown = if settings.boolean(SettingId::FullScreenAdTimeConstraintOnPageLoad) {
            Some(Instant::now())
        } else {
            None
        };

        let session = Rc::new(AdSession {
            settings,
            host,
            surface: RefCell::new(surface),
            last_shown: Cell::new(last_shown),
            overlays_open: Cell::new(0),
        });

        let supported = |id: SettingId| {
            session.desired_outcome(id) != DesiredOutcome::Reject(RejectReason::NotSupported)
        };

        let full_screen = supported(SettingId::FullScreenAdResult).then(|| FullScreenAds {
            session: Rc::clone(&session),
        });
        let rewarded = supported(SettingId::RewardedAdResult).then(|| RewardedAds {
            session: Rc::clone(&session),
        });
        let banner = session
            .settings
            .boolean(SettingId::BannerAdsSupported)
            .then(|| BannerAds {
                session: Rc::clone(&session),
                active: RefCell::new(HashMap::new()),
            });

        info!(
            full_screen = full_screen.is_some(),
            rewarded = rewarded.is_some(),
            banner = banner.is_some(),
            time_constraint_on_start = last_shown.is_some(),
            "Initialized dummy ad plugin"
        );

        Self {
            session,
            full_screen,
            rewarded,
            banner,
        }
    }

    pub fn name(&self) -> &'static str {
        plugin::NAME
    }

    pub fn manual_needs_mute(&self) -> bool {
        plugin::MANUAL_NEEDS_MUTE
    }

    pub fn manual_needs_pause(&self) -> bool {
        plugin::MANUAL_NEEDS_PAUSE
    }

    pub fn full_screen_ads(&self) -> Option<&FullScreenAds> {
        self.full_screen.as_ref()
    }

    pub fn rewarded_ads(&self) -> Option<&RewardedAds> {
        self.rewarded.as_ref()
    }

    pub fn banner_ads(&self) -> Option<&BannerAds> {
        self.banner.as_ref()
    }

    /// Open (or keep open) the settings editor
    pub fn configure(&self) {
        self.session.configure();
    }

    /// Handle a click on the ad overlay; opens the editor while an ad is
    /// playing and returns whether it did
    pub fn click_overlay(&self) -> bool {
        if self.session.overlays_open.get() == 0 {
            debug!("Overlay click with no ad playing ignored");
            return false;
        }
        self.session.configure();
        true
    }

    /// Time left before another full-screen ad may be shown
    pub fn time_constraint_remaining(&self) -> Duration {
        let Some(last) = self.session.last_shown.get() else {
            return Duration::ZERO;
        };
        let seconds = self.session.settings.number(SettingId::FullScreenAdTimeConstraint);
        schedule::millis_to_duration(seconds * 1000.0).saturating_sub(last.elapsed())
    }
}
