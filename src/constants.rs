//! Application-wide constants
//!
//! Storage keys, environment variable names and plugin metadata live here so
//! the settings store, the ad workflow and the CLI agree on them.

/// Durable storage constants
pub mod storage {
    /// Key under which the override map is persisted
    pub const SETTINGS_KEY: &str = "adLadDummySettings";

    /// Directory name under the user's config dir
    pub const APP_DIR: &str = "adlad-dummy";

    /// Extension of the file backing each storage key
    pub const FILE_EXTENSION: &str = "json";
}

/// Environment variables read by [`crate::config::AppConfig`]
pub mod env {
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const PROFILE: &str = "ADLAD_DUMMY_PROFILE";
    pub const STORAGE_DIR: &str = "ADLAD_DUMMY_STORAGE_DIR";
}

/// Plugin metadata reported to the host
pub mod plugin {
    pub const NAME: &str = "dummy";

    /// The plugin toggles needsMute itself during playback
    pub const MANUAL_NEEDS_MUTE: bool = true;

    /// The plugin toggles needsPause itself during playback
    pub const MANUAL_NEEDS_PAUSE: bool = true;
}

/// Overlay titles shown while an ad plays
pub mod overlay {
    pub const FULL_SCREEN_TITLE: &str = "Full Screen Ad";
    pub const REWARDED_TITLE: &str = "Rewarded Ad";
}

/// Banner placeholder constants
pub mod banner {
    /// Appended to the slot id to build the SVG mask id
    pub const MASK_SUFFIX: &str = "-ad-placeholder-mask";

    /// Label drawn in the middle of the placeholder
    pub const LABEL: &str = "AD";

    /// Approximate extents of the bold 15px label, used for the text cut-out
    pub const LABEL_WIDTH: f64 = 24.0;
    pub const LABEL_HEIGHT: f64 = 18.0;
}

/// Editor process wiring
pub mod editor {
    /// Subcommand the editor child process is started with
    pub const SUBCOMMAND: &str = "configure";
}
