//! Configuration surfaces for editing settings
//!
//! - **editor_window**: egui window running in this process
//! - **editor_process**: the same window started as a child process

pub mod components;
pub mod constants;
mod editor_process;
mod editor_window;

use anyhow::Result;

use crate::settings::SharedSettings;

pub use editor_process::{EditorCommand, EditorProcess, EditorStatus};
pub use editor_window::EguiSurface;

/// Presents settings to the user and writes edits back through `settings`
pub trait ConfigurationSurface {
    fn open(&mut self, settings: SharedSettings) -> Result<()>;
}
