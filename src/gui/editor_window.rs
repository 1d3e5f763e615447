//! In-process settings window implemented with egui/eframe

use anyhow::{anyhow, Result};
use eframe::{egui, CreationContext, NativeOptions};
use tracing::info;

use super::components::settings_editor::{self, SettingsEditorState};
use super::constants::*;
use super::ConfigurationSurface;
use crate::settings::SharedSettings;

struct SettingsWindowApp {
    settings: SharedSettings,
    state: SettingsEditorState,
    changes: usize,
}

impl SettingsWindowApp {
    fn new(_cc: &CreationContext<'_>, settings: SharedSettings) -> Self {
        info!("Initializing settings window");
        Self {
            settings,
            state: SettingsEditorState::new(),
            changes: 0,
        }
    }
}

impl eframe::App for SettingsWindowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(WINDOW_TITLE);
            ui.add_space(SECTION_SPACING);

            egui::ScrollArea::vertical().show(ui, |ui| {
                if settings_editor::ui(ui, &self.settings, &mut self.state) {
                    self.changes += 1;
                }
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!(changes = self.changes, "Settings window closed");
    }
}

/// Runs the editor window on the current thread until it is closed
///
/// winit allows a single event loop per process, so a second `open` after
/// the window was closed fails; use [`super::EditorProcess`] for a
/// re-openable editor.
#[derive(Debug, Default)]
pub struct EguiSurface;

impl EguiSurface {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigurationSurface for EguiSurface {
    fn open(&mut self, settings: SharedSettings) -> Result<()> {
        let options = NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
                .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
                .with_title(WINDOW_TITLE),
            ..Default::default()
        };

        eframe::run_native(
            WINDOW_TITLE,
            options,
            Box::new(move |cc| Ok(Box::new(SettingsWindowApp::new(cc, settings)))),
        )
        .map_err(|err| anyhow!("Failed to launch settings window: {err}"))
    }
}
