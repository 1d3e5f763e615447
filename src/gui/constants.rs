//! GUI-specific constants for layout and colors

use egui;

/// Editor window dimensions
pub const WINDOW_WIDTH: f32 = 520.0;
pub const WINDOW_HEIGHT: f32 = 640.0;
pub const WINDOW_MIN_WIDTH: f32 = 400.0;
pub const WINDOW_MIN_HEIGHT: f32 = 400.0;

pub const WINDOW_TITLE: &str = "AdLad Settings";

/// Layout spacing
pub const SECTION_SPACING: f32 = 20.0;
pub const ITEM_SPACING: f32 = 3.0;
pub const TEXT_INPUT_WIDTH: f32 = 160.0;

/// Text colors
pub const DESCRIPTION_COLOR: egui::Color32 = egui::Color32::from_rgb(0x4f, 0x4f, 0x4f);
pub const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
pub const OVERRIDDEN_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);
