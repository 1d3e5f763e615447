//! Settings editor component: one input per catalog entry

use eframe::egui;
use std::collections::HashMap;
use tracing::warn;

use crate::gui::constants::*;
use crate::settings::edit;
use crate::settings::{SettingDescriptor, SettingId, SettingKind, SettingValue, SharedSettings};

/// Per-window state for inputs that need buffering
#[derive(Debug, Default)]
pub struct SettingsEditorState {
    /// Text being typed into free-form enum fields
    text_buffers: HashMap<SettingId, String>,
    /// Number being dragged or typed, committed once the edit ends
    number_drafts: HashMap<SettingId, f64>,
    /// Last rejected input per setting
    errors: HashMap<SettingId, String>,
}

impl SettingsEditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit typed text through the validation boundary
    fn commit_text(&mut self, settings: &SharedSettings, id: SettingId) -> bool {
        let Some(input) = self.text_buffers.get(&id) else {
            return false;
        };
        match edit::apply_input(settings, id, input) {
            Ok(_) => {
                self.errors.remove(&id);
                true
            }
            Err(e) => {
                warn!(setting = %id, error = %e, "Rejected settings input");
                self.errors.insert(id, e.to_string());
                false
            }
        }
    }

    /// Store the drafted number if it is finite and differs from the current value
    fn commit_number(&mut self, settings: &SharedSettings, id: SettingId) -> bool {
        let Some(draft) = self.number_drafts.remove(&id) else {
            return false;
        };
        if !draft.is_finite() || draft == settings.number(id) {
            return false;
        }
        settings.set_value(id, SettingValue::Number(draft));
        true
    }
}

/// Renders every setting and writes changes back; returns true if any
/// setting changed this frame
pub fn ui(ui: &mut egui::Ui, settings: &SharedSettings, state: &mut SettingsEditorState) -> bool {
    let catalog = settings.catalog();
    let mut changed = false;

    for descriptor in catalog.iter() {
        ui.vertical(|ui| {
            if setting_row(ui, settings, state, descriptor) {
                changed = true;
            }

            if let Some(error) = state.errors.get(&descriptor.id) {
                ui.colored_label(ERROR_COLOR, error);
            }

            ui.add_space(ITEM_SPACING);
            for line in descriptor.description.lines() {
                ui.label(egui::RichText::new(line).small().color(DESCRIPTION_COLOR));
            }
        });
        ui.add_space(SECTION_SPACING);
    }

    changed
}

fn setting_row(
    ui: &mut egui::Ui,
    settings: &SharedSettings,
    state: &mut SettingsEditorState,
    descriptor: &SettingDescriptor,
) -> bool {
    let id = descriptor.id;
    let label = if settings.is_overridden(id) {
        egui::RichText::new(descriptor.label).strong().color(OVERRIDDEN_COLOR)
    } else {
        egui::RichText::new(descriptor.label).strong()
    };
    let mut changed = false;

    ui.horizontal(|ui| match descriptor.kind {
        SettingKind::Boolean => {
            // Checkbox goes before the label
            let mut checked = settings.boolean(id);
            if ui.checkbox(&mut checked, label).changed() {
                settings.set_value(id, SettingValue::Boolean(checked));
                changed = true;
            }
        }
        SettingKind::Number => {
            ui.label(label);
            let draft = state
                .number_drafts
                .entry(id)
                .or_insert_with(|| settings.number(id));
            let response = ui.add(egui::DragValue::new(draft).speed(1.0));
            // Dragging changes the draft every frame; persist when the edit ends
            let editing = response.dragged() || response.has_focus();
            if (response.changed() && !editing) || response.drag_stopped() || response.lost_focus() {
                changed = state.commit_number(settings, id);
            } else if !editing {
                state.number_drafts.remove(&id);
            }
        }
        SettingKind::Enum => {
            ui.label(label);
            match descriptor.options {
                Some(options) => {
                    let current = settings.text(id);
                    egui::ComboBox::from_id_salt(id.as_str())
                        .selected_text(current.as_str())
                        .show_ui(ui, |ui| {
                            for option in options {
                                if ui.selectable_label(current == *option, *option).clicked()
                                    && current != *option
                                {
                                    settings.set_value(id, SettingValue::from(*option));
                                    changed = true;
                                }
                            }
                        });
                }
                None => {
                    let buffer = state
                        .text_buffers
                        .entry(id)
                        .or_insert_with(|| settings.text(id));
                    let response = ui.add(
                        egui::TextEdit::singleline(buffer).desired_width(TEXT_INPUT_WIDTH),
                    );
                    if response.lost_focus() && state.commit_text(settings, id) {
                        changed = true;
                    }
                }
            }
        }
    });

    changed
}
