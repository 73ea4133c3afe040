use eframe::egui;

use crate::constants::config::DEFAULT_PRESET;
use crate::gui::constants::*;

/// What the manager should do after the selector was drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetAction {
    None,
    /// Load the named preset into the working config
    Switch(String),
    /// Save the working config under the current preset name
    Save,
    /// Save the working config under a new name
    Create(String),
    /// Delete the named preset
    Delete(String),
}

pub struct PresetSelector {
    new_preset_name: String,
    show_new_dialog: bool,
    show_delete_confirm: bool,
}

impl PresetSelector {
    pub fn new() -> Self {
        Self {
            new_preset_name: String::new(),
            show_new_dialog: false,
            show_delete_confirm: false,
        }
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        preset_names: &[String],
        selected: &mut String,
    ) -> PresetAction {
        let mut action = PresetAction::None;

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Preset:").strong());

                egui::ComboBox::from_id_salt("preset_selector")
                    .selected_text(selected.clone())
                    .show_ui(ui, |ui| {
                        for name in preset_names {
                            if ui
                                .selectable_value(selected, name.clone(), name)
                                .clicked()
                            {
                                action = PresetAction::Switch(name.clone());
                            }
                        }
                    });
            });

            ui.add_space(ITEM_SPACING);

            ui.horizontal(|ui| {
                if ui.button("\u{1F4BE} Save").clicked() {
                    action = PresetAction::Save;
                }

                if ui.button("\u{2795} New").clicked() {
                    self.show_new_dialog = true;
                    self.new_preset_name.clear();
                }

                let deletable = selected.as_str() != DEFAULT_PRESET;
                if ui
                    .add_enabled(deletable, egui::Button::new("\u{1F5D1} Delete"))
                    .clicked()
                {
                    self.show_delete_confirm = true;
                }

                if !deletable {
                    ui.label("(default preset is protected)");
                }
            });
        });

        if self.show_new_dialog {
            if let Some(created) = self.new_preset_dialog(ui.ctx(), preset_names) {
                action = created;
            }
        }

        if self.show_delete_confirm {
            if let Some(deleted) = self.delete_confirm_dialog(ui.ctx(), selected) {
                action = deleted;
            }
        }

        action
    }

    fn new_preset_dialog(
        &mut self,
        ctx: &egui::Context,
        preset_names: &[String],
    ) -> Option<PresetAction> {
        let mut action = None;

        egui::Window::new("New Preset")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Preset Name:");
                ui.text_edit_singleline(&mut self.new_preset_name);

                let name = self.new_preset_name.trim();
                let taken = preset_names.iter().any(|n| n == name);
                if taken {
                    ui.colored_label(STATUS_STOPPED, "A preset with that name already exists");
                }

                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Create").clicked() && !name.is_empty() && !taken {
                        action = Some(PresetAction::Create(name.to_string()));
                        self.show_new_dialog = false;
                    }

                    if ui.button("Cancel").clicked() {
                        self.show_new_dialog = false;
                    }
                });
            });

        action
    }

    fn delete_confirm_dialog(
        &mut self,
        ctx: &egui::Context,
        selected: &str,
    ) -> Option<PresetAction> {
        let mut action = None;

        egui::Window::new("Delete Preset")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Delete preset '{selected}'?"));

                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        action = Some(PresetAction::Delete(selected.to_string()));
                        self.show_delete_confirm = false;
                    }

                    if ui.button("Cancel").clicked() {
                        self.show_delete_confirm = false;
                    }
                });
            });

        action
    }
}
