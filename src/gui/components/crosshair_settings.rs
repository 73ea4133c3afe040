use eframe::egui;

use crate::config::{CrosshairConfig, Shape};
use crate::constants::validation::*;
use crate::gui::constants::*;

/// Draw the crosshair settings editor; returns true when any field changed
pub fn ui(ui: &mut egui::Ui, config: &mut CrosshairConfig) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Crosshair").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Shape:");
            egui::ComboBox::from_id_salt("shape_selector")
                .selected_text(config.shape.label())
                .show_ui(ui, |ui| {
                    for shape in Shape::ALL {
                        if ui
                            .selectable_value(&mut config.shape, shape, shape.label())
                            .clicked()
                        {
                            changed = true;
                        }
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label("Size:");
            if ui
                .add(egui::Slider::new(&mut config.size, MIN_SIZE..=MAX_SIZE).suffix("px"))
                .changed()
            {
                changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Thickness:");
            if ui
                .add(
                    egui::Slider::new(&mut config.thickness, MIN_THICKNESS..=MAX_THICKNESS)
                        .suffix("px"),
                )
                .changed()
            {
                changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Opacity:");
            if ui
                .add(egui::Slider::new(&mut config.opacity, MIN_OPACITY..=MAX_OPACITY))
                .changed()
            {
                changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Color:");
            let text_edit = egui::TextEdit::singleline(&mut config.color).desired_width(100.0);
            if ui.add(text_edit).changed() {
                changed = true;
            }

            // Color picker button - parses hex string, shows picker, updates string
            if let Some(mut color) = parse_hex_color(&config.color) {
                if ui.color_edit_button_srgb(&mut color).changed() {
                    config.color = format_hex_color(color);
                    changed = true;
                }
            }
        });
    });

    if config.shape.is_hollow_cross() {
        ui.add_space(ITEM_SPACING);
        ui.group(|ui| {
            ui.label(egui::RichText::new("Hollow Cross").strong());
            ui.add_space(ITEM_SPACING);

            ui.horizontal(|ui| {
                ui.label("Gap:");
                if ui
                    .add(
                        egui::Slider::new(&mut config.hollow_gap, MIN_HOLLOW_GAP..=MAX_HOLLOW_GAP)
                            .suffix("px"),
                    )
                    .changed()
                {
                    changed = true;
                }
            });

            ui.horizontal(|ui| {
                ui.label("Arm Length:");
                if ui
                    .add(
                        egui::Slider::new(
                            &mut config.hollow_length,
                            MIN_HOLLOW_LENGTH..=MAX_HOLLOW_LENGTH,
                        )
                        .suffix("px"),
                    )
                    .changed()
                {
                    changed = true;
                }
            });

            ui.horizontal(|ui| {
                ui.label("Arm Thickness:");
                if ui
                    .add(
                        egui::Slider::new(
                            &mut config.hollow_thickness,
                            MIN_HOLLOW_THICKNESS..=MAX_HOLLOW_THICKNESS,
                        )
                        .suffix("px"),
                    )
                    .changed()
                {
                    changed = true;
                }
            });

            if config.shape == Shape::HollowCrossDot {
                ui.horizontal(|ui| {
                    ui.label("Center Dot:");
                    if ui
                        .add(
                            egui::Slider::new(
                                &mut config.center_dot_size,
                                MIN_CENTER_DOT_SIZE..=MAX_CENTER_DOT_SIZE,
                            )
                            .suffix("px"),
                        )
                        .changed()
                    {
                        changed = true;
                    }
                });
            }
        });
    }

    changed
}

fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let parsed = crate::color::HexColor::parse(hex)?;
    Some([parsed.r, parsed.g, parsed.b])
}

fn format_hex_color(rgb: [u8; 3]) -> String {
    crate::color::HexColor { r: rgb[0], g: rgb[1], b: rgb[2] }.format()
}
