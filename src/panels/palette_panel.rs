use egui::{Color32, Response, Sense, Stroke, Ui};

use crate::app::TintbookApp;
use crate::color;
use crate::session::Action;

pub fn palette_panel(app: &mut TintbookApp, ctx: &egui::Context) {
    egui::SidePanel::right("palette_panel")
        .resizable(true)
        .default_width(190.0)
        .show(ctx, |ui| {
            ui.heading("Palette");

            let selected = app.session().selected_color.clone();
            ui.horizontal(|ui| {
                color_swatch(ui, color::parse_hex_or_surface(&selected), true);
                ui.monospace(&selected);
            });

            ui.separator();

            let mut pick: Option<String> = None;
            let mut remove: Option<String> = None;

            let palette = app.page().palette.clone();
            ui.horizontal_wrapped(|ui| {
                for hex in &palette {
                    let swatch =
                        color_swatch(ui, color::parse_hex_or_surface(hex), *hex == selected);
                    if swatch.clicked() {
                        pick = Some(hex.clone());
                    }
                }
            });

            let favorites: Vec<String> = app.custom_colors().iter().map(str::to_owned).collect();
            if !favorites.is_empty() {
                ui.separator();
                ui.label("Favorites");
                ui.horizontal_wrapped(|ui| {
                    for hex in &favorites {
                        let swatch =
                            color_swatch(ui, color::parse_hex_or_surface(hex), *hex == selected);
                        if swatch.clicked() {
                            pick = Some(hex.clone());
                        }
                        if swatch.secondary_clicked() {
                            remove = Some(hex.clone());
                        }
                    }
                });
                ui.weak("Right-click a favorite to remove it");
            }

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Custom:");
                egui::color_picker::color_edit_button_srgba(
                    ui,
                    app.picker_color_mut(),
                    egui::color_picker::Alpha::Opaque,
                );
                if ui.button("Use").clicked() {
                    pick = Some(color::to_hex(app.picker_color()));
                }
                if ui.button("Save").clicked() {
                    let hex = color::to_hex(app.picker_color());
                    app.add_custom_color(&hex);
                    pick = Some(hex);
                }
            });

            if let Some(hex) = pick {
                app.dispatch(Action::SetColor(hex));
            }
            if let Some(hex) = remove {
                app.remove_custom_color(&hex);
            }
        });
}

fn color_swatch(ui: &mut Ui, fill: Color32, selected: bool) -> Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(24.0, 24.0), Sense::click());
    let stroke = if selected {
        Stroke::new(2.0, color::ACCENT)
    } else {
        Stroke::new(1.0, color::BORDER)
    };
    let painter = ui.painter();
    painter.rect_filled(rect, 4.0, fill);
    painter.rect_stroke(rect, 4.0, stroke);
    response
}
