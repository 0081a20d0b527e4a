use crate::app::TintbookApp;
use egui;

use crate::session::{Action, Tool, MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH};

pub fn tools_panel(app: &mut TintbookApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active_tool = app.session().active_tool;
            for tool in Tool::ALL {
                if ui
                    .selectable_label(active_tool == tool, tool.label())
                    .clicked()
                {
                    log::info!("Tool selected from UI: {}", tool.label());
                    app.dispatch(Action::SetTool(tool));
                }
            }

            if active_tool == Tool::Brush {
                let mut width = app.session().brush_width;
                ui.horizontal(|ui| {
                    ui.label("Width:");
                    if ui
                        .add(
                            egui::Slider::new(&mut width, MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH)
                                .step_by(1.0),
                        )
                        .changed()
                    {
                        app.dispatch(Action::SetBrushWidth(width));
                    }
                });
            }

            ui.separator();

            ui.horizontal(|ui| {
                let can_undo = app.session().can_undo();
                let can_redo = app.session().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.dispatch(Action::Undo);
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.dispatch(Action::Redo);
                }
                if ui.button("Clear").clicked() {
                    app.dispatch(Action::Reset);
                }
            });
            ui.label(format!(
                "Step {} of {}",
                app.session().history_index() + 1,
                app.session().history_len()
            ));

            ui.separator();

            let saving = app.export_pending();
            let label = if saving { "Saving…" } else { "💾 Save artwork" };
            if ui
                .add_enabled(!saving, egui::Button::new(label))
                .clicked()
            {
                log::info!("Artwork export requested from UI");
                app.request_export(ctx);
            }

            ui.separator();
            ui.heading("Gallery");

            // Collect page entries first to avoid borrowing issues
            let selected_id = app.selected_page_id().to_owned();
            let pages: Vec<(String, String, bool)> = app
                .library()
                .pages()
                .map(|page| {
                    (
                        page.id.clone(),
                        page.name.clone(),
                        app.library().is_custom(&page.id),
                    )
                })
                .collect();

            let mut select: Option<String> = None;
            let mut remove: Option<String> = None;
            for (id, name, is_custom) in &pages {
                ui.horizontal(|ui| {
                    if ui.selectable_label(*id == selected_id, name).clicked() {
                        select = Some(id.clone());
                    }
                    if *is_custom && ui.small_button("✕").clicked() {
                        remove = Some(id.clone());
                    }
                });
            }
            if let Some(id) = select {
                log::info!("Page selected from UI: {}", id);
                app.select_page(&id);
            }
            if let Some(id) = remove {
                app.remove_custom_page(&id);
            }
        });
}
