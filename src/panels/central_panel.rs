use crate::app::TintbookApp;

pub fn central_panel(app: &mut TintbookApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(app.page().name.clone());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Reset view").clicked() {
                    app.reset_view();
                }
                ui.label(format!("{:.0}%", app.zoom() * 100.0));
            });
        });
        if let Some(description) = app.page().description.clone() {
            ui.weak(description);
        }
        ui.separator();

        ui.vertical_centered(|ui| {
            app.show_canvas(ui);
        });
    });
}
