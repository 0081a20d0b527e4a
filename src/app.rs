use egui::Color32;

use crate::canvas::geometry::PageGeometry;
use crate::canvas::ColoringCanvas;
use crate::color;
use crate::export::ArtworkExporter;
use crate::library::{CustomColors, Library};
use crate::page::ColoringPage;
use crate::panels;
use crate::renderer::Renderer;
use crate::session::{Action, ColoringSession};

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct TintbookApp {
    selected_page_id: String,
    custom_colors: CustomColors,

    // Everything below is rebuilt on startup. Custom pages live under their
    // own storage key, not in this blob.
    #[serde(skip)]
    library: Library,
    #[serde(skip)]
    session: ColoringSession,
    #[serde(skip)]
    geometry: PageGeometry,
    #[serde(skip)]
    canvas: ColoringCanvas,
    #[serde(skip)]
    renderer: Renderer,
    #[serde(skip)]
    picker_color: Color32,
    #[serde(skip)]
    exporter: ArtworkExporter,
}

impl Default for TintbookApp {
    fn default() -> Self {
        let library = Library::default();
        let page = library.first();
        let selected_page_id = page.id.clone();
        let session = ColoringSession::new(page.default_color());
        let geometry = PageGeometry::new(page);
        Self {
            selected_page_id,
            custom_colors: CustomColors::default(),
            library,
            session,
            geometry,
            canvas: ColoringCanvas::default(),
            renderer: Renderer::new(),
            picker_color: color::ACCENT,
            exporter: ArtworkExporter::default(),
        }
    }
}

impl TintbookApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        color::apply_theme(&cc.egui_ctx);

        let mut app: TintbookApp = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        if let Some(storage) = cc.storage {
            app.library = Library::load(storage);
        }
        // Re-resolve the persisted selection against whatever actually
        // loaded; a page that disappeared falls back to the first built-in.
        let id = app.selected_page_id.clone();
        app.activate_page(&id);
        app
    }

    pub fn session(&self) -> &ColoringSession {
        &self.session
    }

    pub fn dispatch(&mut self, action: Action) {
        self.session.dispatch(action);
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn selected_page_id(&self) -> &str {
        &self.selected_page_id
    }

    /// The page everything currently operates on.
    pub fn page(&self) -> &ColoringPage {
        self.library
            .page(&self.selected_page_id)
            .unwrap_or_else(|| self.library.first())
    }

    pub fn select_page(&mut self, id: &str) {
        if self.selected_page_id == id && self.library.page(id).is_some() {
            return;
        }
        self.activate_page(id);
    }

    pub fn remove_custom_page(&mut self, id: &str) {
        if !self.library.remove_page(id) {
            return;
        }
        log::info!("Removed custom page: {}", id);
        if self.selected_page_id == id {
            let fallback = self.library.first().id.clone();
            self.activate_page(&fallback);
        }
    }

    pub fn custom_colors(&self) -> &CustomColors {
        &self.custom_colors
    }

    pub fn add_custom_color(&mut self, color: &str) {
        self.custom_colors.add(color);
    }

    pub fn remove_custom_color(&mut self, color: &str) {
        self.custom_colors.remove(color);
    }

    pub fn picker_color(&self) -> Color32 {
        self.picker_color
    }

    pub fn picker_color_mut(&mut self) -> &mut Color32 {
        &mut self.picker_color
    }

    pub fn zoom(&self) -> f32 {
        self.canvas.zoom()
    }

    pub fn reset_view(&mut self) {
        self.canvas.reset_view();
    }

    pub fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let Some(page) = self.library.page(&self.selected_page_id) else {
            return;
        };
        let response =
            self.canvas
                .show(ui, page, &self.geometry, &mut self.session, &mut self.renderer);
        self.exporter.note_canvas_rect(response.rect);
    }

    pub fn export_pending(&self) -> bool {
        self.exporter.is_pending()
    }

    /// Kicks off saving the canvas as a PNG. The capture arrives through
    /// the input queue and is finished in a later frame.
    pub fn request_export(&mut self, ctx: &egui::Context) {
        self.exporter.request_capture(ctx);
    }

    /// Switches the working page: rebuilds the region geometry, starts a
    /// fresh session seeded with the page's first palette color, and resets
    /// the view. The brush width survives the switch.
    fn activate_page(&mut self, id: &str) {
        let page = self
            .library
            .page(id)
            .unwrap_or_else(|| self.library.first());
        let page_id = page.id.clone();
        let default_color = page.default_color().to_owned();
        let geometry = PageGeometry::new(page);

        self.selected_page_id = page_id;
        self.geometry = geometry;
        self.session.dispatch(Action::ResetWithColor(default_color));
        self.canvas.reset_view();
        self.renderer.invalidate();
    }

    fn handle_export(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.exporter.take_screenshot(ctx) else {
            return;
        };
        match self
            .exporter
            .save(&frame, ctx.pixels_per_point(), &self.selected_page_id)
        {
            Ok(path) => log::info!("Saved artwork to {}", path.display()),
            Err(err) => log::warn!("Failed to save artwork: {}", err),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let redo = egui::KeyboardShortcut::new(
            egui::Modifiers::COMMAND | egui::Modifiers::SHIFT,
            egui::Key::Z,
        );
        let undo = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);
        // Check redo first so plain Cmd+Z cannot swallow Shift+Cmd+Z.
        if ctx.input_mut(|i| i.consume_shortcut(&redo)) {
            self.session.dispatch(Action::Redo);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&undo)) {
            self.session.dispatch(Action::Undo);
        }
    }
}

impl eframe::App for TintbookApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
        self.library.save(storage);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        self.handle_export(ctx);

        panels::tools_panel(self, ctx);
        panels::palette_panel(self, ctx);
        panels::central_panel(self, ctx);
    }
}
