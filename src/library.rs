use serde::{Deserialize, Serialize};

use crate::page::{ColoringPage, RegionPath};

/// Storage key for pages the user imported, kept separate from the app
/// preferences blob so a corrupt page list cannot take the rest down.
pub const CUSTOM_PAGES_KEY: &str = "tintbook_custom_pages";

/// Most recent favorite colors kept, newest first.
pub const MAX_CUSTOM_COLORS: usize = 20;

/// The page gallery: built-in artwork plus user-imported pages.
///
/// Built-ins always come first and cannot be removed. Custom pages persist
/// as a JSON array under [`CUSTOM_PAGES_KEY`]; entries that fail to parse
/// or validate are dropped with a warning instead of failing the load.
pub struct Library {
    builtin: Vec<ColoringPage>,
    custom: Vec<ColoringPage>,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            builtin: builtin_pages(),
            custom: Vec::new(),
        }
    }
}

impl Library {
    pub fn load(storage: &dyn eframe::Storage) -> Self {
        let mut library = Self::default();
        if let Some(json) = storage.get_string(CUSTOM_PAGES_KEY) {
            library.custom = parse_custom_pages(&json);
        }
        library
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        match serde_json::to_string(&self.custom) {
            Ok(json) => storage.set_string(CUSTOM_PAGES_KEY, json),
            Err(err) => log::warn!("Failed to serialize custom pages: {}", err),
        }
    }

    /// Adds or replaces a custom page, newest first.
    pub fn add_page(&mut self, page: ColoringPage) {
        self.custom.retain(|existing| existing.id != page.id);
        self.custom.insert(0, page);
    }

    /// Removes a custom page. Built-ins are untouchable.
    pub fn remove_page(&mut self, id: &str) -> bool {
        let before = self.custom.len();
        self.custom.retain(|page| page.id != id);
        self.custom.len() != before
    }

    pub fn page(&self, id: &str) -> Option<&ColoringPage> {
        self.pages().find(|page| page.id == id)
    }

    pub fn first(&self) -> &ColoringPage {
        self.builtin
            .first()
            .expect("library always has built-in pages")
    }

    /// Built-ins first, then custom pages in insertion order.
    pub fn pages(&self) -> impl Iterator<Item = &ColoringPage> {
        self.builtin.iter().chain(self.custom.iter())
    }

    pub fn is_custom(&self, id: &str) -> bool {
        self.custom.iter().any(|page| page.id == id)
    }
}

fn parse_custom_pages(json: &str) -> Vec<ColoringPage> {
    let raw: Vec<serde_json::Value> = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("Ignoring stored custom pages: {}", err);
            return Vec::new();
        }
    };
    let mut pages = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value::<ColoringPage>(value) {
            Ok(page) => match page.validate() {
                Ok(()) => pages.push(page),
                Err(err) => log::warn!("Dropping stored page {:?}: {}", page.id, err),
            },
            Err(err) => log::warn!("Dropping malformed stored page: {}", err),
        }
    }
    pages
}

/// Favorite colors saved from the picker, newest first, deduplicated and
/// capped at [`MAX_CUSTOM_COLORS`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomColors(Vec<String>);

impl CustomColors {
    /// Saves a color at the front. A color that is already saved is left
    /// where it is rather than moved.
    pub fn add(&mut self, color: &str) {
        if self.0.iter().any(|existing| existing == color) {
            return;
        }
        self.0.insert(0, color.to_owned());
        self.0.truncate(MAX_CUSTOM_COLORS);
    }

    pub fn remove(&mut self, color: &str) {
        self.0.retain(|existing| existing != color);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn builtin_pages() -> Vec<ColoringPage> {
    vec![
        ColoringPage::new(
            "butterfly-aurora",
            "Aurora Butterfly",
            "0 0 300 300",
            Some("A simple vector scene for trying out the painting tools."),
            &["#FF6B6B", "#FFE66D", "#4ECDC4", "#A8E6CF", "#5B5F97", "#F4A259"],
            vec![
                RegionPath::new(
                    "body",
                    "M145 70 C150 50 160 50 165 70 L175 200 C175 215 155 235 150 235 \
                     C145 235 125 215 125 200 L135 70 C138 50 150 50 155 70 Z",
                )
                .with_stroke_width(2.0),
                RegionPath::new(
                    "left-wing-top",
                    "M150 110 C90 10 30 120 70 160 C30 190 60 230 120 220 \
                     C110 180 120 130 150 110 Z",
                ),
                RegionPath::new(
                    "right-wing-top",
                    "M150 110 C210 10 270 120 230 160 C270 190 240 230 180 220 \
                     C190 180 180 130 150 110 Z",
                ),
                RegionPath::new(
                    "left-wing-bottom",
                    "M145 170 C80 170 50 230 90 260 C120 280 140 250 145 230 Z",
                ),
                RegionPath::new(
                    "right-wing-bottom",
                    "M155 170 C220 170 250 230 210 260 C180 280 160 250 155 230 Z",
                ),
                RegionPath::new("head", "M140 55 C140 40 160 40 160 55 C160 65 140 65 140 55 Z")
                    .with_stroke_width(1.5),
            ],
        )
        .expect("built-in page data is valid"),
        ColoringPage::new(
            "flora-lunar",
            "Lunar Flora",
            "0 0 320 320",
            Some("Soft foliage around a central moon, made for gentle gradients."),
            &["#F97316", "#FACC15", "#34D399", "#38BDF8", "#6366F1", "#F472B6"],
            vec![
                RegionPath::new(
                    "moon",
                    "M160 80 C190 80 215 105 215 135 C215 165 190 190 160 190 \
                     C130 190 105 165 105 135 C105 105 130 80 160 80 Z",
                )
                .with_stroke_width(1.5),
                RegionPath::new(
                    "leaf-left-top",
                    "M80 60 C40 120 60 190 100 210 C80 160 85 120 110 80 Z",
                ),
                RegionPath::new(
                    "leaf-left-bottom",
                    "M90 210 C40 230 60 290 120 300 C110 270 120 240 150 220 Z",
                ),
                RegionPath::new(
                    "leaf-right-top",
                    "M240 60 C280 120 260 190 220 210 C240 160 235 120 210 80 Z",
                ),
                RegionPath::new(
                    "leaf-right-bottom",
                    "M230 210 C280 230 260 290 200 300 C210 270 200 240 170 220 Z",
                ),
            ],
        )
        .expect("built-in page data is valid"),
    ]
}
