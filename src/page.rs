use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PageError;

/// The artwork coordinate system declared by a page, parsed from the SVG
/// `viewBox` microsyntax. Zero or negative sizes are rejected at parse time
/// so the transform math never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl FromStr for ViewBox {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vb = svgtypes::ViewBox::from_str(s).map_err(|err| PageError::InvalidViewBox {
            value: s.to_owned(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            min_x: vb.x as f32,
            min_y: vb.y as f32,
            width: vb.w as f32,
            height: vb.h as f32,
        })
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}

impl TryFrom<String> for ViewBox {
    type Error = PageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ViewBox> for String {
    fn from(vb: ViewBox) -> Self {
        vb.to_string()
    }
}

/// SVG fill rule for deciding which points lie inside a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    Nonzero,
    Evenodd,
}

impl Default for FillRule {
    fn default() -> Self {
        Self::Nonzero
    }
}

/// An immutable paintable region of a page. The `d` string is SVG path data
/// in the page's viewBox coordinate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionPath {
    pub id: String,
    pub d: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_rule: Option<FillRule>,
}

impl RegionPath {
    pub fn new(id: &str, d: &str) -> Self {
        Self {
            id: id.to_owned(),
            d: d.to_owned(),
            stroke_width: None,
            fill_rule: None,
        }
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn with_fill_rule(mut self, rule: FillRule) -> Self {
        self.fill_rule = Some(rule);
        self
    }
}

/// An immutable artwork definition. Custom pages round-trip through JSON in
/// the same camelCase shape the import pipeline produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColoringPage {
    pub id: String,
    pub name: String,
    pub view_box: ViewBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub palette: Vec<String>,
    pub paths: Vec<RegionPath>,
}

impl ColoringPage {
    /// Builds a page from raw strings, rejecting a malformed viewBox or
    /// malformed region path data.
    pub fn new(
        id: &str,
        name: &str,
        view_box: &str,
        description: Option<&str>,
        palette: &[&str],
        paths: Vec<RegionPath>,
    ) -> Result<Self, PageError> {
        let page = Self {
            id: id.to_owned(),
            name: name.to_owned(),
            view_box: view_box.parse()?,
            description: description.map(str::to_owned),
            palette: palette.iter().map(|s| (*s).to_owned()).collect(),
            paths,
        };
        page.validate()?;
        Ok(page)
    }

    /// Re-checks region path data. Deserialized pages bypass [`Self::new`],
    /// so loaders call this before trusting a page.
    pub fn validate(&self) -> Result<(), PageError> {
        for path in &self.paths {
            validate_path_data(&path.id, &path.d)?;
        }
        Ok(())
    }

    /// First palette entry, the color a fresh session starts with.
    pub fn default_color(&self) -> &str {
        self.palette.first().map(String::as_str).unwrap_or("#FFFFFF")
    }
}

fn validate_path_data(region: &str, d: &str) -> Result<(), PageError> {
    for segment in svgtypes::SimplifyingPathParser::from(d) {
        segment.map_err(|err| PageError::InvalidPathData {
            region: region.to_owned(),
            reason: err.to_string(),
        })?;
    }
    Ok(())
}
