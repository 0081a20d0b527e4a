use egui::{pos2, Pos2, Rect};
use lyon_path::iterator::PathIterator;
use lyon_path::math::point;
use lyon_path::{Path, PathEvent};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use crate::page::{ColoringPage, FillRule};

/// Curve flattening tolerance in artwork units. Pages are a few hundred
/// units across, so this keeps outlines smooth without exploding the
/// point counts.
pub const FLATTEN_TOLERANCE: f32 = 0.25;

/// Builds a lyon path from SVG path data. Relative commands, arcs, and
/// shorthand curves are normalized away by the simplifying parser, leaving
/// only absolute moves, lines, and beziers.
pub fn build_path(d: &str) -> Result<Path, svgtypes::Error> {
    let mut builder = Path::builder();
    let mut started = false;
    for segment in SimplifyingPathParser::from(d) {
        match segment? {
            SimplePathSegment::MoveTo { x, y } => {
                if started {
                    builder.end(false);
                }
                builder.begin(point(x as f32, y as f32));
                started = true;
            }
            SimplePathSegment::LineTo { x, y } => {
                builder.line_to(point(x as f32, y as f32));
            }
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                builder.quadratic_bezier_to(point(x1 as f32, y1 as f32), point(x as f32, y as f32));
            }
            SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                builder.cubic_bezier_to(
                    point(x1 as f32, y1 as f32),
                    point(x2 as f32, y2 as f32),
                    point(x as f32, y as f32),
                );
            }
            SimplePathSegment::ClosePath => {
                if started {
                    builder.end(true);
                    started = false;
                }
            }
        }
    }
    if started {
        builder.end(false);
    }
    Ok(builder.build())
}

/// One flattened subpath of a region outline.
#[derive(Debug, Clone)]
pub struct Ring {
    pub points: Vec<Pos2>,
    pub closed: bool,
}

/// A region's outline flattened into polygon rings, with the fill rule and
/// bounding box used for hit testing.
#[derive(Debug, Clone)]
pub struct RegionOutline {
    pub id: String,
    pub rings: Vec<Ring>,
    pub fill_rule: FillRule,
    pub bounds: Rect,
}

impl RegionOutline {
    /// Point-in-region test in artwork coordinates. Open subpaths are
    /// treated as implicitly closed, matching how SVG fills them.
    pub fn contains(&self, p: Pos2) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        let mut winding = 0i32;
        let mut crossings = 0u32;
        for ring in &self.rings {
            let pts = &ring.points;
            if pts.len() < 3 {
                continue;
            }
            let mut j = pts.len() - 1;
            for i in 0..pts.len() {
                let a = pts[j];
                let b = pts[i];
                if (a.y <= p.y) != (b.y <= p.y) {
                    let t = (p.y - a.y) / (b.y - a.y);
                    let x = a.x + t * (b.x - a.x);
                    if x > p.x {
                        crossings += 1;
                        if b.y > a.y {
                            winding += 1;
                        } else {
                            winding -= 1;
                        }
                    }
                }
                j = i;
            }
        }
        match self.fill_rule {
            FillRule::Nonzero => winding != 0,
            FillRule::Evenodd => crossings % 2 == 1,
        }
    }
}

/// Flattened outlines for every region of a page, in document order.
#[derive(Debug, Clone, Default)]
pub struct PageGeometry {
    outlines: Vec<RegionOutline>,
}

impl PageGeometry {
    /// Flattens each region of the page. Regions with unparseable path data
    /// are skipped with a warning; pages built through the validating
    /// constructor never hit that case.
    pub fn new(page: &ColoringPage) -> Self {
        let mut outlines = Vec::with_capacity(page.paths.len());
        for region in &page.paths {
            match build_path(&region.d) {
                Ok(path) => {
                    let rings = flatten_path(&path);
                    let bounds = rings_bounds(&rings);
                    outlines.push(RegionOutline {
                        id: region.id.clone(),
                        rings,
                        fill_rule: region.fill_rule.unwrap_or_default(),
                        bounds,
                    });
                }
                Err(err) => {
                    log::warn!("Skipping region {:?} with bad path data: {}", region.id, err);
                }
            }
        }
        Self { outlines }
    }

    /// Finds the region under an artwork-space point. Later regions sit on
    /// top of earlier ones, so the search runs back to front.
    pub fn hit_test(&self, p: Pos2) -> Option<&str> {
        self.outlines
            .iter()
            .rev()
            .find(|outline| outline.contains(p))
            .map(|outline| outline.id.as_str())
    }

    pub fn outline(&self, id: &str) -> Option<&RegionOutline> {
        self.outlines.iter().find(|outline| outline.id == id)
    }

    pub fn outlines(&self) -> &[RegionOutline] {
        &self.outlines
    }
}

/// Flattens a path into polyline rings.
pub fn flatten_path(path: &Path) -> Vec<Ring> {
    let mut rings = Vec::new();
    let mut current: Vec<Pos2> = Vec::new();
    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            PathEvent::Begin { at } => {
                current = vec![pos2(at.x, at.y)];
            }
            PathEvent::Line { to, .. } => {
                current.push(pos2(to.x, to.y));
            }
            PathEvent::End { close, .. } => {
                if current.len() >= 2 {
                    rings.push(Ring {
                        points: std::mem::take(&mut current),
                        closed: close,
                    });
                } else {
                    current.clear();
                }
            }
            _ => {}
        }
    }
    rings
}

/// Flattens brush stroke path data into a single polyline for rendering.
pub fn stroke_points(d: &str) -> Vec<Pos2> {
    let path = match build_path(d) {
        Ok(path) => path,
        Err(err) => {
            log::warn!("Skipping brush stroke with bad path data: {}", err);
            return Vec::new();
        }
    };
    let mut points = Vec::new();
    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            PathEvent::Begin { at } => points.push(pos2(at.x, at.y)),
            PathEvent::Line { to, .. } => points.push(pos2(to.x, to.y)),
            _ => {}
        }
    }
    points
}

/// Splits a polyline into the runs that lie inside the outline, keyed off
/// each segment's midpoint. An approximation of a true path clip, but more
/// than enough at brush-stroke scale.
pub fn clip_polyline(points: &[Pos2], outline: &RegionOutline) -> Vec<Vec<Pos2>> {
    let mut runs = Vec::new();
    let mut current: Vec<Pos2> = Vec::new();
    for pair in points.windows(2) {
        let mid = pos2((pair[0].x + pair[1].x) / 2.0, (pair[0].y + pair[1].y) / 2.0);
        if outline.contains(mid) {
            if current.is_empty() {
                current.push(pair[0]);
            }
            current.push(pair[1]);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn rings_bounds(rings: &[Ring]) -> Rect {
    let mut bounds = Rect::NOTHING;
    for ring in rings {
        for p in &ring.points {
            bounds.extend_with(*p);
        }
    }
    bounds
}
