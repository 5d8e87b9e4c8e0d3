//! The abstract drawing surface the painter replays into.
//!
//! Any vector sink can implement [`Surface`]: a raster canvas, an SVG
//! serializer, or a call recorder in tests. Coordinates arriving here are
//! already in device space; the painter has applied viewport origin and
//! scale.

use image::RgbaImage;

use crate::encoding::{HorizAlign, VertAlign};
use crate::objects::{Color, FontSpec};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle spanning two corner points, normalized.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            w: (x2 - x1).abs(),
            h: (y2 - y1).abs(),
        }
    }
}

/// How an arc segment closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    /// Just the arc, no closure.
    Open,
    /// Radii to the center, closed (a pie slice).
    Pie,
    /// Straight line back to the start point.
    Chord,
}

/// A drawable shape in device coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    /// Rectangle with elliptical corners; `corner_w`/`corner_h` are the full
    /// ellipse extents, as the record carries them.
    RoundRect { rect: Rect, corner_w: f64, corner_h: f64 },
    Ellipse(Rect),
    /// Elliptical arc within `rect`, counterclockwise from `start_deg` over
    /// `extent_deg`.
    Arc { rect: Rect, start_deg: f64, extent_deg: f64, kind: ArcKind },
    Polygon { points: Vec<Point>, even_odd: bool },
    Polyline(Vec<Point>),
    PolyPolygon { polygons: Vec<Vec<Point>>, even_odd: bool },
}

/// Current paint: a solid color or a tiled hatch pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Pattern(RgbaImage),
}

/// Everything a sink needs to lay out one text run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontSpec,
    /// Point size in device units, already scaled.
    pub size: f64,
    pub color: Color,
    pub align_h: HorizAlign,
    pub align_v: VertAlign,
    pub clip: Option<Rect>,
}

/// Receiver of playback drawing calls, issued strictly in record order.
pub trait Surface {
    /// Establish the paint used by subsequent fills and strokes.
    fn set_paint(&mut self, paint: Paint);

    /// Establish stroke geometry: device-space width and raw pen style bits.
    fn set_stroke(&mut self, width: f64, style: u16);

    fn fill_shape(&mut self, shape: &Shape);

    fn stroke_shape(&mut self, shape: &Shape);

    fn draw_line(&mut self, from: Point, to: Point);

    /// Draw text at `origin` (the baseline-left reference point). A font
    /// with non-zero escapement or orientation rotates about the origin.
    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle);

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect);

    fn push_state(&mut self);

    fn pop_state(&mut self);
}
