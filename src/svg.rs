//! SVG drawing sink.
//!
//! [`SvgSurface`] implements [`Surface`] by serializing draw calls into a
//! standalone SVG document: minimal attributes, trimmed numbers, embedded
//! rasters and hatch tiles as base64 PNG data URLs. One element per drawing
//! call, in call order.

use std::fmt::Write;
use std::io::Cursor;

use base64::Engine;
use image::RgbaImage;

use crate::constants::pen;
use crate::encoding::{HorizAlign, VertAlign};
use crate::objects::Color;
use crate::playback::{ArcKind, Paint, Point, Rect, Shape, Surface, TextStyle};

/// Fast number formatter: integers verbatim, floats rounded to two decimals
/// with trailing zeros trimmed.
#[inline]
pub fn write_num(buf: &mut String, n: f64) {
    if n.fract() == 0.0 && n.abs() < 1e10 {
        let _ = write!(buf, "{}", n as i64);
    } else {
        let rounded = (n * 100.0).round() / 100.0;
        let mut buffer = ryu::Buffer::new();
        let s = buffer.format(rounded);
        if s.contains('.') {
            buf.push_str(s.trim_end_matches('0').trim_end_matches('.'));
        } else {
            buf.push_str(s);
        }
    }
}

/// Format a number with minimal precision.
#[inline]
pub fn fmt_num(n: f64) -> String {
    let mut s = String::with_capacity(16);
    write_num(&mut s, n);
    s
}

/// Write a color as #rrggbb.
#[inline]
pub fn write_color_hex(buf: &mut String, c: Color) {
    let _ = write!(buf, "#{:02x}{:02x}{:02x}", c.r, c.g, c.b);
}

fn write_xml_escaped(buf: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '&' => buf.push_str("&amp;"),
            '"' => buf.push_str("&quot;"),
            _ => buf.push(ch),
        }
    }
}

fn png_data_url(image: &RgbaImage) -> Option<String> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .ok()?;
    Some(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    ))
}

/// SVG serializer for painter output.
pub struct SvgSurface {
    width: f64,
    height: f64,
    elements: Vec<String>,
    /// `(tile samples, pattern id)` pairs already defined.
    patterns: Vec<(Vec<u8>, String)>,
    defs: Vec<String>,
    paint: Paint,
    stroke_width: f64,
    stroke_style: u16,
    group_depth: usize,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
            patterns: Vec::new(),
            defs: Vec::new(),
            paint: Paint::Solid(Color::BLACK),
            stroke_width: 1.0,
            stroke_style: pen::PS_SOLID,
            group_depth: 0,
        }
    }

    /// Assemble the document.
    pub fn finish(mut self) -> String {
        for _ in 0..self.group_depth {
            self.elements.push("</g>".to_string());
        }
        let mut out = String::with_capacity(256 + self.elements.iter().map(String::len).sum::<usize>());
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            fmt_num(self.width),
            fmt_num(self.height),
            fmt_num(self.width),
            fmt_num(self.height)
        );
        if !self.defs.is_empty() {
            out.push_str("<defs>");
            for def in &self.defs {
                out.push_str(def);
            }
            out.push_str("</defs>");
        }
        for el in &self.elements {
            out.push_str(el);
        }
        out.push_str("</svg>");
        out
    }

    /// Pattern id for a hatch tile, defining it on first use.
    fn pattern_id(&mut self, tile: &RgbaImage) -> String {
        let samples = tile.as_raw().clone();
        if let Some((_, id)) = self.patterns.iter().find(|(s, _)| *s == samples) {
            return id.clone();
        }
        let id = format!("hatch{}", self.patterns.len());
        if let Some(url) = png_data_url(tile) {
            self.defs.push(format!(
                r#"<pattern id="{}" patternUnits="userSpaceOnUse" width="{}" height="{}"><image href="{}" width="{}" height="{}"/></pattern>"#,
                id,
                tile.width(),
                tile.height(),
                url,
                tile.width(),
                tile.height()
            ));
        }
        self.patterns.push((samples, id.clone()));
        id
    }

    fn fill_attr(&mut self, even_odd: Option<bool>) -> String {
        let mut s = String::with_capacity(32);
        match self.paint.clone() {
            Paint::Solid(c) => {
                s.push_str(" fill=\"");
                write_color_hex(&mut s, c);
                s.push('"');
            }
            Paint::Pattern(tile) => {
                let id = self.pattern_id(&tile);
                let _ = write!(s, r#" fill="url(#{})""#, id);
            }
        }
        match even_odd {
            Some(true) => s.push_str(r#" fill-rule="evenodd""#),
            Some(false) => s.push_str(r#" fill-rule="nonzero""#),
            None => {}
        }
        s.push_str(r#" stroke="none""#);
        s
    }

    fn stroke_attrs(&self) -> String {
        let color = match &self.paint {
            Paint::Solid(c) => *c,
            Paint::Pattern(_) => Color::BLACK,
        };
        let mut s = String::with_capacity(96);
        s.push_str(r#" fill="none" stroke=""#);
        write_color_hex(&mut s, color);
        s.push('"');
        let width = self.stroke_width;
        s.push_str(" stroke-width=\"");
        write_num(&mut s, width);
        s.push('"');

        let endcap = (self.stroke_style >> 8) & 0x0F;
        match endcap {
            0x01 => s.push_str(r#" stroke-linecap="square""#),
            0x00 => s.push_str(r#" stroke-linecap="round""#),
            _ => {} // butt is the default
        }
        let join = (self.stroke_style >> 12) & 0x0F;
        match join {
            0x01 => s.push_str(r#" stroke-linejoin="bevel""#),
            0x02 => s.push_str(r#" stroke-linejoin="round""#),
            _ => {} // miter is the default
        }

        // dash patterns scale with pen width
        let dashes: &[f64] = match self.stroke_style & 0x0F {
            pen::PS_DASH => &[10.0, 10.0],
            pen::PS_DOT | pen::PS_ALTERNATE => &[1.0, 2.0],
            pen::PS_DASHDOT => &[10.0, 2.0, 1.0, 2.0],
            pen::PS_DASHDOTDOT => &[10.0, 2.0, 1.0, 2.0, 1.0, 2.0],
            _ => &[],
        };
        if !dashes.is_empty() {
            s.push_str(r#" stroke-dasharray=""#);
            for (i, d) in dashes.iter().enumerate() {
                if i > 0 {
                    s.push(',');
                }
                write_num(&mut s, d * width.max(1.0));
            }
            s.push('"');
        }
        s
    }

    fn shape_body(shape: &Shape) -> String {
        let mut s = String::with_capacity(64);
        match shape {
            Shape::Rect(r) => {
                let _ = write!(
                    s,
                    r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                    fmt_num(r.x),
                    fmt_num(r.y),
                    fmt_num(r.w),
                    fmt_num(r.h)
                );
            }
            Shape::RoundRect { rect: r, corner_w, corner_h } => {
                let _ = write!(
                    s,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}""#,
                    fmt_num(r.x),
                    fmt_num(r.y),
                    fmt_num(r.w),
                    fmt_num(r.h),
                    fmt_num(corner_w / 2.0),
                    fmt_num(corner_h / 2.0)
                );
            }
            Shape::Ellipse(r) => {
                let _ = write!(
                    s,
                    r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}""#,
                    fmt_num(r.x + r.w / 2.0),
                    fmt_num(r.y + r.h / 2.0),
                    fmt_num(r.w / 2.0),
                    fmt_num(r.h / 2.0)
                );
            }
            Shape::Polygon { points, .. } => {
                s.push_str("<polygon points=\"");
                write_points(&mut s, points);
                s.push('"');
            }
            Shape::Polyline(points) => {
                s.push_str("<polyline points=\"");
                write_points(&mut s, points);
                s.push('"');
            }
            Shape::PolyPolygon { polygons, .. } => {
                s.push_str("<path d=\"");
                for poly in polygons {
                    for (i, p) in poly.iter().enumerate() {
                        s.push(if i == 0 { 'M' } else { 'L' });
                        write_num(&mut s, p.x);
                        s.push(',');
                        write_num(&mut s, p.y);
                    }
                    if !poly.is_empty() {
                        s.push('Z');
                    }
                }
                s.push('"');
            }
            Shape::Arc { rect, start_deg, extent_deg, kind } => {
                let rx = rect.w / 2.0;
                let ry = rect.h / 2.0;
                let cx = rect.x + rx;
                let cy = rect.y + ry;
                // y grows downward, so a counterclockwise angle subtracts
                let at = |deg: f64| {
                    let rad = deg.to_radians();
                    (cx + rx * rad.cos(), cy - ry * rad.sin())
                };
                let (sx, sy) = at(*start_deg);
                let (ex, ey) = at(*start_deg + *extent_deg);
                let large = *extent_deg > 180.0;
                s.push_str("<path d=\"M");
                write_num(&mut s, sx);
                s.push(',');
                write_num(&mut s, sy);
                let _ = write!(
                    s,
                    "A{},{} 0 {} 0 {},{}",
                    fmt_num(rx),
                    fmt_num(ry),
                    i32::from(large),
                    fmt_num(ex),
                    fmt_num(ey)
                );
                match kind {
                    ArcKind::Pie => {
                        s.push('L');
                        write_num(&mut s, cx);
                        s.push(',');
                        write_num(&mut s, cy);
                        s.push('Z');
                    }
                    ArcKind::Chord => s.push('Z'),
                    ArcKind::Open => {}
                }
                s.push('"');
            }
        }
        s
    }

    fn shape_fill_rule(shape: &Shape) -> Option<bool> {
        match shape {
            Shape::Polygon { even_odd, .. } | Shape::PolyPolygon { even_odd, .. } => {
                Some(*even_odd)
            }
            _ => None,
        }
    }
}

fn write_points(s: &mut String, points: &[Point]) {
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        write_num(s, p.x);
        s.push(',');
        write_num(s, p.y);
    }
}

impl Surface for SvgSurface {
    fn set_paint(&mut self, paint: Paint) {
        self.paint = paint;
    }

    fn set_stroke(&mut self, width: f64, style: u16) {
        self.stroke_width = width;
        self.stroke_style = style;
    }

    fn fill_shape(&mut self, shape: &Shape) {
        let mut el = Self::shape_body(shape);
        el.push_str(&self.fill_attr(Self::shape_fill_rule(shape)));
        el.push_str("/>");
        self.elements.push(el);
    }

    fn stroke_shape(&mut self, shape: &Shape) {
        let mut el = Self::shape_body(shape);
        el.push_str(&self.stroke_attrs());
        el.push_str("/>");
        self.elements.push(el);
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        let mut el = format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
            fmt_num(from.x),
            fmt_num(from.y),
            fmt_num(to.x),
            fmt_num(to.y)
        );
        el.push_str(&self.stroke_attrs());
        el.push_str("/>");
        self.elements.push(el);
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        let mut el = format!(
            r#"<text x="{}" y="{}" font-size="{}""#,
            fmt_num(origin.x),
            fmt_num(origin.y),
            fmt_num(style.size)
        );
        el.push_str(" fill=\"");
        write_color_hex(&mut el, style.color);
        el.push('"');
        let _ = write!(el, r#" font-family="{}""#, style.font.face);
        if style.font.italic {
            el.push_str(r#" font-style="italic""#);
        }
        if style.font.is_bold() {
            el.push_str(r#" font-weight="bold""#);
        }
        if style.font.underline {
            el.push_str(r#" text-decoration="underline""#);
        } else if style.font.strikeout {
            el.push_str(r#" text-decoration="line-through""#);
        }
        match style.align_h {
            HorizAlign::Center => el.push_str(r#" text-anchor="middle""#),
            HorizAlign::Right => el.push_str(r#" text-anchor="end""#),
            HorizAlign::Left => {}
        }
        if style.align_v == VertAlign::Top {
            el.push_str(r#" dominant-baseline="hanging""#);
        }
        let rotation = if style.font.orientation != 0 {
            style.font.orientation
        } else {
            style.font.escapement
        };
        if rotation != 0 {
            // tenths of a degree, counterclockwise; SVG rotates clockwise
            let angle = -(f64::from(rotation) / 10.0);
            let _ = write!(
                el,
                r#" transform="rotate({} {} {})""#,
                fmt_num(angle),
                fmt_num(origin.x),
                fmt_num(origin.y)
            );
        }
        el.push('>');
        write_xml_escaped(&mut el, text);
        el.push_str("</text>");
        self.elements.push(el);
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
        let Some(url) = png_data_url(image) else { return };
        self.elements.push(format!(
            r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" href="{}"/>"#,
            fmt_num(dest.x),
            fmt_num(dest.y),
            fmt_num(dest.w),
            fmt_num(dest.h),
            url
        ));
    }

    fn push_state(&mut self) {
        self.elements.push("<g>".to_string());
        self.group_depth += 1;
    }

    fn pop_state(&mut self) {
        if self.group_depth > 0 {
            self.elements.push("</g>".to_string());
            self.group_depth -= 1;
        }
    }
}
