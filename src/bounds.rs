//! Bounds-only analysis of a WMF stream.
//!
//! [`HeaderProperties`] runs the same record grammar as the full parser but
//! folds every geometric record into a running min/max accumulator instead of
//! materializing a record list. Raster blits accumulate into a second box in
//! their own coordinate system; the two are rescaled and merged at the end.
//! Used for sizing and cropping decisions before committing to a playback.
//!
//! One heuristic applies: the very first filled or stroked shape is excluded
//! from the bounds when its paint color is pure white and nothing has been
//! painted yet, so a full-canvas white background wash does not inflate the
//! computed box.

use crate::binary::WordReader;
use crate::constants::{record, PIXELS_PER_INCH};
use crate::encoding::{
    decode_string, horizontal_alignment, vertical_alignment, HorizAlign, VertAlign,
};
use crate::error::Result;
use crate::objects::{BrushDef, Color, FontSpec, GdiObject, ObjectTable, PenDef};
use crate::store::{next_record, read_headers, CoordState, PlaceableHeader, StandardHeader};

/// Running min/max box over integer points. `None` until the first point.
#[derive(Debug, Clone, Copy, Default)]
struct BoundsAcc {
    rect: Option<(i32, i32, i32, i32)>,
}

impl BoundsAcc {
    fn add(&mut self, x: i32, y: i32) {
        self.rect = Some(match self.rect {
            None => (x, y, x, y),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x), b.max(y)),
        });
    }

    fn add_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.add(x1.min(x2), y1.min(y2));
        self.add(x1.max(x2), y1.max(y2));
    }
}

/// Simple properties of a WMF metafile: overall dimensions plus the bounding
/// box of its effectively painted content, computed in one streaming pass.
#[derive(Debug, Clone)]
pub struct HeaderProperties {
    pub placeable: Option<PlaceableHeader>,
    pub header: StandardHeader,
    width: i32,
    height: i32,
    inch: u16,
    bounds: Option<(i32, i32, i32, i32)>,
}

impl HeaderProperties {
    /// Scan a WMF byte stream without materializing records.
    pub fn scan(data: &[u8]) -> Result<Self> {
        let mut r = WordReader::new(data);
        let (placeable, header) = read_headers(&mut r)?;

        let mut scanner = Scanner {
            coords: CoordState::default(),
            objects: ObjectTable::new(header.num_objects as usize),
            pen: None,
            brush: None,
            font: None,
            align_h: HorizAlign::default(),
            align_v: VertAlign::default(),
            start: (0, 0),
            first_effective_paint: true,
            geometry: BoundsAcc::default(),
            images: BoundsAcc::default(),
            vp_x: 0,
            vp_y: 0,
            vp_w: -1,
            vp_h: -1,
            inch: placeable.map_or(crate::constants::DEFAULT_INCH_VALUE, |p| p.inch),
            width: placeable.map_or(0, |p| p.width()),
            height: placeable.map_or(0, |p| p.height()),
        };

        while let Some((function, words, mut body)) = next_record(&mut r)? {
            scanner.scan_record(function, words, &mut body)?;
        }

        // without a placeable header the overall size comes from the viewport
        if placeable.is_none() {
            scanner.width = scanner.vp_w.max(0);
            scanner.height = scanner.vp_h.max(0);
        }

        let bounds = scanner.resolve_bounds();
        Ok(Self {
            placeable,
            header,
            width: scanner.width,
            height: scanner.height,
            inch: scanner.inch,
            bounds,
        })
    }

    /// Overall metafile width in logical units.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Overall metafile height in logical units.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width_pixels(&self) -> f32 {
        self.width as f32 * PIXELS_PER_INCH / f32::from(self.inch)
    }

    pub fn height_pixels(&self) -> f32 {
        self.height as f32 * PIXELS_PER_INCH / f32::from(self.inch)
    }

    /// Width of the rectangle bounding the painted figures, in pixels.
    pub fn width_bounds_pixels(&self) -> i32 {
        self.bounds.map_or(-1, |(l, _, r, _)| r.saturating_sub(l))
    }

    /// Height of the rectangle bounding the painted figures, in pixels.
    pub fn height_bounds_pixels(&self) -> i32 {
        self.bounds.map_or(-1, |(_, t, _, b)| b.saturating_sub(t))
    }

    /// Width of the bounding rectangle, converted back to metafile units.
    pub fn width_bounds_units(&self) -> i32 {
        (f32::from(self.inch) * self.width_bounds_pixels() as f32 / PIXELS_PER_INCH) as i32
    }

    /// Height of the bounding rectangle, converted back to metafile units.
    pub fn height_bounds_units(&self) -> i32 {
        (f32::from(self.inch) * self.height_bounds_pixels() as f32 / PIXELS_PER_INCH) as i32
    }

    /// X offset of the bounding rectangle, in pixels.
    pub fn x_offset(&self) -> i32 {
        self.bounds.map_or(-1, |(l, _, _, _)| l)
    }

    /// Y offset of the bounding rectangle, in pixels.
    pub fn y_offset(&self) -> i32 {
        self.bounds.map_or(-1, |(_, t, _, _)| t)
    }
}

struct Scanner {
    coords: CoordState,
    objects: ObjectTable,
    pen: Option<usize>,
    brush: Option<usize>,
    font: Option<usize>,
    align_h: HorizAlign,
    align_v: VertAlign,
    start: (i32, i32),
    first_effective_paint: bool,
    geometry: BoundsAcc,
    images: BoundsAcc,
    vp_x: i32,
    vp_y: i32,
    vp_w: i32,
    vp_h: i32,
    inch: u16,
    width: i32,
    height: i32,
}

impl Scanner {
    fn scan_record(&mut self, function: u16, words: u32, body: &mut WordReader<'_>) -> Result<()> {
        match function {
            record::SET_MAP_MODE => {
                let mode = body.read_i16()?;
                self.coords.set_map_mode(mode);
            }

            record::SET_WINDOW_ORG => {
                self.vp_y = body.read_i16()?.into();
                self.vp_x = body.read_i16()?.into();
            }

            record::SET_WINDOW_EXT => {
                let h = body.read_i16()?;
                let w = body.read_i16()?;
                let (w, h) = self.coords.apply_extents(h, w);
                self.vp_w = w;
                self.vp_h = h;
            }

            record::SET_VIEWPORT_EXT => {
                let h = body.read_i16()?;
                let w = body.read_i16()?;
                self.coords.apply_extents(h, w);
            }

            record::CREATE_PEN_INDIRECT => {
                let style = body.read_u16()?;
                let width = body.read_i16()?;
                body.read_i16()?;
                let color = Color::from_colorref(body.read_u32()?);
                let obj = if style == crate::constants::pen::PS_NULL {
                    GdiObject::NullPen
                } else {
                    GdiObject::Pen(PenDef { style, width: width.into(), color })
                };
                self.objects.insert(obj);
            }

            record::CREATE_BRUSH_INDIRECT => {
                let style = body.read_u16()?;
                let color = Color::from_colorref(body.read_u32()?);
                let hatch = body.read_u16()?;
                let obj = if style == crate::constants::brush::BS_NULL {
                    GdiObject::NullBrush
                } else {
                    GdiObject::Brush(BrushDef { style, color, hatch })
                };
                self.objects.insert(obj);
            }

            record::CREATE_FONT_INDIRECT => {
                let height = body.read_i16()?;
                let _width = body.read_i16()?;
                let escapement = body.read_i16()?;
                let orientation = body.read_i16()?;
                let weight = body.read_i16()?;
                let italic = body.read_u8()? != 0;
                let underline = body.read_u8()? != 0;
                let strikeout = body.read_u8()? != 0;
                let cs = body.read_u8()?;
                body.skip(4)?;
                let face_bytes = body.read_bytes(body.remaining())?;
                let end = face_bytes.iter().position(|&b| b == 0).unwrap_or(face_bytes.len());
                let face = decode_string(cs, &face_bytes[..end]);
                self.objects.insert(GdiObject::Font(FontSpec {
                    height: height.into(),
                    weight: weight.into(),
                    italic,
                    underline,
                    strikeout,
                    escapement: escapement.into(),
                    orientation: orientation.into(),
                    charset: cs,
                    face,
                }));
            }

            record::CREATE_REGION => {
                self.objects.insert(GdiObject::Region);
            }

            record::CREATE_PALETTE => {
                self.objects.insert(GdiObject::Palette);
            }

            record::SET_TEXT_ALIGN => {
                let align = body.read_u16()?;
                self.align_h = horizontal_alignment(align);
                self.align_v = vertical_alignment(align);
            }

            record::SELECT_OBJECT => {
                let handle = body.read_u16()? as usize;
                // handles past the table select stock objects; irrelevant here
                if let Ok(Some(obj)) = self.objects.get(handle) {
                    match obj {
                        GdiObject::Pen(_) => self.pen = Some(handle),
                        GdiObject::NullPen => self.pen = None,
                        GdiObject::Brush(_) => self.brush = Some(handle),
                        GdiObject::NullBrush => self.brush = None,
                        GdiObject::Font(_) => self.font = Some(handle),
                        _ => {}
                    }
                }
            }

            record::DELETE_OBJECT => {
                let handle = body.read_u16()? as usize;
                if self.pen == Some(handle) {
                    self.pen = None;
                }
                if self.brush == Some(handle) {
                    self.brush = None;
                }
                if self.font == Some(handle) {
                    self.font = None;
                }
                let _ = self.objects.clear(handle);
            }

            record::MOVE_TO => {
                let y = self.coords.y(body.read_i16()?);
                let x = self.coords.x(body.read_i16()?);
                self.start = (x, y);
            }

            record::LINE_TO => {
                let y = self.coords.y(body.read_i16()?);
                let x = self.coords.x(body.read_i16()?);
                if self.pen.is_some() {
                    let (sx, sy) = self.start;
                    self.geometry.add(sx, sy);
                    self.geometry.add(x, y);
                    self.first_effective_paint = false;
                }
                self.start = (x, y);
            }

            record::POLY_POLYGON => {
                let count = body.read_i16()?.max(0);
                let mut total = 0i32;
                for _ in 0..count {
                    total += i32::from(body.read_i16()?.max(0));
                }
                let painted = self.pen.is_some() || self.brush.is_some();
                for _ in 0..total {
                    let x = self.coords.x(body.read_i16()?);
                    let y = self.coords.y(body.read_i16()?);
                    if painted {
                        self.geometry.add(x, y);
                    }
                }
                self.first_effective_paint = false;
            }

            record::POLYGON | record::POLYLINE => {
                let count = body.read_i16()?.max(0);
                let mut acc = BoundsAcc::default();
                for _ in 0..count {
                    let x = self.coords.x(body.read_i16()?);
                    let y = self.coords.y(body.read_i16()?);
                    acc.add(x, y);
                }
                if let Some((l, t, r, b)) = acc.rect {
                    if function == record::POLYGON {
                        self.paint(l, t, r, b);
                    } else {
                        self.paint_with_pen(l, t, r, b);
                    }
                }
            }

            record::ELLIPSE | record::RECTANGLE | record::INTERSECT_CLIP_RECT => {
                let bottom = self.coords.y(body.read_i16()?);
                let right = self.coords.x(body.read_i16()?);
                let top = self.coords.y(body.read_i16()?);
                let left = self.coords.x(body.read_i16()?);
                self.paint(left, top, right, bottom);
            }

            record::ROUND_RECT => {
                body.skip(4)?;
                let bottom = self.coords.y(body.read_i16()?);
                let right = self.coords.x(body.read_i16()?);
                let top = self.coords.y(body.read_i16()?);
                let left = self.coords.x(body.read_i16()?);
                self.paint(left, top, right, bottom);
            }

            record::ARC | record::PIE | record::CHORD => {
                body.skip(8)?;
                let bottom = self.coords.y(body.read_i16()?);
                let right = self.coords.x(body.read_i16()?);
                let top = self.coords.y(body.read_i16()?);
                let left = self.coords.x(body.read_i16()?);
                self.paint(left, top, right, bottom);
            }

            record::TEXT_OUT | record::DRAW_TEXT => {
                let len = body.read_i16()?.max(0) as usize;
                let bytes = body.read_bytes(len)?.to_vec();
                if len % 2 != 0 {
                    body.read_u8()?;
                }
                let y = self.coords.y(body.read_i16()?);
                let x = self.coords.x(body.read_i16()?);
                self.text_bounds(&bytes, x, y);
            }

            record::EXT_TEXT_OUT => {
                let y = self.coords.y(body.read_i16()?);
                let x = self.coords.x(body.read_i16()?);
                let len = body.read_i16()?.max(0) as usize;
                let flags = body.read_u16()?;
                if flags
                    & (crate::constants::eto::ETO_CLIPPED | crate::constants::eto::ETO_OPAQUE)
                    != 0
                {
                    body.skip(8)?;
                }
                let bytes = body.read_bytes(len)?.to_vec();
                self.text_bounds(&bytes, x, y);
            }

            record::PAT_BLT => {
                let _rop = body.read_u32()?;
                let h = i32::from(body.read_i16()?);
                let w = self.coords.width(body.read_i16()?);
                let y = self.coords.y(body.read_i16()?);
                let x = self.coords.x(body.read_i16()?);
                if self.pen.is_some() || self.brush.is_some() {
                    self.geometry.add_rect(x, y, x.saturating_add(w), y.saturating_add(h));
                }
            }

            record::DIB_BIT_BLT => {
                let _rop = body.read_u32()?;
                body.skip(4)?; // source origin
                if words == 9 {
                    body.skip(2)?;
                }
                let h = i32::from(body.read_i16()?);
                let w = self.coords.width(body.read_i16()?);
                let y = self.coords.y(body.read_i16()?);
                let x = self.coords.x(body.read_i16()?);
                self.image_bounds(x, y, w, h);
            }

            record::DIB_STRETCH_BLT | record::STRETCH_DIB => {
                let _rop = body.read_u32()?;
                if function == record::STRETCH_DIB {
                    body.skip(2)?; // usage
                }
                body.skip(8)?; // source extent and origin
                let h = i32::from(body.read_i16()?);
                let w = self.coords.width(body.read_i16()?);
                let y = self.coords.y(body.read_i16()?);
                let x = self.coords.x(body.read_i16()?);
                self.image_bounds(x, y, w, h);
            }

            _ => {}
        }
        Ok(())
    }

    /// Fold a blit destination into the image box, converting the record's
    /// pixel-flavored units through the device factors.
    fn image_bounds(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let fx = self.vp_factor_x() * f32::from(self.inch) / PIXELS_PER_INCH;
        let fy = self.vp_factor_y() * f32::from(self.inch) / PIXELS_PER_INCH;
        let dx = (x as f32 * fx) as i32;
        let dy = (y as f32 * fy) as i32;
        let dw = (w as f32 * fx) as i32;
        let dh = (h as f32 * fy) as i32;
        self.images
            .add_rect(dx, dy, dx.saturating_add(dw), dy.saturating_add(dh));
    }

    fn width_pixels(&self) -> f32 {
        self.effective_width() as f32 * PIXELS_PER_INCH / f32::from(self.inch)
    }

    /// Overall width, falling back to the viewport before the final fixup.
    fn effective_width(&self) -> i32 {
        if self.width > 0 {
            self.width
        } else {
            self.vp_w.max(1)
        }
    }

    fn effective_height(&self) -> i32 {
        if self.height > 0 {
            self.height
        } else {
            self.vp_h.max(1)
        }
    }

    fn vp_factor_x(&self) -> f32 {
        if self.vp_w > 0 {
            self.width_pixels() / self.vp_w as f32
        } else {
            1.0
        }
    }

    fn vp_factor_y(&self) -> f32 {
        let height_pixels =
            self.effective_height() as f32 * PIXELS_PER_INCH / f32::from(self.inch);
        if self.vp_h > 0 {
            height_pixels / self.vp_h as f32
        } else {
            1.0
        }
    }

    /// Geometry bounds update gated on an active paint, with the initial
    /// white-wash exclusion.
    fn paint(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        if self.pen.is_none() && self.brush.is_none() {
            return;
        }
        let color = self
            .brush
            .or(self.pen)
            .and_then(|h| self.objects.get(h).ok().flatten())
            .and_then(paint_color);
        self.apply_paint(color, left, top, right, bottom);
    }

    fn paint_with_pen(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        let Some(pen) = self.pen else { return };
        let color = self.objects.get(pen).ok().flatten().and_then(paint_color);
        self.apply_paint(color, left, top, right, bottom);
    }

    fn apply_paint(&mut self, color: Option<Color>, l: i32, t: i32, r: i32, b: i32) {
        if self.first_effective_paint && color == Some(Color::WHITE) {
            return;
        }
        self.geometry.add_rect(l, t, r, b);
        self.first_effective_paint = false;
    }

    fn text_bounds(&mut self, bytes: &[u8], x: i32, y: i32) {
        let font = self
            .font
            .and_then(|h| self.objects.get(h).ok().flatten())
            .and_then(|obj| match obj {
                GdiObject::Font(f) => Some(f.clone()),
                _ => None,
            })
            .unwrap_or_default();
        let text = decode_string(font.charset, bytes);
        let size = font.height.unsigned_abs() as f32;
        // no font shaping in scope; a flat per-char advance estimate
        let width = (0.5 * size * text.chars().count() as f32) as i32;
        let height = match self.align_v {
            VertAlign::Baseline => (-0.8 * size) as i32,
            VertAlign::Top => size as i32,
            VertAlign::Bottom => 0,
        };
        let x = match self.align_h {
            HorizAlign::Left => x,
            HorizAlign::Center => x.saturating_sub(width / 2),
            HorizAlign::Right => x.saturating_sub(width),
        };
        self.geometry.add(x, y);
        self.geometry
            .add(x.saturating_add(width), y.saturating_add(height));
        self.first_effective_paint = false;
    }

    /// Rescale the geometry box into device pixels, rescale the image box
    /// from its own units, and merge.
    fn resolve_bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let scale = self.vp_factor_x();
        let geometry = self.geometry.rect.map(|(l, t, r, b)| {
            (
                ((self.vp_x as f32 + l as f32) * scale) as i32,
                ((self.vp_y as f32 + t as f32) * scale) as i32,
                ((self.vp_x as f32 + r as f32) * scale) as i32,
                ((self.vp_y as f32 + b as f32) * scale) as i32,
            )
        });
        let image_scale = if self.effective_width() > 0 {
            self.width_pixels() / self.effective_width() as f32
        } else {
            1.0
        };
        let images = self.images.rect.map(|(l, t, r, b)| {
            (
                (l as f32 * image_scale) as i32,
                (t as f32 * image_scale) as i32,
                (r as f32 * image_scale) as i32,
                (b as f32 * image_scale) as i32,
            )
        });
        match (geometry, images) {
            (Some(g), Some(i)) => Some((
                g.0.min(i.0),
                g.1.min(i.1),
                g.2.max(i.2),
                g.3.max(i.3),
            )),
            (Some(g), None) => Some(g),
            (None, Some(i)) => Some(i),
            (None, None) => None,
        }
    }
}

fn paint_color(obj: &GdiObject) -> Option<Color> {
    match obj {
        GdiObject::Pen(p) => Some(p.color),
        GdiObject::Brush(b) => Some(b.color),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::record;

    fn le16(words: &[i16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    fn rec(function: u16, operands: &[i16]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(operands.len() as u32 + 3).to_le_bytes());
        out.extend_from_slice(&function.to_le_bytes());
        out.extend_from_slice(&le16(operands));
        out
    }

    fn stream(num_objects: u16, records: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&9u16.to_le_bytes());
        out.extend_from_slice(&0x0300u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&num_objects.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        for r in records {
            out.extend_from_slice(r);
        }
        out.extend_from_slice(&3u32.to_le_bytes());
        out.extend_from_slice(&0i16.to_le_bytes());
        out
    }

    fn pen(colorref: u32) -> Vec<u8> {
        let c = colorref;
        rec(
            record::CREATE_PEN_INDIRECT,
            &[0, 1, 0, (c & 0xFFFF) as i16, ((c >> 16) & 0xFFFF) as i16],
        )
    }

    #[test]
    fn no_paint_no_bounds() {
        // geometry without any selected pen or brush contributes nothing
        let hp = HeaderProperties::scan(&stream(
            2,
            &[
                rec(record::SET_WINDOW_EXT, &[100, 100]),
                rec(record::RECTANGLE, &[40, 30, 20, 10]),
            ],
        ))
        .unwrap();
        assert_eq!(hp.width_bounds_pixels(), -1);
    }

    #[test]
    fn first_white_shape_is_ignored() {
        let white = 0x00FF_FFFFu32;
        let black = 0u32;
        let hp = HeaderProperties::scan(&stream(
            4,
            &[
                rec(record::SET_WINDOW_EXT, &[100, 100]),
                pen(white),
                rec(record::SELECT_OBJECT, &[0]),
                // white background wash over the full canvas
                rec(record::RECTANGLE, &[100, 100, 0, 0]),
                pen(black),
                rec(record::SELECT_OBJECT, &[1]),
                rec(record::RECTANGLE, &[40, 30, 20, 10]),
            ],
        ))
        .unwrap();
        // inch=576, width=vpW=100 -> width_pixels = 100*96/576 = 16.6 -> scale 1/6
        assert_eq!(hp.x_offset(), (10.0f32 * 96.0 / 576.0) as i32);
        assert_eq!(
            hp.width_bounds_pixels(),
            (30.0f32 * 96.0 / 576.0) as i32 - (10.0f32 * 96.0 / 576.0) as i32
        );
    }

    #[test]
    fn second_white_shape_counts() {
        let white = 0x00FF_FFFFu32;
        let hp = HeaderProperties::scan(&stream(
            4,
            &[
                rec(record::SET_WINDOW_EXT, &[96, 96]),
                pen(0),
                rec(record::SELECT_OBJECT, &[0]),
                rec(record::RECTANGLE, &[10, 10, 0, 0]),
                pen(white),
                rec(record::SELECT_OBJECT, &[1]),
                rec(record::RECTANGLE, &[90, 90, 50, 50]),
            ],
        ))
        .unwrap();
        // both rectangles participate
        assert!(hp.width_bounds_pixels() > 0);
        let expected_right = (90.0f32 * 96.0 / 576.0) as i32;
        assert_eq!(hp.x_offset() + hp.width_bounds_pixels(), expected_right);
    }

    #[test]
    fn lineto_needs_a_pen() {
        let hp = HeaderProperties::scan(&stream(
            2,
            &[
                rec(record::SET_WINDOW_EXT, &[100, 100]),
                rec(record::MOVE_TO, &[0, 0]),
                rec(record::LINE_TO, &[50, 50]),
            ],
        ))
        .unwrap();
        assert_eq!(hp.width_bounds_pixels(), -1);

        let hp = HeaderProperties::scan(&stream(
            2,
            &[
                rec(record::SET_WINDOW_EXT, &[100, 100]),
                pen(0),
                rec(record::SELECT_OBJECT, &[0]),
                rec(record::MOVE_TO, &[0, 0]),
                rec(record::LINE_TO, &[50, 50]),
            ],
        ))
        .unwrap();
        assert!(hp.width_bounds_pixels() >= 0);
    }

    #[test]
    fn viewport_supplies_size_without_placeable_header() {
        let hp = HeaderProperties::scan(&stream(
            0,
            &[
                rec(record::SET_WINDOW_ORG, &[0, 0]),
                rec(record::SET_WINDOW_EXT, &[300, 500]),
            ],
        ))
        .unwrap();
        assert_eq!(hp.width(), 500);
        assert_eq!(hp.height(), 300);
    }
}
