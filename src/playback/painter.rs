//! The record interpreter.
//!
//! [`Painter`] replays a decoded [`RecordStore`] against a [`Surface`],
//! maintaining the GDI selection state machine: an object table filled by
//! create records, per-kind selections, foreground/background colors, the
//! LINETO current point, and a SAVEDC/RESTOREDC stack.
//!
//! Nothing draws without a selection. A geometry record fills only when a
//! brush is selected and strokes only when a pen is; with neither it is a
//! no-op. Handle misuse (out-of-range indexes, deleting vacant slots) is
//! collected as [`PlaybackWarning`]s and the offending record is skipped, so
//! a damaged file still renders everything it can. The one hard stop is
//! RESTOREDC with nothing saved.

use crate::constants::{brush, pen, record, stock};
use crate::dib::decode_dib;
use crate::encoding::{decode_string, horizontal_alignment, vertical_alignment};
use crate::error::{Error, Result};
use crate::objects::{BrushDef, Color, FontSpec, GdiObject, ObjectTable, PenDef};
use crate::record::MetaRecord;
use crate::store::RecordStore;
use crate::texture::TextureFactory;

use super::state::DcState;
use super::surface::{ArcKind, Paint, Point, Rect, Shape, Surface, TextStyle};

/// A recoverable anomaly observed during playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackWarning {
    /// A handle outside both the object table and the stock-object range.
    HandleOutOfRange { record: usize, handle: usize },
    /// SELECTOBJECT addressed a vacant slot.
    SelectedUnusedHandle { record: usize, handle: usize },
    /// DELETEOBJECT addressed a vacant slot.
    DeletedUnusedHandle { record: usize, handle: usize },
    /// A create record found no free slot (the header under-declared).
    ObjectTableFull { record: usize },
    /// An embedded bitmap did not decode.
    BadBitmap { record: usize },
}

/// Replays a [`RecordStore`] into drawing-surface calls.
pub struct Painter<'a> {
    store: &'a RecordStore,
    textures: TextureFactory,
    warnings: Vec<PlaybackWarning>,
    dest_w: f64,
    dest_h: f64,
}

impl<'a> Painter<'a> {
    /// Painter targeting the store's own viewport size (scale 1).
    pub fn new(store: &'a RecordStore) -> Self {
        Self::with_size(store, store.vp_w() as f64, store.vp_h() as f64)
    }

    /// Painter scaling playback into a `dest_w` x `dest_h` device area.
    pub fn with_size(store: &'a RecordStore, dest_w: f64, dest_h: f64) -> Self {
        Self {
            store,
            textures: TextureFactory::new(),
            warnings: Vec::new(),
            dest_w,
            dest_h,
        }
    }

    /// Anomalies observed by the last [`paint`](Self::paint) run.
    pub fn warnings(&self) -> &[PlaybackWarning] {
        &self.warnings
    }

    /// Replay every record, in order, against `surface`.
    pub fn paint(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.warnings.clear();
        let mut run = Playback {
            objects: ObjectTable::new(self.store.num_objects()),
            state: DcState::default(),
            stack: Vec::new(),
            org_x: f64::from(-self.store.vp_x()),
            org_y: f64::from(-self.store.vp_y()),
            vp_w: f64::from(self.store.vp_w().max(1)),
            vp_h: f64::from(self.store.vp_h().max(1)),
            dest_w: self.dest_w,
            dest_h: self.dest_h,
            textures: &mut self.textures,
            warnings: &mut self.warnings,
        };
        for (idx, mr) in self.store.records().iter().enumerate() {
            run.step(idx, mr, surface)?;
        }
        Ok(())
    }
}

struct Playback<'a> {
    objects: ObjectTable,
    state: DcState,
    stack: Vec<DcState>,
    org_x: f64,
    org_y: f64,
    vp_w: f64,
    vp_h: f64,
    dest_w: f64,
    dest_h: f64,
    textures: &'a mut TextureFactory,
    warnings: &'a mut Vec<PlaybackWarning>,
}

impl Playback<'_> {
    fn scale_x(&self) -> f64 {
        self.dest_w / self.vp_w
    }

    fn scale_y(&self) -> f64 {
        self.dest_h / self.vp_h
    }

    fn tx(&self, x: i32) -> f64 {
        self.scale_x() * (self.org_x + f64::from(x))
    }

    fn ty(&self, y: i32) -> f64 {
        self.scale_y() * (self.org_y + f64::from(y))
    }

    fn warn(&mut self, warning: PlaybackWarning) {
        log::warn!("wmf playback: {:?}", warning);
        self.warnings.push(warning);
    }

    fn step(&mut self, idx: usize, mr: &MetaRecord, surface: &mut dyn Surface) -> Result<()> {
        match mr.function {
            record::SET_WINDOW_ORG => {
                self.org_x = f64::from(-mr.op(0));
                self.org_y = f64::from(-mr.op(1));
            }

            record::SET_WINDOW_EXT => {
                self.vp_w = f64::from(mr.op(0).max(1));
                self.vp_h = f64::from(mr.op(1).max(1));
            }

            record::SET_POLY_FILL_MODE => {
                self.state.poly_fill_mode = mr.op(0) as u16;
            }

            record::SET_TEXT_ALIGN => {
                let align = mr.op(0) as u16;
                self.state.align_h = horizontal_alignment(align);
                self.state.align_v = vertical_alignment(align);
            }

            record::SET_TEXT_COLOR => {
                self.state.foreground = Some(operand_color(mr, 0));
            }

            record::SET_BK_COLOR => {
                self.state.background = Some(operand_color(mr, 0));
            }

            record::CREATE_PEN_INDIRECT => {
                let style = mr.op(0) as u16;
                let obj = if style & 0x0F == pen::PS_NULL {
                    GdiObject::NullPen
                } else {
                    GdiObject::Pen(PenDef {
                        style,
                        width: mr.op(4),
                        color: operand_color(mr, 1),
                    })
                };
                self.create(idx, obj);
            }

            record::CREATE_BRUSH_INDIRECT => {
                let style = mr.op(0) as u16;
                let obj = if style == brush::BS_NULL {
                    GdiObject::NullBrush
                } else {
                    GdiObject::Brush(BrushDef {
                        style,
                        color: operand_color(mr, 1),
                        hatch: mr.op(4) as u16,
                    })
                };
                self.create(idx, obj);
            }

            record::CREATE_FONT_INDIRECT => {
                let font = FontSpec {
                    height: mr.op(0),
                    weight: mr.op(2),
                    italic: mr.op(1) != 0,
                    underline: mr.op(3) != 0,
                    strikeout: mr.op(4) != 0,
                    orientation: mr.op(5),
                    escapement: mr.op(6),
                    charset: mr.op(7) as u8,
                    face: mr.text().unwrap_or("System").to_string(),
                };
                self.create(idx, GdiObject::Font(font));
            }

            record::CREATE_PALETTE => self.create(idx, GdiObject::Palette),
            record::CREATE_REGION => self.create(idx, GdiObject::Region),
            record::CREATE_PATTERN_BRUSH | record::DIB_CREATE_PATTERN_BRUSH => {
                self.create(idx, GdiObject::Bitmap)
            }

            record::SELECT_OBJECT => {
                self.select_object(idx, mr.op(0) as usize, surface);
            }

            record::DELETE_OBJECT => {
                self.delete_object(idx, mr.op(0) as usize);
            }

            record::SAVE_DC => {
                self.stack.push(self.state.clone());
                surface.push_state();
            }

            record::RESTORE_DC => {
                let saved = self.stack.pop().ok_or(Error::StateStackUnderflow)?;
                self.state = saved;
                surface.pop_state();
            }

            record::MOVE_TO => {
                self.state.position = (self.tx(mr.op(0)), self.ty(mr.op(1)));
            }

            record::LINE_TO => {
                let end = (self.tx(mr.op(0)), self.ty(mr.op(1)));
                if let Some(pen) = self.pen_def() {
                    self.apply_pen(&pen, surface);
                    surface.draw_line(
                        Point::new(self.state.position.0, self.state.position.1),
                        Point::new(end.0, end.1),
                    );
                }
                // the current point advances whether or not anything drew
                self.state.position = end;
            }

            record::POLYLINE => {
                if let Some(pen) = self.pen_def() {
                    let points = self.point_run(mr, 1, mr.op(0) as usize);
                    self.apply_pen(&pen, surface);
                    surface.stroke_shape(&Shape::Polyline(points));
                }
            }

            record::POLYGON => {
                let points = self.point_run(mr, 1, mr.op(0) as usize);
                let shape = Shape::Polygon { points, even_odd: self.state.even_odd() };
                self.fill_then_stroke(&shape, surface);
            }

            record::POLY_POLYGON => {
                let count = mr.op(0).max(0) as usize;
                let mut polygons = Vec::with_capacity(count);
                let mut offset = 1 + count;
                for p in 0..count {
                    let n = mr.op(1 + p).max(0) as usize;
                    polygons.push(self.point_run(mr, offset, n));
                    offset += n * 2;
                }
                let shape = Shape::PolyPolygon { polygons, even_odd: self.state.even_odd() };
                self.fill_then_stroke(&shape, surface);
            }

            record::RECTANGLE => {
                let shape = Shape::Rect(self.operand_rect(mr));
                self.fill_then_stroke(&shape, surface);
            }

            record::ROUND_RECT => {
                let shape = Shape::RoundRect {
                    rect: self.operand_rect(mr),
                    corner_w: self.scale_x() * f64::from(mr.op(4)),
                    corner_h: self.scale_y() * f64::from(mr.op(5)),
                };
                self.fill_then_stroke(&shape, surface);
            }

            record::ELLIPSE => {
                let shape = Shape::Ellipse(self.operand_rect(mr));
                self.fill_then_stroke(&shape, surface);
            }

            record::ARC | record::PIE | record::CHORD => {
                let kind = match mr.function {
                    record::ARC => ArcKind::Open,
                    record::PIE => ArcKind::Pie,
                    _ => ArcKind::Chord,
                };
                let shape = self.arc_shape(mr, kind);
                if kind == ArcKind::Open {
                    if let Some(p) = self.pen_def() {
                        self.apply_pen(&p, surface);
                        surface.stroke_shape(&shape);
                    }
                } else {
                    self.fill_then_stroke(&shape, surface);
                }
            }

            record::TEXT_OUT | record::DRAW_TEXT | record::EXT_TEXT_OUT => {
                self.draw_text(mr, surface);
            }

            record::DIB_BIT_BLT | record::DIB_STRETCH_BLT | record::STRETCH_DIB => {
                let Some(bytes) = mr.bytes() else { return Ok(()) };
                if bytes.is_empty() {
                    return Ok(());
                }
                match decode_dib(bytes) {
                    Some(img) => {
                        let dest = Rect::new(
                            self.tx(mr.op(0)),
                            self.ty(mr.op(1)),
                            self.scale_x() * f64::from(mr.op(2)),
                            self.scale_y() * f64::from(mr.op(3)),
                        );
                        surface.draw_image(&img, dest);
                    }
                    None => self.warn(PlaybackWarning::BadBitmap { record: idx }),
                }
            }

            // Consumed but never drawn. The breadth of this list is part of
            // the format contract: these records exist in real files and must
            // not disturb playback.
            record::SET_VIEWPORT_ORG
            | record::SET_VIEWPORT_EXT
            | record::OFFSET_WINDOW_ORG
            | record::SCALE_WINDOW_EXT
            | record::OFFSET_VIEWPORT_ORG
            | record::SCALE_VIEWPORT_EXT
            | record::SET_MAP_MODE
            | record::SET_BK_MODE
            | record::SET_ROP2
            | record::SET_REL_ABS
            | record::SET_STRETCH_BLT_MODE
            | record::SET_TEXT_CHAR_EXTRA
            | record::SET_TEXT_JUSTIFICATION
            | record::SET_MAPPER_FLAGS
            | record::SET_PIXEL
            | record::FLOOD_FILL
            | record::PAT_BLT
            | record::BIT_BLT
            | record::STRETCH_BLT
            | record::SET_DIB_TO_DEV
            | record::ESCAPE
            | record::FILL_REGION
            | record::FRAME_REGION
            | record::INVERT_REGION
            | record::PAINT_REGION
            | record::EXCLUDE_CLIP_RECT
            | record::INTERSECT_CLIP_RECT
            | record::SELECT_CLIP_REGION
            | record::OFFSET_CLIP_RGN
            | record::SELECT_PALETTE
            | record::REALIZE_PALETTE
            | record::ANIMATE_PALETTE
            | record::SET_PAL_ENTRIES
            | record::RESIZE_PALETTE => {}

            _ => {
                log::debug!("wmf playback: ignoring record {}", mr.name());
            }
        }
        Ok(())
    }

    fn create(&mut self, idx: usize, obj: GdiObject) {
        if self.objects.insert(obj).is_none() {
            self.warn(PlaybackWarning::ObjectTableFull { record: idx });
        }
    }

    fn select_object(&mut self, idx: usize, handle: usize, surface: &mut dyn Surface) {
        if handle >= self.objects.len() {
            // past the table lies the stock-object range
            let id = (handle - self.objects.len()) as u16;
            match id {
                stock::NULL_BRUSH => self.state.brush = None,
                stock::NULL_PEN => self.state.pen = None,
                stock::WHITE_BRUSH..=stock::BLACK_BRUSH
                | stock::WHITE_PEN
                | stock::BLACK_PEN
                | stock::OEM_FIXED_FONT..=stock::SYSTEM_FIXED_FONT => {}
                _ => self.warn(PlaybackWarning::HandleOutOfRange { record: idx, handle }),
            }
            return;
        }
        match self.objects.get(handle) {
            Ok(Some(obj)) => match obj {
                GdiObject::Pen(p) => {
                    let color = p.color;
                    self.state.pen = Some(handle);
                    surface.set_paint(Paint::Solid(color));
                }
                GdiObject::Brush(b) => {
                    let color = b.color;
                    self.state.brush = Some(handle);
                    surface.set_paint(Paint::Solid(color));
                }
                GdiObject::Font(_) => self.state.font = Some(handle),
                GdiObject::NullPen => self.state.pen = None,
                GdiObject::NullBrush => self.state.brush = None,
                GdiObject::Palette | GdiObject::Region | GdiObject::Bitmap => {}
            },
            Ok(None) => {
                self.warn(PlaybackWarning::SelectedUnusedHandle { record: idx, handle })
            }
            Err(_) => self.warn(PlaybackWarning::HandleOutOfRange { record: idx, handle }),
        }
    }

    fn delete_object(&mut self, idx: usize, handle: usize) {
        if self.state.pen == Some(handle) {
            self.state.pen = None;
        }
        if self.state.brush == Some(handle) {
            self.state.brush = None;
        }
        if self.state.font == Some(handle) {
            self.state.font = None;
        }
        match self.objects.clear(handle) {
            Ok(true) => {}
            Ok(false) => self.warn(PlaybackWarning::DeletedUnusedHandle { record: idx, handle }),
            Err(_) => self.warn(PlaybackWarning::HandleOutOfRange { record: idx, handle }),
        }
    }

    fn pen_def(&self) -> Option<PenDef> {
        let handle = self.state.pen?;
        match self.objects.get(handle).ok().flatten() {
            Some(GdiObject::Pen(p)) => Some(*p),
            _ => None,
        }
    }

    fn brush_def(&self) -> Option<BrushDef> {
        let handle = self.state.brush?;
        match self.objects.get(handle).ok().flatten() {
            Some(GdiObject::Brush(b)) => Some(*b),
            _ => None,
        }
    }

    fn font_spec(&self) -> Option<FontSpec> {
        let handle = self.state.font?;
        match self.objects.get(handle).ok().flatten() {
            Some(GdiObject::Font(f)) => Some(f.clone()),
            _ => None,
        }
    }

    /// Resolve the selected brush to a paint: solid color, hatch tile, or
    /// nothing (null brush, unknown hatch, unsupported style).
    fn fill_paint(&mut self) -> Option<Paint> {
        let b = self.brush_def()?;
        match b.style {
            brush::BS_SOLID => Some(Paint::Solid(b.color)),
            brush::BS_HATCHED => {
                let tile = match self.state.background {
                    Some(bg) => self.textures.texture_with_colors(b.hatch, b.color, bg),
                    None => self.textures.texture_with_foreground(b.hatch, b.color),
                };
                tile.cloned().map(Paint::Pattern)
            }
            _ => None,
        }
    }

    fn apply_pen(&self, p: &PenDef, surface: &mut dyn Surface) {
        surface.set_paint(Paint::Solid(p.color));
        surface.set_stroke(self.scale_x() * f64::from(p.width.max(1)), p.style);
    }

    /// Brush fill first, pen stroke second; neither selected means no call.
    fn fill_then_stroke(&mut self, shape: &Shape, surface: &mut dyn Surface) {
        if let Some(paint) = self.fill_paint() {
            surface.set_paint(paint);
            surface.fill_shape(shape);
        }
        if let Some(p) = self.pen_def() {
            self.apply_pen(&p, surface);
            surface.stroke_shape(shape);
        }
    }

    fn point_run(&self, mr: &MetaRecord, offset: usize, count: usize) -> Vec<Point> {
        (0..count)
            .map(|i| {
                Point::new(
                    self.tx(mr.op(offset + i * 2)),
                    self.ty(mr.op(offset + i * 2 + 1)),
                )
            })
            .collect()
    }

    /// Device rect from the standard [left, top, right, bottom] operands.
    fn operand_rect(&self, mr: &MetaRecord) -> Rect {
        Rect::from_corners(
            self.tx(mr.op(0)),
            self.ty(mr.op(1)),
            self.tx(mr.op(2)),
            self.ty(mr.op(3)),
        )
    }

    fn arc_shape(&self, mr: &MetaRecord, kind: ArcKind) -> Shape {
        let rect = self.operand_rect(mr);
        let cx = rect.x + rect.w / 2.0;
        let cy = rect.y + rect.h / 2.0;
        // radial angles, counterclockwise-positive with y pointing down
        let angle = |x: i32, y: i32| {
            let dx = self.tx(x) - cx;
            let dy = cy - self.ty(y);
            dy.atan2(dx).to_degrees()
        };
        let start = angle(mr.op(4), mr.op(5));
        let end = angle(mr.op(6), mr.op(7));
        let mut extent = end - start;
        if extent <= 0.0 {
            extent += 360.0;
        }
        Shape::Arc { rect, start_deg: start, extent_deg: extent, kind }
    }

    fn draw_text(&mut self, mr: &MetaRecord, surface: &mut dyn Surface) {
        let Some(bytes) = mr.bytes() else { return };
        let font = self.font_spec().unwrap_or_default();
        let text = decode_string(font.charset, bytes);
        if text.is_empty() {
            return;
        }
        let color = self.state.foreground.unwrap_or(Color::BLACK);
        let clip = if mr.function == record::EXT_TEXT_OUT && mr.operands.len() >= 7 {
            Some(Rect::from_corners(
                self.tx(mr.op(3)),
                self.ty(mr.op(4)),
                self.tx(mr.op(5)),
                self.ty(mr.op(6)),
            ))
        } else {
            None
        };
        let size = (self.scale_y() * f64::from(font.height)).abs();
        let style = TextStyle {
            size: if size > 0.0 { size } else { 12.0 },
            font,
            color,
            align_h: self.state.align_h,
            align_v: self.state.align_v,
            clip,
        };
        surface.set_paint(Paint::Solid(color));
        let origin = Point::new(self.tx(mr.op(0)), self.ty(mr.op(1)));
        surface.draw_text(&text, origin, &style);
    }
}

fn operand_color(mr: &MetaRecord, offset: usize) -> Color {
    Color::new(
        mr.op(offset) as u8,
        mr.op(offset + 1) as u8,
        mr.op(offset + 2) as u8,
    )
}
