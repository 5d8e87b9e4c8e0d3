//! WMF record store: headers and the record-stream parser.
//!
//! A WMF file is an optional 22-byte Aldus placeable header, an 18-byte
//! standard header, then records of 16-bit words: `u32 size-in-words`,
//! `i16 function`, and `size - 3` words of function-specific operands. A
//! function code of zero or less terminates the stream.
//!
//! [`RecordStore::parse`] decodes the whole stream into an ordered
//! [`MetaRecord`] list plus viewport metadata. Unknown function codes are
//! never an error: their declared size is consumed verbatim and parsing
//! continues, so files written by newer producers still play back.

use crate::binary::WordReader;
use crate::constants::{
    eto, map_mode, record, ALDUS_PLACEABLE_KEY, DEFAULT_INCH_VALUE, PIXELS_PER_INCH,
};
use crate::encoding::decode_string;
use crate::error::{Error, Result};
use crate::objects::Color;
use crate::record::{MetaRecord, Payload};

/// Aldus placeable header: bounding box and density of the metafile.
#[derive(Debug, Clone, Copy)]
pub struct PlaceableHeader {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
    /// Logical units per inch.
    pub inch: u16,
    pub checksum: u16,
}

impl PlaceableHeader {
    /// Check whether the stream opens with the placeable magic.
    pub fn is_placeable(data: &[u8]) -> bool {
        crate::binary::read_u32_le(data, 0) == Some(ALDUS_PLACEABLE_KEY)
    }

    fn read(r: &mut WordReader<'_>) -> Result<Self> {
        let key = r.read_u32()?;
        if key != ALDUS_PLACEABLE_KEY {
            return Err(Error::InvalidFormat(format!(
                "invalid placeable key 0x{:08X}",
                key
            )));
        }
        let _hmf = r.read_i16()?;
        let left = r.read_i16()?;
        let top = r.read_i16()?;
        let right = r.read_i16()?;
        let bottom = r.read_i16()?;
        let inch = r.read_u16()?;
        let _reserved = r.read_u32()?;
        let checksum = r.read_u16()?;
        Ok(Self { left, top, right, bottom, inch, checksum })
    }

    pub fn width(&self) -> i32 {
        i32::from(self.right) - i32::from(self.left)
    }

    pub fn height(&self) -> i32 {
        i32::from(self.bottom) - i32::from(self.top)
    }
}

/// Standard WMF header.
#[derive(Debug, Clone, Copy)]
pub struct StandardHeader {
    /// 1 = memory metafile, 2 = disk metafile.
    pub file_type: u16,
    /// Header size in words (always 9).
    pub header_size: u16,
    pub version: u16,
    /// File size in words.
    pub file_size: u32,
    /// Number of GDI object slots the player must provide.
    pub num_objects: u16,
    /// Size of the largest record, in words.
    pub max_record: u32,
    pub num_params: u16,
}

impl StandardHeader {
    fn read(r: &mut WordReader<'_>) -> Result<Self> {
        Ok(Self {
            file_type: r.read_u16()?,
            header_size: r.read_u16()?,
            version: r.read_u16()?,
            file_size: r.read_u32()?,
            num_objects: r.read_u16()?,
            max_record: r.read_u32()?,
            num_params: r.read_u16()?,
        })
    }
}

/// Read the optional placeable header and the standard header.
pub(crate) fn read_headers(
    r: &mut WordReader<'_>,
) -> Result<(Option<PlaceableHeader>, StandardHeader)> {
    let placeable = if r.remaining() >= 4 && {
        let mut peek = r.clone();
        peek.read_u32()? == ALDUS_PLACEABLE_KEY
    } {
        Some(PlaceableHeader::read(r)?)
    } else {
        None
    };
    let header = StandardHeader::read(r)?;
    Ok((placeable, header))
}

/// Pull the next record envelope off the stream: its function code and a
/// sub-reader covering exactly the declared operand bytes. `Ok(None)` is the
/// terminator (function code ≤ 0).
pub(crate) fn next_record<'a>(
    r: &mut WordReader<'a>,
) -> Result<Option<(u16, u32, WordReader<'a>)>> {
    let offset = r.offset();
    let size = r.read_u32()?;
    let function = r.read_i16()?;
    if function <= 0 {
        return Ok(None);
    }
    if size < 3 {
        return Err(Error::InvalidRecordSize { size, offset });
    }
    let words = size - 3;
    let body = r.sub_reader(words as usize * 2)?;
    Ok(Some((function as u16, words, body)))
}

/// Coordinate decoding state shared by the parser and the bounds analyzer.
///
/// A negative window or viewport extent flips the sign of every coordinate
/// read on that axis from then on; anisotropic mapping mode additionally
/// scales x-coordinates by the window's width/height ratio.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CoordState {
    pub x_sign: i32,
    pub y_sign: i32,
    pub scale_xy: f32,
    pub isotropic: bool,
}

impl Default for CoordState {
    fn default() -> Self {
        Self { x_sign: 1, y_sign: 1, scale_xy: 1.0, isotropic: true }
    }
}

impl CoordState {
    /// Decode an x-coordinate word: sign, then aspect correction.
    #[inline]
    pub fn x(&self, raw: i16) -> i32 {
        (f32::from(raw) * self.x_sign as f32 * self.scale_xy) as i32
    }

    /// Decode a y-coordinate word: sign only.
    #[inline]
    pub fn y(&self, raw: i16) -> i32 {
        i32::from(raw) * self.y_sign
    }

    /// Decode a width extent: aspect correction without sign.
    #[inline]
    pub fn width(&self, raw: i16) -> i32 {
        (f32::from(raw) * self.scale_xy) as i32
    }

    pub fn set_map_mode(&mut self, mode: i16) {
        if mode == map_mode::MM_ANISOTROPIC as i16 {
            self.isotropic = false;
        }
    }

    /// Fold a window/viewport extent pair into the state and return the
    /// corrected `(width, height)`. Reading order in the stream is y first.
    pub fn apply_extents(&mut self, h: i16, w: i16) -> (i32, i32) {
        let mut h = i32::from(h);
        let mut w = i32::from(w);
        if h < 0 {
            h = -h;
            self.y_sign = -1;
        }
        if w < 0 {
            w = -w;
            self.x_sign = -1;
        }
        if !self.isotropic && h != 0 {
            self.scale_xy = w as f32 / h as f32;
        }
        ((w as f32 * self.scale_xy) as i32, h)
    }
}

/// A fully decoded WMF file: ordered records plus viewport metadata. The
/// authoritative script for playback; records never change after parsing.
#[derive(Debug, Clone)]
pub struct RecordStore {
    pub placeable: Option<PlaceableHeader>,
    pub header: StandardHeader,
    records: Vec<MetaRecord>,
    vp_x: i32,
    vp_y: i32,
    vp_w: i32,
    vp_h: i32,
}

impl RecordStore {
    /// Decode a complete WMF byte stream.
    ///
    /// Fails on truncation or an impossible record size; an unrecognized
    /// function code is consumed per its declared size and kept as a raw
    /// record.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = WordReader::new(data);
        let (placeable, header) = read_headers(&mut r)?;

        let mut decoder = Decoder {
            coords: CoordState::default(),
            store: RecordStore {
                placeable,
                header,
                records: Vec::with_capacity(32),
                vp_x: 0,
                vp_y: 0,
                vp_w: 1000,
                vp_h: 1000,
            },
        };

        while let Some((function, words, mut body)) = next_record(&mut r)? {
            let rec = decoder.decode(function, words, &mut body)?;
            decoder.store.records.push(rec);
        }
        Ok(decoder.store)
    }

    pub fn records(&self) -> &[MetaRecord] {
        &self.records
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Number of GDI object slots a player must allocate.
    pub fn num_objects(&self) -> usize {
        self.header.num_objects as usize
    }

    /// Whether the stream carried an Aldus placeable header. Without one the
    /// overall size comes from the viewport instead.
    pub fn is_aldus(&self) -> bool {
        self.placeable.is_some()
    }

    pub fn vp_x(&self) -> i32 {
        self.vp_x
    }

    pub fn vp_y(&self) -> i32 {
        self.vp_y
    }

    pub fn vp_w(&self) -> i32 {
        self.vp_w
    }

    pub fn vp_h(&self) -> i32 {
        self.vp_h
    }

    /// Logical units per inch.
    pub fn units_per_inch(&self) -> u16 {
        self.placeable.map_or(DEFAULT_INCH_VALUE, |p| p.inch)
    }

    /// Overall width in logical units.
    pub fn width(&self) -> i32 {
        match &self.placeable {
            Some(p) => p.width(),
            None => self.vp_w,
        }
    }

    /// Overall height in logical units.
    pub fn height(&self) -> i32 {
        match &self.placeable {
            Some(p) => p.height(),
            None => self.vp_h,
        }
    }

    pub fn width_pixels(&self) -> f32 {
        self.width() as f32 * PIXELS_PER_INCH / f32::from(self.units_per_inch())
    }

    pub fn height_pixels(&self) -> f32 {
        self.height() as f32 * PIXELS_PER_INCH / f32::from(self.units_per_inch())
    }
}

struct Decoder {
    coords: CoordState,
    store: RecordStore,
}

impl Decoder {
    fn decode(&mut self, function: u16, words: u32, body: &mut WordReader<'_>) -> Result<MetaRecord> {
        let mut mr = MetaRecord::new(function, words);
        match function {
            record::SET_MAP_MODE => {
                let mode = body.read_i16()?;
                self.coords.set_map_mode(mode);
                mr.push(mode.into());
            }

            record::SET_WINDOW_ORG | record::SET_VIEWPORT_ORG => {
                let y = body.read_i16()?;
                let x = body.read_i16()?;
                mr.push(x.into());
                mr.push(y.into());
                if function == record::SET_WINDOW_ORG {
                    self.store.vp_x = x.into();
                    self.store.vp_y = y.into();
                }
            }

            record::SET_WINDOW_EXT | record::SET_VIEWPORT_EXT => {
                let h = body.read_i16()?;
                let w = body.read_i16()?;
                let (w, h) = self.coords.apply_extents(h, w);
                mr.push(w);
                mr.push(h);
                if function == record::SET_WINDOW_EXT {
                    self.store.vp_w = w;
                    self.store.vp_h = h;
                }
            }

            record::CREATE_PEN_INDIRECT => {
                let style = body.read_u16()?;
                let width = body.read_i16()?; // x of the width POINT
                body.read_i16()?; // y of the width POINT, unused
                let color = Color::from_colorref(body.read_u32()?);
                mr.push(style.into());
                mr.push(color.r.into());
                mr.push(color.g.into());
                mr.push(color.b.into());
                mr.push(width.into());
            }

            record::CREATE_BRUSH_INDIRECT => {
                let style = body.read_u16()?;
                let color = Color::from_colorref(body.read_u32()?);
                let hatch = body.read_u16()?;
                mr.push(style.into());
                mr.push(color.r.into());
                mr.push(color.g.into());
                mr.push(color.b.into());
                mr.push(hatch.into());
            }

            record::CREATE_FONT_INDIRECT => {
                let height = body.read_i16()?;
                let _width = body.read_i16()?;
                let escapement = body.read_i16()?;
                let orientation = body.read_i16()?;
                let weight = body.read_i16()?;
                let italic = body.read_u8()?;
                let underline = body.read_u8()?;
                let strikeout = body.read_u8()?;
                let cs = body.read_u8()?;
                let _out_precision = body.read_u8()?;
                let _clip_precision = body.read_u8()?;
                let _quality = body.read_u8()?;
                let _pitch_and_family = body.read_u8()?;
                let face = decode_face_name(cs, body.read_bytes(body.remaining())?);
                mr.push(height.into());
                mr.push(italic.into());
                mr.push(weight.into());
                mr.push(underline.into());
                mr.push(strikeout.into());
                mr.push(orientation.into());
                mr.push(escapement.into());
                mr.push(cs.into());
                mr.payload = Payload::Text(face);
            }

            record::SET_TEXT_COLOR | record::SET_BK_COLOR => {
                let color = Color::from_colorref(body.read_u32()?);
                mr.push(color.r.into());
                mr.push(color.g.into());
                mr.push(color.b.into());
            }

            record::LINE_TO | record::MOVE_TO => {
                let y = body.read_i16()?;
                let x = body.read_i16()?;
                mr.push(self.coords.x(x));
                mr.push(self.coords.y(y));
            }

            record::POLY_POLYGON => {
                let count = body.read_i16()?.max(0);
                mr.push(count.into());
                let mut total = 0i32;
                for _ in 0..count {
                    let n = i32::from(body.read_i16()?.max(0));
                    total += n;
                    mr.push(n);
                }
                for _ in 0..total {
                    let x = body.read_i16()?;
                    let y = body.read_i16()?;
                    mr.push(self.coords.x(x));
                    mr.push(self.coords.y(y));
                }
            }

            record::POLYGON | record::POLYLINE => {
                let count = body.read_i16()?.max(0);
                mr.push(count.into());
                for _ in 0..count {
                    let x = body.read_i16()?;
                    let y = body.read_i16()?;
                    mr.push(self.coords.x(x));
                    mr.push(self.coords.y(y));
                }
            }

            record::ELLIPSE
            | record::RECTANGLE
            | record::INTERSECT_CLIP_RECT
            | record::EXCLUDE_CLIP_RECT => {
                let bottom = body.read_i16()?;
                let right = body.read_i16()?;
                let top = body.read_i16()?;
                let left = body.read_i16()?;
                mr.push(self.coords.x(left));
                mr.push(self.coords.y(top));
                mr.push(self.coords.x(right));
                mr.push(self.coords.y(bottom));
            }

            record::ROUND_RECT => {
                let eh = body.read_i16()?;
                let ew = body.read_i16()?;
                let bottom = body.read_i16()?;
                let right = body.read_i16()?;
                let top = body.read_i16()?;
                let left = body.read_i16()?;
                mr.push(self.coords.x(left));
                mr.push(self.coords.y(top));
                mr.push(self.coords.x(right));
                mr.push(self.coords.y(bottom));
                mr.push(self.coords.width(ew));
                mr.push(eh.into());
            }

            record::ARC | record::PIE | record::CHORD => {
                let y_end = body.read_i16()?;
                let x_end = body.read_i16()?;
                let y_start = body.read_i16()?;
                let x_start = body.read_i16()?;
                let bottom = body.read_i16()?;
                let right = body.read_i16()?;
                let top = body.read_i16()?;
                let left = body.read_i16()?;
                mr.push(self.coords.x(left));
                mr.push(self.coords.y(top));
                mr.push(self.coords.x(right));
                mr.push(self.coords.y(bottom));
                mr.push(self.coords.x(x_start));
                mr.push(self.coords.y(y_start));
                mr.push(self.coords.x(x_end));
                mr.push(self.coords.y(y_end));
            }

            record::TEXT_OUT | record::DRAW_TEXT => {
                let len = body.read_i16()?.max(0) as usize;
                let bytes = body.read_bytes(len)?.to_vec();
                // strings occupy an even number of bytes on disk
                if len % 2 != 0 {
                    body.read_u8()?;
                }
                let y = body.read_i16()?;
                let x = body.read_i16()?;
                mr.push(self.coords.x(x));
                mr.push(self.coords.y(y));
                mr.payload = Payload::Bytes(bytes);
            }

            record::EXT_TEXT_OUT => {
                let y = body.read_i16()?;
                let x = body.read_i16()?;
                let len = body.read_i16()?.max(0) as usize;
                let flags = body.read_u16()?;
                mr.push(self.coords.x(x));
                mr.push(self.coords.y(y));
                mr.push(flags.into());
                if flags & (eto::ETO_CLIPPED | eto::ETO_OPAQUE) != 0 {
                    let cx1 = body.read_i16()?;
                    let cy1 = body.read_i16()?;
                    let cx2 = body.read_i16()?;
                    let cy2 = body.read_i16()?;
                    mr.push(self.coords.x(cx1));
                    mr.push(self.coords.y(cy1));
                    mr.push(self.coords.x(cx2));
                    mr.push(self.coords.y(cy2));
                }
                let bytes = body.read_bytes(len)?.to_vec();
                if len % 2 != 0 {
                    body.read_u8()?;
                }
                mr.payload = Payload::Bytes(bytes);
            }

            record::DIB_BIT_BLT => {
                let _rop = body.read_u32()?;
                let y_src = body.read_i16()?;
                let x_src = body.read_i16()?;
                if words == 9 {
                    // bitmap-free variant carries a reserved word instead
                    body.read_i16()?;
                }
                let h = body.read_i16()?;
                let w = body.read_i16()?;
                let y_dst = body.read_i16()?;
                let x_dst = body.read_i16()?;
                mr.push(self.coords.x(x_dst));
                mr.push(self.coords.y(y_dst));
                mr.push(self.coords.width(w));
                mr.push(h.into());
                mr.push(x_src.into());
                mr.push(y_src.into());
                mr.payload = Payload::Bytes(body.read_bytes(body.remaining())?.to_vec());
            }

            record::DIB_STRETCH_BLT | record::STRETCH_DIB => {
                let _rop = body.read_u32()?;
                let usage = if function == record::STRETCH_DIB {
                    body.read_i16()?
                } else {
                    0
                };
                let h_src = body.read_i16()?;
                let w_src = body.read_i16()?;
                let y_src = body.read_i16()?;
                let x_src = body.read_i16()?;
                let h_dst = body.read_i16()?;
                let w_dst = body.read_i16()?;
                let y_dst = body.read_i16()?;
                let x_dst = body.read_i16()?;
                mr.push(self.coords.x(x_dst));
                mr.push(self.coords.y(y_dst));
                mr.push(self.coords.width(w_dst));
                mr.push(h_dst.into());
                mr.push(x_src.into());
                mr.push(y_src.into());
                mr.push(w_src.into());
                mr.push(h_src.into());
                mr.push(usage.into());
                mr.payload = Payload::Bytes(body.read_bytes(body.remaining())?.to_vec());
            }

            record::PAT_BLT => {
                let rop = body.read_u32()?;
                let h = body.read_i16()?;
                let w = body.read_i16()?;
                let y = body.read_i16()?;
                let x = body.read_i16()?;
                mr.push(self.coords.x(x));
                mr.push(self.coords.y(y));
                mr.push(self.coords.width(w));
                mr.push(h.into());
                mr.push(rop as i32);
            }

            // Everything else, known or not, keeps its raw operand words.
            // Never failing on an unrecognized function code is the format's
            // forward-compatibility policy.
            _ => {
                for _ in 0..words {
                    mr.push(body.read_i16()?.into());
                }
            }
        }
        Ok(mr)
    }
}

/// Decode a LOGFONT face name: charset decode, cut at the NUL terminator,
/// then keep the leading run of alphanumeric/whitespace characters. An empty
/// result becomes "System".
fn decode_face_name(cs: u8, bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let decoded = decode_string(cs, &bytes[..end]);
    let keep = decoded
        .chars()
        .take_while(|c| c.is_alphanumeric() || c.is_whitespace())
        .count();
    if keep == 0 {
        return "System".to_string();
    }
    decoded.chars().take(keep).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{charset, record};

    // Test streams are assembled word by word, the way the format is defined.
    fn le16(words: &[i16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    fn standard_header(num_objects: u16) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&1u16.to_le_bytes()); // memory metafile
        out.extend_from_slice(&9u16.to_le_bytes());
        out.extend_from_slice(&0x0300u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&num_objects.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out
    }

    fn rec(function: u16, operands: &[i16]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(operands.len() as u32 + 3).to_le_bytes());
        out.extend_from_slice(&function.to_le_bytes());
        out.extend_from_slice(&le16(operands));
        out
    }

    fn eof() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&3u32.to_le_bytes());
        out.extend_from_slice(&0i16.to_le_bytes());
        out
    }

    fn stream(records: &[Vec<u8>]) -> Vec<u8> {
        let mut out = standard_header(4);
        for r in records {
            out.extend_from_slice(r);
        }
        out.extend_from_slice(&eof());
        out
    }

    #[test]
    fn empty_stream() {
        let store = RecordStore::parse(&stream(&[])).unwrap();
        assert_eq!(store.num_records(), 0);
        assert_eq!(store.num_objects(), 4);
        assert!(!store.is_aldus());
        assert_eq!(store.units_per_inch(), DEFAULT_INCH_VALUE);
    }

    #[test]
    fn placeable_header_is_recognized() {
        let mut data = Vec::new();
        data.extend_from_slice(&ALDUS_PLACEABLE_KEY.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes()); // hmf
        data.extend_from_slice(&le16(&[0, 0, 200, 100])); // bounds
        data.extend_from_slice(&1440u16.to_le_bytes()); // inch
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&stream(&[]));
        let store = RecordStore::parse(&data).unwrap();
        assert!(store.is_aldus());
        assert_eq!(store.width(), 200);
        assert_eq!(store.height(), 100);
        assert_eq!(store.units_per_inch(), 1440);
    }

    #[test]
    fn rectangle_operand_order() {
        // on disk: bottom, right, top, left
        let store =
            RecordStore::parse(&stream(&[rec(record::RECTANGLE, &[40, 30, 20, 10])])).unwrap();
        let mr = &store.records()[0];
        assert_eq!(mr.operands.as_slice(), &[10, 20, 30, 40]);
    }

    #[test]
    fn negative_window_ext_flips_subsequent_x() {
        let store = RecordStore::parse(&stream(&[
            rec(record::MOVE_TO, &[5, 7]), // before the flip: y=5, x=7
            rec(record::SET_WINDOW_EXT, &[100, -200]),
            rec(record::MOVE_TO, &[5, 7]), // after: x is negated
        ]))
        .unwrap();
        assert_eq!(store.records()[0].operands.as_slice(), &[7, 5]);
        assert_eq!(store.records()[1].operands.as_slice(), &[200, 100]);
        assert_eq!(store.records()[2].operands.as_slice(), &[-7, 5]);
        assert_eq!(store.vp_w(), 200);
        assert_eq!(store.vp_h(), 100);
    }

    #[test]
    fn anisotropic_mode_scales_x() {
        let store = RecordStore::parse(&stream(&[
            rec(record::SET_MAP_MODE, &[map_mode::MM_ANISOTROPIC as i16]),
            rec(record::SET_WINDOW_EXT, &[100, 200]), // h=100 w=200 -> scale 2
            rec(record::MOVE_TO, &[10, 10]),
        ]))
        .unwrap();
        // stored width is itself aspect-corrected
        assert_eq!(store.records()[1].operands.as_slice(), &[400, 100]);
        assert_eq!(store.records()[2].operands.as_slice(), &[20, 10]);
    }

    #[test]
    fn unknown_function_consumes_declared_size() {
        let store = RecordStore::parse(&stream(&[
            rec(0x7FF0, &[1, 2, 3, 4, 5]),
            rec(record::MOVE_TO, &[9, 9]),
        ]))
        .unwrap();
        assert_eq!(store.num_records(), 2);
        assert_eq!(store.records()[0].operands.len(), 5);
        assert_eq!(store.records()[1].function, record::MOVE_TO);
    }

    #[test]
    fn textout_pads_odd_lengths() {
        // len=3, "abc" + pad byte, then y, x
        let mut body = 3i16.to_le_bytes().to_vec();
        body.extend_from_slice(b"abc\0");
        body.extend_from_slice(&le16(&[50, 60]));
        let mut record_bytes = Vec::new();
        record_bytes.extend_from_slice(&(3 + body.len() as u32 / 2).to_le_bytes());
        record_bytes.extend_from_slice(&record::TEXT_OUT.to_le_bytes());
        record_bytes.extend_from_slice(&body);

        let store = RecordStore::parse(&stream(&[
            record_bytes,
            rec(record::MOVE_TO, &[1, 2]),
        ]))
        .unwrap();
        let mr = &store.records()[0];
        assert_eq!(mr.bytes(), Some(&b"abc"[..]));
        assert_eq!(mr.operands.as_slice(), &[60, 50]);
        // next record parsed at the right offset
        assert_eq!(store.records()[1].function, record::MOVE_TO);
    }

    #[test]
    fn font_record_decodes_face_name() {
        let mut body = le16(&[-24, 0, 0, 900, 700]); // height, w, esc, orient, weight
        body.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0]); // italic..pitch
        body.extend_from_slice(b"Arial\0\0\0");
        let mut record_bytes = Vec::new();
        record_bytes.extend_from_slice(&(3 + body.len() as u32 / 2).to_le_bytes());
        record_bytes.extend_from_slice(&record::CREATE_FONT_INDIRECT.to_le_bytes());
        record_bytes.extend_from_slice(&body);

        let store = RecordStore::parse(&stream(&[record_bytes])).unwrap();
        let mr = &store.records()[0];
        assert_eq!(mr.text(), Some("Arial"));
        assert_eq!(mr.op(0), -24); // height
        assert_eq!(mr.op(1), 1); // italic
        assert_eq!(mr.op(2), 700); // weight
        assert_eq!(mr.op(5), 900); // orientation
    }

    #[test]
    fn garbage_face_name_falls_back() {
        assert_eq!(decode_face_name(charset::ANSI, &[0x01, 0x02]), "System");
        assert_eq!(decode_face_name(charset::ANSI, b"MS Sans Serif\0junk"), "MS Sans Serif");
    }

    #[test]
    fn truncated_record_is_an_error() {
        let mut data = standard_header(0);
        data.extend_from_slice(&10u32.to_le_bytes()); // declares 7 operand words
        data.extend_from_slice(&record::POLYGON.to_le_bytes());
        data.extend_from_slice(&le16(&[2, 0, 0])); // but only 3 present
        assert!(matches!(
            RecordStore::parse(&data),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn undersized_record_is_an_error() {
        let mut data = standard_header(0);
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&record::MOVE_TO.to_le_bytes());
        assert!(matches!(
            RecordStore::parse(&data),
            Err(Error::InvalidRecordSize { size: 2, .. })
        ));
    }

    #[test]
    fn polypolygon_stores_all_vertices() {
        let store = RecordStore::parse(&stream(&[rec(
            record::POLY_POLYGON,
            &[2, 3, 2, 0, 0, 10, 0, 10, 10, 20, 20, 30, 30],
        )]))
        .unwrap();
        let mr = &store.records()[0];
        assert_eq!(mr.op(0), 2); // polygon count
        assert_eq!(mr.operands.len(), 1 + 2 + 5 * 2);
    }
}
