//! WMF constants and enumerations
//!
//! Record function codes, pen/brush/hatch styles, mapping modes, charsets,
//! stock objects and the other magic numbers of the Windows Metafile format.
//!
//! References:
//! - [MS-WMF]: Windows Metafile Format Specification
//! - https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-wmf/

/// Magic key of the optional 22-byte Aldus placeable header.
pub const ALDUS_PLACEABLE_KEY: u32 = 0x9AC6_CDD7;

/// Units-per-inch assumed when no placeable header supplies one.
pub const DEFAULT_INCH_VALUE: u16 = 576;

/// Reference display resolution for logical-unit conversions.
pub const PIXELS_PER_INCH: f32 = 96.0;

/// WMF record function codes
pub mod record {
    // State records
    pub const SAVE_DC: u16 = 0x001E;
    pub const RESTORE_DC: u16 = 0x0127;
    pub const SET_BK_COLOR: u16 = 0x0201;
    pub const SET_BK_MODE: u16 = 0x0102;
    pub const SET_MAP_MODE: u16 = 0x0103;
    pub const SET_ROP2: u16 = 0x0104;
    pub const SET_REL_ABS: u16 = 0x0105;
    pub const SET_POLY_FILL_MODE: u16 = 0x0106;
    pub const SET_STRETCH_BLT_MODE: u16 = 0x0107;
    pub const SET_TEXT_CHAR_EXTRA: u16 = 0x0108;
    pub const SET_TEXT_COLOR: u16 = 0x0209;
    pub const SET_TEXT_JUSTIFICATION: u16 = 0x020A;
    pub const SET_WINDOW_ORG: u16 = 0x020B;
    pub const SET_WINDOW_EXT: u16 = 0x020C;
    pub const SET_VIEWPORT_ORG: u16 = 0x020D;
    pub const SET_VIEWPORT_EXT: u16 = 0x020E;
    pub const OFFSET_WINDOW_ORG: u16 = 0x020F;
    pub const SCALE_WINDOW_EXT: u16 = 0x0410;
    pub const OFFSET_VIEWPORT_ORG: u16 = 0x0211;
    pub const SCALE_VIEWPORT_EXT: u16 = 0x0412;
    pub const SET_TEXT_ALIGN: u16 = 0x012E;
    pub const SET_MAPPER_FLAGS: u16 = 0x0231;
    pub const SET_PIXEL: u16 = 0x041F;

    // Drawing records
    pub const LINE_TO: u16 = 0x0213;
    pub const MOVE_TO: u16 = 0x0214;
    pub const POLYGON: u16 = 0x0324;
    pub const POLYLINE: u16 = 0x0325;
    pub const RECTANGLE: u16 = 0x041B;
    pub const ROUND_RECT: u16 = 0x061C;
    pub const ELLIPSE: u16 = 0x0418;
    pub const ARC: u16 = 0x0817;
    pub const PIE: u16 = 0x081A;
    pub const CHORD: u16 = 0x0830;
    pub const POLY_POLYGON: u16 = 0x0538;

    // Text records
    pub const TEXT_OUT: u16 = 0x0521;
    pub const EXT_TEXT_OUT: u16 = 0x0A32;
    pub const DRAW_TEXT: u16 = 0x062F;

    // Object records
    pub const CREATE_PEN_INDIRECT: u16 = 0x02FA;
    pub const CREATE_BRUSH_INDIRECT: u16 = 0x02FC;
    pub const CREATE_FONT_INDIRECT: u16 = 0x02FB;
    pub const CREATE_PALETTE: u16 = 0x00F7;
    pub const CREATE_REGION: u16 = 0x06FF;
    pub const CREATE_PATTERN_BRUSH: u16 = 0x01F9;
    pub const DIB_CREATE_PATTERN_BRUSH: u16 = 0x0142;
    pub const SELECT_OBJECT: u16 = 0x012D;
    pub const DELETE_OBJECT: u16 = 0x01F0;
    pub const SELECT_PALETTE: u16 = 0x0234;
    pub const REALIZE_PALETTE: u16 = 0x0035;
    pub const ANIMATE_PALETTE: u16 = 0x0436;
    pub const SET_PAL_ENTRIES: u16 = 0x0037;
    pub const RESIZE_PALETTE: u16 = 0x0139;

    // Raster records
    pub const BIT_BLT: u16 = 0x0922;
    pub const STRETCH_BLT: u16 = 0x0B23;
    pub const PAT_BLT: u16 = 0x061D;
    pub const DIB_BIT_BLT: u16 = 0x0940;
    pub const DIB_STRETCH_BLT: u16 = 0x0B41;
    pub const SET_DIB_TO_DEV: u16 = 0x0D33;
    pub const STRETCH_DIB: u16 = 0x0F43;

    // Clipping records
    pub const EXCLUDE_CLIP_RECT: u16 = 0x0415;
    pub const INTERSECT_CLIP_RECT: u16 = 0x0416;
    pub const SELECT_CLIP_REGION: u16 = 0x012C;
    pub const OFFSET_CLIP_RGN: u16 = 0x0220;

    // Fill records
    pub const FLOOD_FILL: u16 = 0x0419;
    pub const FILL_REGION: u16 = 0x0228;
    pub const FRAME_REGION: u16 = 0x0429;
    pub const INVERT_REGION: u16 = 0x012A;
    pub const PAINT_REGION: u16 = 0x012B;

    // Control records
    pub const EOF: u16 = 0x0000;
    pub const ESCAPE: u16 = 0x0626;
}

/// Mnemonic name of a record function code, for diagnostics.
pub fn record_name(function: u16) -> Option<&'static str> {
    static NAMES: phf::Map<u16, &'static str> = phf::phf_map! {
        0x001Eu16 => "SAVEDC",
        0x0127u16 => "RESTOREDC",
        0x0201u16 => "SETBKCOLOR",
        0x0102u16 => "SETBKMODE",
        0x0103u16 => "SETMAPMODE",
        0x0104u16 => "SETROP2",
        0x0105u16 => "SETRELABS",
        0x0106u16 => "SETPOLYFILLMODE",
        0x0107u16 => "SETSTRETCHBLTMODE",
        0x0108u16 => "SETTEXTCHAREXTRA",
        0x0209u16 => "SETTEXTCOLOR",
        0x020Au16 => "SETTEXTJUSTIFICATION",
        0x020Bu16 => "SETWINDOWORG",
        0x020Cu16 => "SETWINDOWEXT",
        0x020Du16 => "SETVIEWPORTORG",
        0x020Eu16 => "SETVIEWPORTEXT",
        0x020Fu16 => "OFFSETWINDOWORG",
        0x0410u16 => "SCALEWINDOWEXT",
        0x0211u16 => "OFFSETVIEWPORTORG",
        0x0412u16 => "SCALEVIEWPORTEXT",
        0x012Eu16 => "SETTEXTALIGN",
        0x0231u16 => "SETMAPPERFLAGS",
        0x041Fu16 => "SETPIXEL",
        0x0213u16 => "LINETO",
        0x0214u16 => "MOVETO",
        0x0324u16 => "POLYGON",
        0x0325u16 => "POLYLINE",
        0x041Bu16 => "RECTANGLE",
        0x061Cu16 => "ROUNDRECT",
        0x0418u16 => "ELLIPSE",
        0x0817u16 => "ARC",
        0x081Au16 => "PIE",
        0x0830u16 => "CHORD",
        0x0538u16 => "POLYPOLYGON",
        0x0521u16 => "TEXTOUT",
        0x0A32u16 => "EXTTEXTOUT",
        0x062Fu16 => "DRAWTEXT",
        0x02FAu16 => "CREATEPENINDIRECT",
        0x02FCu16 => "CREATEBRUSHINDIRECT",
        0x02FBu16 => "CREATEFONTINDIRECT",
        0x00F7u16 => "CREATEPALETTE",
        0x06FFu16 => "CREATEREGION",
        0x01F9u16 => "CREATEPATTERNBRUSH",
        0x0142u16 => "DIBCREATEPATTERNBRUSH",
        0x012Du16 => "SELECTOBJECT",
        0x01F0u16 => "DELETEOBJECT",
        0x0234u16 => "SELECTPALETTE",
        0x0035u16 => "REALIZEPALETTE",
        0x0436u16 => "ANIMATEPALETTE",
        0x0037u16 => "SETPALENTRIES",
        0x0139u16 => "RESIZEPALETTE",
        0x0922u16 => "BITBLT",
        0x0B23u16 => "STRETCHBLT",
        0x061Du16 => "PATBLT",
        0x0940u16 => "DIBBITBLT",
        0x0B41u16 => "DIBSTRETCHBLT",
        0x0D33u16 => "SETDIBTODEV",
        0x0F43u16 => "STRETCHDIB",
        0x0415u16 => "EXCLUDECLIPRECT",
        0x0416u16 => "INTERSECTCLIPRECT",
        0x012Cu16 => "SELECTCLIPREGION",
        0x0220u16 => "OFFSETCLIPRGN",
        0x0419u16 => "FLOODFILL",
        0x0228u16 => "FILLREGION",
        0x0429u16 => "FRAMEREGION",
        0x012Au16 => "INVERTREGION",
        0x012Bu16 => "PAINTREGION",
        0x0626u16 => "ESCAPE",
    };
    NAMES.get(&function).copied()
}

/// Pen style constants
pub mod pen {
    // Base styles (lower 4 bits)
    pub const PS_SOLID: u16 = 0;
    pub const PS_DASH: u16 = 1;
    pub const PS_DOT: u16 = 2;
    pub const PS_DASHDOT: u16 = 3;
    pub const PS_DASHDOTDOT: u16 = 4;
    pub const PS_NULL: u16 = 5;
    pub const PS_INSIDEFRAME: u16 = 6;
    pub const PS_ALTERNATE: u16 = 7;

    // End cap styles (bits 8-11)
    pub const PS_ENDCAP_ROUND: u16 = 0x0000;
    pub const PS_ENDCAP_SQUARE: u16 = 0x0100;
    pub const PS_ENDCAP_FLAT: u16 = 0x0200;

    // Join styles (bits 12-15)
    pub const PS_JOIN_ROUND: u16 = 0x0000;
    pub const PS_JOIN_BEVEL: u16 = 0x1000;
    pub const PS_JOIN_MITER: u16 = 0x2000;
}

/// Brush style constants
pub mod brush {
    pub const BS_SOLID: u16 = 0;
    pub const BS_NULL: u16 = 1;
    pub const BS_HATCHED: u16 = 2;
    pub const BS_PATTERN: u16 = 3;
    pub const BS_INDEXED: u16 = 4;
    pub const BS_DIBPATTERN: u16 = 5;

    // Hatch styles (for BS_HATCHED)
    pub const HS_HORIZONTAL: u16 = 0;
    pub const HS_VERTICAL: u16 = 1;
    pub const HS_FDIAGONAL: u16 = 2;
    pub const HS_BDIAGONAL: u16 = 3;
    pub const HS_CROSS: u16 = 4;
    pub const HS_DIAGCROSS: u16 = 5;
}

/// Polygon fill modes
pub mod fill_mode {
    /// Even-odd fill (SVG evenodd)
    pub const ALTERNATE: u16 = 1;
    /// Non-zero winding (SVG nonzero)
    pub const WINDING: u16 = 2;
}

/// Mapping modes
pub mod map_mode {
    pub const MM_TEXT: u16 = 1;
    pub const MM_LOMETRIC: u16 = 2;
    pub const MM_HIMETRIC: u16 = 3;
    pub const MM_LOENGLISH: u16 = 4;
    pub const MM_HIENGLISH: u16 = 5;
    pub const MM_TWIPS: u16 = 6;
    pub const MM_ISOTROPIC: u16 = 7;
    pub const MM_ANISOTROPIC: u16 = 8;
}

/// LOGFONT charset identifiers
pub mod charset {
    pub const ANSI: u8 = 0;
    pub const DEFAULT: u8 = 1;
    pub const SYMBOL: u8 = 2;
    pub const MAC: u8 = 77;
    pub const SHIFTJIS: u8 = 128;
    pub const HANGUL: u8 = 129;
    pub const JOHAB: u8 = 130;
    pub const GB2312: u8 = 134;
    pub const CHINESEBIG5: u8 = 136;
    pub const GREEK: u8 = 161;
    pub const TURKISH: u8 = 162;
    pub const VIETNAMESE: u8 = 163;
    pub const HEBREW: u8 = 177;
    pub const ARABIC: u8 = 178;
    pub const BALTIC: u8 = 186;
    pub const RUSSIAN: u8 = 204;
    pub const THAI: u8 = 222;
    pub const EASTEUROPE: u8 = 238;
    pub const OEM: u8 = 255;
}

/// Predefined stock objects, addressed by SELECTOBJECT with a handle at or
/// past the end of the object table (handle minus table size gives the id).
pub mod stock {
    pub const WHITE_BRUSH: u16 = 0;
    pub const LTGRAY_BRUSH: u16 = 1;
    pub const GRAY_BRUSH: u16 = 2;
    pub const DKGRAY_BRUSH: u16 = 3;
    pub const BLACK_BRUSH: u16 = 4;
    pub const NULL_BRUSH: u16 = 5;
    pub const WHITE_PEN: u16 = 6;
    pub const BLACK_PEN: u16 = 7;
    pub const NULL_PEN: u16 = 8;
    pub const OEM_FIXED_FONT: u16 = 10;
    pub const ANSI_FIXED_FONT: u16 = 11;
    pub const ANSI_VAR_FONT: u16 = 12;
    pub const SYSTEM_FONT: u16 = 13;
    pub const DEVICE_DEFAULT_FONT: u16 = 14;
    pub const DEFAULT_PALETTE: u16 = 15;
    pub const SYSTEM_FIXED_FONT: u16 = 16;
}

/// EXTTEXTOUT option bits
pub mod eto {
    pub const ETO_OPAQUE: u16 = 0x0002;
    pub const ETO_CLIPPED: u16 = 0x0004;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeable_key() {
        assert_eq!(ALDUS_PLACEABLE_KEY, 0x9AC6CDD7);
    }

    #[test]
    fn record_names() {
        assert_eq!(record_name(record::RECTANGLE), Some("RECTANGLE"));
        assert_eq!(record_name(record::CREATE_PEN_INDIRECT), Some("CREATEPENINDIRECT"));
        assert_eq!(record_name(0x7FFF), None);
    }
}
