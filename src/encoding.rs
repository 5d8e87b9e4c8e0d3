//! Charset decoding and text-alignment helpers.
//!
//! WMF strings are byte sequences in the codepage named by the LOGFONT
//! charset of the font in effect; this module maps those charset ids to
//! `encoding_rs` encodings and decodes lossily. It also decomposes the
//! SETTEXTALIGN bit field into its horizontal and vertical components.

use bitflags::bitflags;
use encoding_rs::Encoding;

use crate::constants::charset;

/// Map a LOGFONT charset identifier to an encoding.
///
/// Unknown charsets fall back to windows-1252, the closest thing the format
/// has to a default.
pub fn charset_encoding(cs: u8) -> &'static Encoding {
    match cs {
        charset::ANSI | charset::DEFAULT | charset::SYMBOL => encoding_rs::WINDOWS_1252,
        charset::MAC => encoding_rs::MACINTOSH,
        charset::SHIFTJIS => encoding_rs::SHIFT_JIS,
        charset::HANGUL | charset::JOHAB => encoding_rs::EUC_KR,
        charset::GB2312 => encoding_rs::GBK,
        charset::CHINESEBIG5 => encoding_rs::BIG5,
        charset::GREEK => encoding_rs::WINDOWS_1253,
        charset::TURKISH => encoding_rs::WINDOWS_1254,
        charset::VIETNAMESE => encoding_rs::WINDOWS_1258,
        charset::HEBREW => encoding_rs::WINDOWS_1255,
        charset::ARABIC => encoding_rs::WINDOWS_1256,
        charset::BALTIC => encoding_rs::WINDOWS_1257,
        charset::RUSSIAN => encoding_rs::WINDOWS_1251,
        charset::THAI => encoding_rs::WINDOWS_874,
        charset::EASTEUROPE => encoding_rs::WINDOWS_1250,
        charset::OEM => encoding_rs::IBM866, // closest approximation to CP437
        _ => encoding_rs::WINDOWS_1252,
    }
}

/// Decode record bytes with the given charset, lossily.
pub fn decode_string(cs: u8, bytes: &[u8]) -> String {
    let (text, _, _) = charset_encoding(cs).decode(bytes);
    text.into_owned()
}

bitflags! {
    /// SETTEXTALIGN bit field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TextAlign: u16 {
        const UPDATECP = 0x0001;
        const RIGHT = 0x0002;
        const CENTER = 0x0006;
        const BOTTOM = 0x0008;
        const BASELINE = 0x0018;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertAlign {
    #[default]
    Top,
    Bottom,
    Baseline,
}

/// Horizontal component of a SETTEXTALIGN value. CENTER is a superset of the
/// RIGHT bits, so it is tested first.
pub fn horizontal_alignment(align: u16) -> HorizAlign {
    let flags = TextAlign::from_bits_truncate(align);
    if flags.contains(TextAlign::CENTER) {
        HorizAlign::Center
    } else if flags.contains(TextAlign::RIGHT) {
        HorizAlign::Right
    } else {
        HorizAlign::Left
    }
}

/// Vertical component of a SETTEXTALIGN value. BASELINE is a superset of the
/// BOTTOM bits, so it is tested first.
pub fn vertical_alignment(align: u16) -> VertAlign {
    let flags = TextAlign::from_bits_truncate(align);
    if flags.contains(TextAlign::BASELINE) {
        VertAlign::Baseline
    } else if flags.contains(TextAlign::BOTTOM) {
        VertAlign::Bottom
    } else {
        VertAlign::Top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_decodes_ascii() {
        assert_eq!(decode_string(charset::ANSI, &[0x41, 0x42]), "AB");
    }

    #[test]
    fn ansi_decodes_high_bytes() {
        // 0xE9 is e-acute in windows-1252
        assert_eq!(decode_string(charset::ANSI, &[0xE9]), "\u{e9}");
    }

    #[test]
    fn shiftjis_roundtrip() {
        // "あ" in Shift_JIS
        assert_eq!(decode_string(charset::SHIFTJIS, &[0x82, 0xA0]), "\u{3042}");
    }

    #[test]
    fn alignment_decomposition() {
        assert_eq!(horizontal_alignment(0), HorizAlign::Left);
        assert_eq!(horizontal_alignment(2), HorizAlign::Right);
        assert_eq!(horizontal_alignment(6), HorizAlign::Center);
        assert_eq!(vertical_alignment(0), VertAlign::Top);
        assert_eq!(vertical_alignment(8), VertAlign::Bottom);
        assert_eq!(vertical_alignment(24), VertAlign::Baseline);
        // combined flags keep both components independent
        assert_eq!(horizontal_alignment(6 | 24), HorizAlign::Center);
        assert_eq!(vertical_alignment(6 | 24), VertAlign::Baseline);
    }
}
