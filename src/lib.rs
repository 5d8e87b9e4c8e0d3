//! Aldus - a Windows Metafile (WMF) parser and playback engine
//!
//! WMF is a 16-bit vector graphics format for Windows, introduced in
//! Windows 3.0: a recorded sequence of GDI drawing commands manipulating
//! pens, brushes and fonts through integer handles. This library decodes
//! that record stream and replays it against an abstract drawing surface.
//!
//! # Features
//!
//! - **Record parser**: decode a WMF byte stream (optional Aldus placeable
//!   header included) into an ordered record list plus viewport metadata
//! - **Playback**: replay decoded records through the GDI state machine
//!   into any [`Surface`](playback::Surface) implementation
//! - **SVG output**: a bundled [`SvgSurface`](svg::SvgSurface) sink and a
//!   one-call [`wmf_to_svg`] conversion
//! - **Bounds analysis**: compute the bounding box of effectively painted
//!   content in one streaming pass, without materializing records
//! - **DIB decoding**: embedded 1/8/24-bit device-independent bitmaps
//!   decoded to RGBA rasters
//!
//! # Example - converting a file to SVG
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("drawing.wmf")?;
//! let svg = aldus::wmf_to_svg(&data)?;
//! std::fs::write("drawing.svg", svg)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - replaying into a custom surface
//!
//! ```no_run
//! use aldus::playback::Painter;
//! use aldus::store::RecordStore;
//! use aldus::svg::SvgSurface;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("drawing.wmf")?;
//! let store = RecordStore::parse(&data)?;
//! let mut painter = Painter::new(&store);
//! let mut surface = SvgSurface::new(store.vp_w() as f64, store.vp_h() as f64);
//! painter.paint(&mut surface)?;
//! println!("{} records, {} warnings", store.num_records(), painter.warnings().len());
//! println!("{}", surface.finish());
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! - [MS-WMF]: Windows Metafile Format Specification
//! - https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-wmf/

pub mod binary;
pub mod bounds;
pub mod constants;
pub mod dib;
pub mod encoding;
pub mod error;
pub mod objects;
pub mod playback;
pub mod record;
pub mod store;
pub mod svg;
pub mod texture;

pub use bounds::HeaderProperties;
pub use error::{Error, Result};
pub use objects::{Color, GdiObject, ObjectTable};
pub use playback::{Painter, PlaybackWarning, Surface};
pub use record::MetaRecord;
pub use store::RecordStore;

/// Convert a WMF byte stream to an SVG document sized to its viewport.
pub fn wmf_to_svg(data: &[u8]) -> Result<String> {
    let store = RecordStore::parse(data)?;
    let mut painter = Painter::new(&store);
    let mut surface = svg::SvgSurface::new(f64::from(store.vp_w()), f64::from(store.vp_h()));
    painter.paint(&mut surface)?;
    Ok(surface.finish())
}

/// Convert a WMF byte stream to SVG bytes.
pub fn wmf_to_svg_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Ok(wmf_to_svg(data)?.into_bytes())
}
