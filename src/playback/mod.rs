//! Playback of decoded WMF records against an abstract drawing surface.

pub mod painter;
pub mod state;
pub mod surface;

pub use painter::{Painter, PlaybackWarning};
pub use state::DcState;
pub use surface::{ArcKind, Paint, Point, Rect, Shape, Surface, TextStyle};
