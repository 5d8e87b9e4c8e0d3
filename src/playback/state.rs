//! Device-context state carried across records during playback.

use crate::encoding::{HorizAlign, VertAlign};
use crate::objects::Color;

/// The implicit graphics state of the virtual device context: which table
/// slots are selected, the current colors, and the running point for
/// LINETO chains. SAVEDC/RESTOREDC push and pop the whole tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct DcState {
    pub pen: Option<usize>,
    pub brush: Option<usize>,
    pub font: Option<usize>,
    /// Foreground (text) color; None means the default black.
    pub foreground: Option<Color>,
    /// Background color; participates in opaque hatch fills.
    pub background: Option<Color>,
    /// Current point in device coordinates.
    pub position: (f64, f64),
    pub align_h: HorizAlign,
    pub align_v: VertAlign,
    /// 1 = ALTERNATE (even-odd), 2 = WINDING.
    pub poly_fill_mode: u16,
}

impl Default for DcState {
    fn default() -> Self {
        Self {
            pen: None,
            brush: None,
            font: None,
            foreground: None,
            background: None,
            position: (0.0, 0.0),
            align_h: HorizAlign::default(),
            align_v: VertAlign::default(),
            poly_fill_mode: crate::constants::fill_mode::ALTERNATE,
        }
    }
}

impl DcState {
    pub fn even_odd(&self) -> bool {
        self.poly_fill_mode != crate::constants::fill_mode::WINDING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let state = DcState::default();
        assert!(state.pen.is_none());
        assert!(state.even_odd());
        assert_eq!(state.position, (0.0, 0.0));
    }
}
