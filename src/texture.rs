//! Hatch-pattern fill textures.
//!
//! GDI hatched brushes name one of six fixed patterns. [`TextureFactory`]
//! draws each requested pattern into a small tile once and caches it keyed
//! by pattern id and colors. The key space is a closed enumeration, so the
//! cache is unbounded and never invalidated. The factory is an ordinary
//! owned value; construct one wherever a cache scope makes sense.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use crate::constants::brush;
use crate::objects::Color;

/// Edge length of a pattern tile, in pixels.
const TILE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TextureKey {
    hatch: u16,
    foreground: Color,
    background: Option<Color>,
}

/// Memoized generator of hatch-pattern tiles.
#[derive(Debug, Default)]
pub struct TextureFactory {
    cache: HashMap<TextureKey, RgbaImage>,
}

impl TextureFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tile for a hatch pattern drawn black on a transparent background.
    /// Unknown pattern ids yield `None`; callers treat that as "no fill".
    pub fn texture(&mut self, hatch: u16) -> Option<&RgbaImage> {
        self.texture_with(hatch, Color::BLACK, None)
    }

    /// Tile with an explicit foreground color.
    pub fn texture_with_foreground(&mut self, hatch: u16, fg: Color) -> Option<&RgbaImage> {
        self.texture_with(hatch, fg, None)
    }

    /// Tile with explicit foreground and background colors.
    pub fn texture_with_colors(&mut self, hatch: u16, fg: Color, bg: Color) -> Option<&RgbaImage> {
        self.texture_with(hatch, fg, Some(bg))
    }

    fn texture_with(
        &mut self,
        hatch: u16,
        foreground: Color,
        background: Option<Color>,
    ) -> Option<&RgbaImage> {
        if hatch > brush::HS_DIAGCROSS {
            return None;
        }
        let key = TextureKey { hatch, foreground, background };
        Some(
            self.cache
                .entry(key)
                .or_insert_with(|| render_tile(hatch, foreground, background)),
        )
    }
}

fn render_tile(hatch: u16, fg: Color, bg: Option<Color>) -> RgbaImage {
    let back = match bg {
        Some(c) => Rgba([c.r, c.g, c.b, 255]),
        None => Rgba([0, 0, 0, 0]),
    };
    let fore = Rgba([fg.r, fg.g, fg.b, 255]);
    let mut tile = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, back);

    let mid = TILE_SIZE / 2;
    let last = TILE_SIZE - 1;
    match hatch {
        brush::HS_HORIZONTAL => {
            for x in 0..TILE_SIZE {
                tile.put_pixel(x, mid, fore);
            }
        }
        brush::HS_VERTICAL => {
            for y in 0..TILE_SIZE {
                tile.put_pixel(mid, y, fore);
            }
        }
        brush::HS_FDIAGONAL => {
            for i in 0..TILE_SIZE {
                tile.put_pixel(i, i, fore);
            }
        }
        brush::HS_BDIAGONAL => {
            for i in 0..TILE_SIZE {
                tile.put_pixel(i, last - i, fore);
            }
        }
        brush::HS_CROSS => {
            for i in 0..TILE_SIZE {
                tile.put_pixel(i, mid, fore);
                tile.put_pixel(mid, i, fore);
            }
        }
        brush::HS_DIAGCROSS => {
            for i in 0..TILE_SIZE {
                tile.put_pixel(i, i, fore);
                tile.put_pixel(i, last - i, fore);
            }
        }
        _ => unreachable!("hatch id checked by caller"),
    }
    tile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pattern_is_absent() {
        let mut factory = TextureFactory::new();
        assert!(factory.texture(6).is_none());
        assert!(factory.texture(u16::MAX).is_none());
    }

    #[test]
    fn horizontal_pattern_marks_middle_row() {
        let mut factory = TextureFactory::new();
        let tile = factory.texture(brush::HS_HORIZONTAL).unwrap().clone();
        assert_eq!(*tile.get_pixel(0, TILE_SIZE / 2), Rgba([0, 0, 0, 255]));
        assert_eq!(*tile.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn colors_participate_in_the_key() {
        let mut factory = TextureFactory::new();
        let red = factory
            .texture_with_foreground(brush::HS_CROSS, Color::new(255, 0, 0))
            .unwrap()
            .clone();
        let on_white = factory
            .texture_with_colors(brush::HS_CROSS, Color::new(255, 0, 0), Color::WHITE)
            .unwrap()
            .clone();
        assert_eq!(*red.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*on_white.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(factory.cache.len(), 2);
    }

    #[test]
    fn tiles_are_cached() {
        let mut factory = TextureFactory::new();
        factory.texture(brush::HS_VERTICAL);
        factory.texture(brush::HS_VERTICAL);
        assert_eq!(factory.cache.len(), 1);
    }
}
