//! Colors, grid positions and the geometry that ties them together.

use crate::error::{Error, Result};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Packs the color as `r | g << 8 | b << 16`.
    pub fn pack(self) -> u32 {
        self.r as u32 | (self.g as u32) << 8 | (self.b as u32) << 16
    }

    pub fn unpack(rgb: u32) -> Self {
        Color {
            r: (rgb & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: ((rgb >> 16) & 0xff) as u8,
        }
    }
}

impl From<[u8; 3]> for Color {
    fn from(px: [u8; 3]) -> Self {
        Color::new(px[0], px[1], px[2])
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

/// A cell of the profile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Position { x, y }
    }

    /// Packs the position as `x | y << 16`.
    pub fn pack(self) -> u32 {
        self.x as u32 | (self.y as u32) << 16
    }

    pub fn unpack(xy: u32) -> Self {
        Position {
            x: (xy & 0xffff) as u16,
            y: (xy >> 16) as u16,
        }
    }
}

/// Channel depth of a histogram and the grid it is laid out on.
///
/// Every channel is reduced to `bits` bits, so there are `2^(3 * bits)`
/// distinct colors and exactly as many cells in a square grid of side
/// `2^(3 * bits / 2)`. Only even depths give a square grid.
///
/// Colors and positions are addressed internally by dense indices:
/// a color index is `r * levels^2 + g * levels + b` over channel levels and a
/// position index is `y * side + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    bits: u8,
}

impl Geometry {
    /// 256^3 colors on a 4096x4096 grid.
    pub const FULL: Geometry = Geometry { bits: 8 };

    pub fn new(bits: u8) -> Result<Self> {
        match bits {
            2 | 4 | 6 | 8 => Ok(Geometry { bits }),
            _ => Err(Error::UnsupportedDepth(bits)),
        }
    }

    pub fn bits(self) -> u8 {
        self.bits
    }

    pub fn levels(self) -> usize {
        1 << self.bits
    }

    pub fn color_count(self) -> usize {
        1 << (3 * self.bits as usize)
    }

    pub fn side(self) -> usize {
        1 << (3 * self.bits as usize / 2)
    }

    fn shift(self) -> u8 {
        8 - self.bits
    }

    /// Channel levels `(r, g, b)` of a color index.
    #[inline(always)]
    pub(crate) fn levels_of(self, index: usize) -> (u32, u32, u32) {
        let bits = self.bits as usize;
        let mask = self.levels() - 1;
        (
            (index >> (2 * bits)) as u32,
            ((index >> bits) & mask) as u32,
            (index & mask) as u32,
        )
    }

    pub fn color_index(self, c: Color) -> usize {
        let bits = self.bits as usize;
        let s = self.shift();
        ((c.r >> s) as usize) << (2 * bits) | ((c.g >> s) as usize) << bits | (c.b >> s) as usize
    }

    /// The 8-bit color an index stands for; the lowest color of its bucket.
    pub fn color_at_index(self, index: usize) -> Color {
        let (r, g, b) = self.levels_of(index);
        let s = self.shift();
        Color::new((r as u8) << s, (g as u8) << s, (b as u8) << s)
    }

    pub fn position_index(self, p: Position) -> usize {
        p.y as usize * self.side() + p.x as usize
    }

    pub fn position_at_index(self, index: usize) -> Position {
        let side = self.side();
        Position::new((index % side) as u16, (index / side) as u16)
    }

    pub fn contains(self, x: u32, y: u32) -> bool {
        (x as usize) < self.side() && (y as usize) < self.side()
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::FULL
    }
}

fn sqr(x: i32) -> u32 {
    (x * x) as u32
}

/// Squared euclidean distance between two colors given as channel levels.
#[inline(always)]
pub(crate) fn distance(c1: (u32, u32, u32), c2: (u32, u32, u32)) -> u32 {
    sqr(c1.0 as i32 - c2.0 as i32) + sqr(c1.1 as i32 - c2.1 as i32) + sqr(c1.2 as i32 - c2.2 as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_packing() {
        let c = Color::new(0x12, 0x34, 0x56);
        assert_eq!(c.pack(), 0x563412);
        assert_eq!(Color::unpack(0x563412), c);
    }

    #[test]
    fn test_position_packing() {
        let p = Position::new(4095, 17);
        assert_eq!(p.pack(), 4095 | 17 << 16);
        assert_eq!(Position::unpack(p.pack()), p);
    }

    #[test]
    fn test_full_geometry() {
        let g = Geometry::FULL;
        assert_eq!(g.color_count(), 16_777_216);
        assert_eq!(g.side(), 4096);
        assert_eq!(g.side() * g.side(), g.color_count());
        assert_eq!(g.color_index(Color::new(1, 2, 3)), 65536 + 2 * 256 + 3);
        assert_eq!(g.color_at_index(65536 + 2 * 256 + 3), Color::new(1, 2, 3));
    }

    #[test]
    fn test_reduced_geometry_quantizes() {
        let g = Geometry::new(2).unwrap();
        assert_eq!(g.color_count(), 64);
        assert_eq!(g.side(), 8);
        let idx = g.color_index(Color::new(255, 128, 63));
        assert_eq!(g.levels_of(idx), (3, 2, 0));
        assert_eq!(g.color_at_index(idx), Color::new(192, 128, 0));
    }

    #[test]
    fn test_unsupported_depth() {
        assert!(Geometry::new(3).is_err());
        assert!(Geometry::new(0).is_err());
        assert!(Geometry::new(10).is_err());
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance((0, 0, 0), (10, 10, 10)), 300);
        assert_eq!(distance((10, 0, 5), (0, 0, 5)), 100);
    }
}
