//! The color <-> grid position bijection.

use image::{Rgb, RgbImage};
use tracing::warn;

use crate::color::{Color, Geometry, Position};

/// A bijection between the colors of a geometry and the cells of its grid.
///
/// Both directions are stored as flat arrays of dense indices so lookups are
/// O(1) either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    geometry: Geometry,
    positions: Vec<u32>,
    colors: Vec<u32>,
}

impl Profile {
    /// Data-independent seed profile.
    ///
    /// The low half of each channel's bits goes to `x` and the high half to
    /// `y`; at full depth `x = r[0..4] | g[0..4] << 4 | b[0..4] << 8` and
    /// `y = r[4..8] | g[4..8] << 4 | b[4..8] << 8`.
    pub fn default_for(geometry: Geometry) -> Self {
        let half = geometry.bits() as u32 / 2;
        let lo = (1u32 << half) - 1;
        let side = geometry.side();

        let mut positions = vec![0; geometry.color_count()];
        let mut colors = vec![0; geometry.color_count()];
        for (index, slot) in positions.iter_mut().enumerate() {
            let (r, g, b) = geometry.levels_of(index);
            let x = (r & lo) | (g & lo) << half | (b & lo) << (2 * half);
            let y = (r >> half) | (g >> half) << half | (b >> half) << (2 * half);
            let pos = y as usize * side + x as usize;
            *slot = pos as u32;
            colors[pos] = index as u32;
        }

        Profile { geometry, positions, colors }
    }

    /// Builds a profile from a position-indexed list of color indices.
    pub(crate) fn from_colors(geometry: Geometry, colors: Vec<u32>) -> Self {
        let mut positions = vec![0; geometry.color_count()];
        for (pos, &color) in colors.iter().enumerate() {
            positions[color as usize] = pos as u32;
        }
        Profile { geometry, positions, colors }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn position_of(&self, color: Color) -> Position {
        let index = self.positions[self.geometry.color_index(color)];
        self.geometry.position_at_index(index as usize)
    }

    pub fn color_at(&self, pos: Position) -> Color {
        let index = self.colors[self.geometry.position_index(pos)];
        self.geometry.color_at_index(index as usize)
    }

    pub(crate) fn position_index_of(&self, color_index: usize) -> usize {
        self.positions[color_index] as usize
    }

    /// True when both directions agree for every color and every cell.
    pub fn is_bijective(&self) -> bool {
        self.positions
            .iter()
            .enumerate()
            .all(|(color, &pos)| self.colors[pos as usize] as usize == color)
            && self
                .colors
                .iter()
                .enumerate()
                .all(|(pos, &color)| self.positions[color as usize] as usize == pos)
    }

    /// Writes every color at its position, giving a `side` x `side` image.
    pub fn to_image(&self) -> RgbImage {
        let side = self.geometry.side() as u32;
        RgbImage::from_fn(side, side, |x, y| {
            Rgb(self.color_at(Position::new(x as u16, y as u16)).into())
        })
    }

    /// Overwrites the mapping with the pixels of a profile image.
    ///
    /// Each pixel `(x, y)` assigns its color to that cell. Pixels outside the
    /// grid are ignored; an image smaller than the grid leaves the remaining
    /// entries as they were, which generally breaks the bijection.
    pub fn restore_from_image(&mut self, img: &RgbImage) {
        let geometry = self.geometry;
        for (x, y, px) in img.enumerate_pixels() {
            if !geometry.contains(x, y) {
                continue;
            }
            let color = geometry.color_index(Color::from(px.0));
            let pos = geometry.position_index(Position::new(x as u16, y as u16));
            self.positions[color] = pos as u32;
            self.colors[pos] = color as u32;
        }

        let side = geometry.side() as u32;
        if img.dimensions() != (side, side) || !self.is_bijective() {
            warn!(
                width = img.width(),
                height = img.height(),
                side,
                "restored profile is not a complete bijection"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_interleaving() {
        let profile = Profile::default_for(Geometry::FULL);
        assert_eq!(profile.position_of(Color::new(0, 0, 0)), Position::new(0, 0));
        assert_eq!(
            profile.position_of(Color::new(0x12, 0x34, 0x56)),
            Position::new(0x2 | 0x4 << 4 | 0x6 << 8, 0x1 | 0x3 << 4 | 0x5 << 8)
        );
        assert_eq!(
            profile.position_of(Color::new(255, 255, 255)),
            Position::new(4095, 4095)
        );
        assert!(profile.is_bijective());
    }

    #[test]
    fn test_default_profile_is_deterministic() {
        let a = Profile::default_for(Geometry::FULL);
        let b = Profile::default_for(Geometry::FULL);
        assert!(a == b);
    }

    #[test]
    fn test_default_profile_round_trips_small_geometry() {
        let geometry = Geometry::new(4).unwrap();
        let profile = Profile::default_for(geometry);
        for i in 0..geometry.color_count() {
            let pos = geometry.position_at_index(i);
            assert_eq!(profile.position_of(profile.color_at(pos)), pos);
            let c = geometry.color_at_index(i);
            assert_eq!(profile.color_at(profile.position_of(c)), c);
        }
    }

    #[test]
    fn test_image_round_trip() {
        let geometry = Geometry::new(4).unwrap();
        let mut colors: Vec<u32> = (0..geometry.color_count() as u32).collect();
        colors.reverse();
        let original = Profile::from_colors(geometry, colors);

        let img = original.to_image();
        assert_eq!(img.dimensions(), (64, 64));

        let mut restored = Profile::default_for(geometry);
        restored.restore_from_image(&img);
        assert!(restored == original);
        assert!(restored.is_bijective());
    }

    #[test]
    fn test_partial_restore_keeps_previous_entries() {
        let geometry = Geometry::new(2).unwrap();
        let mut profile = Profile::default_for(geometry);
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, Rgb([192, 192, 192]));
        profile.restore_from_image(&img);

        assert_eq!(profile.color_at(Position::new(0, 0)), Color::new(192, 192, 192));
        assert_eq!(profile.position_of(Color::new(192, 192, 192)), Position::new(0, 0));
        // Black still points at the cell it held before.
        assert_eq!(profile.position_of(Color::new(0, 0, 0)), Position::new(0, 0));
        assert!(!profile.is_bijective());
    }
}
