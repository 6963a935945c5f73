//! Occurrence counts for every color of a geometry.

use image::RgbImage;
use rayon::prelude::*;

use crate::color::{Color, Geometry};

#[derive(Debug, Clone)]
pub struct DensityStore {
    geometry: Geometry,
    counts: Vec<u32>,
    total: u64,
}

impl DensityStore {
    pub fn new(geometry: Geometry) -> Self {
        DensityStore {
            geometry,
            counts: vec![0; geometry.color_count()],
            total: 0,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline(always)]
    pub fn accumulate(&mut self, color: Color) {
        self.counts[self.geometry.color_index(color)] += 1;
        self.total += 1;
    }

    pub fn accumulate_image(&mut self, img: &RgbImage) {
        for px in img.pixels() {
            self.accumulate(Color::from(px.0));
        }
    }

    pub fn count(&self, color: Color) -> u32 {
        self.counts[self.geometry.color_index(color)]
    }

    /// Number of pixels observed so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn max_count(&self) -> u32 {
        self.counts.par_iter().copied().max().unwrap_or(0)
    }

    pub(crate) fn counts(&self) -> &[u32] {
        &self.counts
    }
}
