//! Color histogram with a lazily normalized density and a profile to lay it
//! out on.

use image::{GrayImage, RgbImage};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info};

use crate::color::{Color, Geometry, Position};
use crate::density::DensityStore;
use crate::error::Result;
use crate::normalize::normalize;
use crate::optimizer;
use crate::profile::Profile;

/// Occurrence counts of every color plus the profile used to render them.
///
/// The normalized densities are recomputed only when pixels were added since
/// the last computation (`stale`). A fresh histogram carries the default
/// profile.
#[derive(Debug, Clone)]
pub struct Histogram {
    density: DensityStore,
    normalized: Vec<f64>,
    stale: bool,
    profile: Profile,
}

impl Histogram {
    pub fn new(geometry: Geometry) -> Self {
        Histogram {
            density: DensityStore::new(geometry),
            normalized: Vec::new(),
            stale: true,
            profile: Profile::default_for(geometry),
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.density.geometry()
    }

    pub fn accumulate(&mut self, color: Color) {
        self.density.accumulate(color);
        self.stale = true;
    }

    pub fn accumulate_image(&mut self, img: &RgbImage) {
        self.density.accumulate_image(img);
        self.stale = true;
    }

    /// Decodes an image file and accumulates all of its pixels.
    pub fn analyze_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgb8();
        debug!(path = %path.display(), width = img.width(), height = img.height(), "analyzing image");
        self.accumulate_image(&img);
        Ok(())
    }

    pub fn count(&self, color: Color) -> u32 {
        self.density.count(color)
    }

    pub fn max_count(&self) -> u32 {
        self.density.max_count()
    }

    pub fn total(&self) -> u64 {
        self.density.total()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn normalize(&mut self) {
        if !self.stale {
            return;
        }
        normalize(&self.density, &mut self.normalized);
        self.stale = false;
    }

    pub fn normalized(&mut self, color: Color) -> f64 {
        self.normalize();
        self.normalized[self.geometry().color_index(color)]
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn position_of(&self, color: Color) -> Position {
        self.profile.position_of(color)
    }

    pub fn color_at(&self, pos: Position) -> Color {
        self.profile.color_at(pos)
    }

    /// Replaces the profile with one optimized for the current densities.
    ///
    /// Blocking and expensive at full depth, see [`optimizer`].
    pub fn optimize_profile(&mut self) -> Result<()> {
        self.optimize_profile_with(None)
    }

    /// Like [`Histogram::optimize_profile`], abandoning the work when
    /// `cancel` is set. The current profile is kept on cancellation.
    pub fn optimize_profile_with(&mut self, cancel: Option<&AtomicBool>) -> Result<()> {
        self.normalize();
        self.profile = optimizer::optimize(self.geometry(), &self.normalized, cancel)?;
        Ok(())
    }

    /// Draws every color's normalized density, scaled to 0..=255, at its
    /// profile position. Non-finite densities are drawn as 0.
    pub fn render(&mut self) -> GrayImage {
        self.normalize();
        let side = self.geometry().side() as u32;
        let mut img = GrayImage::new(side, side);
        let pixels: &mut [u8] = &mut img;
        for (color, &value) in self.normalized.iter().enumerate() {
            pixels[self.profile.position_index_of(color)] = (value * 255.0) as u8;
        }
        img
    }

    pub fn write_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.render().save(path)?;
        info!(path = %path.display(), "histogram written");
        Ok(())
    }

    pub fn profile_image(&self) -> RgbImage {
        self.profile.to_image()
    }

    pub fn save_profile<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.profile_image().save(path)?;
        info!(path = %path.display(), "profile saved");
        Ok(())
    }

    pub fn restore_profile(&mut self, img: &RgbImage) {
        self.profile.restore_from_image(img);
    }

    pub fn load_profile<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgb8();
        self.restore_profile(&img);
        info!(path = %path.display(), "profile loaded");
        Ok(())
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Histogram::new(Geometry::FULL)
    }
}
