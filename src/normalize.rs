//! Gamma-compressed densities.

use rayon::prelude::*;
use tracing::debug;

use crate::density::DensityStore;

/// Exponent applied to `count / max`. Keeps rare colors visible next to a
/// handful of dominant ones.
pub const DENSITY_GAMMA: f64 = 0.2;

/// Computes `(count / max) ^ DENSITY_GAMMA` for every color of the store.
///
/// An empty store has `max == 0`, which makes every value NaN. This is left
/// to the caller.
pub fn normalize(store: &DensityStore, out: &mut Vec<f64>) {
    let max = store.max_count();
    debug!(max, "normalizing densities");
    let max = max as f64;
    store
        .counts()
        .par_iter()
        .map(|&count| (count as f64 / max).powf(DENSITY_GAMMA))
        .collect_into_vec(out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, Geometry};

    #[test]
    fn test_normalize_range() {
        let geometry = Geometry::new(4).unwrap();
        let mut store = DensityStore::new(geometry);
        for _ in 0..32 {
            store.accumulate(Color::new(0, 0, 0));
        }
        store.accumulate(Color::new(255, 255, 255));

        let mut out = Vec::new();
        normalize(&store, &mut out);
        assert_eq!(out.len(), geometry.color_count());
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(out[geometry.color_index(Color::new(0, 0, 0))], 1.0);
        let rare = out[geometry.color_index(Color::new(255, 255, 255))];
        assert!((rare - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_empty_is_not_finite() {
        let store = DensityStore::new(Geometry::new(2).unwrap());
        let mut out = Vec::new();
        normalize(&store, &mut out);
        assert!(out.iter().all(|v| !v.is_finite()));
    }
}
