//! Synthetic data for the scatter plot.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Multiplier applied to the log-normal size sample.
pub const SIZE_SCALE: f32 = 10.0;

/// One synthetic point. `size` is a marker area in square pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SyntheticPoint {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Immutable set of points generated once at renderer startup.
///
/// `revision` identifies the contents; it never changes for a given dataset,
/// which is what lets the GPU side skip re-uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    points: Vec<SyntheticPoint>,
    revision: u64,
}

impl Dataset {
    /// Generates `count` points from `rng`.
    ///
    /// Positions are standard normal on both axes; sizes are log-normal(0, 1)
    /// scaled by [`SIZE_SCALE`].
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let points = (0..count)
            .map(|_| {
                let x: f32 = rng.sample(StandardNormal);
                let y: f32 = rng.sample(StandardNormal);
                let z: f32 = rng.sample(StandardNormal);
                SyntheticPoint { x, y, size: z.exp() * SIZE_SCALE }
            })
            .collect();

        Self { points, revision: 1 }
    }

    /// Generates `count` points, seeded when `seed` is given.
    pub fn generate_seeded(count: usize, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::generate(count, &mut StdRng::seed_from_u64(seed)),
            None => Self::generate(count, &mut rand::rng()),
        }
    }

    pub fn points(&self) -> &[SyntheticPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_exactly_count_points() {
        assert_eq!(Dataset::generate_seeded(1234, Some(1)).len(), 1234);
    }

    #[test]
    fn zero_count_is_empty() {
        let d = Dataset::generate_seeded(0, Some(1));
        assert!(d.is_empty());
        assert!(d.points().is_empty());
    }

    #[test]
    fn same_seed_same_points() {
        assert_eq!(Dataset::generate_seeded(64, Some(9)), Dataset::generate_seeded(64, Some(9)));
    }

    #[test]
    fn sizes_are_positive_and_positions_centered() {
        let d = Dataset::generate_seeded(10_000, Some(42));
        assert!(d.points().iter().all(|p| p.size > 0.0 && p.size.is_finite()));

        let mean_x = d.points().iter().map(|p| p.x as f64).sum::<f64>() / d.len() as f64;
        let mean_y = d.points().iter().map(|p| p.y as f64).sum::<f64>() / d.len() as f64;
        assert!(mean_x.abs() < 0.1, "mean x {mean_x}");
        assert!(mean_y.abs() < 0.1, "mean y {mean_y}");
    }

    #[test]
    fn median_size_is_near_scale() {
        // median of log-normal(0, 1) is 1
        let d = Dataset::generate_seeded(10_001, Some(7));
        let mut sizes: Vec<f32> = d.points().iter().map(|p| p.size).collect();
        sizes.sort_by(f32::total_cmp);
        let median = sizes[sizes.len() / 2];
        assert!((median - SIZE_SCALE).abs() < 1.0, "median {median}");
    }
}
