//! Initial centroid placement

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::error::{ClusterError, Result};
use super::point::{Bounds, Position};

/// Places the `k` starting centroids of a run
pub trait Initializer {
    /// Returns exactly `k` centroids for points enclosed by `bounds`
    fn centroids(&mut self, bounds: &Bounds, k: usize) -> Result<Vec<Position>>;
}

/// Draws every centroid uniformly inside the bounding rectangle,
/// independently per centroid and per axis
pub struct UniformBounds<R> {
    rng: R,
}

impl<R: Rng> UniformBounds<R> {
    pub fn new(rng: R) -> Self {
        UniformBounds { rng }
    }
}

impl UniformBounds<SmallRng> {
    /// Reproducible draws from a fixed seed
    pub fn seeded(seed: u64) -> Self {
        UniformBounds::new(SmallRng::seed_from_u64(seed))
    }

    /// Fresh draws on every run, seeded from the operating system
    pub fn from_os() -> Self {
        UniformBounds::new(SmallRng::from_os_rng())
    }
}

impl<R: Rng> Initializer for UniformBounds<R> {
    fn centroids(&mut self, bounds: &Bounds, k: usize) -> Result<Vec<Position>> {
        let mut centroids = Vec::new();
        centroids
            .try_reserve_exact(k)
            .map_err(|e| ClusterError::InvalidParameter {
                name: "k".into(),
                value: format!("{} centroids do not fit in memory: {}", k, e),
            })?;

        for _ in 0..k {
            let lat = draw(&mut self.rng, bounds.min.lat(), bounds.max.lat());
            let lon = draw(&mut self.rng, bounds.min.lon(), bounds.max.lon());
            centroids.push(Position::new(lat, lon));
        }

        Ok(centroids)
    }
}

// Degenerate ranges (lo == hi) yield lo.
fn draw<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + rng.random::<f64>() * (hi - lo)
}
