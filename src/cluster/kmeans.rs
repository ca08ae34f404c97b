use super::error::{ClusterError, Result};
use super::init::{Initializer, UniformBounds};
use super::palette::color_for;
use super::point::{Bounds, Cluster, Located, Position, mean};
use bitvec::prelude::*;
use std::collections::BTreeMap;

// Lloyd's algorithm, flat (lat, lon) plane:
//
// KMeans(D, k)
//    C = k centroids drawn uniformly inside bounds(D)
//    A = [0; |D|]
//    repeat at most MAX_ITERATIONS times
//       A' = for each point, index of nearest centroid (first strictly smaller wins)
//       if A' == A
//          stop
//       A = A'
//       for each centroid c with members
//          c = mean of its members
//    return non-empty groups of A

/// Default bound on assignment/update rounds
pub const MAX_ITERATIONS: usize = 100;

/// K-means run configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    k: usize,
    max_iterations: usize,
}

/// Outcome of a single run
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering<P> {
    /// Non-empty clusters, ordered by slot index
    pub clusters: Vec<Cluster<P>>,
    /// Assignment rounds performed
    pub iterations: usize,
    /// `false` when the run stopped on the iteration bound
    pub converged: bool,
}

impl<P> Clustering<P> {
    fn empty() -> Self {
        Clustering {
            clusters: Vec::new(),
            iterations: 0,
            converged: true,
        }
    }
}

impl KMeans {
    /// Creates a configuration for `k` clusters
    ///
    /// Any positive `k` is accepted here. A run keeps `k` centroids in memory
    /// and compares every point against all of them, so [`KMeans::run`]
    /// reports a `k` whose centroids cannot be allocated as an error.
    ///
    /// # Errors
    ///
    /// [`ClusterError::InvalidParameter`] if `k` is not positive
    pub fn new(k: i64) -> Result<Self> {
        let invalid = || ClusterError::InvalidParameter {
            name: "k".into(),
            value: k.to_string(),
        };
        if k <= 0 {
            return Err(invalid());
        }
        let k = usize::try_from(k).map_err(|_| invalid())?;

        Ok(KMeans {
            k,
            max_iterations: MAX_ITERATIONS,
        })
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Partitions `points` into at most `k` non-empty clusters
    ///
    /// Hitting the iteration bound is not an error: the partition reached so
    /// far is returned with `converged == false`.
    ///
    /// # Errors
    ///
    /// [`ClusterError::InvalidParameter`] if a point has a non-finite coordinate,
    /// the `k` centroids cannot be allocated, or the initializer does not
    /// return `k` centroids
    pub fn run<P, I>(&self, points: &[P], init: &mut I) -> Result<Clustering<P>>
    where
        P: Located + Clone,
        I: Initializer + ?Sized,
    {
        let positions: Vec<Position> = points.iter().map(Located::position).collect();
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(ClusterError::InvalidParameter {
                name: format!("points[{}]", i),
                value: format!("{:?}", positions[i].0),
            });
        }

        let bounds = match Bounds::of(&positions) {
            Some(bounds) => bounds,
            None => return Ok(Clustering::empty()),
        };

        let mut centroids = init.centroids(&bounds, self.k)?;
        if centroids.len() != self.k {
            return Err(ClusterError::InvalidParameter {
                name: "initial centroids".into(),
                value: format!("{} != k ({})", centroids.len(), self.k),
            });
        }

        log::debug!("kmeans start n={} k={}", positions.len(), self.k);

        let mut assignments = vec![0usize; positions.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;

            let next = assign(&positions, &centroids);
            if next == assignments {
                converged = true;
                break;
            }
            assignments = next;

            update_centroids(&positions, &assignments, &mut centroids);
        }

        if converged {
            log::debug!("kmeans converged after {} iterations", iterations);
        } else {
            log::debug!("kmeans stopped at iteration bound {}", iterations);
        }

        Ok(Clustering {
            clusters: assemble(points, &positions, &assignments, self.k),
            iterations,
            converged,
        })
    }
}

/// Clusters `points` into at most `k` groups with an OS-seeded initializer
///
/// Repeated calls may return different partitions for the same input.
#[allow(dead_code)] // Part of public API, may be used by external code
pub fn cluster<P: Located + Clone>(points: &[P], k: i64) -> Result<Vec<Cluster<P>>> {
    let kmeans = KMeans::new(k)?;
    Ok(kmeans.run(points, &mut UniformBounds::from_os())?.clusters)
}

/// Same as [`cluster`] but reproducible for a given `seed`
#[allow(dead_code)] // Part of public API, may be used by external code
pub fn cluster_seeded<P: Located + Clone>(
    points: &[P],
    k: i64,
    seed: u64,
) -> Result<Vec<Cluster<P>>> {
    let kmeans = KMeans::new(k)?;
    Ok(kmeans.run(points, &mut UniformBounds::seeded(seed))?.clusters)
}

/// Returns the slot of the nearest centroid
///
/// On equal distances the lower slot is kept.
pub(crate) fn nearest(pt: &Position, centroids: &[Position]) -> usize {
    let mut best = 0;
    let mut min_dist = f64::INFINITY;

    for (c, centroid) in centroids.iter().enumerate() {
        let dist = pt.dist(centroid);
        if dist < min_dist {
            min_dist = dist;
            best = c;
        }
    }

    best
}

pub(crate) fn assign(positions: &[Position], centroids: &[Position]) -> Vec<usize> {
    positions.iter().map(|pt| nearest(pt, centroids)).collect()
}

/// Moves every centroid with members to their mean; empty slots keep their position
///
/// Sums are kept per occupied slot only, so the scratch space is bounded by
/// the number of points rather than by `k`.
pub(crate) fn update_centroids(
    positions: &[Position],
    assignments: &[usize],
    centroids: &mut [Position],
) {
    let mut sums: BTreeMap<usize, (Position, usize)> = BTreeMap::new();

    for (pt, &c) in positions.iter().zip(assignments) {
        let (sum, count) = sums.entry(c).or_default();
        for j in 0..2 {
            sum.0[j] += pt.0[j];
        }
        *count += 1;
    }

    for (c, (sum, count)) in sums {
        for j in 0..2 {
            centroids[c].0[j] = sum.0[j] / count as f64;
        }
    }
}

/// Groups points by slot, dropping empty slots
fn assemble<P: Clone>(
    points: &[P],
    positions: &[Position],
    assignments: &[usize],
    k: usize,
) -> Vec<Cluster<P>> {
    let mut occupied = bitvec![0; k];
    for &c in assignments {
        occupied.set(c, true);
    }

    occupied
        .iter_ones()
        .filter_map(|index| {
            let centroid = mean(
                positions
                    .iter()
                    .zip(assignments)
                    .filter(|&(_, &c)| c == index)
                    .map(|(pt, _)| *pt),
            )?;
            let members = points
                .iter()
                .zip(assignments)
                .filter(|&(_, &c)| c == index)
                .map(|(p, _)| p.clone())
                .collect();

            Some(Cluster {
                index,
                centroid,
                members,
                display_color: color_for(index),
            })
        })
        .collect()
}
