//! Package cluster implements k-means clustering on (lat, lon)
pub mod distance;
pub mod error;
pub mod init;
pub mod kmeans;
pub mod palette;
pub mod point;

#[cfg(test)]
mod kmeans_test;

// Public API exports - allow unused imports as these are part of the public API
#[allow(unused_imports)]
pub use error::{ClusterError, Result};
#[allow(unused_imports)]
pub use point::{Bounds, Cluster, Located, Point, Position};
#[allow(unused_imports)]
pub use init::{Initializer, UniformBounds};
#[allow(unused_imports)]
pub use kmeans::{Clustering, KMeans, MAX_ITERATIONS, cluster, cluster_seeded};
#[allow(unused_imports)]
pub use palette::{PALETTE, color_for};
