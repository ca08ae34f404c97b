//! Geometry and input records for clustering on (lat, lon)

use std::collections::BTreeMap;

/// Position represents a geographic coordinate (latitude, longitude)
///
/// The position is stored as [latitude, longitude] where:
/// - `[0]` is latitude
/// - `[1]` is longitude
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub [f64; 2]);

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Position([lat, lon])
    }

    pub fn lat(&self) -> f64 {
        self.0[0]
    }

    pub fn lon(&self) -> f64 {
        self.0[1]
    }

    pub fn is_finite(&self) -> bool {
        self.0[0].is_finite() && self.0[1].is_finite()
    }

    /// Returns planar (flat lat/lon) distance between two positions
    pub fn dist(&self, b: &Position) -> f64 {
        super::distance::distance_planar(self, b)
    }
}

/// Anything the engine can place on the plane
///
/// The engine reads nothing else from its input; every other field travels
/// through to the output untouched.
pub trait Located {
    fn position(&self) -> Position;
}

impl Located for Position {
    fn position(&self) -> Position {
        *self
    }
}

/// Point is a labeled geo record, e.g. a restaurant
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Unique, stable identifier
    pub id: String,
    /// Display name, if any
    pub name: Option<String>,
    pub position: Position,
    /// Categorical labels such as `cuisine` or `zone`
    pub attributes: BTreeMap<String, String>,
}

impl Point {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Point {
            id: id.into(),
            name: None,
            position: Position::new(lat, lon),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl Located for Point {
    fn position(&self) -> Position {
        self.position
    }
}

/// Cluster is one non-empty group of a k-means partition
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<P> {
    /// Initialization slot, `0..k`
    pub index: usize,
    /// Mean position of the members
    pub centroid: Position,
    /// Members in input order
    pub members: Vec<P>,
    pub display_color: &'static str,
}

/// Bounds is the axis-aligned rectangle enclosing a set of positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner (south-west)
    pub min: Position,
    /// Maximum corner (north-east)
    pub max: Position,
}

impl Bounds {
    /// Calculates bounds of the given items
    ///
    /// Returns `None` if there are no items
    pub fn of<P: Located>(items: &[P]) -> Option<Bounds> {
        let first = items.first()?.position();
        let mut min = first;
        let mut max = first;

        for item in &items[1..] {
            let pt = item.position();

            for j in 0..2 {
                if pt.0[j] < min.0[j] {
                    min.0[j] = pt.0[j];
                }
                if pt.0[j] > max.0[j] {
                    max.0[j] = pt.0[j];
                }
            }
        }

        Some(Bounds { min, max })
    }
}

/// Calculates the arithmetic mean of positions, lat and lon independently
///
/// Returns `None` for an empty iterator
pub fn mean<I>(positions: I) -> Option<Position>
where
    I: IntoIterator<Item = Position>,
{
    let mut center = Position([0.0, 0.0]);
    let mut count = 0usize;

    for pt in positions {
        for j in 0..2 {
            center.0[j] += pt.0[j];
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }

    for j in 0..2 {
        center.0[j] /= count as f64;
    }

    Some(center)
}
