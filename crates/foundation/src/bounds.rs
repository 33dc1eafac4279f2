use serde::{Deserialize, Serialize};

use crate::math::GeoPoint;

/// Latitude/longitude bounding box in degrees.
///
/// No antimeridian handling: a box spanning it comes out as the long way round.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn around(point: GeoPoint) -> Self {
        GeoBounds {
            south: point.lat,
            west: point.lng,
            north: point.lat,
            east: point.lng,
        }
    }

    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::around(*first);
        for p in rest {
            bounds.extend(*p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: GeoPoint) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south + self.north) * 0.5,
            (self.west + self.east) * 0.5,
        )
    }
}
