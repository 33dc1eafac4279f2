use serde::{Deserialize, Serialize};

use super::{GeoPoint, bearing_deg, distance_m};
use crate::bounds::GeoBounds;

/// Ordered polyline of geodetic points, traversed in insertion order.
///
/// Empty and single-point paths are valid. Repeated points are kept; the
/// zero-length segments they form are skipped when walking the path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    points: Vec<GeoPoint>,
}

impl Path {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// The two-point path used when no road route is available.
    pub fn straight_line(from: GeoPoint, to: GeoPoint) -> Self {
        Self::new(vec![from, to])
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }

    pub fn push(&mut self, point: GeoPoint) {
        self.points.push(point);
    }

    /// Total great-circle length in meters. Zero for fewer than two points.
    pub fn length_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| distance_m(pair[0], pair[1]))
            .sum()
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(&self.points)
    }

    /// Position at `fraction` of the path's length.
    ///
    /// Within a segment latitude and longitude are interpolated linearly in
    /// degree space. That is an approximation which is only close to the
    /// geodesic for short segments.
    pub fn position_at(&self, fraction: f64) -> Option<GeoPoint> {
        let first = self.first()?;
        let last = self.last()?;
        let fraction = sanitize_fraction(fraction);
        if fraction <= 0.0 {
            return Some(first);
        }
        if fraction >= 1.0 {
            return Some(last);
        }

        let total = self.length_m();
        if total <= 0.0 {
            return Some(first);
        }

        match self.locate(total * fraction) {
            Some(hit) => {
                let a = self.points[hit.index];
                let b = self.points[hit.index + 1];
                Some(a.lerp(b, hit.t))
            }
            // Float drift can leave the target just past the final segment.
            None => Some(last),
        }
    }

    /// Compass heading (degrees in [0, 360)) of the segment under `fraction`.
    ///
    /// None when the path has no extent to travel along.
    pub fn heading_at(&self, fraction: f64) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        let total = self.length_m();
        if total <= 0.0 {
            return None;
        }

        let fraction = sanitize_fraction(fraction).clamp(0.0, 1.0);
        match self.locate(total * fraction) {
            Some(hit) => Some(bearing_deg(
                self.points[hit.index],
                self.points[hit.index + 1],
            )),
            None => self
                .points
                .windows(2)
                .rev()
                .find(|pair| distance_m(pair[0], pair[1]) > 0.0)
                .map(|pair| bearing_deg(pair[0], pair[1])),
        }
    }

    /// Finds the first non-degenerate segment whose cumulative end reaches
    /// `target_m`.
    fn locate(&self, target_m: f64) -> Option<SegmentHit> {
        let mut before = 0.0;
        for (index, pair) in self.points.windows(2).enumerate() {
            let segment = distance_m(pair[0], pair[1]);
            if segment <= 0.0 {
                continue;
            }
            if before + segment >= target_m {
                let t = ((target_m - before) / segment).clamp(0.0, 1.0);
                return Some(SegmentHit { index, t });
            }
            before += segment;
        }
        None
    }
}

impl From<Vec<GeoPoint>> for Path {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<GeoPoint> for Path {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Copy, Clone)]
struct SegmentHit {
    index: usize,
    t: f64,
}

fn sanitize_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() { 0.0 } else { fraction }
}
