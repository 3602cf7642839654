use super::{Point, Space};
use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

const EPS: f32 = 1e-6;

/// Directed line segment `p0 → p1` in space `S`.
///
/// Besides segment queries, the segment doubles as the carrier of an infinite
/// line for offsets and intersections.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct LineSegment<S: Space> {
    pub p0: Point<S>,
    pub p1: Point<S>,
}

impl<S: Space> LineSegment<S> {
    pub fn new(p0: Point<S>, p1: Point<S>) -> Self {
        Self { p0, p1 }
    }

    pub fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    pub fn midpoint(&self) -> Point<S> {
        self.p0.midpoint(&self.p1)
    }

    pub fn length(&self) -> f32 {
        self.p0.distance(&self.p1)
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() <= EPS || !self.p0.is_finite() || !self.p1.is_finite()
    }

    /// Unit direction `p0 → p1`, zero for a degenerate segment.
    pub fn direction(&self) -> [f32; 2] {
        let len = self.length();
        if len > EPS {
            [(self.p1.x - self.p0.x) / len, (self.p1.y - self.p0.y) / len]
        } else {
            [0.0, 0.0]
        }
    }

    /// Unit normal `(dy, -dx)`: points up for a left-to-right segment and
    /// right for a top-to-bottom one (image y grows downward).
    pub fn normal(&self) -> [f32; 2] {
        let dir = self.direction();
        [dir[1], -dir[0]]
    }

    /// Orientation in degrees, `atan2(dy, dx)`.
    pub fn angle(&self) -> f32 {
        (self.p1.y - self.p0.y)
            .atan2(self.p1.x - self.p0.x)
            .to_degrees()
    }

    /// Segment translated by `distance` along [`Self::normal`].
    ///
    /// A degenerate segment has no normal and is returned unchanged; any
    /// later intersection with it fails.
    pub fn parallel_line(&self, distance: f32) -> Self {
        let n = self.normal();
        let dx = distance * n[0];
        let dy = distance * n[1];
        Self::new(
            Point::new(self.p0.x + dx, self.p0.y + dy),
            Point::new(self.p1.x + dx, self.p1.y + dy),
        )
    }

    /// Intersection of the infinite lines carrying `self` and `other`.
    pub fn intersection(&self, other: &Self) -> Result<Point<S>, GeometryError> {
        if self.is_degenerate() || other.is_degenerate() {
            return Err(GeometryError::DegenerateSegment);
        }
        let d1 = [self.p1.x - self.p0.x, self.p1.y - self.p0.y];
        let d2 = [other.p1.x - other.p0.x, other.p1.y - other.p0.y];
        let denom = d1[0] * d2[1] - d1[1] * d2[0];
        let scale = self.length() * other.length();
        if denom.abs() <= EPS * scale {
            return Err(GeometryError::ParallelLines);
        }
        let wx = other.p0.x - self.p0.x;
        let wy = other.p0.y - self.p0.y;
        let t = (wx * d2[1] - wy * d2[0]) / denom;
        let p = Point::new(self.p0.x + t * d1[0], self.p0.y + t * d1[1]);
        if p.is_finite() {
            Ok(p)
        } else {
            Err(GeometryError::NonFinite)
        }
    }

    /// Closest point to `p` that lies on the segment (clamped to its ends).
    pub fn closest_point_on_segment(&self, p: &Point<S>) -> Point<S> {
        let dx = self.p1.x - self.p0.x;
        let dy = self.p1.y - self.p0.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq <= EPS {
            return self.p0;
        }
        let t = (((p.x - self.p0.x) * dx + (p.y - self.p0.y) * dy) / len_sq).clamp(0.0, 1.0);
        Point::new(self.p0.x + t * dx, self.p0.y + t * dy)
    }

    /// For a left-to-right segment, true when `p` lies below it in image
    /// coordinates (larger y).
    pub fn is_point_below(&self, p: &Point<S>) -> bool {
        (self.p1.x - self.p0.x) * (p.y - self.p0.y) - (self.p1.y - self.p0.y) * (p.x - self.p0.x)
            > 0.0
    }

    /// Point at parameter `t` (0 → `p0`, 1 → `p1`).
    pub fn point_at(&self, t: f32) -> Point<S> {
        Point::new(
            self.p0.x + t * (self.p1.x - self.p0.x),
            self.p0.y + t * (self.p1.y - self.p0.y),
        )
    }

    pub fn map<T: Space>(&self, mut f: impl FnMut(Point<S>) -> Point<T>) -> LineSegment<T> {
        LineSegment::new(f(self.p0), f(self.p1))
    }
}
