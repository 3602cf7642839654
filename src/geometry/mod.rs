//! Points, quadrilaterals and lines tagged with the coordinate space they live in.
//!
//! Three spaces take part in one edge-finder call:
//!
//! - [`Crop`]: pixel coordinates relative to the plate candidate's crop.
//! - [`Full`]: pixel coordinates in the full input image.
//! - [`Canonical`]: pixel coordinates in the perspective-corrected,
//!   template-sized crop handed to the refiner.
//!
//! The marker is a zero-sized type parameter, so a `Point<Crop>` cannot be
//! passed where a `Point<Full>` is expected. Crossing spaces goes through
//! [`crate::transform::Transformation`] or a typed
//! [`crate::homography::Homography`].

pub mod line;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

pub use line::LineSegment;

/// Marker trait implemented by the coordinate-space tags.
pub trait Space: Copy + Clone + fmt::Debug + Default + PartialEq + Send + Sync + 'static {
    const NAME: &'static str;
}

/// Crop-local coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crop;

/// Full-image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Full;

/// Canonical-crop coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Canonical;

impl Space for Crop {
    const NAME: &'static str = "crop";
}

impl Space for Full {
    const NAME: &'static str = "full";
}

impl Space for Canonical {
    const NAME: &'static str = "canonical";
}

/// 2D point in space `S`.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Point<S: Space> {
    pub x: f32,
    pub y: f32,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: Space> Point<S> {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }

    #[inline]
    pub fn from_array(p: [f32; 2]) -> Self {
        Self::new(p[0], p[1])
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    #[inline]
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<S: Space> fmt::Debug for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:.3}, {:.3})", S::NAME, self.x, self.y)
    }
}

/// Axis-aligned integer rectangle, used for the crop's placement inside the
/// full image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Four corners ordered top-left, top-right, bottom-right, bottom-left.
///
/// The order is positional: consumers index corners by meaning and the type
/// never re-sorts them geometrically.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Quad<S: Space> {
    pub corners: [Point<S>; 4],
}

impl<S: Space> Quad<S> {
    pub const TOP_LEFT: usize = 0;
    pub const TOP_RIGHT: usize = 1;
    pub const BOTTOM_RIGHT: usize = 2;
    pub const BOTTOM_LEFT: usize = 3;

    pub fn new(
        top_left: Point<S>,
        top_right: Point<S>,
        bottom_right: Point<S>,
        bottom_left: Point<S>,
    ) -> Self {
        Self {
            corners: [top_left, top_right, bottom_right, bottom_left],
        }
    }

    /// Axis-aligned quad spanning `[x0, x1] × [y0, y1]`.
    pub fn from_bounds(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        )
    }

    pub fn top_left(&self) -> Point<S> {
        self.corners[Self::TOP_LEFT]
    }

    pub fn top_right(&self) -> Point<S> {
        self.corners[Self::TOP_RIGHT]
    }

    pub fn bottom_right(&self) -> Point<S> {
        self.corners[Self::BOTTOM_RIGHT]
    }

    pub fn bottom_left(&self) -> Point<S> {
        self.corners[Self::BOTTOM_LEFT]
    }

    pub fn top_edge(&self) -> LineSegment<S> {
        LineSegment::new(self.top_left(), self.top_right())
    }

    pub fn bottom_edge(&self) -> LineSegment<S> {
        LineSegment::new(self.bottom_left(), self.bottom_right())
    }

    pub fn left_edge(&self) -> LineSegment<S> {
        LineSegment::new(self.top_left(), self.bottom_left())
    }

    pub fn right_edge(&self) -> LineSegment<S> {
        LineSegment::new(self.top_right(), self.bottom_right())
    }

    /// Mean of the four corners.
    pub fn center(&self) -> Point<S> {
        let (sx, sy) = self
            .corners
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx * 0.25, sy * 0.25)
    }

    pub fn points(&self) -> &[Point<S>; 4] {
        &self.corners
    }

    pub fn is_finite(&self) -> bool {
        self.corners.iter().all(Point::is_finite)
    }

    /// True when the corners form a strictly convex polygon in the stored
    /// order (which also rules out self-intersection).
    pub fn is_convex(&self) -> bool {
        let mut sign = 0.0f32;
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            let c = self.corners[(i + 2) % 4];
            let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
            if cross.abs() <= f32::EPSILON {
                return false;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }

    pub fn map<T: Space>(&self, mut f: impl FnMut(Point<S>) -> Point<T>) -> Quad<T> {
        Quad {
            corners: [
                f(self.corners[0]),
                f(self.corners[1]),
                f(self.corners[2]),
                f(self.corners[3]),
            ],
        }
    }

    pub fn try_map<T: Space, E>(
        &self,
        mut f: impl FnMut(Point<S>) -> Result<Point<T>, E>,
    ) -> Result<Quad<T>, E> {
        Ok(Quad {
            corners: [
                f(self.corners[0])?,
                f(self.corners[1])?,
                f(self.corners[2])?,
                f(self.corners[3])?,
            ],
        })
    }
}
