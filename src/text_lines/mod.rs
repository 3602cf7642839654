//! Detected text lines and their aggregate.
//!
//! A [`TextLine`] carries two 4-point polygons produced by the character
//! detector: the `text_area` bounding the characters and the `line_polygon`
//! bounding the baseline band. Both are ordered top-left, top-right,
//! bottom-right, bottom-left. [`TextLineCollection`] summarises a set of lines
//! into the quantities the edge finder sizes the plate from.

mod collection;

pub use collection::TextLineCollection;

use crate::geometry::{LineSegment, Point, Space};
use serde::{Deserialize, Serialize};

/// One detected run of characters in space `S`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TextLine<S: Space> {
    pub text_area: [Point<S>; 4],
    pub line_polygon: [Point<S>; 4],
}

impl<S: Space> TextLine<S> {
    pub fn new(text_area: [Point<S>; 4], line_polygon: [Point<S>; 4]) -> Self {
        Self {
            text_area,
            line_polygon,
        }
    }

    /// Upper edge of the line band, left to right.
    pub fn top_line(&self) -> LineSegment<S> {
        LineSegment::new(self.line_polygon[0], self.line_polygon[1])
    }

    /// Lower edge of the line band, left to right.
    pub fn bottom_line(&self) -> LineSegment<S> {
        LineSegment::new(self.line_polygon[3], self.line_polygon[2])
    }

    pub fn char_box_top(&self) -> LineSegment<S> {
        LineSegment::new(self.text_area[0], self.text_area[1])
    }

    pub fn char_box_bottom(&self) -> LineSegment<S> {
        LineSegment::new(self.text_area[3], self.text_area[2])
    }

    /// Left edge of the character box, bottom to top.
    pub fn char_box_left(&self) -> LineSegment<S> {
        LineSegment::new(self.text_area[3], self.text_area[0])
    }

    /// Right edge of the character box, bottom to top.
    pub fn char_box_right(&self) -> LineSegment<S> {
        LineSegment::new(self.text_area[2], self.text_area[1])
    }

    /// Height of the line band measured from the middle of its bottom edge.
    pub fn line_height(&self) -> f32 {
        let bottom = self.bottom_line();
        let mid = bottom.midpoint();
        let across = self.top_line().closest_point_on_segment(&mid);
        mid.distance(&across)
    }

    /// Mean orientation of the band edges in degrees.
    pub fn angle(&self) -> f32 {
        (self.top_line().angle() + self.bottom_line().angle()) * 0.5
    }

    /// Same line expressed in another coordinate space.
    pub fn map<T: Space>(&self, mut f: impl FnMut(Point<S>) -> Point<T>) -> TextLine<T> {
        TextLine {
            text_area: self.text_area.map(&mut f),
            line_polygon: self.line_polygon.map(&mut f),
        }
    }

    /// Fallible variant of [`Self::map`].
    pub fn try_map<T: Space, E>(
        &self,
        mut f: impl FnMut(Point<S>) -> Result<Point<T>, E>,
    ) -> Result<TextLine<T>, E> {
        let mut text_area = [Point::new(0.0, 0.0); 4];
        for (dst, src) in text_area.iter_mut().zip(self.text_area.iter()) {
            *dst = f(*src)?;
        }
        let mut line_polygon = [Point::new(0.0, 0.0); 4];
        for (dst, src) in line_polygon.iter_mut().zip(self.line_polygon.iter()) {
            *dst = f(*src)?;
        }
        Ok(TextLine {
            text_area,
            line_polygon,
        })
    }
}
