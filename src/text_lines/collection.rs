use super::TextLine;
use crate::error::EdgeFinderError;
use crate::geometry::{LineSegment, Point, Space};

/// Aggregate over all text lines of one plate candidate.
///
/// - `char_height`, `char_angle`: means over the lines.
/// - `top_char_area`, `bottom_char_area`: the highest character-box top edge
///   and the lowest character-box bottom edge.
/// - `longer_segment` / `shorter_segment`: the two above ordered by length.
/// - `center_horizontal_line`: runs midway between top and bottom, left to
///   right, spanning the longer segment.
/// - `center_vertical_line`: from the middle of the longer segment to the
///   closest point of the shorter one, oriented top to bottom.
#[derive(Clone, Debug)]
pub struct TextLineCollection<S: Space> {
    pub char_height: f32,
    pub char_angle: f32,
    pub top_char_area: LineSegment<S>,
    pub bottom_char_area: LineSegment<S>,
    pub longer_segment: LineSegment<S>,
    pub shorter_segment: LineSegment<S>,
    pub center_horizontal_line: LineSegment<S>,
    pub center_vertical_line: LineSegment<S>,
}

impl<S: Space> TextLineCollection<S> {
    pub fn new(lines: &[TextLine<S>]) -> Result<Self, EdgeFinderError> {
        let first = lines.first().ok_or_else(|| {
            EdgeFinderError::InsufficientInput("no text lines to aggregate".to_string())
        })?;

        let n = lines.len() as f32;
        let char_height = lines.iter().map(TextLine::line_height).sum::<f32>() / n;
        let char_angle = lines.iter().map(TextLine::angle).sum::<f32>() / n;

        let mut top_char_area = first.char_box_top();
        let mut bottom_char_area = first.char_box_bottom();
        for line in &lines[1..] {
            let top = line.char_box_top();
            if !top_char_area.is_point_below(&top.midpoint()) {
                top_char_area = top;
            }
            let bottom = line.char_box_bottom();
            if bottom_char_area.is_point_below(&bottom.midpoint()) {
                bottom_char_area = bottom;
            }
        }

        let (longer_segment, shorter_segment) =
            if top_char_area.length() > bottom_char_area.length() {
                (top_char_area, bottom_char_area)
            } else {
                (bottom_char_area, top_char_area)
            };

        let center_horizontal_line = center_horizontal(&longer_segment, &shorter_segment);
        let center_vertical_line = center_vertical(&longer_segment, &shorter_segment);

        Ok(Self {
            char_height,
            char_angle,
            top_char_area,
            bottom_char_area,
            longer_segment,
            shorter_segment,
            center_horizontal_line,
            center_vertical_line,
        })
    }

    /// Length of the longer of the two character-area edges.
    pub fn longest_segment_length(&self) -> f32 {
        self.longer_segment.length()
    }

    /// Intersection of the two center lines.
    pub fn center(&self) -> Result<Point<S>, crate::error::GeometryError> {
        self.center_horizontal_line
            .intersection(&self.center_vertical_line)
    }
}

fn center_horizontal<S: Space>(longer: &LineSegment<S>, shorter: &LineSegment<S>) -> LineSegment<S> {
    let left = shorter
        .closest_point_on_segment(&longer.p0)
        .midpoint(&longer.p0);
    let right = shorter
        .closest_point_on_segment(&longer.p1)
        .midpoint(&longer.p1);
    LineSegment::new(left, right)
}

fn center_vertical<S: Space>(longer: &LineSegment<S>, shorter: &LineSegment<S>) -> LineSegment<S> {
    let p0 = longer.midpoint();
    let p1 = shorter.closest_point_on_segment(&p0);
    if p0.y < p1.y {
        LineSegment::new(p0, p1)
    } else {
        LineSegment::new(p1, p0)
    }
}
