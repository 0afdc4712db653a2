//! Vector paths used for glyph outlines and surface fills.

use crate::geometry::{BBox, Ctm, Point};

/// A segment of a vector path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSegment {
    /// Move to a new point (starts a new subpath).
    MoveTo(Point),
    /// Straight line from current point to target.
    LineTo(Point),
    /// Cubic Bezier curve with two control points and an endpoint.
    CurveTo {
        /// First control point.
        cp1: Point,
        /// Second control point.
        cp2: Point,
        /// Endpoint of the curve.
        end: Point,
    },
    /// Close the current subpath (line back to the subpath start).
    ClosePath,
}

impl PathSegment {
    fn map(&self, m: &Ctm) -> PathSegment {
        match self {
            PathSegment::MoveTo(p) => PathSegment::MoveTo(m.transform_point(*p)),
            PathSegment::LineTo(p) => PathSegment::LineTo(m.transform_point(*p)),
            PathSegment::CurveTo { cp1, cp2, end } => PathSegment::CurveTo {
                cp1: m.transform_point(*cp1),
                cp2: m.transform_point(*cp2),
                end: m.transform_point(*end),
            },
            PathSegment::ClosePath => PathSegment::ClosePath,
        }
    }
}

/// A complete path consisting of segments.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// The path segments.
    pub segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.segments.push(PathSegment::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.segments.push(PathSegment::LineTo(Point::new(x, y)));
        self
    }

    pub fn curve_to(&mut self, cp1: Point, cp2: Point, end: Point) -> &mut Self {
        self.segments.push(PathSegment::CurveTo { cp1, cp2, end });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segments.push(PathSegment::ClosePath);
        self
    }

    /// Append a closed axis-aligned rectangle subpath.
    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.move_to(x, y)
            .line_to(x + width, y)
            .line_to(x + width, y + height)
            .line_to(x, y + height)
            .close()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Return a copy of this path with every point mapped through `m`.
    pub fn transformed(&self, m: &Ctm) -> Path {
        Path {
            segments: self.segments.iter().map(|s| s.map(m)).collect(),
        }
    }

    /// Axis-aligned bounds of all points on the path, in the path's own
    /// coordinate space (`top` holds the minimum y, `bottom` the maximum).
    ///
    /// Curve control points are included, so the box may be slightly larger
    /// than the drawn curve. Returns `None` for a path with no points.
    pub fn bounds(&self) -> Option<BBox> {
        let mut points = self.segments.iter().flat_map(|s| match s {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => vec![*p],
            PathSegment::CurveTo { cp1, cp2, end } => vec![*cp1, *cp2, *end],
            PathSegment::ClosePath => Vec::new(),
        });
        let first = points.next()?;
        let init = BBox::new(first.x, first.y, first.x, first.y);
        Some(points.fold(init, |acc, p| acc.union(&BBox::new(p.x, p.y, p.x, p.y))))
    }
}
