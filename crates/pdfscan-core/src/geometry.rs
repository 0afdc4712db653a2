//! Points, affine matrices, and bounding boxes.
//!
//! Matrices use the PDF row-vector convention: a point `(x, y)` maps to
//! `(a*x + c*y + e, b*x + d*y + f)`, and `m1.concat(&m2)` applies `m1`
//! first, then `m2`.

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D affine transformation matrix `[a b c d e f]`.
///
/// Used for the current transformation matrix (CTM), the text matrix (Tm),
/// and the text line matrix (Tlm). It is a plain value type: copying a
/// `Ctm` never aliases the original.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// The matrix as a 6-element array `[a, b, c, d, e, f]`.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// A pure translation matrix.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// A pure scaling matrix.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Concatenate: the result applies `self` first, then `other`.
    pub fn concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Translate in this matrix's own (local) coordinate space.
    ///
    /// Equivalent to `Ctm::translation(tx, ty).concat(self)`, which moves the
    /// origin by `(tx, ty)` measured along this matrix's axes.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        *self = Ctm::translation(tx, ty).concat(self);
    }

    /// Horizontal translation component (`e`).
    pub fn translate_x(&self) -> f64 {
        self.e
    }

    /// Vertical translation component (`f`).
    pub fn translate_y(&self) -> f64 {
        self.f
    }

    /// Horizontal scale component (`a`).
    pub fn scale_x(&self) -> f64 {
        self.a
    }

    /// Vertical scale component (`d`).
    pub fn scale_y(&self) -> f64 {
        self.d
    }

    /// Map a point through this matrix.
    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }
}

/// Bounding box with top-left origin coordinate system.
///
/// Coordinates follow the page-layout convention:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Build a box from its top-left corner and its size.
    ///
    /// Sizes may be negative (e.g. under a mirrored CTM); the box keeps them
    /// as given so `width()`/`height()` report the signed extent.
    pub fn from_origin_size(x: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(x, top, x + width, top + height)
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }
}
