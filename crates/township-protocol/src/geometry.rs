//! Rectangle geometry for conversation areas.
//!
//! A conversation area is described by its center and full width/height
//! ([`BoundingBox`]). Two derived forms are used for the two questions
//! the room asks:
//!
//! - [`Bounds`] (`x_min`, `y_min`, `x_max`, `y_max`) answers "do these two
//!   areas overlap?"
//! - [`Corners`] (`top_left`, `bottom_right`) answers "is this participant
//!   standing inside the area?"
//!
//! The y axis grows upward, so "top" is the larger y and "left" the
//! smaller x.
//!
//! The two tests treat edges differently. Overlap lets rectangles touch
//! (shared edges are not an overlap), so areas can be placed flush against
//! each other. Containment is strict (a point on the edge is outside).

use serde::{Deserialize, Serialize};

/// A point in room space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle given by its center and full width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned min/max form of a [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

/// Diagonal-corner form of a [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    /// Smallest x, largest y.
    pub top_left: Point,
    /// Largest x, smallest y.
    pub bottom_right: Point,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the min/max form used for overlap testing.
    pub fn bounds(&self) -> Bounds {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        Bounds {
            x_min: self.x - half_w,
            y_min: self.y - half_h,
            x_max: self.x + half_w,
            y_max: self.y + half_h,
        }
    }

    /// Returns the corner form used for containment testing.
    pub fn corners(&self) -> Corners {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        Corners {
            top_left: Point::new(self.x - half_w, self.y + half_h),
            bottom_right: Point::new(self.x + half_w, self.y - half_h),
        }
    }

    /// Returns `true` if the two boxes share interior area.
    /// Boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    /// Returns `true` if `point` lies strictly inside the box.
    pub fn contains(&self, point: Point) -> bool {
        self.corners().contains(point)
    }
}

impl Bounds {
    /// Two rectangles overlap unless one lies entirely to one side of the
    /// other on either axis. Equal edges count as "to one side".
    pub fn overlaps(&self, other: &Bounds) -> bool {
        !(self.x_min >= other.x_max
            || self.x_max <= other.x_min
            || self.y_max <= other.y_min
            || self.y_min >= other.y_max)
    }
}

impl Corners {
    /// Strict containment: boundary points are excluded.
    pub fn contains(&self, point: Point) -> bool {
        self.top_left.x < point.x
            && point.x < self.bottom_right.x
            && self.bottom_right.y < point.y
            && point.y < self.top_left.y
    }
}
