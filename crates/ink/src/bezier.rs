//! Cubic Bézier segments fitted between input samples

use glam::Vec2;

use crate::constants::ARC_LENGTH_STEPS;
use crate::point::Point;

/// One cubic segment of a stroke
///
/// Start and end are the original samples (their timestamps drive the
/// velocity estimate). Control points may overshoot the chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub start_point: Point,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end_point: Point,
}

impl CurveSegment {
    pub fn new(start_point: Point, control1: Vec2, control2: Vec2, end_point: Point) -> Self {
        Self {
            start_point,
            control1,
            control2,
            end_point,
        }
    }

    /// Evaluate the curve at parameter `t` in [0, 1]
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        let uu = u * u;
        let tt = t * t;

        self.start_point.pos() * (uu * u)
            + self.control1 * (3.0 * uu * t)
            + self.control2 * (3.0 * u * tt)
            + self.end_point.pos() * (tt * t)
    }

    /// Polyline approximation of the arc length.
    ///
    /// Samples the curve at ARC_LENGTH_STEPS + 1 evenly spaced parameters.
    /// Only used to pick a rendering resolution.
    pub fn arc_length(&self) -> f32 {
        let mut length = 0.0;
        let mut previous = self.start_point.pos();

        for i in 1..=ARC_LENGTH_STEPS {
            let t = i as f32 / ARC_LENGTH_STEPS as f32;
            let current = self.point_at(t);
            length += current.distance(previous);
            previous = current;
        }

        length
    }

    /// Box around the control polygon, which contains the whole curve
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let corners = [
            self.start_point.pos(),
            self.control1,
            self.control2,
            self.end_point.pos(),
        ];
        corners[1..]
            .iter()
            .fold((corners[0], corners[0]), |(min, max), p| (min.min(*p), max.max(*p)))
    }

    /// Same curve with every coordinate multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        let scale = |p: &Point| Point::new(p.x * factor, p.y * factor, p.time);
        Self {
            start_point: scale(&self.start_point),
            control1: self.control1 * factor,
            control2: self.control2 * factor,
            end_point: scale(&self.end_point),
        }
    }
}
