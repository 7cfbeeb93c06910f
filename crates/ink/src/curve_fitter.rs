//! Sliding-window curve fitting
//!
//! Every new sample slides a window of at most four points. Once three
//! samples are available each slide yields one cubic segment spanning the
//! two middle points, with control points synthesised from the outer
//! neighbours (a Catmull-Rom style midpoint construction).

use std::collections::VecDeque;

use glam::Vec2;
use tracing::debug;

use crate::bezier::CurveSegment;
use crate::constants::{MIN_CURVE_POINTS, WINDOW_SIZE};
use crate::point::Point;

/// Control points synthesised around the middle sample of three
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoints {
    /// Control point on the incoming side of `s2`
    pub c1: Vec2,
    /// Control point on the outgoing side of `s2`
    pub c2: Vec2,
}

/// Compute the control points around `s2` for the path `s1 -> s2 -> s3`.
///
/// The midpoints of both chords are blended by relative chord length and the
/// pair is translated so the blend lands on `s2`. Three coincident samples
/// collapse every control point onto `s2`.
pub fn control_points(s1: &Point, s2: &Point, s3: &Point) -> ControlPoints {
    let m1 = s1.midpoint(s2);
    let m2 = s2.midpoint(s3);

    let l1 = s1.distance_to(s2);
    let l2 = s2.distance_to(s3);

    let total = l1 + l2;
    let k = if total > 0.0 { l2 / total } else { 0.5 };
    let cm = m2 + (m1 - m2) * k;

    let t = s2.pos() - cm;

    ControlPoints {
        c1: m1 + t,
        c2: m2 + t,
    }
}

/// Sliding window of recent samples for a single stroke
#[derive(Debug, Clone, Default)]
pub struct CurveFitter {
    points: VecDeque<Point>,
}

impl CurveFitter {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(WINDOW_SIZE),
        }
    }

    /// Number of samples currently held
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether enough samples have arrived to fit curves
    #[inline]
    pub fn can_draw_curve(&self) -> bool {
        self.points.len() >= MIN_CURVE_POINTS
    }

    /// Oldest sample in the window
    pub fn first(&self) -> Option<&Point> {
        self.points.front()
    }

    /// Iterate the window from oldest to newest
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Add a sample, returning the segment it completes (if any).
    ///
    /// The third sample of a stroke duplicates the first so the opening
    /// segment starts at the first sample instead of being skipped.
    pub fn push(&mut self, point: Point) -> Option<CurveSegment> {
        self.points.push_back(point);

        if self.points.len() < MIN_CURVE_POINTS {
            return None;
        }

        if self.points.len() == MIN_CURVE_POINTS {
            let first = self.points[0];
            self.points.push_front(first);
        }

        let p0 = &self.points[0];
        let p1 = &self.points[1];
        let p2 = &self.points[2];
        let p3 = &self.points[3];

        let outgoing = control_points(p0, p1, p2).c2;
        let incoming = control_points(p1, p2, p3).c1;
        let curve = CurveSegment::new(*p1, outgoing, incoming, *p2);

        debug!(
            "CurveFitter::push: segment ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            p1.x, p1.y, p2.x, p2.y
        );

        self.points.pop_front();

        Some(curve)
    }
}
