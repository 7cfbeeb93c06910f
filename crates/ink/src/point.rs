//! Timestamped input samples

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A single pointer sample in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X position in surface pixels
    pub x: f32,
    /// Y position in surface pixels
    pub y: f32,
    /// Timestamp in milliseconds, non-decreasing within a stroke
    pub time: u64,
}

impl Point {
    pub fn new(x: f32, y: f32, time: u64) -> Self {
        Self { x, y, time }
    }

    /// Create a sample stamped with the current wall-clock time
    pub fn now(x: f32, y: f32) -> Self {
        let time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::new(x, y, time)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn distance_to(&self, other: &Point) -> f32 {
        self.pos().distance(other.pos())
    }

    #[inline]
    pub fn midpoint(&self, other: &Point) -> Vec2 {
        (self.pos() + other.pos()) * 0.5
    }

    /// Speed in pixels per millisecond since `start`.
    ///
    /// Equal timestamps yield exactly 1.0.
    pub fn velocity_from(&self, start: &Point) -> f32 {
        let dt = self.time.abs_diff(start.time);
        if dt == 0 {
            return 1.0;
        }
        self.distance_to(start) / dt as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_equal_times() {
        let a = Point::new(0.0, 0.0, 100);
        let b = Point::new(30.0, 40.0, 100);
        assert_eq!(b.velocity_from(&a), 1.0);

        let same = Point::new(3.0, 3.0, 7);
        assert_eq!(same.velocity_from(&same), 1.0);
    }

    #[test]
    fn test_velocity() {
        let a = Point::new(0.0, 0.0, 0);
        let b = Point::new(30.0, 40.0, 10);
        assert!((b.velocity_from(&a) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_never_negative() {
        let a = Point::new(0.0, 0.0, 20);
        let b = Point::new(10.0, 0.0, 10);
        assert!(b.velocity_from(&a) >= 0.0);
    }

    #[test]
    fn test_midpoint() {
        let a = Point::new(0.0, 0.0, 0);
        let b = Point::new(10.0, 4.0, 0);
        assert_eq!(a.midpoint(&b), Vec2::new(5.0, 2.0));
    }

    #[test]
    fn test_now_is_stamped() {
        let p = Point::now(1.0, 2.0);
        assert!(p.time > 0);
    }
}
