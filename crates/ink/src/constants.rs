/// Subdivisions used by the arc-length estimate (samples = steps + 1).
pub const ARC_LENGTH_STEPS: usize = 10;

/// Maximum number of samples held in the sliding window.
pub const WINDOW_SIZE: usize = 4;

/// Samples needed before a curve can be fitted.
pub const MIN_CURVE_POINTS: usize = 3;
