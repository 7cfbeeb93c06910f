//! Running state of the stroke in progress

use crate::curve_fitter::CurveFitter;

/// Per-stroke state owned by the pad
///
/// Holds the sliding sample window plus the width and velocity the previous
/// segment ended with, so the next segment continues without a jump.
#[derive(Debug, Clone)]
pub struct StrokeState {
    pub(crate) fitter: CurveFitter,
    pub(crate) last_width: f32,
    pub(crate) last_velocity: f32,
    pub(crate) is_empty: bool,
}

impl StrokeState {
    /// Fresh state for an empty pad
    pub fn new(start_width: f32) -> Self {
        Self {
            fitter: CurveFitter::new(),
            last_width: start_width,
            last_velocity: 0.0,
            is_empty: true,
        }
    }

    /// Prepare for a new stroke. Ink already on the pad keeps it non-empty.
    pub fn begin(&mut self, start_width: f32) {
        self.fitter.clear();
        self.last_velocity = 0.0;
        self.last_width = start_width;
    }

    /// Forget everything, including whether any ink was drawn
    pub fn reset(&mut self, start_width: f32) {
        self.begin(start_width);
        self.is_empty = true;
    }

    /// The sliding sample window
    #[inline]
    pub fn window(&self) -> &CurveFitter {
        &self.fitter
    }

    /// Width the last rendered segment ended with
    #[inline]
    pub fn last_width(&self) -> f32 {
        self.last_width
    }

    /// Filtered velocity of the last rendered segment
    #[inline]
    pub fn last_velocity(&self) -> f32 {
        self.last_velocity
    }

    /// True until any ink has been drawn
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }
}
