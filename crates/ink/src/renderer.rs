//! Variable-width stroke rendering
//!
//! Each fitted segment gets a pen width from the low-pass filtered pointer
//! velocity (fast strokes thin, slow strokes thick). The segment is then
//! approximated by a run of filled discs whose radius eases from the
//! previous segment's width to the new one.

use std::fmt;

use glam::Vec2;
use inkpad_config::PadConfig;
use tracing::debug;

use crate::bezier::CurveSegment;
use crate::point::Point;
use crate::stroke::StrokeState;

/// A filled disc to stamp onto the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dab {
    /// X position in surface coordinates
    pub x: f32,
    /// Y position in surface coordinates
    pub y: f32,
    /// Disc radius in pixels
    pub radius: f32,
}

/// Radius used when a stroke ends before a curve could be fitted
pub enum DotSize {
    Fixed(f32),
    Computed(Box<dyn Fn(&StrokeState) -> f32 + Send + Sync>),
}

impl DotSize {
    pub fn computed(f: impl Fn(&StrokeState) -> f32 + Send + Sync + 'static) -> Self {
        Self::Computed(Box::new(f))
    }

    pub fn resolve(&self, state: &StrokeState) -> f32 {
        match self {
            Self::Fixed(size) => *size,
            Self::Computed(f) => f(state),
        }
    }
}

impl fmt::Debug for DotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(size) => f.debug_tuple("Fixed").field(size).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Result of rendering one segment
#[derive(Debug, Clone)]
pub struct RenderedSegment {
    /// Filtered velocity used for this segment
    pub velocity: f32,
    /// Width carried over from the previous segment
    pub start_width: f32,
    /// Width this segment ends with
    pub end_width: f32,
    /// Discs approximating the ribbon, in drawing order
    pub dabs: Vec<Dab>,
}

/// Turns fitted segments into width-modulated dabs
#[derive(Debug)]
pub struct StrokeRenderer {
    min_width: f32,
    max_width: f32,
    velocity_filter_weight: f32,
    dot_size: DotSize,
}

impl StrokeRenderer {
    /// Build a renderer from an already validated config
    pub fn new(config: &PadConfig) -> Self {
        Self {
            min_width: config.min_width,
            max_width: config.max_width,
            velocity_filter_weight: config.velocity_filter_weight,
            dot_size: DotSize::Fixed(config.dot_radius()),
        }
    }

    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Width every stroke starts from
    pub fn start_width(&self) -> f32 {
        (self.min_width + self.max_width) / 2.0
    }

    pub fn set_dot_size(&mut self, dot_size: DotSize) {
        self.dot_size = dot_size;
    }

    pub fn dot_size(&self) -> &DotSize {
        &self.dot_size
    }

    /// Blend a raw velocity sample with the previous filtered value
    #[inline]
    pub fn filter_velocity(&self, raw: f32, last: f32) -> f32 {
        let w = self.velocity_filter_weight;
        w * raw + (1.0 - w) * last
    }

    /// Pen width for a velocity: inverse to speed, clamped below at min_width
    #[inline]
    pub fn stroke_width(&self, velocity: f32) -> f32 {
        (self.max_width / (velocity + 1.0)).max(self.min_width)
    }

    /// Render one segment and advance the stroke state
    pub fn render_segment(&self, state: &mut StrokeState, curve: &CurveSegment) -> RenderedSegment {
        self.render(state, curve, None)
    }

    /// Like `render_segment`, keeping only dabs that overlap a surface of `size`
    pub fn render_segment_within(
        &self,
        state: &mut StrokeState,
        curve: &CurveSegment,
        size: Vec2,
    ) -> RenderedSegment {
        self.render(state, curve, Some(size))
    }

    fn render(
        &self,
        state: &mut StrokeState,
        curve: &CurveSegment,
        clip: Option<Vec2>,
    ) -> RenderedSegment {
        let raw = curve.end_point.velocity_from(&curve.start_point);
        let velocity = self.filter_velocity(raw, state.last_velocity);
        let end_width = self.stroke_width(velocity);
        let start_width = state.last_width;

        let dabs = match clip {
            Some(size) => Self::visible_dabs(curve, start_width, end_width, size),
            None => Self::curve_dabs(curve, start_width, end_width),
        };

        debug!(
            "StrokeRenderer::render_segment: v={:.3} (raw {:.3}), width {:.3} -> {:.3}, {} dabs",
            velocity,
            raw,
            start_width,
            end_width,
            dabs.len()
        );

        if !dabs.is_empty() {
            state.is_empty = false;
        }
        state.last_velocity = velocity;
        state.last_width = end_width;

        RenderedSegment {
            velocity,
            start_width,
            end_width,
            dabs,
        }
    }

    /// Sample a segment into discs, one per unit of estimated arc length.
    ///
    /// The radius eases with t³ rather than linearly in t.
    pub fn curve_dabs(curve: &CurveSegment, start_width: f32, end_width: f32) -> Vec<Dab> {
        Self::dabs_along(curve, start_width, end_width).collect()
    }

    /// `curve_dabs` without the discs that cannot touch a surface of `size`.
    ///
    /// A segment whose control polygon lies entirely off the surface is
    /// skipped without sampling.
    pub fn visible_dabs(
        curve: &CurveSegment,
        start_width: f32,
        end_width: f32,
        size: Vec2,
    ) -> Vec<Dab> {
        let reach = start_width.abs().max(end_width.abs()) + 1.0;
        let lo = Vec2::splat(-reach);
        let hi = size + reach;

        let (min, max) = curve.bounds();
        if !(max.cmpge(lo).all() && min.cmple(hi).all()) {
            return Vec::new();
        }

        Self::dabs_along(curve, start_width, end_width)
            .filter(|dab| {
                let pos = Vec2::new(dab.x, dab.y);
                pos.cmpge(lo).all() && pos.cmple(hi).all()
            })
            .collect()
    }

    fn dabs_along(
        curve: &CurveSegment,
        start_width: f32,
        end_width: f32,
    ) -> impl Iterator<Item = Dab> + '_ {
        let steps = curve.arc_length().floor() as usize;
        let width_delta = end_width - start_width;

        (0..steps).map(move |i| {
            let t = i as f32 / steps as f32;
            let pos = curve.point_at(t);
            Dab {
                x: pos.x,
                y: pos.y,
                radius: start_width + t * t * t * width_delta,
            }
        })
    }

    /// Single disc for a stroke too short to fit a curve
    pub fn dot(&self, state: &mut StrokeState, point: &Point) -> Dab {
        let radius = self.dot_size.resolve(state);
        debug!(
            "StrokeRenderer::dot at ({:.1}, {:.1}), radius={:.2}",
            point.x, point.y, radius
        );
        state.is_empty = false;
        Dab {
            x: point.x,
            y: point.y,
            radius,
        }
    }
}
