//! Signature pad: the host-facing stroke lifecycle
//!
//! This module connects:
//! - Input samples (from the host's pointer events)
//! - Curve fitting over a sliding sample window
//! - Velocity-driven width modelling and dab generation
//! - The raster surface the ink lands on
//!
//! The pad is driven from a single event loop through `&mut self` and never
//! blocks.

use glam::Vec2;
use inkpad_config::{ConfigError, PadConfig};
use thiserror::Error;
use tracing::{debug, info};

use crate::events::{PadEvent, PadListener};
use crate::point::Point;
use crate::renderer::{DotSize, RenderedSegment, StrokeRenderer};
use crate::stroke::StrokeState;
use crate::surface::{CpuSurface, InkSurface, SurfaceError};

#[derive(Debug, Error)]
pub enum PadError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

/// Captures strokes and renders them as variable-width ink
///
/// Usage:
/// 1. `begin_stroke` on pointer down
/// 2. `extend_stroke` on every pointer move
/// 3. `end_stroke` on pointer up
/// 4. `reset` to wipe the pad
pub struct SignaturePad<S: InkSurface = CpuSurface> {
    surface: S,
    config: PadConfig,
    renderer: StrokeRenderer,
    state: StrokeState,
    stroking: bool,
    listeners: Vec<PadListener>,
}

impl SignaturePad<CpuSurface> {
    /// Create a pad backed by a CPU surface of `config.width` x `config.height`
    pub fn with_size(config: PadConfig) -> Result<Self, PadError> {
        let surface = CpuSurface::new(config.width, config.height);
        Self::new(config, surface)
    }

    /// Encode the current ink as PNG
    pub fn to_png(&self) -> Result<Vec<u8>, PadError> {
        Ok(self.surface.encode_png()?)
    }

    /// Draw a PNG over the pad, scaled to its size.
    ///
    /// Any stroke in progress is abandoned and the pad counts as non-empty.
    pub fn load_png(&mut self, bytes: &[u8]) -> Result<(), PadError> {
        let image = CpuSurface::decode_png(bytes)?;
        self.state.begin(self.renderer.start_width());
        self.stroking = false;
        self.surface.draw_image(&image);
        self.state.is_empty = false;
        info!(
            "SignaturePad::load_png: drew {}x{} image",
            image.width(),
            image.height()
        );
        Ok(())
    }
}

impl<S: InkSurface> SignaturePad<S> {
    /// Create a pad drawing onto `surface`.
    ///
    /// The config is validated and the surface cleared to the background color.
    pub fn new(config: PadConfig, surface: S) -> Result<Self, PadError> {
        config.validate()?;

        let renderer = StrokeRenderer::new(&config);
        let state = StrokeState::new(renderer.start_width());
        let mut pad = Self {
            surface,
            config,
            renderer,
            state,
            stroking: false,
            listeners: Vec::new(),
        };
        pad.surface.clear(pad.config.background_color);
        Ok(pad)
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Running state of the current (or last) stroke
    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    pub fn renderer(&self) -> &StrokeRenderer {
        &self.renderer
    }

    /// True until any ink has been drawn since construction, reset or resize.
    ///
    /// Starting a new stroke does not clear the flag.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty
    }

    pub fn is_stroking(&self) -> bool {
        self.stroking
    }

    pub fn pen_color(&self) -> [f32; 4] {
        self.config.pen_color
    }

    pub fn set_pen_color(&mut self, color: [f32; 4]) {
        self.config.pen_color = color;
    }

    /// Override the radius used for single-dot strokes
    pub fn set_dot_size(&mut self, dot_size: DotSize) {
        self.renderer.set_dot_size(dot_size);
    }

    /// Register a lifecycle listener
    pub fn add_listener(&mut self, listener: impl Fn(&PadEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: PadEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }

    /// Start a stroke at `point`
    pub fn begin_stroke(&mut self, point: Point) {
        self.state.begin(self.renderer.start_width());
        self.stroking = true;

        debug!(
            "SignaturePad::begin_stroke at ({:.1}, {:.1}) t={}",
            point.x, point.y, point.time
        );

        self.extend_stroke(point);
        self.emit(PadEvent::StrokeBegan { point });
    }

    /// Feed the next sample of the active stroke.
    ///
    /// Returns the segment rendered by this sample, if the window produced one.
    pub fn extend_stroke(&mut self, point: Point) -> Option<RenderedSegment> {
        if !self.stroking {
            debug!("extend_stroke: no active stroke, ignoring");
            return None;
        }

        let curve = self.state.fitter.push(point)?;
        let size = Vec2::new(self.surface.width() as f32, self.surface.height() as f32);
        let rendered = self
            .renderer
            .render_segment_within(&mut self.state, &curve, size);
        if !rendered.dabs.is_empty() {
            self.surface.fill_dabs(&rendered.dabs, self.config.pen_color);
        }
        Some(rendered)
    }

    /// Finish the active stroke, returning whether the pad is still empty.
    ///
    /// A stroke that never gathered enough samples for a curve is drawn as a
    /// single dot at its first sample.
    pub fn end_stroke(&mut self) -> bool {
        if !self.stroking {
            return self.state.is_empty;
        }

        if !self.state.fitter.can_draw_curve() {
            if let Some(first) = self.state.fitter.first().copied() {
                let dab = self.renderer.dot(&mut self.state, &first);
                self.surface.fill_circle(dab.x, dab.y, dab.radius, self.config.pen_color);
            }
        }

        self.stroking = false;
        let is_empty = self.state.is_empty;
        debug!("SignaturePad::end_stroke: is_empty={}", is_empty);
        self.emit(PadEvent::StrokeEnded { is_empty });
        is_empty
    }

    /// Wipe all ink and stroke state
    pub fn reset(&mut self) {
        self.surface.clear(self.config.background_color);
        self.state.reset(self.renderer.start_width());
        self.stroking = false;
        info!("SignaturePad::reset");
        self.emit(PadEvent::Cleared);
    }

    /// Resize the surface. Content is lost and the pad becomes empty.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.config.width = width;
        self.config.height = height;
        self.reset();
        info!("SignaturePad::resize to {}x{}", width, height);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::renderer::Dab;

    /// Surface double that records every draw call
    #[derive(Default)]
    struct RecordingSurface {
        width: u32,
        height: u32,
        circles: Vec<Dab>,
        batches: Vec<Vec<Dab>>,
        clears: Vec<[f32; 4]>,
    }

    impl InkSurface for RecordingSurface {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn fill_circle(&mut self, x: f32, y: f32, radius: f32, _color: [f32; 4]) {
            self.circles.push(Dab { x, y, radius });
        }

        fn fill_dabs(&mut self, dabs: &[Dab], _color: [f32; 4]) {
            self.batches.push(dabs.to_vec());
        }

        fn clear(&mut self, color: [f32; 4]) {
            self.circles.clear();
            self.batches.clear();
            self.clears.push(color);
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.width = width;
            self.height = height;
        }
    }

    fn recording_pad() -> SignaturePad<RecordingSurface> {
        let surface = RecordingSurface {
            width: 1000,
            height: 250,
            ..Default::default()
        };
        SignaturePad::new(PadConfig::default(), surface).unwrap()
    }

    /// Horizontal samples every 16 ms, `step` pixels apart
    fn samples(count: u64, step: f32) -> Vec<Point> {
        (0..count)
            .map(|i| Point::new(10.0 + i as f32 * step, 50.0, i * 16))
            .collect()
    }

    #[test]
    fn test_new_clears_to_background() {
        let pad = recording_pad();
        assert!(pad.is_empty());
        assert!(!pad.is_stroking());
        assert_eq!(pad.surface().clears, vec![[0.0, 0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_new_rejects_inverted_widths() {
        let config = PadConfig {
            min_width: 4.0,
            max_width: 1.0,
            ..Default::default()
        };
        let result = SignaturePad::new(config, RecordingSurface::default());
        assert!(matches!(result, Err(PadError::Config(_))));
    }

    #[test]
    fn test_single_tap_draws_one_dot() {
        let mut pad = recording_pad();
        pad.begin_stroke(Point::new(5.0, 5.0, 0));
        let is_empty = pad.end_stroke();

        assert!(!is_empty);
        assert!(!pad.is_empty());
        assert_eq!(
            pad.surface().circles,
            vec![Dab {
                x: 5.0,
                y: 5.0,
                radius: 1.25
            }]
        );
        assert!(pad.surface().batches.is_empty());
    }

    #[test]
    fn test_two_samples_draw_dot_at_first() {
        let mut pad = recording_pad();
        pad.set_dot_size(DotSize::Fixed(3.0));
        pad.begin_stroke(Point::new(1.0, 2.0, 0));
        assert!(pad.extend_stroke(Point::new(30.0, 2.0, 16)).is_none());
        pad.end_stroke();

        assert_eq!(
            pad.surface().circles,
            vec![Dab {
                x: 1.0,
                y: 2.0,
                radius: 3.0
            }]
        );
    }

    #[test]
    fn test_straight_constant_speed_stroke() {
        let mut pad = recording_pad();
        pad.begin_stroke(Point::new(0.0, 0.0, 0));
        pad.extend_stroke(Point::new(10.0, 0.0, 10));
        let first = pad.extend_stroke(Point::new(20.0, 0.0, 20)).unwrap();

        assert!((first.velocity - 0.7).abs() < 1e-6);
        assert!(first.dabs.iter().all(|d| d.y.abs() < 1e-5));
        assert!(
            first
                .dabs
                .iter()
                .all(|d| d.radius <= 1.25 && d.radius >= 2.0 / 1.7 - 1e-5)
        );

        // Keep going at the same speed: velocity converges on 1 px/ms
        let mut last = first;
        for i in 3..30u64 {
            last = pad
                .extend_stroke(Point::new(i as f32 * 10.0, 0.0, i * 10))
                .unwrap();
        }
        assert!((pad.state().last_velocity() - 1.0).abs() < 1e-3);
        assert!((pad.state().last_width() - 1.0).abs() < 1e-3);

        // Once converged the width along a segment is constant
        let (min, max) = last
            .dabs
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), d| (lo.min(d.radius), hi.max(d.radius)));
        assert!(max - min < 1e-3);

        assert!(!pad.end_stroke());
        assert_eq!(pad.surface().circles.len(), 0);
    }

    #[test]
    fn test_width_is_continuous_between_segments() {
        let mut pad = recording_pad();
        let points = [
            Point::new(0.0, 0.0, 0),
            Point::new(12.0, 3.0, 8),
            Point::new(30.0, 10.0, 20),
            Point::new(45.0, 30.0, 26),
            Point::new(50.0, 60.0, 60),
            Point::new(70.0, 62.0, 64),
            Point::new(72.0, 90.0, 120),
        ];

        pad.begin_stroke(points[0]);
        let segments: Vec<RenderedSegment> = points[1..]
            .iter()
            .filter_map(|p| pad.extend_stroke(*p))
            .collect();
        assert_eq!(segments.len(), points.len() - 2);

        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_width, pair[1].start_width);
            if let Some(first_dab) = pair[1].dabs.first() {
                assert_eq!(first_dab.radius, pair[0].end_width);
            }
        }

        let widths: Vec<f32> = segments.iter().map(|s| s.end_width).collect();
        assert!(widths.iter().all(|w| *w >= 0.5 && *w <= 2.0));
    }

    #[test]
    fn test_window_bounded_over_long_stroke() {
        let mut pad = recording_pad();
        let points = samples(300, 3.0);
        pad.begin_stroke(points[0]);
        for p in &points[1..] {
            pad.extend_stroke(*p);
            assert!(pad.state().window().len() <= 4);
        }
        pad.end_stroke();
        assert_eq!(pad.surface().batches.len(), 298);
    }

    #[test]
    fn test_extend_without_begin_is_ignored() {
        let mut pad = recording_pad();
        assert!(pad.extend_stroke(Point::new(1.0, 1.0, 0)).is_none());
        assert!(pad.state().window().is_empty());
        assert!(pad.end_stroke());
    }

    #[test]
    fn test_reset_after_stroke() {
        let mut pad = recording_pad();
        pad.begin_stroke(Point::new(0.0, 0.0, 0));
        for p in samples(8, 7.0) {
            pad.extend_stroke(p);
        }
        pad.end_stroke();
        assert!(!pad.is_empty());

        pad.reset();
        assert!(pad.is_empty());
        assert!(pad.state().window().is_empty());
        assert_eq!(pad.state().last_velocity(), 0.0);
        assert_eq!(pad.state().last_width(), 1.25);
        assert_eq!(pad.surface().clears.last(), Some(&[0.0, 0.0, 0.0, 0.0]));
        assert!(pad.surface().batches.is_empty());
    }

    #[test]
    fn test_new_stroke_keeps_pad_non_empty() {
        let mut pad = recording_pad();
        pad.begin_stroke(Point::new(5.0, 5.0, 0));
        pad.end_stroke();

        pad.begin_stroke(Point::new(9.0, 9.0, 100));
        assert!(!pad.is_empty());
        assert_eq!(pad.state().last_width(), 1.25);
        assert_eq!(pad.state().window().len(), 1);
    }

    #[test]
    fn test_coincident_samples_draw_nothing() {
        let mut pad = recording_pad();
        let p = Point::new(5.0, 5.0, 0);
        pad.begin_stroke(p);
        pad.extend_stroke(Point::new(5.0, 5.0, 5));
        let rendered = pad.extend_stroke(Point::new(5.0, 5.0, 10)).unwrap();

        assert!(rendered.dabs.is_empty());
        assert!(rendered.end_width.is_finite());
        assert!(pad.end_stroke());
        assert!(pad.surface().circles.is_empty());
    }

    #[test]
    fn test_offscreen_segments_skip_dabs() {
        let mut pad = recording_pad();
        pad.begin_stroke(Point::new(1.0e6, 10.0, 0));
        pad.extend_stroke(Point::new(5.0e6, 10.0, 16));
        let rendered = pad.extend_stroke(Point::new(1.0e7, 10.0, 32)).unwrap();

        assert!(rendered.dabs.is_empty());
        assert_eq!(pad.state().last_width(), rendered.end_width);
        assert!(pad.surface().batches.is_empty());
    }

    #[test]
    fn test_jump_offscreen_keeps_only_visible_dabs() {
        let mut pad = recording_pad();
        pad.begin_stroke(Point::new(10.0, 10.0, 0));
        pad.extend_stroke(Point::new(1.0e6, 10.0, 16));
        let rendered = pad.extend_stroke(Point::new(2.0e6, 10.0, 32)).unwrap();

        assert!(!rendered.dabs.is_empty());
        assert!(rendered.dabs.len() < 2000);
        assert!(rendered.dabs.iter().all(|d| d.x <= 1000.0 + 3.0));
    }

    #[test]
    fn test_resize_empties_pad() {
        let mut pad = recording_pad();
        pad.begin_stroke(Point::new(5.0, 5.0, 0));
        pad.end_stroke();

        pad.resize(640, 480);
        assert!(pad.is_empty());
        assert_eq!(pad.surface().width(), 640);
        assert_eq!(pad.config().height, 480);
    }

    #[test]
    fn test_listeners_receive_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        let mut pad = recording_pad();
        pad.add_listener(move |event| sink.lock().unwrap().push(event.clone()));

        let start = Point::new(2.0, 2.0, 0);
        pad.begin_stroke(start);
        pad.end_stroke();
        pad.reset();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                PadEvent::StrokeBegan { point: start },
                PadEvent::StrokeEnded { is_empty: false },
                PadEvent::Cleared,
            ]
        );
    }

    #[test]
    fn test_cpu_pad_draws_ink() {
        let config = PadConfig {
            pen_color: [0.0, 0.0, 0.0, 1.0],
            ..PadConfig::new(120, 80)
        };
        let mut pad = SignaturePad::with_size(config).unwrap();

        pad.begin_stroke(Point::new(10.0, 40.0, 0));
        for i in 1..10u64 {
            pad.extend_stroke(Point::new(10.0 + i as f32 * 10.0, 40.0, i * 20));
        }
        pad.end_stroke();

        assert!(pad.surface().inked_pixel_count() > 0);
        assert_eq!(pad.surface().get_pixel(40, 40).unwrap()[3], 1.0);
        assert_eq!(pad.surface().get_pixel(40, 10).unwrap()[3], 0.0);
        assert!(pad.surface().has_dirty_region());
    }

    #[test]
    fn test_png_round_trip_through_pad() {
        let config = PadConfig {
            background_color: [1.0, 1.0, 1.0, 1.0],
            ..PadConfig::new(64, 32)
        };
        let mut pad = SignaturePad::with_size(config.clone()).unwrap();
        pad.begin_stroke(Point::new(20.0, 16.0, 0));
        pad.end_stroke();
        let png = pad.to_png().unwrap();

        let mut restored = SignaturePad::with_size(config).unwrap();
        assert!(restored.is_empty());
        restored.load_png(&png).unwrap();

        assert!(!restored.is_empty());
        assert_eq!(
            restored.surface().to_rgba_image(),
            pad.surface().to_rgba_image()
        );
    }

    #[test]
    fn test_load_png_rejects_garbage() {
        let mut pad = SignaturePad::with_size(PadConfig::new(8, 8)).unwrap();
        assert!(matches!(pad.load_png(b"garbage"), Err(PadError::Surface(_))));
        assert!(pad.is_empty());
    }
}
