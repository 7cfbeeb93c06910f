//! Inkpad ink core - smooth, variable-width signature strokes
//!
//! This crate turns timestamped pointer samples into pen-like ink:
//! - [`point::Point`] - A timestamped sample with velocity estimation
//! - [`bezier::CurveSegment`] - A cubic segment with arc-length estimate
//! - [`curve_fitter`] - Sliding-window control point synthesis
//! - [`stroke::StrokeState`] - Running width/velocity state of a stroke
//! - [`renderer`] - Velocity-to-width model and dab generation
//! - [`surface`] - Raster surface contract and a CPU implementation
//! - [`pad`] - The host-facing signature pad
//! - [`events`] - Pad lifecycle events for host hooks

pub mod bezier;
pub mod constants;
pub mod curve_fitter;
pub mod events;
pub mod pad;
pub mod point;
pub mod renderer;
pub mod stroke;
pub mod surface;

pub use bezier::*;
pub use constants::*;
pub use curve_fitter::*;
pub use events::PadEvent;
pub use pad::*;
pub use point::*;
pub use renderer::*;
pub use stroke::*;
pub use surface::*;

pub use inkpad_config::{DotSizeSetting, PadConfig};
