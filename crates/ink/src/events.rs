//! Lifecycle events emitted by the signature pad

use crate::point::Point;

/// Events emitted by [`crate::SignaturePad`] so hosts can react to stroke
/// lifecycle changes without polling.
#[derive(Debug, Clone, PartialEq)]
pub enum PadEvent {
    /// A stroke started at `point`.
    StrokeBegan { point: Point },
    /// The active stroke ended.
    StrokeEnded { is_empty: bool },
    /// The pad was cleared to its background color.
    Cleared,
}

pub(crate) type PadListener = Box<dyn Fn(&PadEvent) + Send + Sync>;
