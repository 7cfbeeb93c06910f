//! Recorded stroke replay

use std::path::Path;

use anyhow::{Context, Result};
use ink::{InkSurface, Point, SignaturePad};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Strokes captured from a pointer device, in drawing order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Replay {
    pub strokes: Vec<Vec<Point>>,
}

/// What a replay drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub strokes: usize,
    pub samples: usize,
    pub segments: usize,
}

impl Replay {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid replay JSON")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Drive every stroke through the pad's begin/extend/end lifecycle
    pub fn play<S: InkSurface>(&self, pad: &mut SignaturePad<S>) -> ReplaySummary {
        let mut summary = ReplaySummary::default();

        for (index, stroke) in self.strokes.iter().enumerate() {
            let Some((first, rest)) = stroke.split_first() else {
                warn!("stroke {} has no samples, skipping", index);
                continue;
            };

            if stroke.windows(2).any(|pair| pair[1].time < pair[0].time) {
                warn!("stroke {} has decreasing timestamps", index);
            }

            pad.begin_stroke(*first);
            for point in rest {
                if pad.extend_stroke(*point).is_some() {
                    summary.segments += 1;
                }
            }
            pad.end_stroke();

            summary.strokes += 1;
            summary.samples += stroke.len();
            debug!("replayed stroke {} ({} samples)", index, stroke.len());
        }

        summary
    }
}
