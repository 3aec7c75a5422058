//! Image constants shared by both species' models

use serde::{Deserialize, Serialize};

/// Target size passed to the resize step, `(width, height)` in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Build from the `img_size` descriptor field: exactly two positive ints
    pub fn from_slice(dims: &[u32]) -> Option<Self> {
        match dims {
            [w, h] if *w > 0 && *h > 0 => Some(Self::new(*w, *h)),
            _ => None,
        }
    }
}

/// Input contract of the trained models: target size plus per-channel
/// mean/std applied after rescaling to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationProfile {
    pub size: ImageSize,
    /// RGB channel means
    pub mean: [f32; 3],
    /// RGB channel standard deviations, all nonzero
    pub std: [f32; 3],
}

impl NormalizationProfile {
    /// Validate raw descriptor vectors. Returns `None` unless both vectors
    /// have three entries and no std entry is zero.
    pub fn from_parts(size: ImageSize, mean: &[f32], std: &[f32]) -> Option<Self> {
        let mean: [f32; 3] = mean.try_into().ok()?;
        let std: [f32; 3] = std.try_into().ok()?;
        if std.iter().any(|s| *s == 0.0 || !s.is_finite()) || mean.iter().any(|m| !m.is_finite()) {
            return None;
        }
        Some(Self { size, mean, std })
    }
}
