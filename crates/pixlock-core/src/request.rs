//! Named transform requests.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownTransform;
use crate::host::BitmapHandle;
use crate::vision::DEFAULT_BLUR_SIGMA;

/// The operations the bridge can run, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Grayscale,
    EdgeDetect,
    Brightness,
    Contrast,
    Invert,
    Blur,
}

impl TransformKind {
    /// Stable wire name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::EdgeDetect => "edge_detect",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Invert => "invert",
            Self::Blur => "blur",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransformKind {
    type Err = UnknownTransform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grayscale" => Ok(Self::Grayscale),
            "edge_detect" => Ok(Self::EdgeDetect),
            "brightness" => Ok(Self::Brightness),
            "contrast" => Ok(Self::Contrast),
            "invert" => Ok(Self::Invert),
            "blur" => Ok(Self::Blur),
            other => Err(UnknownTransform(other.to_string())),
        }
    }
}

/// One transform invocation: the operation plus its buffer handle(s) and
/// parameters.
///
/// Every operation is in-place over a single buffer except
/// [`EdgeDetect`](Self::EdgeDetect), which reads `input` and writes `output`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformRequest {
    /// In-place luminance conversion. Rewrites alpha to opaque.
    Grayscale { target: BitmapHandle },
    /// Canny edge map of `input`, broadcast into `output` as binary RGBA.
    EdgeDetect {
        input: BitmapHandle,
        output: BitmapHandle,
    },
    /// Add a clamped delta to every color channel, alpha untouched.
    Brightness { target: BitmapHandle, delta: i32 },
    /// Scale color channels around the 128 midpoint, alpha untouched.
    Contrast { target: BitmapHandle, factor: f32 },
    /// Flip every color channel, alpha untouched.
    Invert { target: BitmapHandle },
    /// Gaussian blur of the whole buffer.
    Blur { target: BitmapHandle, sigma: f32 },
}

impl TransformRequest {
    /// Blur with the default sigma.
    pub fn blur(target: BitmapHandle) -> Self {
        Self::Blur {
            target,
            sigma: DEFAULT_BLUR_SIGMA,
        }
    }

    pub fn kind(&self) -> TransformKind {
        match self {
            Self::Grayscale { .. } => TransformKind::Grayscale,
            Self::EdgeDetect { .. } => TransformKind::EdgeDetect,
            Self::Brightness { .. } => TransformKind::Brightness,
            Self::Contrast { .. } => TransformKind::Contrast,
            Self::Invert { .. } => TransformKind::Invert,
            Self::Blur { .. } => TransformKind::Blur,
        }
    }
}
