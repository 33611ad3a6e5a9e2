//! Error types for acquisition, buffer validation, and transform runs.

use crate::buffer::PixelFormat;
use crate::host::BitmapHandle;

/// A bitmap could not be acquired for processing.
///
/// These failures indicate structural misuse (bad handle, wrong format, lock
/// held elsewhere) and are not transient-recoverable; there is no retry
/// policy.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("no bitmap registered for handle {0}")]
    InvalidHandle(BitmapHandle),
    #[error("bitmap info unavailable for handle {handle}: {reason}")]
    InfoUnavailable {
        handle: BitmapHandle,
        reason: &'static str,
    },
    #[error("pixel lock denied for handle {handle}: {reason}")]
    LockDenied {
        handle: BitmapHandle,
        reason: &'static str,
    },
    #[error("unsupported pixel format {format} on handle {handle}, expected RGBA_8888")]
    UnsupportedFormat {
        handle: BitmapHandle,
        format: PixelFormat,
    },
}

/// A pixel view or packed write-back violated the buffer's declared layout.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("format {0} is not processable, expected RGBA_8888")]
    NotRgba(PixelFormat),
    #[error("stride {stride} is smaller than the {row} byte row width")]
    StrideTooSmall { stride: u32, row: usize },
    #[error("view of {got} bytes is too small for a {needed} byte bitmap")]
    ViewTooSmall { needed: usize, got: usize },
    #[error("packed pixel data has {got} bytes, expected {expected}")]
    PackedLengthMismatch { expected: usize, got: usize },
}

/// A transform run failed before or during buffer work.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Acquire(#[from] AcquireError),
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error(
        "dimension mismatch: input {input_width}x{input_height}, \
         output {output_width}x{output_height}"
    )]
    DimensionMismatch {
        input_width: u32,
        input_height: u32,
        output_width: u32,
        output_height: u32,
    },
}

/// A transform name did not match any known operation.
#[derive(Debug, thiserror::Error)]
#[error("unknown transform name: {0:?}")]
pub struct UnknownTransform(pub String);
