//! Pixlock Core — scoped pixel-buffer interop with pluggable transforms.
//!
//! The bridge acquires exclusive access to platform-owned bitmaps described
//! by width/height/stride/format metadata, runs a named transform against
//! them, and releases the underlying lock on every exit path. Pixel
//! algorithms are consumed from a vision library behind
//! [`VisionOps`](vision::VisionOps); this crate owns only the locking
//! discipline, format contracts, and dispatch.
#![allow(unsafe_code)]
// Host-locked pixel memory is handed over as a raw address by contract.

pub mod bridge;
pub mod buffer;
pub mod error;
pub mod host;
pub mod pointwise;
pub mod request;
pub mod vision;

// Re-exports for convenience.
pub use bridge::PixelBridge;
pub use buffer::{BufferInfo, PixelBuffer, PixelFormat};
pub use error::{AcquireError, BridgeError, BufferError, UnknownTransform};
pub use host::{BitmapHandle, BitmapHost, MemoryHost, PixelLock};
pub use request::{TransformKind, TransformRequest};
pub use vision::VisionOps;
