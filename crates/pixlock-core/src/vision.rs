//! Vision-library capability consumed by the transform engine.

/// Hysteresis lower bound: gradient responses below this are discarded.
pub const EDGE_LOW_THRESHOLD: f32 = 50.0;

/// Hysteresis upper bound: responses above this are kept as definite edges;
/// responses between the bounds survive only when connected to one.
pub const EDGE_HIGH_THRESHOLD: f32 = 150.0;

/// Gaussian sigma used when a blur request does not specify one.
pub const DEFAULT_BLUR_SIGMA: f32 = 2.0;

/// Pixel-processing primitives delegated to an external vision library.
///
/// Injected into the bridge so the buffer-management layer can be exercised
/// against a fake, independent of any particular library.
///
/// All methods take and return packed buffers: RGBA is `width × height × 4`
/// bytes, single-channel is `width × height` bytes. Implementations may
/// panic when a caller violates those lengths; the engine always passes
/// exact sizes.
pub trait VisionOps {
    /// Collapse packed RGBA to a single luminance channel using the standard
    /// perceptual weighting.
    fn color_to_gray(&self, rgba: &[u8], width: u32, height: u32) -> Vec<u8>;

    /// Broadcast a single channel into packed RGBA with opaque alpha.
    fn gray_to_color(&self, gray: &[u8], width: u32, height: u32) -> Vec<u8>;

    /// Binary edge map (0 or 255) of a single-channel buffer using
    /// hysteresis thresholding.
    fn detect_edges(&self, gray: &[u8], width: u32, height: u32, low: f32, high: f32) -> Vec<u8>;

    /// Gaussian blur of a packed RGBA buffer.
    fn blur(&self, rgba: &[u8], width: u32, height: u32, sigma: f32) -> Vec<u8>;
}
