//! The transform engine: acquire, transform, release.

use crate::error::BridgeError;
use crate::host::{BitmapHandle, BitmapHost, PixelLock};
use crate::pointwise;
use crate::request::{TransformKind, TransformRequest};
use crate::vision::{EDGE_HIGH_THRESHOLD, EDGE_LOW_THRESHOLD, VisionOps};

/// Runs named transforms against host-owned bitmaps.
///
/// Each call is synchronous and stateless: pixels are locked, transformed,
/// and unlocked before the call returns. Every failure path releases every
/// lock that was taken, so a partial failure never leaks one.
pub struct PixelBridge<H, V> {
    host: H,
    vision: V,
}

impl<H: BitmapHost, V: VisionOps> PixelBridge<H, V> {
    pub fn new(host: H, vision: V) -> Self {
        Self { host, vision }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Dispatch one request to the matching operation.
    pub fn run(&self, request: TransformRequest) -> Result<(), BridgeError> {
        match request {
            TransformRequest::Grayscale { target } => self.apply_grayscale(target),
            TransformRequest::EdgeDetect { input, output } => {
                self.apply_edge_detection(input, output)
            }
            TransformRequest::Brightness { target, delta } => self.apply_brightness(target, delta),
            TransformRequest::Contrast { target, factor } => self.apply_contrast(target, factor),
            TransformRequest::Invert { target } => self.apply_invert(target),
            TransformRequest::Blur { target, sigma } => self.apply_blur(target, sigma),
        }
    }

    /// Convert `target` to grayscale in place.
    ///
    /// Round-trips through a single-channel intermediate, so alpha comes
    /// back opaque; callers that need the original alpha must reapply it.
    pub fn apply_grayscale(&self, target: BitmapHandle) -> Result<(), BridgeError> {
        let mut lock = self.acquire(target)?;
        let mut buf = lock.buffer()?;
        let (w, h) = buf.dimensions();
        let gray = self.vision.color_to_gray(&buf.to_packed(), w, h);
        let rgba = self.vision.gray_to_color(&gray, w, h);
        buf.copy_from_packed(&rgba)?;
        tracing::info!("grayscale applied to bitmap {target} ({w}x{h})");
        Ok(())
    }

    /// Write a binary edge map of `input` into `output`.
    ///
    /// The input guard is taken first and released even when acquiring the
    /// output fails. Mismatched dimensions are rejected before any pixel
    /// work; `input` is never modified.
    pub fn apply_edge_detection(
        &self,
        input: BitmapHandle,
        output: BitmapHandle,
    ) -> Result<(), BridgeError> {
        let mut in_lock = self.acquire(input)?;
        let mut out_lock = self.acquire(output)?;
        let in_buf = in_lock.buffer()?;
        let mut out_buf = out_lock.buffer()?;
        let (iw, ih) = in_buf.dimensions();
        let (ow, oh) = out_buf.dimensions();
        if (iw, ih) != (ow, oh) {
            return Err(BridgeError::DimensionMismatch {
                input_width: iw,
                input_height: ih,
                output_width: ow,
                output_height: oh,
            });
        }
        let gray = self.vision.color_to_gray(&in_buf.to_packed(), iw, ih);
        let edges = self
            .vision
            .detect_edges(&gray, iw, ih, EDGE_LOW_THRESHOLD, EDGE_HIGH_THRESHOLD);
        out_buf.copy_from_packed(&self.vision.gray_to_color(&edges, iw, ih))?;
        tracing::info!("edge detection applied: bitmap {input} -> bitmap {output} ({iw}x{ih})");
        Ok(())
    }

    pub fn apply_brightness(&self, target: BitmapHandle, delta: i32) -> Result<(), BridgeError> {
        self.apply_pointwise(target, TransformKind::Brightness, |px| {
            pointwise::adjust_brightness(px, delta)
        })
    }

    pub fn apply_contrast(&self, target: BitmapHandle, factor: f32) -> Result<(), BridgeError> {
        self.apply_pointwise(target, TransformKind::Contrast, |px| {
            pointwise::adjust_contrast(px, factor)
        })
    }

    pub fn apply_invert(&self, target: BitmapHandle) -> Result<(), BridgeError> {
        self.apply_pointwise(target, TransformKind::Invert, pointwise::invert)
    }

    /// Gaussian-blur `target` in place at the given sigma.
    pub fn apply_blur(&self, target: BitmapHandle, sigma: f32) -> Result<(), BridgeError> {
        let mut lock = self.acquire(target)?;
        let mut buf = lock.buffer()?;
        let (w, h) = buf.dimensions();
        let blurred = self.vision.blur(&buf.to_packed(), w, h, sigma);
        buf.copy_from_packed(&blurred)?;
        tracing::info!("blur applied to bitmap {target} ({w}x{h}, sigma {sigma})");
        Ok(())
    }

    fn apply_pointwise(
        &self,
        target: BitmapHandle,
        kind: TransformKind,
        op: impl Fn([u8; 4]) -> [u8; 4],
    ) -> Result<(), BridgeError> {
        let mut lock = self.acquire(target)?;
        let mut buf = lock.buffer()?;
        let (w, h) = buf.dimensions();
        for y in 0..h {
            for px in buf.row_pixels_mut(y) {
                *px = op(*px);
            }
        }
        tracing::info!("{kind} applied to bitmap {target} ({w}x{h})");
        Ok(())
    }

    fn acquire(&self, handle: BitmapHandle) -> Result<PixelLock<'_, H>, BridgeError> {
        PixelLock::acquire(&self.host, handle)
            .inspect_err(|e| tracing::warn!("acquire failed for bitmap {handle}: {e}"))
            .map_err(BridgeError::from)
    }
}
