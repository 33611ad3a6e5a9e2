//! C-ABI surface of the pixel bridge.
//!
//! A managed embedder supplies its platform's bitmap interface as a
//! [`BitmapHostVtable`] and calls the exported entry points with opaque
//! bitmap handles. Pixel processing is delegated to the imageproc-backed
//! vision stack. Every call locks, transforms, unlocks, and reports an
//! explicit status code instead of failing silently.
#![allow(unsafe_code)]
// The exported surface necessarily speaks raw pointers and C calling
// conventions.

use std::ffi::c_void;
use std::ptr::NonNull;

use pixlock_core::{
    AcquireError, BitmapHandle, BitmapHost, BridgeError, BufferInfo, PixelBridge, PixelFormat,
    TransformRequest,
};
use pixlock_imageproc::ImageprocVision;

/// Status codes returned by every entry point.
pub const PIXLOCK_OK: i32 = 0;
pub const PIXLOCK_ERR_ACQUIRE: i32 = -1;
pub const PIXLOCK_ERR_DIMENSION_MISMATCH: i32 = -2;
pub const PIXLOCK_ERR_BUFFER: i32 = -3;
pub const PIXLOCK_ERR_BAD_ARGUMENT: i32 = -4;

/// Platform pixel format codes (matches the mobile bitmap API numbering).
pub const PIXLOCK_FORMAT_RGBA_8888: u32 = 1;
pub const PIXLOCK_FORMAT_RGB_565: u32 = 4;

/// Bitmap metadata filled in by the embedder's `get_info` callback.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawBufferInfo {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, padding included.
    pub stride: u32,
    /// One of the `PIXLOCK_FORMAT_*` codes.
    pub format: u32,
}

/// The platform bitmap interface, supplied by the embedder.
///
/// Each callback receives `user_data` back verbatim. `get_info` and
/// `lock_pixels` return 0 on success and negative on failure, matching the
/// platform convention; `unlock_pixels` is invoked exactly once per
/// successful lock. A locked address must stay valid and exclusive for
/// `stride × height` bytes until the matching unlock.
#[repr(C)]
pub struct BitmapHostVtable {
    pub user_data: *mut c_void,
    pub get_info:
        unsafe extern "C" fn(user_data: *mut c_void, handle: u64, out: *mut RawBufferInfo) -> i32,
    pub lock_pixels:
        unsafe extern "C" fn(user_data: *mut c_void, handle: u64, out_addr: *mut *mut u8) -> i32,
    pub unlock_pixels: unsafe extern "C" fn(user_data: *mut c_void, handle: u64),
}

/// [`BitmapHost`] over a caller-supplied vtable, valid for one entry call.
struct VtableHost<'a> {
    vtable: &'a BitmapHostVtable,
}

// SAFETY: the vtable contract passes the platform guarantees through: a
// successful lock_pixels yields an address valid and exclusive for
// stride × height bytes until unlock_pixels.
unsafe impl BitmapHost for VtableHost<'_> {
    fn info(&self, handle: BitmapHandle) -> Result<BufferInfo, AcquireError> {
        let mut raw = RawBufferInfo {
            width: 0,
            height: 0,
            stride: 0,
            format: 0,
        };
        // SAFETY: `raw` is a valid out-pointer for the duration of the call.
        let rc = unsafe { (self.vtable.get_info)(self.vtable.user_data, handle.0, &mut raw) };
        if rc < 0 {
            return Err(AcquireError::InfoUnavailable {
                handle,
                reason: "get_info callback failed",
            });
        }
        let format = match raw.format {
            PIXLOCK_FORMAT_RGBA_8888 => PixelFormat::Rgba8888,
            PIXLOCK_FORMAT_RGB_565 => PixelFormat::Rgb565,
            other => PixelFormat::Unknown(other),
        };
        Ok(BufferInfo {
            width: raw.width,
            height: raw.height,
            stride: raw.stride,
            format,
        })
    }

    fn lock(&self, handle: BitmapHandle) -> Result<NonNull<u8>, AcquireError> {
        let mut addr: *mut u8 = std::ptr::null_mut();
        // SAFETY: `addr` is a valid out-pointer for the duration of the call.
        let rc = unsafe { (self.vtable.lock_pixels)(self.vtable.user_data, handle.0, &mut addr) };
        if rc < 0 {
            return Err(AcquireError::LockDenied {
                handle,
                reason: "lock_pixels callback failed",
            });
        }
        NonNull::new(addr).ok_or(AcquireError::LockDenied {
            handle,
            reason: "lock_pixels returned a null address",
        })
    }

    fn unlock(&self, handle: BitmapHandle) {
        // SAFETY: the guard calls this exactly once per successful lock.
        unsafe { (self.vtable.unlock_pixels)(self.vtable.user_data, handle.0) };
    }
}

fn status(result: Result<(), BridgeError>) -> i32 {
    match result {
        Ok(()) => PIXLOCK_OK,
        Err(BridgeError::Acquire(_)) => PIXLOCK_ERR_ACQUIRE,
        Err(BridgeError::DimensionMismatch { .. }) => PIXLOCK_ERR_DIMENSION_MISMATCH,
        Err(BridgeError::Buffer(_)) => PIXLOCK_ERR_BUFFER,
    }
}

/// # Safety
///
/// `host` must be null or point to a valid vtable whose callbacks uphold the
/// documented contract for the duration of the call.
unsafe fn run_request(host: *const BitmapHostVtable, request: TransformRequest) -> i32 {
    let Some(vtable) = (unsafe { host.as_ref() }) else {
        tracing::warn!("null host vtable passed to {} entry point", request.kind());
        return PIXLOCK_ERR_BAD_ARGUMENT;
    };
    let bridge = PixelBridge::new(VtableHost { vtable }, ImageprocVision::new());
    status(bridge.run(request))
}

/// Convert the bitmap behind `handle` to grayscale in place.
///
/// # Safety
///
/// `host` must point to a valid [`BitmapHostVtable`] whose callbacks uphold
/// the documented contract for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn apply_grayscale_native(host: *const BitmapHostVtable, handle: u64) -> i32 {
    unsafe {
        run_request(
            host,
            TransformRequest::Grayscale {
                target: BitmapHandle(handle),
            },
        )
    }
}

/// Write a binary Canny edge map of `input` into `output`.
///
/// Fails with `PIXLOCK_ERR_DIMENSION_MISMATCH` when the two bitmaps differ
/// in width or height.
///
/// # Safety
///
/// Same contract as [`apply_grayscale_native`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn apply_edge_detection_native(
    host: *const BitmapHostVtable,
    input: u64,
    output: u64,
) -> i32 {
    unsafe {
        run_request(
            host,
            TransformRequest::EdgeDetect {
                input: BitmapHandle(input),
                output: BitmapHandle(output),
            },
        )
    }
}

/// Add `value` to every color channel of the bitmap, clamped to [0, 255].
///
/// # Safety
///
/// Same contract as [`apply_grayscale_native`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn apply_brightness_native(
    host: *const BitmapHostVtable,
    handle: u64,
    value: i32,
) -> i32 {
    unsafe {
        run_request(
            host,
            TransformRequest::Brightness {
                target: BitmapHandle(handle),
                delta: value,
            },
        )
    }
}

/// Scale every color channel around the 128 midpoint by `value`.
///
/// # Safety
///
/// Same contract as [`apply_grayscale_native`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn apply_contrast_native(
    host: *const BitmapHostVtable,
    handle: u64,
    value: f32,
) -> i32 {
    unsafe {
        run_request(
            host,
            TransformRequest::Contrast {
                target: BitmapHandle(handle),
                factor: value,
            },
        )
    }
}

/// Gaussian-blur the bitmap in place with the default sigma.
///
/// # Safety
///
/// Same contract as [`apply_grayscale_native`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn apply_blur_native(host: *const BitmapHostVtable, handle: u64) -> i32 {
    unsafe { run_request(host, TransformRequest::blur(BitmapHandle(handle))) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixlock_core::MemoryHost;

    unsafe extern "C" fn host_get_info(
        user_data: *mut c_void,
        handle: u64,
        out: *mut RawBufferInfo,
    ) -> i32 {
        // SAFETY: tests pass a MemoryHost reference as user_data.
        let host = unsafe { &*(user_data as *const MemoryHost) };
        match host.info(BitmapHandle(handle)) {
            Ok(info) => {
                let format = match info.format {
                    PixelFormat::Rgba8888 => PIXLOCK_FORMAT_RGBA_8888,
                    PixelFormat::Rgb565 => PIXLOCK_FORMAT_RGB_565,
                    PixelFormat::Unknown(code) => code,
                };
                // SAFETY: `out` is a valid out-pointer per the callback contract.
                unsafe {
                    *out = RawBufferInfo {
                        width: info.width,
                        height: info.height,
                        stride: info.stride,
                        format,
                    };
                }
                0
            }
            Err(_) => -1,
        }
    }

    unsafe extern "C" fn host_lock_pixels(
        user_data: *mut c_void,
        handle: u64,
        out_addr: *mut *mut u8,
    ) -> i32 {
        // SAFETY: tests pass a MemoryHost reference as user_data.
        let host = unsafe { &*(user_data as *const MemoryHost) };
        match host.lock(BitmapHandle(handle)) {
            Ok(ptr) => {
                // SAFETY: `out_addr` is a valid out-pointer per the contract.
                unsafe { *out_addr = ptr.as_ptr() };
                0
            }
            Err(_) => -1,
        }
    }

    unsafe extern "C" fn host_unlock_pixels(user_data: *mut c_void, handle: u64) {
        // SAFETY: tests pass a MemoryHost reference as user_data.
        let host = unsafe { &*(user_data as *const MemoryHost) };
        host.unlock(BitmapHandle(handle));
    }

    fn vtable_for(host: &MemoryHost) -> BitmapHostVtable {
        BitmapHostVtable {
            user_data: host as *const MemoryHost as *mut c_void,
            get_info: host_get_info,
            lock_pixels: host_lock_pixels,
            unlock_pixels: host_unlock_pixels,
        }
    }

    #[test]
    fn test_grayscale_entry_point_transforms_through_the_vtable() {
        let host = MemoryHost::new();
        let handle = host
            .register_rgba(2, 1, vec![10, 10, 10, 255, 200, 200, 200, 255])
            .expect("register");
        let vtable = vtable_for(&host);

        let rc = unsafe { apply_grayscale_native(&vtable, handle.0) };
        assert_eq!(rc, PIXLOCK_OK);
        assert_eq!(
            host.pixels(handle).expect("slot"),
            vec![10, 10, 10, 255, 200, 200, 200, 255]
        );
        assert!(!host.is_locked(handle));
    }

    #[test]
    fn test_brightness_entry_point_applies_the_delta() {
        let host = MemoryHost::new();
        let handle = host
            .register_rgba(1, 1, vec![100, 150, 250, 42])
            .expect("register");
        let vtable = vtable_for(&host);

        let rc = unsafe { apply_brightness_native(&vtable, handle.0, 50) };
        assert_eq!(rc, PIXLOCK_OK);
        assert_eq!(host.pixels(handle).expect("slot"), vec![150, 200, 255, 42]);
    }

    #[test]
    fn test_dimension_mismatch_status_code() {
        let host = MemoryHost::new();
        let input = host.register_rgba(2, 2, vec![0u8; 16]).expect("register");
        let output = host.register_rgba(1, 1, vec![0u8; 4]).expect("register");
        let vtable = vtable_for(&host);

        let rc = unsafe { apply_edge_detection_native(&vtable, input.0, output.0) };
        assert_eq!(rc, PIXLOCK_ERR_DIMENSION_MISMATCH);
        assert!(!host.is_locked(input));
        assert!(!host.is_locked(output));
    }

    #[test]
    fn test_unknown_handle_reports_acquire_error() {
        let host = MemoryHost::new();
        let vtable = vtable_for(&host);
        let rc = unsafe { apply_grayscale_native(&vtable, 999) };
        assert_eq!(rc, PIXLOCK_ERR_ACQUIRE);
    }

    #[test]
    fn test_null_vtable_is_rejected() {
        let rc = unsafe { apply_grayscale_native(std::ptr::null(), 1) };
        assert_eq!(rc, PIXLOCK_ERR_BAD_ARGUMENT);
    }
}
