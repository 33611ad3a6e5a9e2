//! Bitmap host abstraction and scoped pixel acquisition.
//!
//! A [`BitmapHost`] is the platform side of the bridge: it owns bitmap
//! allocations and grants exclusive, temporary access to their pixel memory.
//! [`PixelLock`] wraps one acquisition as an RAII guard so the unlock happens
//! exactly once on every exit path.

use std::collections::HashMap;
use std::fmt;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::buffer::{BufferInfo, PixelBuffer, PixelFormat};
use crate::error::{AcquireError, BufferError};

/// Opaque identifier for a platform bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitmapHandle(pub u64);

impl fmt::Display for BitmapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Access to pixel memory owned by the platform.
///
/// Mirrors the platform bitmap interface: metadata query, lock, unlock.
///
/// # Safety
///
/// Implementors must guarantee that an address returned by
/// [`lock`](Self::lock) stays valid, writable, and exclusively the caller's
/// for the `stride × height` bytes described by [`info`](Self::info) until
/// the matching [`unlock`](Self::unlock), and that no second lock on the same
/// handle succeeds in between.
pub unsafe trait BitmapHost {
    /// Query width/height/stride/format for a handle.
    fn info(&self, handle: BitmapHandle) -> Result<BufferInfo, AcquireError>;

    /// Obtain a stable address for the handle's pixel memory.
    fn lock(&self, handle: BitmapHandle) -> Result<NonNull<u8>, AcquireError>;

    /// Release a previously granted lock. Exactly one call per successful
    /// lock; never called when the lock itself failed.
    fn unlock(&self, handle: BitmapHandle);
}

/// Scoped, exclusive access to one bitmap's pixels.
///
/// Dropping the guard unlocks the handle, so early returns and error paths
/// release without duplicated cleanup code.
pub struct PixelLock<'h, H: BitmapHost + ?Sized> {
    host: &'h H,
    handle: BitmapHandle,
    ptr: NonNull<u8>,
    info: BufferInfo,
}

impl<'h, H: BitmapHost + ?Sized> PixelLock<'h, H> {
    /// Validate the handle's metadata and lock its pixels.
    ///
    /// Only RGBA 8888 bitmaps with non-zero dimensions are accepted; anything
    /// else fails before the lock is taken, leaving nothing to release.
    pub fn acquire(host: &'h H, handle: BitmapHandle) -> Result<Self, AcquireError> {
        let info = host.info(handle)?;
        if info.format != PixelFormat::Rgba8888 {
            return Err(AcquireError::UnsupportedFormat {
                handle,
                format: info.format,
            });
        }
        if info.width == 0 || info.height == 0 {
            return Err(AcquireError::InfoUnavailable {
                handle,
                reason: "zero-sized bitmap",
            });
        }
        let ptr = host.lock(handle)?;
        Ok(Self {
            host,
            handle,
            ptr,
            info,
        })
    }

    pub fn handle(&self) -> BitmapHandle {
        self.handle
    }

    pub fn info(&self) -> BufferInfo {
        self.info
    }

    /// View the locked memory as a pixel buffer.
    pub fn buffer(&mut self) -> Result<PixelBuffer<'_>, BufferError> {
        // SAFETY: the host contract guarantees the locked address covers
        // stride × height writable bytes that are exclusively ours until
        // unlock, and the view cannot outlive this borrow of the guard.
        let data =
            unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.info.size_bytes()) };
        PixelBuffer::new(self.info, data)
    }
}

impl<'h, H: BitmapHost + ?Sized> Drop for PixelLock<'h, H> {
    fn drop(&mut self) {
        self.host.unlock(self.handle);
    }
}

struct Slot {
    info: BufferInfo,
    data: Box<[u8]>,
    locked: bool,
    refuse_lock: bool,
}

/// In-process [`BitmapHost`] over owned buffers.
///
/// Serves tests and embedders that have no platform bitmap subsystem. Lock
/// bookkeeping matches the platform contract: at most one lock per handle,
/// and a second attempt while locked is denied.
pub struct MemoryHost {
    slots: Mutex<HashMap<u64, Slot>>,
    next_id: AtomicU64,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a bitmap, taking ownership of its pixel data.
    ///
    /// `data` must cover `stride × height` bytes.
    pub fn register(&self, info: BufferInfo, data: Vec<u8>) -> Result<BitmapHandle, BufferError> {
        let needed = info.size_bytes();
        if data.len() < needed {
            return Err(BufferError::ViewTooSmall {
                needed,
                got: data.len(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots.lock().insert(
            id,
            Slot {
                info,
                data: data.into_boxed_slice(),
                locked: false,
                refuse_lock: false,
            },
        );
        Ok(BitmapHandle(id))
    }

    /// Register a packed RGBA bitmap.
    pub fn register_rgba(
        &self,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> Result<BitmapHandle, BufferError> {
        self.register(BufferInfo::rgba(width, height), data)
    }

    /// Copy of the handle's current pixel data, for inspection.
    pub fn pixels(&self, handle: BitmapHandle) -> Option<Vec<u8>> {
        self.slots.lock().get(&handle.0).map(|s| s.data.to_vec())
    }

    pub fn is_locked(&self, handle: BitmapHandle) -> bool {
        self.slots
            .lock()
            .get(&handle.0)
            .is_some_and(|s| s.locked)
    }

    /// Make lock attempts on `handle` fail, simulating a bitmap whose pixels
    /// cannot be pinned.
    pub fn refuse_locks(&self, handle: BitmapHandle, refuse: bool) {
        if let Some(slot) = self.slots.lock().get_mut(&handle.0) {
            slot.refuse_lock = refuse;
        }
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: pixel data lives in a stable heap allocation owned by its slot;
// slots are never removed or resized, and the locked flag keeps a second
// lock from handing the same address out twice.
unsafe impl BitmapHost for MemoryHost {
    fn info(&self, handle: BitmapHandle) -> Result<BufferInfo, AcquireError> {
        self.slots
            .lock()
            .get(&handle.0)
            .map(|s| s.info)
            .ok_or(AcquireError::InvalidHandle(handle))
    }

    fn lock(&self, handle: BitmapHandle) -> Result<NonNull<u8>, AcquireError> {
        let mut slots = self.slots.lock();
        let slot = slots
            .get_mut(&handle.0)
            .ok_or(AcquireError::InvalidHandle(handle))?;
        if slot.refuse_lock {
            return Err(AcquireError::LockDenied {
                handle,
                reason: "host refused to pin pixels",
            });
        }
        if slot.locked {
            return Err(AcquireError::LockDenied {
                handle,
                reason: "already locked",
            });
        }
        slot.locked = true;
        NonNull::new(slot.data.as_mut_ptr()).ok_or(AcquireError::LockDenied {
            handle,
            reason: "null pixel address",
        })
    }

    fn unlock(&self, handle: BitmapHandle) {
        if let Some(slot) = self.slots.lock().get_mut(&handle.0) {
            slot.locked = false;
        }
    }
}
