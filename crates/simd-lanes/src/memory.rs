//! Aligned host memory for vector storage.

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

use crate::error::{Error, Result};

/// An owned, zero-initialized block of memory aligned to a power of two.
///
/// The buffer is the sole owner of its storage. Moving it transfers
/// ownership; [`try_clone`](Self::try_clone) and `Clone` allocate a new block
/// with a copy of the contents. The memory is returned to the allocator
/// exactly once, on drop.
pub struct AlignedBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: the buffer uniquely owns plain bytes.
unsafe impl Send for AlignedBuffer {}
unsafe impl Sync for AlignedBuffer {}

impl AlignedBuffer {
    /// Allocate `count * stride` zeroed bytes aligned to `alignment`.
    ///
    /// A zero-sized request succeeds without touching the allocator and
    /// yields a dangling pointer that still honours `alignment`.
    pub fn allocate(count: usize, stride: usize, alignment: usize) -> Result<Self> {
        let layout = Self::layout(count, stride, alignment)?;

        if layout.size() == 0 {
            return Ok(Self {
                ptr: dangling(alignment),
                layout,
            });
        }

        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or_else(|| {
            tracing::debug!(size = layout.size(), alignment, "aligned allocation failed");
            Error::AllocationFailure {
                size: layout.size(),
                alignment,
            }
        })?;

        Ok(Self { ptr, layout })
    }

    fn layout(count: usize, stride: usize, alignment: usize) -> Result<Layout> {
        if !alignment.is_power_of_two() {
            return Err(Error::InvalidAlignment { alignment });
        }
        let size = count
            .checked_mul(stride)
            .ok_or(Error::AllocationFailure {
                size: usize::MAX,
                alignment,
            })?;
        Layout::from_size_align(size, alignment)
            .map_err(|_| Error::AllocationFailure { size, alignment })
    }

    /// Size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.size() == 0
    }

    /// Alignment in bytes.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: ptr is valid for len bytes (or dangling and aligned when len == 0).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len()) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above, and we hold the only reference.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len()) }
    }

    /// Allocate a new buffer with the same layout and contents.
    pub fn try_clone(&self) -> Result<Self> {
        let mut copy = Self::allocate(self.len(), 1, self.alignment())?;
        copy.as_bytes_mut().copy_from_slice(self.as_bytes());
        Ok(copy)
    }
}

impl Clone for AlignedBuffer {
    /// Aborts through [`alloc::handle_alloc_error`] if the allocator is exhausted.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(_) => alloc::handle_alloc_error(self.layout),
        }
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: ptr was returned by alloc_zeroed with this layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
        }
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.len())
            .field("alignment", &self.alignment())
            .finish()
    }
}

fn dangling(alignment: usize) -> NonNull<u8> {
    NonNull::new(std::ptr::without_provenance_mut(alignment)).unwrap_or(NonNull::dangling())
}
