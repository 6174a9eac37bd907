use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use super::Vector;
use crate::error::{Error, Result};
use crate::lane::{lane_count, Lane, Width};
use crate::simd::{capabilities, ensure_supported, Capabilities, LaneOps};

/// A vector over caller-owned memory.
///
/// The view never frees what it points at. [`import`](Self::import) ties the
/// view to a mutable borrow of the source slice, so the storage always
/// outlives it.
pub struct VectorView<'a, W: Width, E: Lane> {
    ptr: NonNull<E>,
    _marker: PhantomData<(&'a mut [E], W)>,
}

// SAFETY: a view behaves like `&'a mut [E]`.
unsafe impl<W: Width, E: Lane + Send> Send for VectorView<'_, W, E> {}
unsafe impl<W: Width, E: Lane + Sync> Sync for VectorView<'_, W, E> {}

impl<'a, W: Width, E: Lane> VectorView<'a, W, E> {
    /// Lanes per register.
    pub const LANES: usize = lane_count::<W, E>();

    /// Wrap block storage already known to be aligned and supported.
    ///
    /// # Safety
    ///
    /// `ptr` must be aligned to `W::BYTES`, valid for `W::BYTES` bytes and
    /// exclusively borrowed for `'a`.
    #[inline]
    pub(crate) unsafe fn from_block(ptr: NonNull<E>) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const E {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut E {
        self.ptr.as_ptr()
    }

    lane_accessors!();

    /// Copy the lanes into a new owned vector. Aborts on allocator exhaustion.
    pub fn to_owned_vector(&self) -> Vector<W, E> {
        let mut owned = Vector::<W, E>::zeroed_or_abort();
        owned.as_mut_slice().copy_from_slice(self.get());
        owned
    }

    /// Copy the lanes into a new owned vector.
    pub fn try_to_owned(&self) -> Result<Vector<W, E>> {
        let mut owned = Vector::<W, E>::zeroed()?;
        owned.as_mut_slice().copy_from_slice(self.get());
        Ok(owned)
    }
}

impl<'a, W: Width, E: LaneOps<W>> VectorView<'a, W, E> {
    /// Borrow the first `LANES` elements of `lanes` as a vector.
    ///
    /// Fails if the host lacks the required instruction set, if `lanes` is
    /// shorter than one register, or if it does not start on a `W::BYTES`
    /// boundary.
    pub fn import(lanes: &'a mut [E]) -> Result<Self> {
        Self::import_with(lanes, capabilities())
    }

    pub fn import_with(lanes: &'a mut [E], caps: &Capabilities) -> Result<Self> {
        ensure_supported::<W, E>(caps)?;
        if lanes.len() < Self::LANES {
            return Err(Error::ShortImport {
                required: Self::LANES,
                actual: lanes.len(),
            });
        }
        let ptr = check_alignment::<W, E>(lanes.as_mut_ptr())?;
        // SAFETY: aligned, long enough, and borrowed for 'a.
        Ok(unsafe { Self::from_block(ptr) })
    }

    /// Wrap a raw pointer as a vector. A null or misaligned `ptr` is rejected.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `LANES` elements for all
    /// of `'a`, and nothing else may access that memory while the view lives.
    pub unsafe fn from_raw(ptr: *mut E) -> Result<Self> {
        Self::from_raw_with(ptr, capabilities())
    }

    /// # Safety
    ///
    /// Same as [`from_raw`](Self::from_raw).
    pub unsafe fn from_raw_with(ptr: *mut E, caps: &Capabilities) -> Result<Self> {
        ensure_supported::<W, E>(caps)?;
        let ptr = check_alignment::<W, E>(ptr)?;
        Ok(Self::from_block(ptr))
    }
}

fn check_alignment<W: Width, E: Lane>(ptr: *mut E) -> Result<NonNull<E>> {
    let address = ptr.addr();
    match NonNull::new(ptr) {
        Some(ptr) if address % W::BYTES == 0 => Ok(ptr),
        _ => {
            tracing::debug!(address, alignment = W::BYTES, "vector import rejected");
            Err(Error::MisalignedImport {
                address,
                alignment: W::BYTES,
            })
        }
    }
}

impl<W: Width, E: Lane> fmt::Debug for VectorView<'_, W, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorView")
            .field("bits", &W::BITS)
            .field("lane", &E::NAME)
            .field("lanes", &self.get())
            .finish()
    }
}

#[cfg(all(test, target_arch = "x86_64"))]
mod tests {
    use super::*;
    use crate::lane::{W128, W256};
    use crate::simd::InstructionSet;

    #[repr(C, align(32))]
    struct Aligned<const N: usize>([i32; N]);

    #[test]
    fn test_import_reads_and_writes_through() {
        let mut storage = Aligned([1, 2, 3, 4, 99]);
        {
            let mut view = VectorView::<W128, i32>::import(&mut storage.0).unwrap();
            assert_eq!(view.get(), &[1, 2, 3, 4]);
            *view.lane_mut(0).unwrap() = 10;
        }
        assert_eq!(storage.0, [10, 2, 3, 4, 99]);
    }

    #[test]
    fn test_import_misaligned() {
        let mut storage = Aligned([0; 8]);
        let err = VectorView::<W128, i32>::import(&mut storage.0[1..]).unwrap_err();
        assert!(matches!(err, Error::MisalignedImport { alignment: 16, .. }));
    }

    #[test]
    fn test_import_short() {
        let mut storage = Aligned([0; 3]);
        let err = VectorView::<W128, i32>::import(&mut storage.0).unwrap_err();
        assert_eq!(err, Error::ShortImport { required: 4, actual: 3 });
    }

    #[test]
    fn test_from_raw_one_byte_off() {
        let mut storage = Aligned([0; 8]);
        let base = storage.0.as_mut_ptr().cast::<u8>();
        let shifted = base.wrapping_add(1).cast::<i32>();

        let err = unsafe { VectorView::<W128, i32>::from_raw(shifted) }.unwrap_err();
        assert_eq!(
            err,
            Error::MisalignedImport {
                address: shifted.addr(),
                alignment: 16,
            }
        );
    }

    #[test]
    fn test_from_raw_null() {
        let err = unsafe { VectorView::<W128, i32>::from_raw(std::ptr::null_mut()) }.unwrap_err();
        assert_eq!(err, Error::MisalignedImport { address: 0, alignment: 16 });
    }

    #[test]
    fn test_import_checks_capability_first() {
        let caps = capabilities().limit(InstructionSet::Sse2);
        let mut storage = Aligned([0; 8]);
        let err = VectorView::<W256, i32>::import_with(&mut storage.0[1..], &caps).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCapability { bits: 256, .. }));
    }

    #[test]
    fn test_to_owned_copies() {
        let mut storage = Aligned([5, 6, 7, 8]);
        let view = VectorView::<W128, i32>::import(&mut storage.0).unwrap();
        let owned = view.to_owned_vector();
        assert_ne!(owned.as_ptr(), view.as_ptr());
        assert_eq!(owned.get(), view.get());
        assert_eq!(view.try_to_owned().unwrap(), owned);
    }
}
