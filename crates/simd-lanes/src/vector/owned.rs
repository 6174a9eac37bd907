use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;

use super::AsLanes;
use crate::error::{Error, Result};
use crate::lane::{lane_count, Lane, Width};
use crate::memory::AlignedBuffer;
use crate::simd::{capabilities, ensure_supported, Capabilities, InstructionSet, LaneDiv, LaneMul, LaneOps};

/// A vector of `E` lanes filling one `W`-bit register, in owned aligned storage.
///
/// Every constructor checks the capability descriptor first, so an
/// instance only exists when its kernels can run on this host. Lanes
/// start at zero.
///
/// ```
/// # #[cfg(target_arch = "x86_64")] {
/// use simd_lanes::I32x4;
///
/// let a = I32x4::from_array([1, 2, 3, 4]).unwrap();
/// let b = I32x4::from_array([5, 6, 7, 8]).unwrap();
/// assert_eq!((&a + &b).get(), &[6, 8, 10, 12]);
/// # }
/// ```
pub struct Vector<W: Width, E: Lane> {
    buffer: AlignedBuffer,
    _marker: PhantomData<(W, E)>,
}

impl<W: Width, E: Lane> Vector<W, E> {
    /// Lanes per register.
    pub const LANES: usize = lane_count::<W, E>();

    const LAYOUT: Layout = match Layout::from_size_align(W::BYTES, W::BYTES) {
        Ok(layout) => layout,
        Err(_) => panic!("register width is not a valid layout"),
    };

    #[inline]
    pub fn as_ptr(&self) -> *const E {
        self.buffer.as_ptr().cast()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut E {
        self.buffer.as_mut_ptr().cast()
    }

    lane_accessors!();

    /// Allocate zeroed storage without a capability check.
    pub(crate) fn zeroed() -> Result<Self> {
        let buffer = AlignedBuffer::allocate(1, W::BYTES, W::BYTES)?;
        Ok(Self {
            buffer,
            _marker: PhantomData,
        })
    }

    /// Like [`zeroed`](Self::zeroed), aborting on allocator exhaustion.
    pub(crate) fn zeroed_or_abort() -> Self {
        match Self::zeroed() {
            Ok(vector) => vector,
            Err(_) => alloc::handle_alloc_error(Self::LAYOUT),
        }
    }

    /// Deep copy into a new buffer.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            buffer: self.buffer.try_clone()?,
            _marker: PhantomData,
        })
    }
}

impl<W: Width, E: LaneOps<W>> Vector<W, E> {
    /// Instruction set this vector type needs.
    pub const REQUIRED: InstructionSet = E::REQUIRED;

    /// Whether this vector type can be constructed on this host.
    pub fn is_supported() -> bool {
        Self::is_supported_on(capabilities())
    }

    /// Whether construction under `caps` would succeed on this host.
    pub fn is_supported_on(caps: &Capabilities) -> bool {
        caps.intersect(*capabilities()).supports(Self::REQUIRED)
    }

    /// A zeroed vector.
    pub fn new() -> Result<Self> {
        Self::new_with(capabilities())
    }

    /// A zeroed vector, checked against `caps` instead of the host descriptor.
    pub fn new_with(caps: &Capabilities) -> Result<Self> {
        ensure_supported::<W, E>(caps)?;
        Self::zeroed()
    }

    /// A vector with every lane set to `value`.
    pub fn splat(value: E) -> Result<Self> {
        Self::splat_with(value, capabilities())
    }

    pub fn splat_with(value: E, caps: &Capabilities) -> Result<Self> {
        let mut vector = Self::new_with(caps)?;
        vector.as_mut_slice().fill(value);
        Ok(vector)
    }

    /// A vector whose first `N` lanes are `values`; the rest are zero.
    ///
    /// Supplying more values than the vector has lanes fails to compile.
    pub fn from_array<const N: usize>(values: [E; N]) -> Result<Self> {
        Self::from_array_with(values, capabilities())
    }

    pub fn from_array_with<const N: usize>(values: [E; N], caps: &Capabilities) -> Result<Self> {
        const { assert!(N <= lane_count::<W, E>(), "more values than lanes") };
        let mut vector = Self::new_with(caps)?;
        vector.as_mut_slice()[..N].copy_from_slice(&values);
        Ok(vector)
    }

    /// Like [`from_array`](Self::from_array), converting each value to the lane type.
    ///
    /// ```
    /// # #[cfg(target_arch = "x86_64")] {
    /// use simd_lanes::I16x8;
    ///
    /// let v = I16x8::from_values([1u8, 200, 3]).unwrap();
    /// assert_eq!(v.get(), &[1, 200, 3, 0, 0, 0, 0, 0]);
    /// # }
    /// ```
    pub fn from_values<T: Into<E>, const N: usize>(values: [T; N]) -> Result<Self> {
        Self::from_values_with(values, capabilities())
    }

    pub fn from_values_with<T: Into<E>, const N: usize>(
        values: [T; N],
        caps: &Capabilities,
    ) -> Result<Self> {
        const { assert!(N <= lane_count::<W, E>(), "more values than lanes") };
        let mut vector = Self::new_with(caps)?;
        for (lane, value) in vector.as_mut_slice().iter_mut().zip(values) {
            *lane = value.into();
        }
        Ok(vector)
    }

    /// Like [`from_array`](Self::from_array) with the length checked at run time.
    pub fn from_slice(values: &[E]) -> Result<Self> {
        Self::from_slice_with(values, capabilities())
    }

    pub fn from_slice_with(values: &[E], caps: &Capabilities) -> Result<Self> {
        ensure_supported::<W, E>(caps)?;
        if values.len() > Self::LANES {
            return Err(Error::TooManyLanes {
                capacity: Self::LANES,
                actual: values.len(),
            });
        }
        let mut vector = Self::zeroed()?;
        vector.as_mut_slice()[..values.len()].copy_from_slice(values);
        Ok(vector)
    }

    /// `*to += *from` on raw register storage.
    ///
    /// # Safety
    ///
    /// [`REQUIRED`](Self::REQUIRED) must be supported on this host. Both
    /// pointers must be aligned to `W::BYTES` and valid for `LANES` lanes.
    #[inline(always)]
    pub unsafe fn add_raw(to: *mut E, from: *const E) {
        E::add_raw(to, from)
    }

    /// `*to -= *from` on raw register storage.
    ///
    /// # Safety
    ///
    /// Same as [`add_raw`](Self::add_raw).
    #[inline(always)]
    pub unsafe fn sub_raw(to: *mut E, from: *const E) {
        E::sub_raw(to, from)
    }

    pub fn try_add<R: AsLanes<W, E>>(&self, rhs: &R) -> Result<Self> {
        let mut out = self.try_clone()?;
        // SAFETY: both operands are live vectors of this type.
        unsafe { E::add_raw(out.as_mut_ptr(), rhs.lanes_ptr()) };
        Ok(out)
    }

    pub fn try_sub<R: AsLanes<W, E>>(&self, rhs: &R) -> Result<Self> {
        let mut out = self.try_clone()?;
        // SAFETY: as in `try_add`.
        unsafe { E::sub_raw(out.as_mut_ptr(), rhs.lanes_ptr()) };
        Ok(out)
    }
}

impl<W: Width, E: LaneMul<W>> Vector<W, E> {
    /// `*to *= *from` on raw register storage.
    ///
    /// # Safety
    ///
    /// Same as [`add_raw`](Self::add_raw).
    #[inline(always)]
    pub unsafe fn mul_raw(to: *mut E, from: *const E) {
        E::mul_raw(to, from)
    }

    pub fn try_mul<R: AsLanes<W, E>>(&self, rhs: &R) -> Result<Self> {
        let mut out = self.try_clone()?;
        // SAFETY: as in `try_add`.
        unsafe { E::mul_raw(out.as_mut_ptr(), rhs.lanes_ptr()) };
        Ok(out)
    }
}

impl<W: Width, E: LaneDiv<W>> Vector<W, E> {
    /// `*to /= *from` on raw register storage.
    ///
    /// # Safety
    ///
    /// Same as [`add_raw`](Self::add_raw).
    #[inline(always)]
    pub unsafe fn div_raw(to: *mut E, from: *const E) {
        E::div_raw(to, from)
    }

    pub fn try_div<R: AsLanes<W, E>>(&self, rhs: &R) -> Result<Self> {
        let mut out = self.try_clone()?;
        // SAFETY: as in `try_add`.
        unsafe { E::div_raw(out.as_mut_ptr(), rhs.lanes_ptr()) };
        Ok(out)
    }
}

impl<W: Width, E: Lane> Clone for Vector<W, E> {
    /// Aborts through [`alloc::handle_alloc_error`] if the allocator is exhausted.
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            _marker: PhantomData,
        }
    }
}

impl<W: Width, E: Lane> PartialEq for Vector<W, E> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<W: Width, E: Lane> fmt::Debug for Vector<W, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("bits", &W::BITS)
            .field("lane", &E::NAME)
            .field("lanes", &self.get())
            .finish()
    }
}
