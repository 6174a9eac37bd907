//! Bulk storage for many registers of one vector type.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};
use std::ptr::NonNull;

use crate::error::{Error, Result};
use crate::memory::AlignedBuffer;
use crate::simd::{capabilities, ensure_supported, Capabilities, LaneDiv, LaneMul, LaneOps};
use crate::vector::{SimdVector, VectorView};

type LaneOf<V> = <V as SimdVector>::Lane;
type WidthOf<V> = <V as SimdVector>::Width;

/// `LEN` contiguous registers of vector type `V` in one aligned allocation.
///
/// The capability check happens once, when the array is constructed. After
/// that, bulk operators walk the blocks straight through the raw kernels
/// without building a vector object per block.
///
/// ```
/// # #[cfg(target_arch = "x86_64")] {
/// use simd_lanes::{I32x4, VectorArray};
///
/// let mut a = VectorArray::<I32x4, 256>::splat(1).unwrap();
/// let b = VectorArray::<I32x4, 256>::splat(2).unwrap();
/// a += &b;
/// assert!(a.as_slice().iter().all(|&x| x == 3));
/// # }
/// ```
pub struct VectorArray<V: SimdVector, const LEN: usize> {
    buffer: AlignedBuffer,
    _marker: PhantomData<V>,
}

impl<V: SimdVector, const LEN: usize> VectorArray<V, LEN> {
    /// Number of registers.
    pub const LEN: usize = LEN;

    /// Total number of lanes across all registers.
    pub const TOTAL_LANES: usize = LEN * V::LANES;

    /// A zeroed array.
    pub fn new() -> Result<Self> {
        Self::new_with(capabilities())
    }

    pub fn new_with(caps: &Capabilities) -> Result<Self> {
        ensure_supported::<WidthOf<V>, LaneOf<V>>(caps)?;
        Self::zeroed()
    }

    /// Allocate without a capability check.
    fn zeroed() -> Result<Self> {
        let buffer = AlignedBuffer::allocate(LEN, V::BYTES, V::BYTES)?;
        Ok(Self {
            buffer,
            _marker: PhantomData,
        })
    }

    /// An array with every lane set to `value`.
    pub fn splat(value: LaneOf<V>) -> Result<Self> {
        Self::splat_with(value, capabilities())
    }

    pub fn splat_with(value: LaneOf<V>, caps: &Capabilities) -> Result<Self> {
        let mut array = Self::new_with(caps)?;
        array.fill(value);
        Ok(array)
    }

    /// Copy exactly [`TOTAL_LANES`](Self::TOTAL_LANES) lanes from `lanes`.
    pub fn from_slice(lanes: &[LaneOf<V>]) -> Result<Self> {
        Self::from_slice_with(lanes, capabilities())
    }

    pub fn from_slice_with(lanes: &[LaneOf<V>], caps: &Capabilities) -> Result<Self> {
        ensure_supported::<WidthOf<V>, LaneOf<V>>(caps)?;
        if lanes.len() != Self::TOTAL_LANES {
            return Err(Error::LengthMismatch {
                expected: Self::TOTAL_LANES,
                actual: lanes.len(),
            });
        }
        let mut array = Self::zeroed()?;
        array.as_mut_slice().copy_from_slice(lanes);
        Ok(array)
    }

    #[inline]
    pub const fn len(&self) -> usize {
        LEN
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        LEN == 0
    }

    /// Pointer to the first lane of block `index`.
    ///
    /// No bounds check; the pointer may only be dereferenced for `index < LEN`.
    #[inline(always)]
    pub fn block_ptr(&self, index: usize) -> *const LaneOf<V> {
        self.buffer.as_ptr().wrapping_add(index * V::BYTES).cast()
    }

    /// Mutable pointer to the first lane of block `index`.
    ///
    /// No bounds check; the pointer may only be dereferenced for `index < LEN`.
    #[inline(always)]
    pub fn block_mut_ptr(&mut self, index: usize) -> *mut LaneOf<V> {
        self.buffer.as_mut_ptr().wrapping_add(index * V::BYTES).cast()
    }

    /// Lanes of block `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= LEN`.
    #[inline]
    pub fn block(&self, index: usize) -> &[LaneOf<V>] {
        &self.as_slice()[index * V::LANES..(index + 1) * V::LANES]
    }

    /// Mutable lanes of block `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= LEN`.
    #[inline]
    pub fn block_mut(&mut self, index: usize) -> &mut [LaneOf<V>] {
        &mut self.as_mut_slice()[index * V::LANES..(index + 1) * V::LANES]
    }

    /// Block `index` as a vector, without another capability check.
    ///
    /// # Panics
    ///
    /// Panics if `index >= LEN`.
    pub fn view_mut(&mut self, index: usize) -> VectorView<'_, WidthOf<V>, LaneOf<V>> {
        let block = NonNull::from(self.block_mut(index)).cast();
        // SAFETY: every block starts on a V::BYTES boundary and spans one
        // register. The array was checked at construction.
        unsafe { VectorView::from_block(block) }
    }

    /// All lanes, block after block.
    #[inline]
    pub fn as_slice(&self) -> &[LaneOf<V>] {
        // SAFETY: the buffer holds exactly TOTAL_LANES lanes.
        unsafe { std::slice::from_raw_parts(self.buffer.as_ptr().cast(), Self::TOTAL_LANES) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [LaneOf<V>] {
        // SAFETY: as above, and `&mut self` makes the access unique.
        unsafe { std::slice::from_raw_parts_mut(self.buffer.as_mut_ptr().cast(), Self::TOTAL_LANES) }
    }

    /// Iterate over the blocks as lane slices.
    pub fn blocks(&self) -> impl Iterator<Item = &[LaneOf<V>]> + '_ {
        (0..LEN).map(move |i| self.block(i))
    }

    pub fn fill(&mut self, value: LaneOf<V>) {
        self.as_mut_slice().fill(value);
    }

    /// Deep copy into a new buffer.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            buffer: self.buffer.try_clone()?,
            _marker: PhantomData,
        })
    }
}

macro_rules! impl_bulk_op {
    ($bound:ident, $assign_trait:ident, $assign:ident, $raw:ident) => {
        impl<V, const LEN: usize> $assign_trait<&VectorArray<V, LEN>> for VectorArray<V, LEN>
        where
            V: SimdVector,
            LaneOf<V>: $bound<WidthOf<V>>,
        {
            fn $assign(&mut self, rhs: &VectorArray<V, LEN>) {
                for i in 0..LEN {
                    // SAFETY: both arrays hold LEN aligned blocks of V and were
                    // checked against the descriptor when constructed.
                    unsafe {
                        <LaneOf<V> as $bound<WidthOf<V>>>::$raw(self.block_mut_ptr(i), rhs.block_ptr(i));
                    }
                }
            }
        }
    };
}

impl_bulk_op!(LaneOps, AddAssign, add_assign, add_raw);
impl_bulk_op!(LaneOps, SubAssign, sub_assign, sub_raw);
impl_bulk_op!(LaneMul, MulAssign, mul_assign, mul_raw);
impl_bulk_op!(LaneDiv, DivAssign, div_assign, div_raw);

impl<V: SimdVector, const LEN: usize> Clone for VectorArray<V, LEN> {
    /// Aborts through [`std::alloc::handle_alloc_error`] if the allocator is exhausted.
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            _marker: PhantomData,
        }
    }
}

impl<V: SimdVector, const LEN: usize> PartialEq for VectorArray<V, LEN> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<V: SimdVector, const LEN: usize> fmt::Debug for VectorArray<V, LEN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.blocks()).finish()
    }
}
