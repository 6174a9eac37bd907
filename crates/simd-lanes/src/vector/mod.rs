//! Fixed-width vector types.
//!
//! [`Vector`] owns its aligned storage. [`VectorView`] borrows caller
//! memory that is already aligned. Both are gated by the capability
//! descriptor at construction and carry no validity flag afterwards.

use crate::lane::{Lane, Width, W128, W256, W512};
use crate::simd::LaneOps;

mod sealed {
    pub trait Sealed {}
}

/// Register-shaped storage whose lanes can be read as the right-hand side
/// of an in-place operation.
///
/// Implemented by [`Vector`] and [`VectorView`]. The pointer returned by
/// [`lanes_ptr`](Self::lanes_ptr) is always aligned to `W::BYTES` and
/// valid for `W::BYTES` bytes.
pub trait AsLanes<W: Width, E: Lane>: sealed::Sealed {
    fn lanes_ptr(&self) -> *const E;
}

/// A concrete vector type, used to parameterise [`VectorArray`](crate::VectorArray).
pub trait SimdVector: sealed::Sealed {
    type Width: Width;
    type Lane: LaneOps<Self::Width>;

    /// Lanes per register.
    const LANES: usize;

    /// Bytes per register, and the storage alignment.
    const BYTES: usize;
}

impl<W: Width, E: LaneOps<W>> SimdVector for Vector<W, E> {
    type Width = W;
    type Lane = E;

    const LANES: usize = crate::lane::lane_count::<W, E>();
    const BYTES: usize = W::BYTES;
}

impl<W: Width, E: Lane> sealed::Sealed for Vector<W, E> {}
impl<W: Width, E: Lane> sealed::Sealed for VectorView<'_, W, E> {}

impl<W: Width, E: Lane> AsLanes<W, E> for Vector<W, E> {
    #[inline]
    fn lanes_ptr(&self) -> *const E {
        self.as_ptr()
    }
}

impl<W: Width, E: Lane> AsLanes<W, E> for VectorView<'_, W, E> {
    #[inline]
    fn lanes_ptr(&self) -> *const E {
        self.as_ptr()
    }
}

/// Lane accessors shared by the owned and borrowed vector types.
///
/// Expects `as_ptr`/`as_mut_ptr` and `LANES` on the implementing type.
macro_rules! lane_accessors {
    () => {
        /// Lane `index`, or zero when `index` is out of range.
        #[inline]
        pub fn element_at(&self, index: usize) -> E {
            self.get().get(index).copied().unwrap_or(E::ZERO)
        }

        /// All lanes, read-only.
        #[inline]
        pub fn get(&self) -> &[E] {
            // SAFETY: storage is valid for LANES elements of E.
            unsafe { std::slice::from_raw_parts(self.as_ptr(), Self::LANES) }
        }

        /// All lanes, mutable.
        #[inline]
        pub fn as_mut_slice(&mut self) -> &mut [E] {
            // SAFETY: as in `get`, and `&mut self` makes the access unique.
            unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), Self::LANES) }
        }

        /// Checked mutable access to lane `index`.
        #[inline]
        pub fn lane_mut(&mut self, index: usize) -> Option<&mut E> {
            self.as_mut_slice().get_mut(index)
        }

        /// Mutable access to lane `index` without a bounds check.
        ///
        /// # Safety
        ///
        /// `index` must be less than `Self::LANES`.
        #[inline]
        pub unsafe fn lane_unchecked_mut(&mut self, index: usize) -> &mut E {
            debug_assert!(index < Self::LANES);
            &mut *self.as_mut_ptr().add(index)
        }

        /// Copy the lanes out.
        pub fn to_vec(&self) -> Vec<E> {
            self.get().to_vec()
        }
    };
}

mod ops;
mod owned;
mod view;

pub use owned::Vector;
pub use view::VectorView;

pub type I8x16 = Vector<W128, i8>;
pub type U8x16 = Vector<W128, u8>;
pub type I16x8 = Vector<W128, i16>;
pub type U16x8 = Vector<W128, u16>;
pub type I32x4 = Vector<W128, i32>;
pub type U32x4 = Vector<W128, u32>;
pub type I64x2 = Vector<W128, i64>;
pub type U64x2 = Vector<W128, u64>;
pub type F32x4 = Vector<W128, f32>;
pub type F64x2 = Vector<W128, f64>;

pub type I8x32 = Vector<W256, i8>;
pub type U8x32 = Vector<W256, u8>;
pub type I16x16 = Vector<W256, i16>;
pub type U16x16 = Vector<W256, u16>;
pub type I32x8 = Vector<W256, i32>;
pub type U32x8 = Vector<W256, u32>;
pub type I64x4 = Vector<W256, i64>;
pub type U64x4 = Vector<W256, u64>;
pub type F32x8 = Vector<W256, f32>;
pub type F64x4 = Vector<W256, f64>;

pub type I8x64 = Vector<W512, i8>;
pub type U8x64 = Vector<W512, u8>;
pub type I16x32 = Vector<W512, i16>;
pub type U16x32 = Vector<W512, u16>;
pub type I32x16 = Vector<W512, i32>;
pub type U32x16 = Vector<W512, u32>;
pub type I64x8 = Vector<W512, i64>;
pub type U64x8 = Vector<W512, u64>;
pub type F32x16 = Vector<W512, f32>;
pub type F64x8 = Vector<W512, f64>;
