//! Operator impls for [`Vector`] and [`VectorView`].
//!
//! The compound forms (`a += &b`) accept any right-hand operand of the same
//! width and lane type. The binary forms allocate a new [`Vector`] for the
//! result.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use super::{AsLanes, Vector, VectorView};
use crate::lane::Width;
use crate::simd::{LaneDiv, LaneMul, LaneOps};

macro_rules! impl_vector_op {
    ($bound:ident, $assign_trait:ident, $assign:ident, $op_trait:ident, $op:ident, $raw:ident) => {
        impl<W: Width, E: $bound<W>, R: AsLanes<W, E>> $assign_trait<&R> for Vector<W, E> {
            #[inline]
            fn $assign(&mut self, rhs: &R) {
                // SAFETY: both sides are constructed vectors of this type,
                // so they are aligned and the kernel is supported.
                unsafe { E::$raw(self.as_mut_ptr(), rhs.lanes_ptr()) }
            }
        }

        impl<W: Width, E: $bound<W>, R: AsLanes<W, E>> $assign_trait<&R> for VectorView<'_, W, E> {
            #[inline]
            fn $assign(&mut self, rhs: &R) {
                // SAFETY: as above.
                unsafe { E::$raw(self.as_mut_ptr(), rhs.lanes_ptr()) }
            }
        }

        impl<W: Width, E: $bound<W>, R: AsLanes<W, E>> $op_trait<&R> for Vector<W, E> {
            type Output = Vector<W, E>;

            #[inline]
            fn $op(mut self, rhs: &R) -> Self::Output {
                self.$assign(rhs);
                self
            }
        }

        impl<W: Width, E: $bound<W>, R: AsLanes<W, E>> $op_trait<&R> for &Vector<W, E> {
            type Output = Vector<W, E>;

            #[inline]
            fn $op(self, rhs: &R) -> Self::Output {
                self.clone().$op(rhs)
            }
        }

        impl<W: Width, E: $bound<W>, R: AsLanes<W, E>> $op_trait<&R> for &VectorView<'_, W, E> {
            type Output = Vector<W, E>;

            #[inline]
            fn $op(self, rhs: &R) -> Self::Output {
                self.to_owned_vector().$op(rhs)
            }
        }
    };
}

impl_vector_op!(LaneOps, AddAssign, add_assign, Add, add, add_raw);
impl_vector_op!(LaneOps, SubAssign, sub_assign, Sub, sub, sub_raw);
impl_vector_op!(LaneMul, MulAssign, mul_assign, Mul, mul, mul_raw);
impl_vector_op!(LaneDiv, DivAssign, div_assign, Div, div, div_raw);
