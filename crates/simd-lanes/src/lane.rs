use std::fmt::Debug;

use crate::simd::{Category, Tier};

mod sealed {
    pub trait Sealed {}
}

/// Register width marker for a vector type.
pub trait Width: sealed::Sealed + Copy + Send + Sync + Debug + Default + 'static {
    /// Register width in bits.
    const BITS: usize;

    /// Register width in bytes. Also the required storage alignment.
    const BYTES: usize = Self::BITS / 8;

    /// Capability tier that corresponds to this width.
    const TIER: Tier;
}

/// 128-bit registers (SSE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct W128;

/// 256-bit registers (AVX / AVX2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct W256;

/// 512-bit registers (AVX-512).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct W512;

impl sealed::Sealed for W128 {}
impl sealed::Sealed for W256 {}
impl sealed::Sealed for W512 {}

impl Width for W128 {
    const BITS: usize = 128;
    const TIER: Tier = Tier::V128;
}

impl Width for W256 {
    const BITS: usize = 256;
    const TIER: Tier = Tier::V256;
}

impl Width for W512 {
    const BITS: usize = 512;
    const TIER: Tier = Tier::V512;
}

/// Element type of a vector lane.
///
/// Implemented for the fixed-width integers and both IEEE float widths.
/// Every bit pattern of zero is the value zero for all of them, which is
/// what zero-filled storage relies on.
pub trait Lane: sealed::Sealed + Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Instruction category this element belongs to.
    const CATEGORY: Category;

    /// Lane width in bits.
    const BITS: u32;

    /// Additive identity.
    const ZERO: Self;

    /// Multiplicative identity.
    const ONE: Self;

    /// Short type name used in diagnostics.
    const NAME: &'static str;
}

macro_rules! impl_lane {
    ($category:expr; $($t:ty => $zero:expr, $one:expr);* $(;)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Lane for $t {
                const CATEGORY: Category = $category;
                const BITS: u32 = <$t>::BITS;
                const ZERO: Self = $zero;
                const ONE: Self = $one;
                const NAME: &'static str = stringify!($t);
            }
        )*
    };
}

impl_lane!(Category::Integer;
    i8 => 0, 1;
    u8 => 0, 1;
    i16 => 0, 1;
    u16 => 0, 1;
    i32 => 0, 1;
    u32 => 0, 1;
    i64 => 0, 1;
    u64 => 0, 1;
);

impl sealed::Sealed for f32 {}
impl sealed::Sealed for f64 {}

impl Lane for f32 {
    const CATEGORY: Category = Category::Float32;
    const BITS: u32 = 32;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const NAME: &'static str = "f32";
}

impl Lane for f64 {
    const CATEGORY: Category = Category::Float64;
    const BITS: u32 = 64;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const NAME: &'static str = "f64";
}

/// Number of `E` lanes in a register of width `W`.
pub const fn lane_count<W: Width, E: Lane>() -> usize {
    W::BYTES / std::mem::size_of::<E>()
}
