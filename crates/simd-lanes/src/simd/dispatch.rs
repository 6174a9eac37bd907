//! Compile-time binding of `(width, lane)` pairs to native kernels.
//!
//! Each supported pair gets one trait impl whose methods forward straight to
//! a `#[target_feature]` kernel. A pair with no kernel simply has no impl, so
//! e.g. multiplying two `u8` vectors is a type error rather than a runtime
//! failure.

use crate::error::{Error, Result};
use crate::lane::{Lane, Width};
use crate::simd::{capabilities, Capabilities, InstructionSet};

#[cfg(target_arch = "x86_64")]
use crate::lane::{W128, W256};
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
use crate::lane::W512;
#[cfg(target_arch = "x86_64")]
use crate::simd::{kernels, required_instruction_set};

/// Add and subtract kernels for lane type `Self` at register width `W`.
///
/// # Safety
///
/// Implementations must only issue instructions covered by `REQUIRED` or
/// by the x86-64 baseline (SSE and SSE2), which every x86-64 processor
/// executes regardless of the reported descriptor.
/// Callers of the raw functions must ensure `REQUIRED` is supported on the
/// host and that both pointers are aligned to `W::BYTES` and valid for
/// `W::BYTES` bytes.
pub unsafe trait LaneOps<W: Width>: Lane {
    /// Instruction set the kernels need.
    const REQUIRED: InstructionSet;

    /// `*to = *to + *from`, lane-wise, wrapping for integers.
    unsafe fn add_raw(to: *mut Self, from: *const Self);

    /// `*to = *to - *from`, lane-wise, wrapping for integers.
    unsafe fn sub_raw(to: *mut Self, from: *const Self);
}

/// Lane-wise multiply, keeping the low half of integer products.
///
/// # Safety
///
/// Same contract as [`LaneOps`].
pub unsafe trait LaneMul<W: Width>: LaneOps<W> {
    unsafe fn mul_raw(to: *mut Self, from: *const Self);
}

/// Lane-wise division. Only floating-point lanes implement this.
///
/// # Safety
///
/// Same contract as [`LaneOps`].
pub unsafe trait LaneDiv<W: Width>: LaneOps<W> {
    unsafe fn div_raw(to: *mut Self, from: *const Self);
}

#[cfg(target_arch = "x86_64")]
macro_rules! impl_lane_ops {
    ($w:ty, $kernels:ident; $($t:ty => $add:ident, $sub:ident);* $(;)?) => {
        $(
            unsafe impl LaneOps<$w> for $t {
                const REQUIRED: InstructionSet = required_instruction_set(
                    <$t as Lane>::CATEGORY,
                    <$t as Lane>::BITS,
                    <$w as Width>::TIER,
                );

                #[inline(always)]
                unsafe fn add_raw(to: *mut Self, from: *const Self) {
                    kernels::$kernels::$add(to.cast(), from.cast())
                }

                #[inline(always)]
                unsafe fn sub_raw(to: *mut Self, from: *const Self) {
                    kernels::$kernels::$sub(to.cast(), from.cast())
                }
            }
        )*
    };
}

#[cfg(target_arch = "x86_64")]
macro_rules! impl_lane_binary {
    ($tr:ident, $method:ident, $w:ty, $kernels:ident; $($t:ty => $kernel:ident);* $(;)?) => {
        $(
            unsafe impl $tr<$w> for $t {
                #[inline(always)]
                unsafe fn $method(to: *mut Self, from: *const Self) {
                    kernels::$kernels::$kernel(to.cast(), from.cast())
                }
            }
        )*
    };
}

// 128-bit.
#[cfg(target_arch = "x86_64")]
impl_lane_ops!(W128, sse;
    i8 => add_epi8, sub_epi8;
    u8 => add_epi8, sub_epi8;
    i16 => add_epi16, sub_epi16;
    u16 => add_epi16, sub_epi16;
    i32 => add_epi32, sub_epi32;
    u32 => add_epi32, sub_epi32;
    i64 => add_epi64, sub_epi64;
    u64 => add_epi64, sub_epi64;
    f32 => add_ps, sub_ps;
    f64 => add_pd, sub_pd;
);

#[cfg(target_arch = "x86_64")]
impl_lane_binary!(LaneMul, mul_raw, W128, sse;
    i16 => mullo_epi16;
    u16 => mullo_epi16;
    i32 => mullo_epi32;
    u32 => mullo_epi32;
    f32 => mul_ps;
    f64 => mul_pd;
);

#[cfg(target_arch = "x86_64")]
impl_lane_binary!(LaneDiv, div_raw, W128, sse;
    f32 => div_ps;
    f64 => div_pd;
);

// 256-bit: integers on AVX2, floats on AVX.
#[cfg(target_arch = "x86_64")]
impl_lane_ops!(W256, avx2;
    i8 => add_epi8, sub_epi8;
    u8 => add_epi8, sub_epi8;
    i16 => add_epi16, sub_epi16;
    u16 => add_epi16, sub_epi16;
    i32 => add_epi32, sub_epi32;
    u32 => add_epi32, sub_epi32;
    i64 => add_epi64, sub_epi64;
    u64 => add_epi64, sub_epi64;
);

#[cfg(target_arch = "x86_64")]
impl_lane_ops!(W256, avx;
    f32 => add_ps, sub_ps;
    f64 => add_pd, sub_pd;
);

#[cfg(target_arch = "x86_64")]
impl_lane_binary!(LaneMul, mul_raw, W256, avx2;
    i16 => mullo_epi16;
    u16 => mullo_epi16;
    i32 => mullo_epi32;
    u32 => mullo_epi32;
);

#[cfg(target_arch = "x86_64")]
impl_lane_binary!(LaneMul, mul_raw, W256, avx;
    f32 => mul_ps;
    f64 => mul_pd;
);

#[cfg(target_arch = "x86_64")]
impl_lane_binary!(LaneDiv, div_raw, W256, avx;
    f32 => div_ps;
    f64 => div_pd;
);

// 512-bit.
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
impl_lane_ops!(W512, avx512;
    i8 => add_epi8, sub_epi8;
    u8 => add_epi8, sub_epi8;
    i16 => add_epi16, sub_epi16;
    u16 => add_epi16, sub_epi16;
    i32 => add_epi32, sub_epi32;
    u32 => add_epi32, sub_epi32;
    i64 => add_epi64, sub_epi64;
    u64 => add_epi64, sub_epi64;
    f32 => add_ps, sub_ps;
    f64 => add_pd, sub_pd;
);

#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
impl_lane_binary!(LaneMul, mul_raw, W512, avx512;
    i16 => mullo_epi16;
    u16 => mullo_epi16;
    i32 => mullo_epi32;
    u32 => mullo_epi32;
    f32 => mul_ps;
    f64 => mul_pd;
);

#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
impl_lane_binary!(LaneDiv, div_raw, W512, avx512;
    f32 => div_ps;
    f64 => div_pd;
);

/// Check that `caps` covers what `(W, E)` vectors need.
///
/// `caps` is intersected with the process descriptor first, so a caller
/// supplied descriptor can narrow what [`capabilities`] reports but never
/// widen it.
pub(crate) fn ensure_supported<W: Width, E: LaneOps<W>>(caps: &Capabilities) -> Result<()> {
    let effective = caps.intersect(*capabilities());
    if effective.supports(E::REQUIRED) {
        return Ok(());
    }

    tracing::debug!(
        lane = E::NAME,
        bits = W::BITS,
        required = %E::REQUIRED,
        highest = %effective.highest(),
        "vector construction rejected"
    );
    Err(Error::UnsupportedCapability {
        lane: E::NAME,
        bits: W::BITS,
        required: E::REQUIRED,
    })
}

#[cfg(all(test, target_arch = "x86_64"))]
mod tests {
    use super::*;

    #[repr(C, align(32))]
    struct Block<T, const N: usize>([T; N]);

    #[test]
    fn test_required_sets() {
        assert_eq!(<i8 as LaneOps<W128>>::REQUIRED, InstructionSet::Sse);
        assert_eq!(<u32 as LaneOps<W128>>::REQUIRED, InstructionSet::Sse);
        assert_eq!(<f32 as LaneOps<W128>>::REQUIRED, InstructionSet::Sse);
        assert_eq!(<i64 as LaneOps<W128>>::REQUIRED, InstructionSet::Sse2);
        assert_eq!(<f64 as LaneOps<W128>>::REQUIRED, InstructionSet::Sse2);

        assert_eq!(<u8 as LaneOps<W256>>::REQUIRED, InstructionSet::Avx2);
        assert_eq!(<i64 as LaneOps<W256>>::REQUIRED, InstructionSet::Avx2);
        assert_eq!(<f32 as LaneOps<W256>>::REQUIRED, InstructionSet::Avx);
        assert_eq!(<f64 as LaneOps<W256>>::REQUIRED, InstructionSet::Avx);
    }

    #[cfg(feature = "avx512")]
    #[test]
    fn test_required_sets_512() {
        assert_eq!(<i8 as LaneOps<W512>>::REQUIRED, InstructionSet::Avx512Bw);
        assert_eq!(<u64 as LaneOps<W512>>::REQUIRED, InstructionSet::Avx512Bw);
        assert_eq!(<f32 as LaneOps<W512>>::REQUIRED, InstructionSet::Avx512F);
    }

    #[test]
    fn test_ensure_supported_rejects() {
        let err = ensure_supported::<W256, f32>(&Capabilities::none()).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedCapability {
                lane: "f32",
                bits: 256,
                required: InstructionSet::Avx,
            }
        );
    }

    #[test]
    fn test_ensure_supported_respects_limit() {
        let full = Capabilities::from_registers(0x0600_0000, 0x1800_0000, 0x4001_0020, 0xE7);
        let baseline = full.limit(InstructionSet::Sse2);

        assert!(ensure_supported::<W128, i64>(&baseline).is_ok());
        assert!(ensure_supported::<W256, i32>(&baseline).is_err());
        assert_eq!(
            ensure_supported::<W256, i32>(&full).is_ok(),
            capabilities().supports(InstructionSet::Avx2)
        );
    }

    #[test]
    fn test_ensure_supported_never_widens_process_descriptor() {
        // Every CPUID bit set and full XCR0 state.
        let forged = Capabilities::from_registers(u32::MAX, u32::MAX, u32::MAX, u64::MAX);
        assert_eq!(forged.highest(), InstructionSet::Avx512Bw);

        let host = capabilities();
        assert_eq!(
            ensure_supported::<W256, f32>(&forged).is_ok(),
            host.supports(InstructionSet::Avx)
        );
        assert_eq!(
            ensure_supported::<W256, u8>(&forged).is_ok(),
            host.supports(InstructionSet::Avx2)
        );
        #[cfg(feature = "avx512")]
        assert_eq!(
            ensure_supported::<W512, f64>(&forged).is_ok(),
            host.supports(InstructionSet::Avx512F)
        );

        if !host.supports(InstructionSet::Avx512Bw) {
            #[cfg(feature = "avx512")]
            assert_eq!(
                ensure_supported::<W512, i16>(&forged),
                Err(Error::UnsupportedCapability {
                    lane: "i16",
                    bits: 512,
                    required: InstructionSet::Avx512Bw,
                })
            );
        }
    }

    #[test]
    fn test_baseline_kernels_run_under_sse_ceiling() {
        // 128-bit integer kernels use SSE2 encodings, which the x86-64
        // baseline guarantees even when the descriptor stops at SSE.
        assert_eq!(<i32 as LaneOps<W128>>::REQUIRED, InstructionSet::Sse);
        let sse_only = capabilities().limit(InstructionSet::Sse);
        assert!(ensure_supported::<W128, i32>(&sse_only).is_ok());
        assert!(ensure_supported::<W128, i64>(&sse_only).is_err());

        let mut a = Block([7i32, -1, 0, i32::MAX]);
        let b = Block([1i32, 1, 1, 1]);
        unsafe { <i32 as LaneOps<W128>>::add_raw(a.0.as_mut_ptr(), b.0.as_ptr()) };
        assert_eq!(a.0, [8, 0, 1, i32::MIN]);
    }

    #[test]
    fn test_raw_128_integer_kernels() {
        let mut a = Block([1i32, 2, 3, 4]);
        let b = Block([5i32, 6, 7, 8]);

        unsafe { <i32 as LaneOps<W128>>::add_raw(a.0.as_mut_ptr(), b.0.as_ptr()) };
        assert_eq!(a.0, [6, 8, 10, 12]);

        unsafe { <i32 as LaneMul<W128>>::mul_raw(a.0.as_mut_ptr(), b.0.as_ptr()) };
        assert_eq!(a.0, [30, 48, 70, 96]);

        unsafe { <i32 as LaneOps<W128>>::sub_raw(a.0.as_mut_ptr(), b.0.as_ptr()) };
        assert_eq!(a.0, [25, 42, 63, 88]);
    }

    #[test]
    fn test_raw_128_float_kernels() {
        let mut a = Block([1.0f64, -4.0]);
        let b = Block([2.0f64, 0.5]);

        unsafe { <f64 as LaneMul<W128>>::mul_raw(a.0.as_mut_ptr(), b.0.as_ptr()) };
        assert_eq!(a.0, [2.0, -2.0]);

        unsafe { <f64 as LaneDiv<W128>>::div_raw(a.0.as_mut_ptr(), b.0.as_ptr()) };
        assert_eq!(a.0, [1.0, -4.0]);
    }

    #[test]
    fn test_raw_256_when_available() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }
        let mut a = Block([i16::MAX; 16]);
        let b = Block([1i16; 16]);

        unsafe { <i16 as LaneOps<W256>>::add_raw(a.0.as_mut_ptr(), b.0.as_ptr()) };
        assert_eq!(a.0, [i16::MIN; 16]);
    }
}
