//! Native elementwise kernels, one module per instruction group.
//!
//! Every kernel has the shape `unsafe fn(to: *mut u8, from: *const u8)`:
//! it loads one register from each pointer, combines them, and stores the
//! result back through `to`. Both pointers must be aligned to the register
//! width and valid for that many bytes, and the instruction group named by
//! the kernel's `target_feature` must be available.

/// Define a kernel that applies `$op` to two aligned registers.
#[cfg(target_arch = "x86_64")]
macro_rules! binary_kernel {
    ($($name:ident: $feature:tt, $load:ident, $store:ident, $op:ident;)*) => {
        $(
            #[inline]
            #[target_feature(enable = $feature)]
            pub(crate) unsafe fn $name(to: *mut u8, from: *const u8) {
                let a = $load(to.cast_const().cast());
                let b = $load(from.cast());
                $store(to.cast(), $op(a, b));
            }
        )*
    };
}

#[cfg(target_arch = "x86_64")]
pub(crate) mod avx;
#[cfg(target_arch = "x86_64")]
pub(crate) mod avx2;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub(crate) mod avx512;
#[cfg(target_arch = "x86_64")]
pub(crate) mod sse;
