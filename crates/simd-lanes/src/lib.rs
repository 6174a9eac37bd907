//! Capability-gated fixed-width SIMD vectors.
//!
//! This library wraps x86-64 vector registers (128, 256 and 512 bits) in
//! typed containers whose arithmetic compiles down to one native
//! instruction per operation, and refuses to construct a vector the host
//! cannot execute.
//!
//! # Vector Types
//!
//! | Width | Integers | f32 | f64 | Needs |
//! |-------|----------|-----|-----|-------|
//! | 128 | [`I8x16`] … [`U64x2`] | [`F32x4`] | [`F64x2`] | SSE / SSE2 |
//! | 256 | [`I8x32`] … [`U64x4`] | [`F32x8`] | [`F64x4`] | AVX2 / AVX |
//! | 512 | [`I8x64`] … [`U64x8`] | [`F32x16`] | [`F64x8`] | AVX-512BW / AVX-512F |
//!
//! Integer add, subtract and multiply wrap. Multiply exists for 16 and
//! 32-bit integer lanes and both float widths; divide for floats only.
//! Using an operation that has no native kernel is a compile error.
//!
//! # Quick Start
//!
//! ```
//! # #[cfg(target_arch = "x86_64")] {
//! use simd_lanes::{F32x4, I32x4};
//!
//! let a = I32x4::from_array([1, 2, 3, 4]).unwrap();
//! let b = I32x4::from_array([5, 6, 7, 8]).unwrap();
//! assert_eq!((&a + &b).get(), &[6, 8, 10, 12]);
//!
//! let mut x = F32x4::splat(1.5).unwrap();
//! x *= &F32x4::splat(2.0).unwrap();
//! assert_eq!(x.element_at(0), 3.0);
//! assert_eq!(x.element_at(99), 0.0); // out of range reads zero
//! # }
//! ```
//!
//! # Capability Gating
//!
//! Detection runs once per process and checks both the CPU feature bits and
//! the register state the OS has enabled. Every constructor returns
//! [`Error::UnsupportedCapability`] when the host falls short:
//!
//! ```
//! use simd_lanes::{capabilities, Backend, CapabilityMatrix, InstructionSet};
//!
//! println!("Using: {}", Backend::description());
//! println!("{}", CapabilityMatrix::current());
//!
//! // A descriptor can be narrowed, never widened.
//! let baseline = capabilities().limit(InstructionSet::Sse2);
//! assert!(!baseline.supports(InstructionSet::Avx));
//! ```
//!
//! Set `SIMD_LANES_MAX_ISA` (e.g. `sse2`) to cap what the process uses.
//!
//! # Bulk Arrays
//!
//! [`VectorArray`] stores many registers in one allocation and applies the
//! compound operators block by block:
//!
//! ```
//! # #[cfg(target_arch = "x86_64")] {
//! use simd_lanes::{F64x2, VectorArray};
//!
//! let mut a = VectorArray::<F64x2, 1024>::splat(1.0).unwrap();
//! let b = VectorArray::<F64x2, 1024>::splat(0.5).unwrap();
//! a -= &b;
//! a /= &b;
//! assert_eq!(a.block(0), &[1.0, 1.0]);
//! # }
//! ```

pub mod config;
pub mod lane;
pub mod memory;
pub mod simd;

mod array;
mod backend;
mod error;
mod vector;

pub use array::VectorArray;
pub use backend::{version_info, Backend, CapabilityMatrix};
pub use config::DetectConfig;
pub use error::{Error, ParseInstructionSetError, Result};
pub use lane::{Lane, Width, W128, W256, W512};
pub use simd::{capabilities, Capabilities, Category, InstructionSet, LaneDiv, LaneMul, LaneOps, Tier};
pub use vector::{AsLanes, SimdVector, Vector, VectorView};

// Named vector types
pub use vector::{
    F32x16, F32x4, F32x8, F64x2, F64x4, F64x8, I16x16, I16x32, I16x8, I32x16, I32x4, I32x8,
    I64x2, I64x4, I64x8, I8x16, I8x32, I8x64, U16x16, U16x32, U16x8, U32x16, U32x4, U32x8,
    U64x2, U64x4, U64x8, U8x16, U8x32, U8x64,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::{
        capabilities, AsLanes, Capabilities, Error, InstructionSet, SimdVector, Vector,
        VectorArray, VectorView, W128, W256, W512,
    };
}
