//! Capability detection and native kernel dispatch.
//!
//! [`capabilities`] answers which instruction sets are safe to run on this
//! host. The [`LaneOps`], [`LaneMul`] and [`LaneDiv`] traits bind each
//! `(width, lane)` pair to its native kernels at compile time.

mod detect;
mod dispatch;
pub(crate) mod kernels;

pub use detect::{capabilities, required_instruction_set, Capabilities, Category, InstructionSet, Tier};
pub use dispatch::{LaneDiv, LaneMul, LaneOps};

pub(crate) use dispatch::ensure_supported;
