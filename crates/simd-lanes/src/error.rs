//! Error types for vector construction.

use thiserror::Error;

use crate::simd::InstructionSet;

/// Errors that can occur while constructing vectors, views and arrays.
///
/// Every variant is raised at construction time. Arithmetic on an
/// already-constructed value never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The instruction set needed by the vector type is not usable on this host.
    #[error("{bits}-bit {lane} vectors require {required}, which is not available on this host")]
    UnsupportedCapability {
        lane: &'static str,
        bits: usize,
        required: InstructionSet,
    },

    /// An imported pointer does not sit on the vector's alignment boundary.
    #[error("address {address:#x} is not aligned to {alignment} bytes")]
    MisalignedImport { address: usize, alignment: usize },

    /// The allocator could not provide the requested block.
    #[error("failed to allocate {size} bytes aligned to {alignment}")]
    AllocationFailure { size: usize, alignment: usize },

    /// The requested alignment is not a power of two.
    #[error("alignment {alignment} is not a power of two")]
    InvalidAlignment { alignment: usize },

    /// An imported slice holds fewer lanes than one vector.
    #[error("import needs {required} lanes, got {actual}")]
    ShortImport { required: usize, actual: usize },

    /// More values were supplied than the vector has lanes.
    #[error("{actual} values exceed the {capacity}-lane capacity")]
    TooManyLanes { capacity: usize, actual: usize },

    /// A bulk source does not match the array's lane count.
    #[error("expected {expected} lanes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Error returned when an instruction set name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown instruction set `{0}`")]
pub struct ParseInstructionSetError(pub String);

/// Result type for vector construction.
pub type Result<T> = std::result::Result<T, Error>;
