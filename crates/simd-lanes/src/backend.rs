use std::fmt;

use crate::simd::{capabilities, Capabilities, Category, InstructionSet, Tier};

/// Which vector kernels can run in this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// No vector type can be constructed (non-x86-64 target or no SSE).
    Unavailable,
    /// At least the 128-bit kernels are usable.
    Native,
}

impl Backend {
    /// Get the backend for the process-wide descriptor.
    pub fn current() -> Self {
        match capabilities().highest() {
            InstructionSet::None => Backend::Unavailable,
            _ => Backend::Native,
        }
    }

    /// Get a description of the widest usable instruction set.
    pub fn description() -> String {
        match capabilities().highest() {
            InstructionSet::None => "Unavailable (no vector instructions)".to_string(),
            InstructionSet::Sse => "x86-64 SSE (128-bit)".to_string(),
            InstructionSet::Sse2 => "x86-64 SSE2 (128-bit)".to_string(),
            InstructionSet::Avx => "x86-64 AVX (256-bit float)".to_string(),
            InstructionSet::Avx2 => "x86-64 AVX2 (256-bit)".to_string(),
            InstructionSet::Avx512F => "x86-64 AVX-512F (512-bit float)".to_string(),
            InstructionSet::Avx512Bw => "x86-64 AVX-512BW (512-bit)".to_string(),
        }
    }
}

/// Which `(category, tier)` pairs can run, for logging and diagnostics.
///
/// A cell is set only when every lane type of the category is usable at
/// that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityMatrix {
    cells: [[bool; 3]; 3],
}

impl CapabilityMatrix {
    /// Matrix for the process-wide descriptor.
    pub fn current() -> Self {
        Self::from_capabilities(capabilities())
    }

    pub fn from_capabilities(caps: &Capabilities) -> Self {
        let mut cells = [[false; 3]; 3];
        for (row, category) in Category::ALL.iter().enumerate() {
            for (col, tier) in Tier::ALL.iter().enumerate() {
                cells[row][col] = caps.supports_tier(*category, *tier);
            }
        }
        Self { cells }
    }

    pub fn get(&self, category: Category, tier: Tier) -> bool {
        self.cells[category as usize][tier as usize]
    }
}

impl fmt::Display for CapabilityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8}", "")?;
        for tier in Tier::ALL {
            write!(f, "{:>6}", tier.bits())?;
        }
        for category in Category::ALL {
            write!(f, "\n{:<8}", category.name())?;
            for tier in Tier::ALL {
                let mark = if self.get(category, tier) { "yes" } else { "no" };
                write!(f, "{:>6}", mark)?;
            }
        }
        Ok(())
    }
}

/// Get information about the library configuration.
pub fn version_info() -> String {
    format!(
        "simd-lanes v{}\nBackend: {}\nHighest: {}\n{}",
        env!("CARGO_PKG_VERSION"),
        Backend::description(),
        capabilities().highest(),
        CapabilityMatrix::current()
    )
}
