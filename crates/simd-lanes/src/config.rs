//! Detection configuration.
//!
//! The only knob is a ceiling on the instruction sets the process will use,
//! read from [`MAX_ISA_ENV`]. It is applied once, when the process-wide
//! descriptor is first computed, and can only narrow what was detected.

use crate::simd::{Capabilities, InstructionSet};

/// Environment variable holding the instruction set ceiling (e.g. `sse2`, `avx2`).
pub const MAX_ISA_ENV: &str = "SIMD_LANES_MAX_ISA";

/// Settings applied on top of raw host detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectConfig {
    /// Widest instruction set the process may use. `None` means no ceiling.
    pub max_instruction_set: Option<InstructionSet>,
}

impl DetectConfig {
    /// A config that restricts usage to `max` and below.
    pub fn with_ceiling(max: InstructionSet) -> Self {
        Self {
            max_instruction_set: Some(max),
        }
    }

    /// Read the config from the environment.
    ///
    /// A missing or empty variable means no ceiling. An unparsable value is
    /// logged and ignored.
    pub fn from_env() -> Self {
        match std::env::var(MAX_ISA_ENV) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::default(),
        }
    }

    fn from_value(value: &str) -> Self {
        if value.trim().is_empty() {
            return Self::default();
        }
        match value.parse::<InstructionSet>() {
            Ok(set) => Self::with_ceiling(set),
            Err(err) => {
                tracing::warn!(
                    variable = MAX_ISA_ENV,
                    value,
                    error = %err,
                    "ignoring instruction set ceiling"
                );
                Self::default()
            }
        }
    }

    /// Apply the ceiling to a detected descriptor.
    pub fn apply(&self, caps: Capabilities) -> Capabilities {
        match self.max_instruction_set {
            Some(max) => caps.limit(max),
            None => caps,
        }
    }
}
