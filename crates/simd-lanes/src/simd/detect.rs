//! CPU and OS feature detection for capability-gated vectors.
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::config::DetectConfig;
use crate::error::ParseInstructionSetError;

/// Vector instruction sets, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstructionSet {
    /// No vector instructions required.
    None,
    /// SSE (128-bit integer and f32).
    Sse,
    /// SSE2 (128-bit 64-bit integer and f64).
    Sse2,
    /// AVX (256-bit f32 and f64).
    Avx,
    /// AVX2 (256-bit integer).
    Avx2,
    /// AVX-512 Foundation (512-bit f32 and f64).
    Avx512F,
    /// AVX-512 Byte/Word (512-bit integer, all lane widths).
    Avx512Bw,
}

impl InstructionSet {
    /// Every instruction set, narrowest first.
    pub const ALL: [InstructionSet; 7] = [
        InstructionSet::None,
        InstructionSet::Sse,
        InstructionSet::Sse2,
        InstructionSet::Avx,
        InstructionSet::Avx2,
        InstructionSet::Avx512F,
        InstructionSet::Avx512Bw,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            InstructionSet::None => "none",
            InstructionSet::Sse => "SSE",
            InstructionSet::Sse2 => "SSE2",
            InstructionSet::Avx => "AVX",
            InstructionSet::Avx2 => "AVX2",
            InstructionSet::Avx512F => "AVX-512F",
            InstructionSet::Avx512Bw => "AVX-512BW",
        }
    }

    /// Register width in bytes of the widest registers this set operates on.
    pub fn width_bytes(&self) -> usize {
        match self {
            InstructionSet::None => 0,
            InstructionSet::Sse | InstructionSet::Sse2 => 16,
            InstructionSet::Avx | InstructionSet::Avx2 => 32,
            InstructionSet::Avx512F | InstructionSet::Avx512Bw => 64,
        }
    }
}

impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InstructionSet {
    type Err = ParseInstructionSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_' && *c != '.')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "none" | "scalar" => Ok(InstructionSet::None),
            "sse" => Ok(InstructionSet::Sse),
            "sse2" => Ok(InstructionSet::Sse2),
            "avx" => Ok(InstructionSet::Avx),
            "avx2" => Ok(InstructionSet::Avx2),
            "avx512" | "avx512f" => Ok(InstructionSet::Avx512F),
            "avx512bw" => Ok(InstructionSet::Avx512Bw),
            _ => Err(ParseInstructionSetError(s.to_string())),
        }
    }
}

/// Element category, which decides the instruction group used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// 8/16/32/64-bit signed and unsigned integers.
    Integer,
    /// Single-precision floats.
    Float32,
    /// Double-precision floats.
    Float64,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Integer, Category::Float32, Category::Float64];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Integer => "integer",
            Category::Float32 => "f32",
            Category::Float64 => "f64",
        }
    }

    /// Widest lane of this category, in bits.
    pub const fn widest_lane_bits(&self) -> u32 {
        match self {
            Category::Integer | Category::Float64 => 64,
            Category::Float32 => 32,
        }
    }
}

/// Capability tier, one per register width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    V128,
    V256,
    V512,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::V128, Tier::V256, Tier::V512];

    pub const fn bits(&self) -> usize {
        match self {
            Tier::V128 => 128,
            Tier::V256 => 256,
            Tier::V512 => 512,
        }
    }
}

/// Instruction set a vector of `category` lanes, `lane_bits` wide, needs at `tier`.
///
/// At 128 bits the 8/16/32-bit integers and f32 only need SSE while 64-bit
/// integers and f64 need SSE2. All 256-bit integer kinds need AVX2 and the
/// 256-bit floats AVX. At 512 bits the floats need AVX-512F and the integers
/// AVX-512BW, which covers the byte and word lanes.
pub const fn required_instruction_set(category: Category, lane_bits: u32, tier: Tier) -> InstructionSet {
    match (tier, category) {
        (Tier::V128, Category::Integer) => {
            if lane_bits >= 64 {
                InstructionSet::Sse2
            } else {
                InstructionSet::Sse
            }
        }
        (Tier::V128, Category::Float32) => InstructionSet::Sse,
        (Tier::V128, Category::Float64) => InstructionSet::Sse2,
        (Tier::V256, Category::Integer) => InstructionSet::Avx2,
        (Tier::V256, Category::Float32 | Category::Float64) => InstructionSet::Avx,
        (Tier::V512, Category::Integer) => InstructionSet::Avx512Bw,
        (Tier::V512, Category::Float32 | Category::Float64) => InstructionSet::Avx512F,
    }
}

// CPUID leaf 1.
const EDX_SSE: u32 = 1 << 25;
const EDX_SSE2: u32 = 1 << 26;
const ECX_OSXSAVE: u32 = 1 << 27;
const ECX_AVX: u32 = 1 << 28;

// CPUID leaf 7, sub-leaf 0.
const EBX_AVX2: u32 = 1 << 5;
const EBX_AVX512F: u32 = 1 << 16;
const EBX_AVX512BW: u32 = 1 << 30;

// XCR0: XMM | YMM state, then opmask | ZMM_Hi256 | Hi16_ZMM state.
const XCR0_YMM_STATE: u64 = 0x6;
const XCR0_ZMM_STATE: u64 = 0xE0;

/// Immutable set of usable instruction sets.
///
/// A flag is only ever set when the processor reports the instruction group
/// *and*, for 256/512-bit registers, the operating system saves the
/// corresponding register state on context switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities {
    sse: bool,
    sse2: bool,
    avx: bool,
    avx2: bool,
    avx512f: bool,
    avx512bw: bool,
}

impl Capabilities {
    /// A descriptor with every instruction set unsupported.
    pub const fn none() -> Self {
        Self {
            sse: false,
            sse2: false,
            avx: false,
            avx2: false,
            avx512f: false,
            avx512bw: false,
        }
    }

    /// Probe the host. Never fails; unknown platforms report nothing.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            cpuid::probe()
        }

        #[cfg(not(target_arch = "x86_64"))]
        {
            Self::none()
        }
    }

    /// Build a descriptor from raw CPUID and XCR0 register values.
    ///
    /// `leaf1_edx`/`leaf1_ecx` come from CPUID leaf 1, `leaf7_ebx` from leaf 7
    /// sub-leaf 0, and `xcr0` from `xgetbv(0)`. `xcr0` is ignored unless the
    /// OSXSAVE bit is present in `leaf1_ecx`.
    #[cfg_attr(not(target_arch = "x86_64"), allow(dead_code))]
    pub(crate) fn from_registers(leaf1_edx: u32, leaf1_ecx: u32, leaf7_ebx: u32, xcr0: u64) -> Self {
        let osxsave = leaf1_ecx & ECX_OSXSAVE != 0;
        let os_ymm = osxsave && xcr0 & XCR0_YMM_STATE == XCR0_YMM_STATE;
        let os_zmm = os_ymm && xcr0 & XCR0_ZMM_STATE == XCR0_ZMM_STATE;

        Self {
            sse: leaf1_edx & EDX_SSE != 0,
            sse2: leaf1_edx & EDX_SSE2 != 0,
            avx: leaf1_ecx & ECX_AVX != 0 && os_ymm,
            avx2: leaf7_ebx & EBX_AVX2 != 0 && os_ymm,
            avx512f: leaf7_ebx & EBX_AVX512F != 0 && os_zmm,
            avx512bw: leaf7_ebx & EBX_AVX512BW != 0 && os_zmm,
        }
        .normalized()
    }

    /// Clear any flag whose narrower prerequisite is missing.
    fn normalized(mut self) -> Self {
        self.sse2 &= self.sse;
        self.avx &= self.sse2;
        self.avx2 &= self.avx;
        self.avx512f &= self.avx2;
        self.avx512bw &= self.avx512f;
        self
    }

    /// Whether `set` is usable.
    #[inline]
    pub fn supports(&self, set: InstructionSet) -> bool {
        match set {
            InstructionSet::None => true,
            InstructionSet::Sse => self.sse,
            InstructionSet::Sse2 => self.sse2,
            InstructionSet::Avx => self.avx,
            InstructionSet::Avx2 => self.avx2,
            InstructionSet::Avx512F => self.avx512f,
            InstructionSet::Avx512Bw => self.avx512bw,
        }
    }

    /// Whether every lane type of `category` is usable at `tier`.
    pub fn supports_tier(&self, category: Category, tier: Tier) -> bool {
        self.supports(required_instruction_set(
            category,
            category.widest_lane_bits(),
            tier,
        ))
    }

    /// Widest usable instruction set.
    pub fn highest(&self) -> InstructionSet {
        InstructionSet::ALL
            .iter()
            .rev()
            .copied()
            .find(|set| self.supports(*set))
            .unwrap_or(InstructionSet::None)
    }

    /// Copy of this descriptor with every set wider than `max` removed.
    ///
    /// This can only take capabilities away, so the result is always safe to
    /// execute against.
    pub fn limit(self, max: InstructionSet) -> Self {
        Self {
            sse: self.sse && InstructionSet::Sse <= max,
            sse2: self.sse2 && InstructionSet::Sse2 <= max,
            avx: self.avx && InstructionSet::Avx <= max,
            avx2: self.avx2 && InstructionSet::Avx2 <= max,
            avx512f: self.avx512f && InstructionSet::Avx512F <= max,
            avx512bw: self.avx512bw && InstructionSet::Avx512Bw <= max,
        }
    }

    /// Sets usable under both `self` and `other`.
    pub fn intersect(self, other: Self) -> Self {
        Self {
            sse: self.sse && other.sse,
            sse2: self.sse2 && other.sse2,
            avx: self.avx && other.avx,
            avx2: self.avx2 && other.avx2,
            avx512f: self.avx512f && other.avx512f,
            avx512bw: self.avx512bw && other.avx512bw,
        }
    }

    /// Usable sets, narrowest first. Always starts with `None`.
    pub fn supported(&self) -> impl Iterator<Item = InstructionSet> + '_ {
        InstructionSet::ALL
            .iter()
            .copied()
            .filter(move |set| self.supports(*set))
    }
}

#[cfg(target_arch = "x86_64")]
mod cpuid {
    use core::arch::x86_64::{__cpuid, __cpuid_count, _xgetbv};

    use super::{Capabilities, ECX_OSXSAVE};

    pub(super) fn probe() -> Capabilities {
        let max_leaf = __cpuid(0).eax;
        if max_leaf < 1 {
            return Capabilities::none();
        }

        let leaf1 = __cpuid(1);
        let leaf7_ebx = if max_leaf >= 7 {
            __cpuid_count(7, 0).ebx
        } else {
            0
        };
        let xcr0 = if leaf1.ecx & ECX_OSXSAVE != 0 {
            // SAFETY: OSXSAVE means the OS has enabled XGETBV.
            unsafe { read_xcr0() }
        } else {
            0
        };

        Capabilities::from_registers(leaf1.edx, leaf1.ecx, leaf7_ebx, xcr0)
    }

    #[target_feature(enable = "xsave")]
    unsafe fn read_xcr0() -> u64 {
        _xgetbv(0)
    }
}

/// Process-wide descriptor.
static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();

/// Get the host capabilities (detected once, then cached).
///
/// The first call probes the host, applies the ceiling from
/// [`DetectConfig::from_env`], and logs the result.
pub fn capabilities() -> &'static Capabilities {
    CAPABILITIES.get_or_init(|| {
        let detected = Capabilities::detect();
        let config = DetectConfig::from_env();
        let caps = config.apply(detected);
        tracing::info!(
            sse = caps.sse,
            sse2 = caps.sse2,
            avx = caps.avx,
            avx2 = caps.avx2,
            avx512f = caps.avx512f,
            avx512bw = caps.avx512bw,
            highest = %caps.highest(),
            ceiling = ?config.max_instruction_set,
            "vector capabilities detected"
        );
        caps
    })
}
