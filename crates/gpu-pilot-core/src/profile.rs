use serde::{Deserialize, Serialize};

/// GPU vendor, inferred from the adapter name string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Nvidia,
    Amd,
    Intel,
    Apple,
    Qualcomm,
    Arm,
    Imagination,
    Samsung,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Nvidia => "nvidia",
            Self::Amd => "amd",
            Self::Intel => "intel",
            Self::Apple => "apple",
            Self::Qualcomm => "qualcomm",
            Self::Arm => "arm",
            Self::Imagination => "imagination",
            Self::Samsung => "samsung",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Where the GPU lives: discrete card, phone/tablet SoC, or CPU package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformClass {
    Desktop,
    Mobile,
    Integrated,
}

impl std::fmt::Display for PlatformClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Integrated => "integrated",
        };
        write!(f, "{s}")
    }
}

/// Memory attached to a GPU. Exactly one of `vram` (discrete) or `unified`
/// (shared with the CPU) is populated in a well-formed profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuMemory {
    /// Dedicated VRAM in MB, for discrete GPUs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vram: Option<u32>,
    /// Unified/shared memory in MB, for Apple Silicon, mobile SoCs and iGPUs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified: Option<u32>,
    /// Free-text memory technology label, e.g. "GDDR6X".
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl GpuMemory {
    pub fn vram_mb(mb: u32, kind: impl Into<String>) -> Self {
        Self {
            vram: Some(mb),
            unified: None,
            kind: Some(kind.into()),
        }
    }

    pub fn unified_mb(mb: u32, kind: impl Into<String>) -> Self {
        Self {
            vram: None,
            unified: Some(mb),
            kind: Some(kind.into()),
        }
    }

    /// The usable memory budget in MB, whichever field is populated.
    pub fn budget_mb(&self) -> Option<u32> {
        self.vram.or(self.unified)
    }

    /// Exactly one of vram/unified populated.
    pub fn is_well_formed(&self) -> bool {
        self.vram.is_some() != self.unified.is_some()
    }
}

/// Benchmark-derived performance summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
    /// Coarse capability ranking, 0 (weakest) to 3.
    pub tier: u8,
    /// Mean FPS across benchmark samples; 30 when no samples exist.
    pub fps: u32,
}

/// Resolved description of a GPU: who made it, where it runs, how much
/// memory it has and how fast it is. This is the unit stored per entry in
/// the reference database and returned by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityProfile {
    pub vendor: Vendor,
    pub platform: PlatformClass,
    pub memory: GpuMemory,
    pub performance: Performance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

impl CapabilityProfile {
    /// Memory budget in MB for model selection.
    pub fn budget_mb(&self) -> Option<u32> {
        self.memory.budget_mb()
    }
}
