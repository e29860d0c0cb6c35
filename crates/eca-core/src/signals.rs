//! Caller-supplied usage signals and preferences

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes per mebibyte, used for every size threshold
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Hours per week, the unit of the recency weight
pub const HOURS_PER_WEEK: f64 = 168.0;

/// Upper bound of the weekly recency weight
pub const MAX_RECENCY_WEIGHT: f64 = 3.0;

/// Speed/ratio preference for algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Tradeoff {
    /// Favor fast codecs
    Speed,
    /// Favor compression ratio
    Ratio,
    /// Middle ground
    #[default]
    Balanced,
}

impl Tradeoff {
    /// Normalize a free-form preference string.
    ///
    /// Anything other than `speed`, `ratio` or `balanced` (after trimming and
    /// lowercasing) becomes [`Tradeoff::Balanced`].
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "speed" => Self::Speed,
            "ratio" => Self::Ratio,
            _ => Self::Balanced,
        }
    }

    /// Lowercase name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Ratio => "ratio",
            Self::Balanced => "balanced",
        }
    }
}

impl From<String> for Tradeoff {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<&str> for Tradeoff {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl fmt::Display for Tradeoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User preferences passed with every recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Speed/ratio tradeoff
    pub tradeoff: Tradeoff,
    /// Assume AES hardware acceleration is available
    pub assume_hardware_aes: bool,
    /// Accepted for compatibility; the extension already always overrides
    /// sniffed content, so this has no effect on classification
    pub force_extension_priority: bool,
}

impl Preferences {
    /// Preferences with the given tradeoff
    pub fn with_tradeoff(tradeoff: Tradeoff) -> Self {
        Self {
            tradeoff,
            ..Self::default()
        }
    }
}

/// Usage signals for a single file
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Signals {
    /// Externally known size; `None` or a non-positive value means unknown
    pub size_bytes: Option<i64>,
    /// Hours since the file was last used
    pub last_used_hours: f64,
    /// Predicted likelihood of near-future access, expected in [0, 1]
    pub attention: f64,
}

impl Signals {
    /// Create signals from raw caller values
    pub fn new(size_bytes: Option<i64>, last_used_hours: f64, attention: f64) -> Self {
        Self {
            size_bytes,
            last_used_hours,
            attention,
        }
    }

    /// Set the known size
    #[must_use]
    pub fn with_size(mut self, size_bytes: i64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    /// Whether a usable size was supplied
    pub fn has_size(&self) -> bool {
        matches!(self.size_bytes, Some(n) if n > 0)
    }

    /// Apply the clamps every scorer relies on
    pub fn normalized(&self) -> NormalizedSignals {
        let size_bytes = self.size_bytes.unwrap_or(0).max(0) as u64;

        let attention = if self.attention.is_nan() {
            0.0
        } else {
            self.attention.clamp(0.0, 1.0)
        };

        let last_used_hours = if self.last_used_hours.is_nan() {
            0.0
        } else {
            self.last_used_hours.max(0.0)
        };

        NormalizedSignals {
            size_bytes,
            size_mb: size_bytes as f64 / BYTES_PER_MB,
            recency_weight: (last_used_hours / HOURS_PER_WEEK).min(MAX_RECENCY_WEIGHT),
            attention,
        }
    }
}

/// Signals after clamping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedSignals {
    /// Size in bytes, never negative
    pub size_bytes: u64,
    /// Size in MiB, unrounded
    pub size_mb: f64,
    /// Weekly recency weight in [0, 3]
    pub recency_weight: f64,
    /// Attention in [0, 1]
    pub attention: f64,
}
