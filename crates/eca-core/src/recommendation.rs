//! Recommendation output

use crate::algorithm::{CompressionAlgorithm, EncryptionAlgorithm};
use crate::classifier::{Category, Classification};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Name reported when compression is skipped
pub const NO_COMPRESSION: &str = "none";

/// Algorithm recommendation for a single file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Winning cipher
    pub encryption: EncryptionAlgorithm,
    /// Winning codec, `None` when compression is skipped
    #[serde(serialize_with = "serialize_compression")]
    pub compression: Option<CompressionAlgorithm>,
    /// Zstd level, set only when the final compression is zstd
    pub zstd_level: Option<u8>,
    /// Compression judged not worthwhile for already-compressed content
    pub skip_compression: bool,
    /// Score of every candidate, keyed `enc_<name>` / `comp_<name>`
    pub scores: BTreeMap<String, f64>,
    /// Human-readable explanation
    pub reason: String,
    /// Detected MIME type
    pub mime_type: String,
    /// Detected category
    pub category: Category,
}

impl Recommendation {
    /// Compression name, `"none"` when skipped
    pub fn compression_name(&self) -> &'static str {
        self.compression.map_or(NO_COMPRESSION, |c| c.name())
    }

    /// Score for a key such as `enc_aes256gcm`
    pub fn score(&self, key: &str) -> Option<f64> {
        self.scores.get(key).copied()
    }

    /// Score of a cipher candidate
    pub fn encryption_score(&self, algorithm: EncryptionAlgorithm) -> f64 {
        self.score(&algorithm.score_key()).unwrap_or(f64::NEG_INFINITY)
    }

    /// Score of a codec candidate
    pub fn compression_score(&self, algorithm: CompressionAlgorithm) -> f64 {
        self.score(&algorithm.score_key()).unwrap_or(f64::NEG_INFINITY)
    }

    /// Classification the recommendation was based on
    pub fn classification(&self) -> Classification {
        Classification::new(self.mime_type.clone(), self.category)
    }
}

fn serialize_compression<S: Serializer>(
    value: &Option<CompressionAlgorithm>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(value.map_or(NO_COMPRESSION, |c| c.name()))
}
