//! Candidate encryption and compression algorithms

use serde::{Deserialize, Serialize};
use std::fmt;

/// AEAD cipher candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionAlgorithm {
    /// AES-256-GCM
    #[serde(rename = "aes256gcm")]
    Aes256Gcm,
    /// AES-256-GCM-SIV (nonce misuse resistant)
    #[serde(rename = "aes256gcmsiv")]
    Aes256GcmSiv,
    /// XChaCha20-Poly1305 (extended nonce)
    #[serde(rename = "xchacha20poly1305")]
    XChaCha20Poly1305,
}

impl EncryptionAlgorithm {
    /// All candidates, highest tie-break priority first
    pub const PRIORITY: [Self; 3] = [Self::Aes256Gcm, Self::Aes256GcmSiv, Self::XChaCha20Poly1305];

    /// Used when no candidate produced a comparable score
    pub const FALLBACK: Self = Self::Aes256Gcm;

    /// Short name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Aes256Gcm => "aes256gcm",
            Self::Aes256GcmSiv => "aes256gcmsiv",
            Self::XChaCha20Poly1305 => "xchacha20poly1305",
        }
    }

    /// Key in the score map
    pub fn score_key(&self) -> String {
        format!("enc_{}", self.name())
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compression codec candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// LZMA2 (xz/7z)
    Lzma2,
    /// Zstandard
    Zstd,
    /// LZ4
    Lz4,
    /// Deflate in a zip container
    Zip,
}

impl CompressionAlgorithm {
    /// All candidates, highest tie-break priority first
    pub const PRIORITY: [Self; 4] = [Self::Lzma2, Self::Zstd, Self::Lz4, Self::Zip];

    /// Used when no candidate produced a comparable score
    pub const FALLBACK: Self = Self::Lz4;

    /// Short name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Lzma2 => "lzma2",
            Self::Zstd => "zstd",
            Self::Lz4 => "lz4",
            Self::Zip => "zip",
        }
    }

    /// Key in the score map
    pub fn score_key(&self) -> String {
        format!("comp_{}", self.name())
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
