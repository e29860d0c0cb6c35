//! Weighted scoring of cipher and codec candidates
//!
//! Every candidate starts from [`BASE_SCORE`] and collects bonuses from the
//! content category, the usage signals and the caller's tradeoff. Winners are
//! picked by highest score; exact ties go to the candidate listed first in
//! the family's `PRIORITY` order, so output is reproducible.

use crate::algorithm::{CompressionAlgorithm, EncryptionAlgorithm};
use crate::classifier::{Category, Classification};
use crate::recommendation::Recommendation;
use crate::signals::{NormalizedSignals, Preferences, Signals, Tradeoff};
use std::collections::BTreeMap;
use tracing::debug;

/// Starting score of every candidate
pub const BASE_SCORE: f64 = 0.1;

/// Files above this size (MiB) favor XChaCha20 and LZMA2
pub const LARGE_FILE_MB: f64 = 100.0;
/// Files above this size (MiB) favor zstd
pub const MEDIUM_FILE_MB: f64 = 50.0;
/// Files below this size (MiB) favor lz4 and zip
pub const SMALL_FILE_MB: f64 = 10.0;
/// Files above this size (MiB) favor the streaming codecs regardless of content
pub const VERY_LARGE_FILE_MB: f64 = 500.0;

// Encryption weights
const SIV_ATTENTION_WEIGHT: f64 = 2.5;
const SIV_RECENCY_WEIGHT: f64 = 1.2;
const GCM_ATTENTION_WEIGHT: f64 = 0.6;
const GCM_HARDWARE_BONUS: f64 = 2.0;
const GCM_SOFTWARE_BONUS: f64 = 0.6;
const GCM_RECENCY_WEIGHT: f64 = 0.6;
const XCHACHA_LARGE_FILE_BONUS: f64 = 3.0;
const XCHACHA_SPEED_BONUS: f64 = 1.2;
const XCHACHA_ATTENTION_WEIGHT: f64 = 0.8;

// Compression weights
const PRECOMPRESSED_LZ4_BONUS: f64 = 2.0;
const PRECOMPRESSED_PENALTY: f64 = 1.2;
const VERY_LARGE_STREAMING_BONUS: f64 = 1.2;

/// A winning score below this on already-compressed content skips compression
pub const SKIP_SCORE_THRESHOLD: f64 = 0.5;

/// Lowest zstd level
pub const ZSTD_MIN_LEVEL: u8 = 1;
/// Highest zstd level
pub const ZSTD_MAX_LEVEL: u8 = 22;

/// Score one cipher candidate
pub fn encryption_score(
    algorithm: EncryptionAlgorithm,
    signals: &NormalizedSignals,
    prefs: &Preferences,
) -> f64 {
    let mut score = BASE_SCORE;

    match algorithm {
        EncryptionAlgorithm::Aes256GcmSiv => {
            score += signals.attention * SIV_ATTENTION_WEIGHT
                + signals.recency_weight * SIV_RECENCY_WEIGHT;
        }
        EncryptionAlgorithm::Aes256Gcm => {
            let hardware = if prefs.assume_hardware_aes {
                GCM_HARDWARE_BONUS
            } else {
                GCM_SOFTWARE_BONUS
            };
            score += signals.attention * GCM_ATTENTION_WEIGHT + hardware;
            score += signals.recency_weight * GCM_RECENCY_WEIGHT;
        }
        EncryptionAlgorithm::XChaCha20Poly1305 => {
            if signals.size_mb > LARGE_FILE_MB {
                score += XCHACHA_LARGE_FILE_BONUS;
            }
            if prefs.tradeoff == Tradeoff::Speed {
                score += XCHACHA_SPEED_BONUS;
            }
            score += signals.attention * XCHACHA_ATTENTION_WEIGHT;
        }
    }

    score
}

/// Score one codec candidate
pub fn compression_score(
    algorithm: CompressionAlgorithm,
    category: Category,
    signals: &NormalizedSignals,
    tradeoff: Tradeoff,
) -> f64 {
    let mut score = BASE_SCORE;

    if category.is_already_compressed() {
        if algorithm == CompressionAlgorithm::Lz4 {
            score += PRECOMPRESSED_LZ4_BONUS;
        } else {
            score -= PRECOMPRESSED_PENALTY;
        }
    } else {
        score += tradeoff_bonus(algorithm, tradeoff);
        score += size_bonus(algorithm, signals.size_mb);
    }

    if signals.size_mb > VERY_LARGE_FILE_MB
        && matches!(algorithm, CompressionAlgorithm::Zstd | CompressionAlgorithm::Lz4)
    {
        score += VERY_LARGE_STREAMING_BONUS;
    }

    score
}

/// Tradeoff column of the codec table (compressible content only)
const fn tradeoff_bonus(algorithm: CompressionAlgorithm, tradeoff: Tradeoff) -> f64 {
    use CompressionAlgorithm::{Lz4, Lzma2, Zip, Zstd};

    match (algorithm, tradeoff) {
        (Lzma2, Tradeoff::Speed) => 0.6,
        (Lzma2, Tradeoff::Balanced) => 1.6,
        (Lzma2, Tradeoff::Ratio) => 3.0,
        (Zstd, Tradeoff::Speed) => 1.2,
        (Zstd, Tradeoff::Balanced) => 2.0,
        (Zstd, Tradeoff::Ratio) => 2.5,
        (Lz4, Tradeoff::Speed) => 2.2,
        (Lz4, Tradeoff::Balanced) => 1.0,
        (Lz4, Tradeoff::Ratio) => 0.3,
        (Zip, Tradeoff::Speed) => 0.6,
        (Zip, _) => 0.0,
    }
}

/// Size column of the codec table (compressible content only)
fn size_bonus(algorithm: CompressionAlgorithm, size_mb: f64) -> f64 {
    match algorithm {
        CompressionAlgorithm::Lzma2 if size_mb > LARGE_FILE_MB => 1.2,
        CompressionAlgorithm::Zstd if size_mb > MEDIUM_FILE_MB => 1.0,
        CompressionAlgorithm::Lz4 if size_mb < SMALL_FILE_MB => 0.6,
        CompressionAlgorithm::Zip if size_mb < SMALL_FILE_MB => 1.2,
        _ => 0.0,
    }
}

/// Highest score wins; on equal scores the earlier entry wins.
///
/// NaN scores never win. Returns `None` only if every score is NaN.
fn pick_winner<T: Copy>(scored: &[(T, f64)]) -> Option<(T, f64)> {
    let mut best: Option<(T, f64)> = None;

    for &(candidate, score) in scored {
        if score.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }

    best
}

/// Zstd level for a tradeoff and size.
///
/// `balanced` rises to 5 between 50 and 200 MiB and drops back to 3 above
/// that; `ratio` climbs 7 / 9 / 12 at the 200 and 500 MiB marks.
pub fn zstd_level(tradeoff: Tradeoff, size_mb: f64) -> u8 {
    let level: u8 = match tradeoff {
        Tradeoff::Speed => 1,
        Tradeoff::Balanced => {
            if size_mb > 200.0 {
                3
            } else if size_mb > MEDIUM_FILE_MB {
                5
            } else {
                3
            }
        }
        Tradeoff::Ratio => {
            if size_mb > VERY_LARGE_FILE_MB {
                12
            } else if size_mb > 200.0 {
                9
            } else {
                7
            }
        }
    };

    level.clamp(ZSTD_MIN_LEVEL, ZSTD_MAX_LEVEL)
}

/// Whether to drop compression for already-compressed content
fn should_skip_compression(
    category: Category,
    winner: CompressionAlgorithm,
    winning_score: f64,
    tradeoff: Tradeoff,
) -> bool {
    category.is_already_compressed()
        && (winning_score < SKIP_SCORE_THRESHOLD
            || (winner == CompressionAlgorithm::Lz4 && tradeoff != Tradeoff::Ratio))
}

/// Score every candidate and assemble a recommendation.
///
/// Pure function of its inputs. A missing size counts as zero.
pub fn recommend(
    signals: &Signals,
    prefs: &Preferences,
    classification: &Classification,
) -> Recommendation {
    let normalized = signals.normalized();
    let tradeoff = prefs.tradeoff;
    let category = classification.category;
    let mut scores = BTreeMap::new();

    let enc_scores = EncryptionAlgorithm::PRIORITY
        .map(|alg| (alg, encryption_score(alg, &normalized, prefs)));
    for (alg, score) in &enc_scores {
        scores.insert(alg.score_key(), *score);
    }
    let (encryption, enc_score) = pick_winner(&enc_scores)
        .unwrap_or((EncryptionAlgorithm::FALLBACK, f64::NEG_INFINITY));

    let comp_scores = CompressionAlgorithm::PRIORITY
        .map(|alg| (alg, compression_score(alg, category, &normalized, tradeoff)));
    for (alg, score) in &comp_scores {
        scores.insert(alg.score_key(), *score);
    }
    let (comp_winner, comp_score) = pick_winner(&comp_scores)
        .unwrap_or((CompressionAlgorithm::FALLBACK, f64::NEG_INFINITY));

    let skip_compression = should_skip_compression(category, comp_winner, comp_score, tradeoff);

    let (compression, reason) = if skip_compression {
        (
            None,
            format!("file category {category} is likely already compressed; skipping compression"),
        )
    } else {
        (
            Some(comp_winner),
            format!(
                "selected encryption {encryption} (score {enc_score:.2}), compression {comp_winner} (score {comp_score:.2})"
            ),
        )
    };

    let zstd_level = (compression == Some(CompressionAlgorithm::Zstd))
        .then(|| zstd_level(tradeoff, normalized.size_mb));

    debug!(
        %category,
        %tradeoff,
        size_mb = normalized.size_mb,
        %encryption,
        enc_score,
        compression = compression.map_or("none", |c| c.name()),
        comp_score,
        skip_compression,
        ?zstd_level,
        "scored candidates"
    );

    Recommendation {
        encryption,
        compression,
        zstd_level,
        skip_compression,
        scores,
        reason,
        mime_type: classification.mime_type.clone(),
        category,
    }
}
