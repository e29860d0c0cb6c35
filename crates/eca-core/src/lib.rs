//! eca-core: encryption and compression algorithm recommendation
//!
//! This crate picks a cipher, a codec and (for zstd) a level for one file:
//! - Content classification from a byte prefix and the file extension
//! - Weighted scoring of every candidate from category, usage signals and
//!   preferences
//! - Deterministic winner selection and the skip-compression policy
//!
//! No encryption or compression is performed here.

#![warn(missing_docs)]

pub mod algorithm;
pub mod classifier;
pub mod engine;
pub mod recommendation;
pub mod signals;

pub use algorithm::{CompressionAlgorithm, EncryptionAlgorithm};
pub use classifier::{Category, Classification, classify};
pub use engine::{recommend, zstd_level};
pub use recommendation::Recommendation;
pub use signals::{Preferences, Signals, Tradeoff};

use std::io::{self, Seek, SeekFrom};
use tracing::{debug, warn};

/// Core error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required input was not supplied
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for eca-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Recommend algorithms for a file handle.
///
/// `name` supplies the extension used for classification. When
/// `signals.size_bytes` is missing or not positive, the size is taken from
/// the handle's length, falling back to zero if that cannot be determined.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when `source` is `None`.
pub fn recommend_file<R: io::Read + Seek + ?Sized>(
    source: Option<&mut R>,
    name: &str,
    signals: Signals,
    prefs: &Preferences,
) -> Result<Recommendation> {
    let Some(source) = source else {
        return Err(Error::InvalidInput("file source is absent".to_string()));
    };

    let mut signals = signals;
    if !signals.has_size() {
        let derived = match stream_len(source) {
            Ok(len) => i64::try_from(len).unwrap_or(i64::MAX),
            Err(e) => {
                warn!(name, error = %e, "could not determine file size, assuming 0");
                0
            }
        };
        signals.size_bytes = Some(derived);
    }

    if prefs.force_extension_priority {
        debug!(name, "force_extension_priority set; extension mappings already take priority");
    }

    let classification = classify(source, name);
    Ok(recommend(&signals, prefs, &classification))
}

/// Length of a seekable stream, leaving its position unchanged
fn stream_len<S: Seek + ?Sized>(source: &mut S) -> io::Result<u64> {
    let original = source.stream_position()?;
    let len = source.seek(SeekFrom::End(0))?;
    if original != len {
        source.seek(SeekFrom::Start(original))?;
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_absent_source_is_invalid_input() {
        let result = recommend_file::<Cursor<Vec<u8>>>(
            None,
            "file.txt",
            Signals::default(),
            &Preferences::default(),
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_size_derived_from_handle() {
        let mut cursor = Cursor::new(vec![b'a'; 4096]);
        cursor.set_position(10);

        let rec = recommend_file(
            Some(&mut cursor),
            "notes.txt",
            Signals::default().with_size(-3),
            &Preferences::default(),
        )
        .unwrap();

        assert_eq!(cursor.position(), 10);
        assert_eq!(rec.category, Category::Text);
        // 4 KiB is under the small-file mark, so zip and lz4 get their bonus
        assert!((rec.compression_score(CompressionAlgorithm::Zip) - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_size_wins_over_handle() {
        let mut cursor = Cursor::new(vec![b'a'; 16]);
        let rec = recommend_file(
            Some(&mut cursor),
            "notes.txt",
            Signals::default().with_size(600 * 1024 * 1024),
            &Preferences::with_tradeoff(Tradeoff::Ratio),
        )
        .unwrap();

        assert_eq!(rec.compression, Some(CompressionAlgorithm::Zstd));
        assert_eq!(rec.zstd_level, Some(12));
    }

    #[test]
    fn test_stream_len() {
        let mut cursor = Cursor::new(vec![0u8; 100]);
        cursor.set_position(40);
        assert_eq!(stream_len(&mut cursor).unwrap(), 100);
        assert_eq!(cursor.position(), 40);
    }
}
