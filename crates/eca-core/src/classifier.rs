//! Content classification from a file prefix and its extension

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, warn};

/// Number of leading bytes inspected for content sniffing
pub const SNIFF_LEN: usize = 512;

/// MIME type for content that could not be identified
pub const OCTET_STREAM: &str = "application/octet-stream";

/// MIME type for sniffed plain text
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Substrings marking an archive MIME type
const ARCHIVE_MIME_MARKERS: [&str; 5] = ["zip", "compressed", "x-rar", "7z", "tar"];

/// Extensions forced to the text category regardless of MIME
const TEXT_EXTENSIONS: [&str; 22] = [
    "txt", "md", "csv", "log", "json", "xml", "yaml", "yml", "c", "cc", "cpp", "h", "hpp", "go",
    "java", "js", "ts", "py", "rb", "rs", "sh", "toml",
];

/// Extensions forced to the archive category regardless of MIME
const ARCHIVE_EXTENSIONS: [&str; 1] = ["pdf"];

/// Coarse content category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Human-readable text and source code
    Text,
    /// Still images
    Image,
    /// Audio
    Audio,
    /// Video
    Video,
    /// Archives and other container formats
    Archive,
    /// Anything else
    Binary,
}

impl Category {
    /// Lowercase name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Archive => "archive",
            Self::Binary => "binary",
        }
    }

    /// Media and archive formats carry their own compression
    pub const fn is_already_compressed(&self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Audio | Self::Archive)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Final MIME type (extension mapping wins over sniffed content)
    pub mime_type: String,
    /// Coarse category
    pub category: Category,
}

impl Classification {
    /// Create a classification
    pub fn new(mime_type: impl Into<String>, category: Category) -> Self {
        Self {
            mime_type: mime_type.into(),
            category,
        }
    }

    /// Classification used when the content cannot be read
    pub fn unknown() -> Self {
        Self::new(OCTET_STREAM, Category::Binary)
    }
}

/// Classify a file from its first [`SNIFF_LEN`] bytes and its name.
///
/// The source is read from offset 0 and its position is restored afterwards.
/// Short reads are fine. Any other read failure yields
/// [`Classification::unknown`] instead of an error.
pub fn classify<R: Read + Seek + ?Sized>(source: &mut R, name: &str) -> Classification {
    let prefix = match read_prefix(source, SNIFF_LEN) {
        Ok(prefix) => prefix,
        Err(e) => {
            warn!(name, error = %e, "content prefix unreadable, classifying as binary");
            return Classification::unknown();
        }
    };

    let sniffed = sniff_mime(&prefix);
    let extension = extension_of(name);

    let mime_type = extension
        .as_deref()
        .and_then(|ext| mime_guess::from_ext(ext).first_raw())
        .unwrap_or(sniffed);

    let mut category = category_for_mime(mime_type);
    if let Some(forced) = extension.as_deref().and_then(category_for_extension) {
        category = forced;
    }

    debug!(
        name,
        prefix_len = prefix.len(),
        sniffed,
        mime_type,
        %category,
        "classified content"
    );

    Classification::new(mime_type, category)
}

/// Read up to `limit` bytes from the start of `source`, restoring its position
fn read_prefix<R: Read + Seek + ?Sized>(source: &mut R, limit: usize) -> io::Result<Vec<u8>> {
    let original = source.stream_position()?;
    source.seek(SeekFrom::Start(0))?;

    let mut buffer = Vec::with_capacity(limit);
    let read = (&mut *source).take(limit as u64).read_to_end(&mut buffer);
    let restored = source.seek(SeekFrom::Start(original));

    read?;
    restored?;
    Ok(buffer)
}

/// Sniff a MIME type from leading content bytes.
///
/// Magic-byte signatures come first. Without a match, a prefix free of
/// binary control bytes that decodes as UTF-8 is plain text; everything else,
/// including an empty prefix, is `application/octet-stream`.
pub fn sniff_mime(prefix: &[u8]) -> &'static str {
    if prefix.is_empty() {
        return OCTET_STREAM;
    }

    if let Some(kind) = infer::get(prefix) {
        return kind.mime_type();
    }

    if looks_like_text(prefix) {
        TEXT_PLAIN
    } else {
        OCTET_STREAM
    }
}

fn looks_like_text(prefix: &[u8]) -> bool {
    if prefix.iter().any(|&b| is_binary_byte(b)) {
        return false;
    }

    match std::str::from_utf8(prefix) {
        Ok(_) => true,
        // A multi-byte sequence cut off by the prefix limit is still text
        Err(e) => e.error_len().is_none(),
    }
}

/// Control bytes that never appear in text (tab, newlines, form feed and
/// escape are allowed)
const fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

/// Derive the coarse category from a MIME type
pub fn category_for_mime(mime_type: &str) -> Category {
    let mime = mime_type.to_ascii_lowercase();

    if mime.starts_with("text/") {
        Category::Text
    } else if mime.starts_with("image/") {
        Category::Image
    } else if mime.starts_with("audio/") {
        Category::Audio
    } else if mime.starts_with("video/") {
        Category::Video
    } else if ARCHIVE_MIME_MARKERS.iter().any(|m| mime.contains(m)) {
        Category::Archive
    } else {
        Category::Binary
    }
}

/// Category forced by the extension, if it belongs to the fixed override set
pub fn category_for_extension(extension: &str) -> Option<Category> {
    if TEXT_EXTENSIONS.contains(&extension) {
        Some(Category::Text)
    } else if ARCHIVE_EXTENSIONS.contains(&extension) {
        Some(Category::Archive)
    } else {
        None
    }
}

/// Lowercase extension of the final path component
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}
