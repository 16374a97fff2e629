//! core/tags/mod.rs
//!
//! On-disk tag IO.
//! Public API:
//! - [`TagCodec`] is the only thing the tag store knows about disk formats.
//! - [`Id3Codec`] implements it for MP3 files via the `id3` crate.
//!
//! Keys crossing this boundary are canonical (`TITLE`, `TRACKNUMBER`, ...);
//! translating them to frame ids is the codec's job.

#[cfg(test)]
mod memory;
mod read;
mod util;
mod write;

use std::path::Path;

use id3::Version;

use super::error::CodecError;
use super::types::Tag;

#[cfg(test)]
pub(crate) use memory::MemoryCodec;
pub(crate) use util::{parse_boolish, parse_leading_i32, parse_slash_pair_u32};

/// Reads and writes the ordered tag list of one file.
pub trait TagCodec: Send + Sync {
    fn read_tags(&self, path: &Path) -> Result<Vec<Tag>, CodecError>;
    fn write_tags(&self, path: &Path, tags: &[Tag]) -> Result<(), CodecError>;
}

/// Canonical keys stored in dedicated ID3 text frames.
/// TRCK/TPOS (number pairs), COMM and the date frame are handled separately.
pub(crate) const TEXT_FRAMES: [(&str, &str); 9] = [
    ("TIT2", "TITLE"),
    ("TPE1", "ARTIST"),
    ("TALB", "ALBUM"),
    ("TCON", "GENRE"),
    ("TCOM", "COMPOSER"),
    ("TSRC", "ISRC"),
    ("TSSE", "ENCODER"),
    ("TCMP", "COMPILATION"),
    ("TIT1", "GROUPING"),
];

/// Separates a key from the counter in TXXX names holding extra values (`GENRE#2`).
pub(crate) const EXTRA_VALUE_MARK: char = '#';

/// `GENRE#2` -> `GENRE`. Descriptions without a numeric suffix are returned as is.
pub(crate) fn base_key(description: &str) -> &str {
    match description.rsplit_once(EXTRA_VALUE_MARK) {
        Some((key, n)) if !key.is_empty() && !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => {
            key
        }
        _ => description,
    }
}

pub(crate) fn key_for_frame(id: &str) -> Option<&'static str> {
    TEXT_FRAMES.iter().find(|(f, _)| *f == id).map(|(_, k)| *k)
}

pub(crate) fn frame_for_key(key: &str) -> Option<&'static str> {
    TEXT_FRAMES.iter().find(|(_, k)| *k == key).map(|(f, _)| *f)
}

/// ID3v2 codec for `.mp3` files.
#[derive(Debug, Clone, Copy)]
pub struct Id3Codec {
    version: Version,
}

impl Id3Codec {
    pub fn new(version: Version) -> Self {
        Self { version }
    }

    pub fn version(&self) -> Version {
        self.version
    }
}

impl Default for Id3Codec {
    fn default() -> Self {
        Self::new(Version::Id3v24)
    }
}

impl TagCodec for Id3Codec {
    fn read_tags(&self, path: &Path) -> Result<Vec<Tag>, CodecError> {
        read::read_tags(path)
    }

    fn write_tags(&self, path: &Path, tags: &[Tag]) -> Result<(), CodecError> {
        write::write_tags(path, tags, self.version)
    }
}
