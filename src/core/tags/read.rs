//! core/tags/read.rs
//! Read ID3 frames from an MP3 and flatten them into canonical `Tag`s.
//!
//! - Frame order is kept, so the tag list comes back the way the file stores it.
//! - Multi-valued text frames (NUL-separated, ID3v2.4) become one `Tag` per value.
//! - Frames that aren't text or comments (pictures, play counters, ...) are skipped;
//!   the writer leaves them alone on disk.

use std::path::Path;

use id3::frame::Content;
use id3::{ErrorKind, TagLike};

use super::super::error::CodecError;
use super::super::genres::genre_by_code;
use super::super::library::is_mp3;
use super::super::types::Tag;
use super::{base_key, key_for_frame};

pub fn read_tags(path: &Path) -> Result<Vec<Tag>, CodecError> {
    match read_id3(path)? {
        Some(tag) => Ok(tags_from_id3(&tag)),
        None => Ok(Vec::new()),
    }
}

/// Load the raw ID3 tag. `Ok(None)` means "valid MP3, no tag yet".
pub(super) fn read_id3(path: &Path) -> Result<Option<id3::Tag>, CodecError> {
    if !path.is_file() {
        return Err(CodecError::NotFound(path.to_path_buf()));
    }
    if !is_mp3(path) {
        return Err(CodecError::Format(format!(
            "{}: not an MP3 file",
            path.display()
        )));
    }

    match id3::Tag::read_from_path(path) {
        Ok(tag) => Ok(Some(tag)),
        Err(e) => {
            let description = e.to_string();
            match e.kind {
                ErrorKind::NoTag => Ok(None),
                // Files shorter than an ID3 header can't carry one.
                ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
                ErrorKind::Io(io) => Err(CodecError::Io(io)),
                _ => Err(CodecError::Format(description)),
            }
        }
    }
}

fn tags_from_id3(tag: &id3::Tag) -> Vec<Tag> {
    let has_tdrc = tag.get("TDRC").is_some();
    let mut out = Vec::new();

    for frame in tag.frames() {
        let id = frame.id();

        match frame.content() {
            Content::Text(s) => match id {
                "TRCK" => push_pair(&mut out, s, "TRACKNUMBER", "TRACKTOTAL"),
                "TPOS" => push_pair(&mut out, s, "DISCNUMBER", "DISCTOTAL"),
                "TDRC" => push_values(&mut out, "DATE", s),
                "TYER" if !has_tdrc => push_values(&mut out, "DATE", s),
                "TYER" => {}
                "TCON" => {
                    for v in split_values(s) {
                        let name = genre_by_code(v).unwrap_or(v);
                        out.push(Tag::new("GENRE", name));
                    }
                }
                _ => push_values(&mut out, key_for_frame(id).unwrap_or(id), s),
            },
            Content::ExtendedText(et) => push_values(&mut out, base_key(&et.description), &et.value),
            Content::Comment(c) => {
                if !c.text.is_empty() {
                    out.push(Tag::new("COMMENT", c.text.clone()));
                }
            }
            _ => {}
        }
    }

    out
}

fn split_values(s: &str) -> impl Iterator<Item = &str> {
    s.split('\0').filter(|v| !v.is_empty())
}

fn push_values(out: &mut Vec<Tag>, key: &str, s: &str) {
    for v in split_values(s) {
        out.push(Tag::new(key, v));
    }
}

/// TRCK/TPOS: "n" or "n/total". Kept as text so odd values survive a round trip.
fn push_pair(out: &mut Vec<Tag>, s: &str, number_key: &str, total_key: &str) {
    let mut parts = s.splitn(2, '/');
    let number = parts.next().map(str::trim).unwrap_or_default();
    let total = parts.next().map(str::trim).unwrap_or_default();

    if !number.is_empty() {
        out.push(Tag::new(number_key, number));
    }
    if !total.is_empty() {
        out.push(Tag::new(total_key, total));
    }
}
