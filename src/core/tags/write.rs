//! Write canonical `Tag`s back to an MP3 as ID3 frames.
//!
//! Semantics:
//! - The tag list is the full desired state: text frames and comments not in
//!   the list are removed from the file.
//! - Other frames (pictures, lyrics, counters) are left as they are.
//! - A key with several values is one NUL-separated frame on ID3v2.4. ID3v2.3
//!   can't hold that, so there the first value takes the frame and each extra
//!   value gets its own TXXX frame named `KEY#2`, `KEY#3`, ...
//! - A TRACKNUMBER/DISCNUMBER written as "n/t" is split: "t" becomes the
//!   total unless an explicit TRACKTOTAL/DISCTOTAL is present.

use std::path::Path;

use id3::frame::{Comment, ExtendedText};
use id3::{TagLike, Version};

use super::super::error::CodecError;
use super::super::types::Tag;
use super::read::read_id3;
use super::{EXTRA_VALUE_MARK, frame_for_key};

/// Helper: write TRCK/TPOS as "n" or "n/total".
/// A total without a number has no TRCK form, so it goes to TXXX instead.
fn set_slash_pair(
    tag: &mut id3::Tag,
    id: &str,
    total_key: &str,
    n: Option<&str>,
    total: Option<&str>,
) {
    let (n, implied) = match n.map(|n| n.split_once('/')) {
        Some(Some((n, t))) => (Some(n.trim()), Some(t.trim())),
        Some(None) => (n, None),
        None => (None, None),
    };
    if let (Some(explicit), Some(implied)) = (total, implied) {
        if explicit != implied {
            log::warn!("{id}: total {implied:?} in the number ignored, {total_key} is {explicit:?}");
        }
    }
    let n = n.filter(|n| !n.is_empty());
    let total = total.or(implied).filter(|t| !t.is_empty());

    match (n, total) {
        (Some(n), Some(t)) => tag.set_text(id, format!("{n}/{t}")),
        (Some(n), None) => tag.set_text(id, n),
        (None, Some(t)) => {
            let _ = tag.add_frame(ExtendedText {
                description: total_key.to_string(),
                value: t.to_string(),
            });
        }
        (None, None) => {}
    }
}

/// True for ids like "TBPM": plain text frames we don't have a canonical name for.
fn is_text_frame_id(key: &str) -> bool {
    key.len() == 4
        && key.starts_with('T')
        && key != "TXXX"
        && key
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Where the first (or, on v2.4, every) value of a key goes.
enum Slot<'a> {
    Frame(&'a str),
    Extended,
}

fn put_values(tag: &mut id3::Tag, version: Version, key: &str, slot: Slot<'_>, values: &[&str]) {
    let Some((first, rest)) = values.split_first() else {
        return;
    };
    let (head, extra) = match version {
        Version::Id3v24 => (values.join("\0"), &[][..]),
        _ => (first.to_string(), rest),
    };

    match slot {
        Slot::Frame(id) => tag.set_text(id, head),
        Slot::Extended => {
            let _ = tag.add_frame(ExtendedText {
                description: key.to_string(),
                value: head,
            });
        }
    }
    for (i, value) in extra.iter().enumerate() {
        let _ = tag.add_frame(ExtendedText {
            description: format!("{key}{EXTRA_VALUE_MARK}{}", i + 2),
            value: value.to_string(),
        });
    }
}

/// Group values by key, keeping first-seen key order.
fn group_by_key(tags: &[Tag]) -> Vec<(&str, Vec<&str>)> {
    let mut out: Vec<(&str, Vec<&str>)> = Vec::new();
    for t in tags {
        if t.value.is_empty() {
            continue;
        }
        match out.iter_mut().find(|(k, _)| *k == t.key) {
            Some((_, values)) => values.push(t.value.as_str()),
            None => out.push((t.key.as_str(), vec![t.value.as_str()])),
        }
    }
    out
}

/// Write the complete tag list for a single file.
pub fn write_tags(path: &Path, tags: &[Tag], version: Version) -> Result<(), CodecError> {
    // Load existing tag if possible; otherwise start fresh.
    let mut tag = read_id3(path)?.unwrap_or_else(id3::Tag::new);

    // Drop every frame we own; the list below is authoritative.
    let owned: Vec<String> = tag
        .frames()
        .map(|f| f.id())
        .filter(|id| id.starts_with('T') || *id == "COMM")
        .map(str::to_owned)
        .collect();
    for id in owned {
        let _ = tag.remove(&id); // TagLike::remove returns Vec<Frame>; discard it
    }

    let date_frame = match version {
        Version::Id3v24 => "TDRC",
        _ => "TYER",
    };

    let mut track: (Option<&str>, Option<&str>) = (None, None);
    let mut disc: (Option<&str>, Option<&str>) = (None, None);

    for (key, values) in group_by_key(tags) {
        match key {
            "TRACKNUMBER" => track.0 = values.first().copied(),
            "TRACKTOTAL" => track.1 = values.first().copied(),
            "DISCNUMBER" => disc.0 = values.first().copied(),
            "DISCTOTAL" => disc.1 = values.first().copied(),
            "DATE" => put_values(&mut tag, version, key, Slot::Frame(date_frame), &values),
            "COMMENT" => {
                // COMM frames are unique per (lang, description).
                for (i, text) in values.iter().enumerate() {
                    let description = if i == 0 { String::new() } else { i.to_string() };
                    let _ = tag.add_frame(Comment {
                        lang: "eng".to_string(),
                        description,
                        text: text.to_string(),
                    });
                }
            }
            _ => {
                let slot = match frame_for_key(key) {
                    Some(id) => Slot::Frame(id),
                    None if is_text_frame_id(key) => Slot::Frame(key),
                    None => Slot::Extended,
                };
                put_values(&mut tag, version, key, slot, &values);
            }
        }

        if matches!(key, "TRACKNUMBER" | "TRACKTOTAL" | "DISCNUMBER" | "DISCTOTAL")
            && values.len() > 1
        {
            log::warn!(
                "{}: {key} has {} values, only the first is written",
                path.display(),
                values.len()
            );
        }
    }

    set_slash_pair(&mut tag, "TRCK", "TRACKTOTAL", track.0, track.1);
    set_slash_pair(&mut tag, "TPOS", "DISCTOTAL", disc.0, disc.1);

    tag.write_to_path(path, version)
        .map_err(|e| CodecError::Write(format!("write_to_path failed: {e}")))?;

    log::debug!("wrote {} tags to {}", tags.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_frame_ids() {
        assert!(is_text_frame_id("TBPM"));
        assert!(is_text_frame_id("TSO2"));
        assert!(!is_text_frame_id("TXXX"));
        assert!(!is_text_frame_id("TITLE"));
        assert!(!is_text_frame_id("Tbpm"));
    }

    #[test]
    fn grouping_keeps_first_seen_order_and_skips_empty() {
        let tags = vec![
            Tag::new("B", "1"),
            Tag::new("A", "x"),
            Tag::new("B", "2"),
            Tag::new("C", ""),
        ];
        let grouped = group_by_key(&tags);
        assert_eq!(grouped, vec![("B", vec!["1", "2"]), ("A", vec!["x"])]);
    }
}
