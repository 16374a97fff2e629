//! core/tagged_file.rs
//!
//! One audio file's tags, held in memory.
//!
//! - `tags` is an ordered list of (key, value); a key may repeat.
//! - Lookup is last-write-wins: `value_for_tag` returns the last occurrence.
//! - Every mutation that actually changes the list bumps the change count and
//!   is bracketed by observer notifications. `dirty()` is "change count != 0";
//!   parse/save/revert reset it.
//! - Typed accessors (`title()`, `set_track_number()`, ...) go through
//!   `tag_for_field`, which is the field table plus per-file aliases.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::{Result, TagError};
use super::fields::TagField;
use super::guess::Pattern;
use super::observer::TagObserver;
use super::tags::{TagCodec, parse_boolish, parse_leading_i32, parse_slash_pair_u32};
use super::types::{ChangeKind, Tag};

pub struct TaggedFile {
    filename: PathBuf,
    display_name: String,
    tags: Vec<Tag>,
    change_count: i32,
    aliases: BTreeMap<String, String>,
    codec: Arc<dyn TagCodec>,
    observers: Vec<Arc<dyn TagObserver>>,
}

impl fmt::Debug for TaggedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedFile")
            .field("filename", &self.filename)
            .field("tags", &self.tags)
            .field("change_count", &self.change_count)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

impl TaggedFile {
    /// Read `path` through `codec`. Fails without producing a file on any
    /// codec error.
    pub fn parse(path: impl Into<PathBuf>, codec: Arc<dyn TagCodec>) -> Result<TaggedFile> {
        let filename = path.into();
        let tags = codec.read_tags(&filename).map_err(|source| TagError::Parse {
            path: filename.clone(),
            source,
        })?;

        let display_name = filename
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.display().to_string());

        log::debug!("parsed {} ({} tags)", filename.display(), tags.len());

        Ok(TaggedFile {
            filename,
            display_name,
            tags,
            change_count: 0,
            aliases: BTreeMap::new(),
            codec,
            observers: Vec::new(),
        })
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The text guess patterns are matched against: file name without extension.
    pub fn guess_name(&self) -> String {
        self.filename
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display_name.clone())
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    // -------------------------
    // Change tracking
    // -------------------------

    pub fn dirty(&self) -> bool {
        self.change_count != 0
    }

    pub fn change_count(&self) -> i32 {
        self.change_count
    }

    pub fn update_change_count(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Done => self.change_count += 1,
            ChangeKind::Undone => self.change_count -= 1,
            ChangeKind::Cleared => self.change_count = 0,
        }
    }

    pub fn add_observer(&mut self, observer: Arc<dyn TagObserver>) {
        self.observers.push(observer);
    }

    pub fn will_change_value_for_tag(&self, tag: &str) {
        for o in &self.observers {
            o.will_change(&self.filename, tag);
        }
    }

    pub fn did_change_value_for_tag(&self, tag: &str) {
        for o in &self.observers {
            o.did_change(&self.filename, tag);
        }
    }

    // -------------------------
    // Generic tag store
    // -------------------------

    pub fn value_for_tag(&self, tag: &str) -> Option<&str> {
        self.tags
            .iter()
            .rev()
            .find(|t| t.key == tag)
            .map(|t| t.value.as_str())
    }

    pub fn values_for_tag(&self, tag: &str) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|t| t.key == tag)
            .map(|t| t.value.as_str())
            .collect()
    }

    /// Make `value` the only value of `tag`. An empty value removes the tag.
    ///
    /// The surviving occurrence keeps the position of the first old one.
    /// Returns whether the store changed.
    pub fn set_value(&mut self, tag: &str, value: &str) -> bool {
        if tag.is_empty() {
            log::warn!("{}: ignoring value for empty tag name", self.display_name);
            return false;
        }

        let count = self.tags.iter().filter(|t| t.key == tag).count();
        let unchanged = if value.is_empty() {
            count == 0
        } else {
            count == 1 && self.value_for_tag(tag) == Some(value)
        };
        if unchanged {
            return false;
        }

        self.will_change_value_for_tag(tag);

        let old = std::mem::take(&mut self.tags);
        let mut placed = value.is_empty();
        for t in old {
            if t.key != tag {
                self.tags.push(t);
            } else if !placed {
                self.tags.push(Tag::new(tag, value));
                placed = true;
            }
        }
        if !placed {
            self.tags.push(Tag::new(tag, value));
        }

        self.did_change_value_for_tag(tag);
        self.update_change_count(ChangeKind::Done);
        log::debug!("{}: set {tag}={value:?}", self.display_name);
        true
    }

    /// Append another occurrence of `tag`. Returns false if ignored.
    pub fn add_value(&mut self, tag: &str, value: &str) -> bool {
        if tag.is_empty() || value.is_empty() {
            log::warn!("{}: ignoring empty tag or value", self.display_name);
            return false;
        }

        self.will_change_value_for_tag(tag);
        self.tags.push(Tag::new(tag, value));
        self.did_change_value_for_tag(tag);
        self.update_change_count(ChangeKind::Done);
        log::debug!("{}: add {tag}={value:?}", self.display_name);
        true
    }

    fn position_of(&self, tag: &str, value: &str) -> Result<usize> {
        self.tags
            .iter()
            .position(|t| t.key == tag && t.value == value)
            .ok_or_else(|| TagError::TagNotFound {
                tag: tag.to_string(),
                value: value.to_string(),
            })
    }

    /// Change the value of the one occurrence matching (tag, current_value).
    /// An empty new value removes that occurrence.
    pub fn update_tag(&mut self, tag: &str, current_value: &str, new_value: &str) -> Result<()> {
        let i = self.position_of(tag, current_value)?;
        if current_value == new_value {
            return Ok(());
        }

        self.will_change_value_for_tag(tag);
        if new_value.is_empty() {
            self.tags.remove(i);
        } else {
            self.tags[i].value = new_value.to_string();
        }
        self.did_change_value_for_tag(tag);
        self.update_change_count(ChangeKind::Done);
        log::debug!(
            "{}: update {tag} {current_value:?} -> {new_value:?}",
            self.display_name
        );
        Ok(())
    }

    /// Change the key of the one occurrence matching (current_tag, current_value).
    pub fn rename_tag(&mut self, current_tag: &str, current_value: &str, new_tag: &str) -> Result<()> {
        if new_tag.is_empty() {
            return Err(TagError::EmptyTagName);
        }
        let i = self.position_of(current_tag, current_value)?;
        if current_tag == new_tag {
            return Ok(());
        }

        self.will_change_value_for_tag(current_tag);
        self.will_change_value_for_tag(new_tag);
        self.tags[i].key = new_tag.to_string();
        self.did_change_value_for_tag(new_tag);
        self.did_change_value_for_tag(current_tag);
        self.update_change_count(ChangeKind::Done);
        log::debug!(
            "{}: rename {current_tag} -> {new_tag} ({current_value:?})",
            self.display_name
        );
        Ok(())
    }

    /// Delete the one occurrence matching (tag, value).
    pub fn remove_tag(&mut self, tag: &str, value: &str) -> Result<()> {
        let i = self.position_of(tag, value)?;

        self.will_change_value_for_tag(tag);
        self.tags.remove(i);
        self.did_change_value_for_tag(tag);
        self.update_change_count(ChangeKind::Done);
        log::debug!("{}: remove {tag}={value:?}", self.display_name);
        Ok(())
    }

    // -------------------------
    // Guessing
    // -------------------------

    pub fn guess_tags_using_pattern(&mut self, pattern: &str) -> Result<Vec<(TagField, String)>> {
        let pattern = Pattern::parse(pattern)?;
        self.guess_tags(&pattern)
    }

    /// All-or-nothing: tags are only touched once the whole name has matched.
    pub fn guess_tags(&mut self, pattern: &Pattern) -> Result<Vec<(TagField, String)>> {
        let captures = pattern.match_name(&self.guess_name())?;
        for (field, value) in &captures {
            self.set_field(*field, value);
        }
        log::debug!(
            "{}: guessed {} tags from {pattern}",
            self.display_name,
            captures.len()
        );
        Ok(captures)
    }

    // -------------------------
    // Disk
    // -------------------------

    /// Write tags through the codec. On failure nothing changes and the file stays dirty.
    pub fn save(&mut self) -> Result<()> {
        self.codec
            .write_tags(&self.filename, &self.tags)
            .map_err(|source| TagError::Save {
                path: self.filename.clone(),
                source,
            })?;

        self.update_change_count(ChangeKind::Cleared);
        log::info!("saved {}", self.filename.display());
        Ok(())
    }

    /// Re-read tags from disk, dropping in-memory edits.
    /// If the read fails the in-memory state is kept.
    pub fn revert(&mut self) -> Result<()> {
        let fresh = self
            .codec
            .read_tags(&self.filename)
            .map_err(|source| TagError::Parse {
                path: self.filename.clone(),
                source,
            })?;

        let touched: BTreeSet<String> = self
            .tags
            .iter()
            .chain(fresh.iter())
            .map(|t| t.key.clone())
            .collect();

        for key in &touched {
            self.will_change_value_for_tag(key);
        }
        self.tags = fresh;
        for key in &touched {
            self.did_change_value_for_tag(key);
        }

        self.update_change_count(ChangeKind::Cleared);
        log::info!("reverted {}", self.filename.display());
        Ok(())
    }

    // -------------------------
    // Field mapping
    // -------------------------

    /// User-facing name for a tag key: the alias if one is set, else the key itself.
    pub fn customize_tag(&self, tag: &str) -> String {
        self.aliases
            .get(tag)
            .cloned()
            .unwrap_or_else(|| tag.to_string())
    }

    pub fn set_tag_alias(&mut self, tag: &str, alias: &str) {
        if alias.is_empty() || alias == tag {
            self.aliases.remove(tag);
        } else {
            self.aliases.insert(tag.to_string(), alias.to_string());
        }
    }

    pub fn tag_for_field(&self, field: TagField) -> String {
        self.customize_tag(field.key())
    }

    /// Every semantic field with the tag key it currently reads from.
    pub fn tag_mapping(&self) -> Vec<(TagField, String)> {
        TagField::ALL
            .iter()
            .map(|f| (*f, self.tag_for_field(*f)))
            .collect()
    }

    pub fn field_value(&self, field: TagField) -> Option<&str> {
        self.value_for_tag(&self.tag_for_field(field))
    }

    pub fn set_field(&mut self, field: TagField, value: &str) -> bool {
        let tag = self.tag_for_field(field);
        self.set_value(&tag, value)
    }

    fn field_u32(&self, field: TagField) -> Option<u32> {
        parse_slash_pair_u32(self.field_value(field)).0
    }

    fn set_field_u32(&mut self, field: TagField, value: Option<u32>) {
        let text = value.map(|n| n.to_string()).unwrap_or_default();
        self.set_field(field, &text);
    }

    // -------------------------
    // Accessors
    // -------------------------

    pub fn title(&self) -> Option<&str> {
        self.field_value(TagField::Title)
    }

    pub fn artist(&self) -> Option<&str> {
        self.field_value(TagField::Artist)
    }

    pub fn album(&self) -> Option<&str> {
        self.field_value(TagField::Album)
    }

    pub fn year(&self) -> Option<i32> {
        self.field_value(TagField::Year).and_then(parse_leading_i32)
    }

    pub fn genre(&self) -> Option<&str> {
        self.field_value(TagField::Genre)
    }

    pub fn composer(&self) -> Option<&str> {
        self.field_value(TagField::Composer)
    }

    pub fn mcn(&self) -> Option<&str> {
        self.field_value(TagField::Mcn)
    }

    pub fn isrc(&self) -> Option<&str> {
        self.field_value(TagField::Isrc)
    }

    pub fn encoder(&self) -> Option<&str> {
        self.field_value(TagField::Encoder)
    }

    pub fn comment(&self) -> Option<&str> {
        self.field_value(TagField::Comment)
    }

    pub fn track_number(&self) -> Option<u32> {
        self.field_u32(TagField::TrackNumber)
    }

    pub fn track_total(&self) -> Option<u32> {
        self.field_u32(TagField::TrackTotal)
    }

    pub fn disc_number(&self) -> Option<u32> {
        self.field_u32(TagField::DiscNumber)
    }

    pub fn disc_total(&self) -> Option<u32> {
        self.field_u32(TagField::DiscTotal)
    }

    pub fn compilation(&self) -> Option<bool> {
        self.field_value(TagField::Compilation).and_then(parse_boolish)
    }

    pub fn custom(&self) -> Option<&str> {
        self.field_value(TagField::Custom)
    }

    // -------------------------
    // Mutators
    // -------------------------

    pub fn set_title(&mut self, value: &str) {
        self.set_field(TagField::Title, value);
    }

    pub fn set_artist(&mut self, value: &str) {
        self.set_field(TagField::Artist, value);
    }

    pub fn set_album(&mut self, value: &str) {
        self.set_field(TagField::Album, value);
    }

    pub fn set_year(&mut self, value: Option<i32>) {
        let text = value.map(|y| y.to_string()).unwrap_or_default();
        self.set_field(TagField::Year, &text);
    }

    pub fn set_genre(&mut self, value: &str) {
        self.set_field(TagField::Genre, value);
    }

    pub fn set_composer(&mut self, value: &str) {
        self.set_field(TagField::Composer, value);
    }

    pub fn set_mcn(&mut self, value: &str) {
        self.set_field(TagField::Mcn, value);
    }

    pub fn set_isrc(&mut self, value: &str) {
        self.set_field(TagField::Isrc, value);
    }

    pub fn set_encoder(&mut self, value: &str) {
        self.set_field(TagField::Encoder, value);
    }

    pub fn set_comment(&mut self, value: &str) {
        self.set_field(TagField::Comment, value);
    }

    pub fn set_track_number(&mut self, value: Option<u32>) {
        self.set_field_u32(TagField::TrackNumber, value);
    }

    pub fn set_track_total(&mut self, value: Option<u32>) {
        self.set_field_u32(TagField::TrackTotal, value);
    }

    pub fn set_disc_number(&mut self, value: Option<u32>) {
        self.set_field_u32(TagField::DiscNumber, value);
    }

    pub fn set_disc_total(&mut self, value: Option<u32>) {
        self.set_field_u32(TagField::DiscTotal, value);
    }

    pub fn set_compilation(&mut self, value: Option<bool>) {
        let text = match value {
            Some(true) => "1",
            Some(false) => "0",
            None => "",
        };
        self.set_field(TagField::Compilation, text);
    }

    pub fn set_custom(&mut self, value: &str) {
        self.set_field(TagField::Custom, value);
    }
}
