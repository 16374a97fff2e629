//! core/editor.rs
//!
//! The multi-file editor: an ordered list of open files plus a selection.
//!
//! - The editor owns every `TaggedFile`. Closing a file drops it.
//! - Selection is stored as `FileId`s (stable), not `Vec` indices, so sorting
//!   and inserting don't change what is selected.
//! - Tag edits are broadcast to every selected file, best effort: one file
//!   failing never stops the rest, and each file reports its own result.
//! - `dirty()` / `selection_dirty()` are live scans, never cached.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::error::{Result, TagError};
use super::fields::TagField;
use super::genres::sorted_genres;
use super::guess::Pattern;
use super::library::file_key;
use super::observer::TagObserver;
use super::tagged_file::TaggedFile;
use super::tags::TagCodec;
use super::types::{FileId, SaveOptions};

/// What happened to one file during a broadcast.
#[derive(Debug)]
pub struct FileOutcome<T = ()> {
    pub id: FileId,
    pub path: PathBuf,
    pub result: Result<T>,
}

impl<T> FileOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Keys `sort_files` understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Filename,
    Title,
    Artist,
    Album,
    Year,
    Genre,
    Composer,
    TrackNumber,
    DiscNumber,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "filename" | "file" => Ok(SortKey::Filename),
            "title" => Ok(SortKey::Title),
            "artist" => Ok(SortKey::Artist),
            "album" => Ok(SortKey::Album),
            "year" => Ok(SortKey::Year),
            "genre" => Ok(SortKey::Genre),
            "composer" => Ok(SortKey::Composer),
            "track" | "tracknumber" => Ok(SortKey::TrackNumber),
            "disc" | "discnumber" => Ok(SortKey::DiscNumber),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Filename => "filename",
            SortKey::Title => "title",
            SortKey::Artist => "artist",
            SortKey::Album => "album",
            SortKey::Year => "year",
            SortKey::Genre => "genre",
            SortKey::Composer => "composer",
            SortKey::TrackNumber => "track",
            SortKey::DiscNumber => "disc",
        };
        f.write_str(s)
    }
}

struct Entry {
    id: FileId,
    /// Resolved path, for duplicate detection.
    key: PathBuf,
    file: TaggedFile,
}

pub struct Editor {
    codec: Arc<dyn TagCodec>,
    entries: Vec<Entry>,
    selection: BTreeSet<FileId>,
    next_id: u64,
    observers: Vec<Arc<dyn TagObserver>>,
    custom_tag: Option<String>,
}

impl Editor {
    pub fn new(codec: Arc<dyn TagCodec>) -> Self {
        Self {
            codec,
            entries: Vec::new(),
            selection: BTreeSet::new(),
            next_id: 1,
            observers: Vec::new(),
            custom_tag: None,
        }
    }

    /// Key the `custom` field maps to, for open files and files added later.
    pub fn set_custom_tag(&mut self, tag: &str) {
        self.custom_tag = Some(tag.to_string());
        for e in &mut self.entries {
            e.file.set_tag_alias(TagField::Custom.key(), tag);
        }
    }

    /// Register an observer on every open file and every file added later.
    pub fn add_observer(&mut self, observer: Arc<dyn TagObserver>) {
        for e in &mut self.entries {
            e.file.add_observer(observer.clone());
        }
        self.observers.push(observer);
    }

    // -------------------------
    // File collection
    // -------------------------

    pub fn add_file(&mut self, path: impl AsRef<Path>) -> bool {
        let end = self.entries.len();
        self.add_file_at(path, end)
    }

    /// Parse and insert at `index` (clamped to the end).
    /// Returns false, changing nothing, for a path already open or a file that fails to parse.
    pub fn add_file_at(&mut self, path: impl AsRef<Path>, index: usize) -> bool {
        match self.try_add_file_at(path, index) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    /// Like `add_file_at`, but says why a file was not added.
    ///
    /// A file reached through a different path (symlink, `..`) counts as already open.
    pub fn try_add_file_at(&mut self, path: impl AsRef<Path>, index: usize) -> Result<FileId> {
        let path = path.as_ref();
        let key = file_key(path);

        if self.entries.iter().any(|e| e.key == key) {
            return Err(TagError::AlreadyOpen(path.to_path_buf()));
        }

        let mut file = TaggedFile::parse(path, self.codec.clone())?;

        if let Some(tag) = &self.custom_tag {
            file.set_tag_alias(TagField::Custom.key(), tag);
        }
        for o in &self.observers {
            file.add_observer(o.clone());
        }

        let id = FileId(self.next_id);
        self.next_id += 1;

        let index = index.min(self.entries.len());
        self.entries.insert(index, Entry { id, key, file });
        log::debug!("opened {} as {id}", path.display());
        Ok(id)
    }

    /// Add several paths; returns how many were accepted.
    pub fn add_files<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) -> usize {
        paths.into_iter().filter(|p| self.add_file(p)).count()
    }

    pub fn count_of_files(&self) -> usize {
        self.entries.len()
    }

    pub fn file_at(&self, index: usize) -> Option<&TaggedFile> {
        self.entries.get(index).map(|e| &e.file)
    }

    pub fn file_at_mut(&mut self, index: usize) -> Option<&mut TaggedFile> {
        self.entries.get_mut(index).map(|e| &mut e.file)
    }

    pub fn id_at(&self, index: usize) -> Option<FileId> {
        self.entries.get(index).map(|e| e.id)
    }

    pub fn index_of(&self, id: FileId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn file(&self, id: FileId) -> Option<&TaggedFile> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.file)
    }

    pub fn file_mut(&mut self, id: FileId) -> Option<&mut TaggedFile> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.file)
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &TaggedFile)> {
        self.entries.iter().map(|e| (e.id, &e.file))
    }

    // -------------------------
    // Selection
    // -------------------------

    /// Replace the selection. Unknown ids are ignored.
    pub fn select(&mut self, ids: impl IntoIterator<Item = FileId>) {
        self.selection = ids
            .into_iter()
            .filter(|id| self.index_of(*id).is_some())
            .collect();
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        match self.id_at(index) {
            Some(id) => {
                self.select([id]);
                true
            }
            None => false,
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.entries.iter().map(|e| e.id).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Move a single selection one file down. Stays put on the last file.
    pub fn select_next(&mut self) {
        let next = match self.last_selected_index() {
            Some(i) => (i + 1).min(self.entries.len().saturating_sub(1)),
            None => 0,
        };
        self.select_index(next);
    }

    /// Move a single selection one file up. Stays put on the first file.
    pub fn select_previous(&mut self) {
        let prev = match self.first_selected_index() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.select_index(prev);
    }

    fn first_selected_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| self.selection.contains(&e.id))
    }

    fn last_selected_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|e| self.selection.contains(&e.id))
    }

    pub fn is_selected(&self, id: FileId) -> bool {
        self.selection.contains(&id)
    }

    pub fn count_of_selected_files(&self) -> usize {
        self.selection.len()
    }

    /// Selected ids, in file order.
    pub fn selected_ids(&self) -> Vec<FileId> {
        self.selected_files().map(|(id, _)| id).collect()
    }

    pub fn selected_files(&self) -> impl Iterator<Item = (FileId, &TaggedFile)> {
        self.entries
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .map(|e| (e.id, &e.file))
    }

    // -------------------------
    // Broadcast edits
    // -------------------------

    fn for_each_selected<T>(
        &mut self,
        mut f: impl FnMut(&mut TaggedFile) -> Result<T>,
    ) -> Vec<FileOutcome<T>> {
        let selection = &self.selection;
        self.entries
            .iter_mut()
            .filter(|e| selection.contains(&e.id))
            .map(|e| {
                let result = f(&mut e.file);
                if let Err(err) = &result {
                    log::debug!("{}: {err}", e.file.display_name());
                }
                FileOutcome {
                    id: e.id,
                    path: e.file.filename().to_path_buf(),
                    result,
                }
            })
            .collect()
    }

    /// Returns the number of files that actually changed.
    pub fn set_value(&mut self, tag: &str, value: &str) -> usize {
        self.count_changed(|f| f.set_value(tag, value))
    }

    /// Like `set_value`, but resolves the key per file (aliases may differ).
    pub fn set_field(&mut self, field: TagField, value: &str) -> usize {
        self.count_changed(|f| f.set_field(field, value))
    }

    pub fn add_value(&mut self, tag: &str, value: &str) -> usize {
        self.count_changed(|f| f.add_value(tag, value))
    }

    fn count_changed(&mut self, mut f: impl FnMut(&mut TaggedFile) -> bool) -> usize {
        self.for_each_selected(|file| Ok(f(file)))
            .into_iter()
            .filter(|o| matches!(o.result, Ok(true)))
            .count()
    }

    pub fn update_tag(&mut self, tag: &str, current_value: &str, new_value: &str) -> Vec<FileOutcome> {
        self.for_each_selected(|f| f.update_tag(tag, current_value, new_value))
    }

    pub fn rename_tag(&mut self, current_tag: &str, current_value: &str, new_tag: &str) -> Vec<FileOutcome> {
        self.for_each_selected(|f| f.rename_tag(current_tag, current_value, new_tag))
    }

    pub fn remove_tag(&mut self, tag: &str, value: &str) -> Vec<FileOutcome> {
        self.for_each_selected(|f| f.remove_tag(tag, value))
    }

    /// Guess per selected file. Each file is all-or-nothing on its own;
    /// an invalid pattern fails up front without touching any file.
    pub fn guess_tags_using_pattern(
        &mut self,
        pattern: &str,
    ) -> Result<Vec<FileOutcome<Vec<(TagField, String)>>>> {
        let pattern = Pattern::parse(pattern)?;
        Ok(self.for_each_selected(|f| f.guess_tags(&pattern)))
    }

    // -------------------------
    // Dirty state
    // -------------------------

    pub fn dirty(&self) -> bool {
        self.entries.iter().any(|e| e.file.dirty())
    }

    pub fn selection_dirty(&self) -> bool {
        self.selected_files().any(|(_, f)| f.dirty())
    }

    /// Safe to quit without losing edits.
    pub fn can_terminate(&self) -> bool {
        !self.dirty()
    }

    // -------------------------
    // Save / revert / close
    // -------------------------

    /// Save every dirty selected file.
    pub fn save_selected(&mut self) -> Vec<FileOutcome> {
        self.for_each_selected(|f| if f.dirty() { f.save() } else { Ok(()) })
    }

    /// Save every dirty file, selected or not. Clean files are skipped.
    pub fn save_all(&mut self) -> Vec<FileOutcome> {
        self.entries
            .iter_mut()
            .filter(|e| e.file.dirty())
            .map(|e| FileOutcome {
                id: e.id,
                path: e.file.filename().to_path_buf(),
                result: e.file.save(),
            })
            .collect()
    }

    pub fn revert_selected(&mut self) -> Vec<FileOutcome> {
        self.for_each_selected(|f| f.revert())
    }

    /// Save one file by id (the path automation and UI both use).
    pub fn save_file(&mut self, id: FileId) -> Option<Result<()>> {
        self.file_mut(id).map(|f| f.save())
    }

    /// Close a file, saving it first when asked.
    /// A failed save keeps the file open and returns the error.
    /// Returns Ok(false) for an unknown id.
    pub fn close_file(&mut self, id: FileId, options: SaveOptions) -> Result<bool> {
        let Some(index) = self.index_of(id) else {
            return Ok(false);
        };

        if options == SaveOptions::Yes && self.entries[index].file.dirty() {
            self.entries[index].file.save()?;
        }

        let entry = self.entries.remove(index);
        self.selection.remove(&id);
        log::debug!("closed {}", entry.file.filename().display());
        Ok(true)
    }

    // -------------------------
    // Ordering
    // -------------------------

    /// Stable sort: files comparing equal keep their previous order.
    pub fn sort_files(&mut self, key: SortKey) {
        self.entries.sort_by(|a, b| compare_files(&a.file, &b.file, key));
    }

    pub fn genres(&self) -> Vec<&'static str> {
        sorted_genres()
    }
}

fn missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn text_key(s: Option<&str>) -> Option<String> {
    s.map(str::to_lowercase)
}

fn compare_files(a: &TaggedFile, b: &TaggedFile, key: SortKey) -> Ordering {
    match key {
        SortKey::Filename => missing_last(
            text_key(a.filename().to_str()),
            text_key(b.filename().to_str()),
        ),
        SortKey::Title => missing_last(text_key(a.title()), text_key(b.title())),
        SortKey::Artist => missing_last(text_key(a.artist()), text_key(b.artist())),
        SortKey::Album => missing_last(text_key(a.album()), text_key(b.album())),
        SortKey::Genre => missing_last(text_key(a.genre()), text_key(b.genre())),
        SortKey::Composer => missing_last(text_key(a.composer()), text_key(b.composer())),
        SortKey::Year => missing_last(a.year(), b.year()),
        SortKey::TrackNumber => missing_last(a.track_number(), b.track_number()),
        SortKey::DiscNumber => missing_last(a.disc_number(), b.disc_number()),
    }
}
