//! Core data types shared between the tag store, the editor and the codec.
//!
//! Rule of thumb:
//! - These structs should be "boring bags of data"
//! - No filesystem code
//! - No tag parsing code
//!
//! `Tag` represents ONE (key, value) metadata entry of one audio file.

use std::fmt;

/// One metadata entry.
///
/// Keys are canonical names like `TITLE` or `TRACKNUMBER`, independent of
/// whatever the on-disk format calls them. A file may hold the same key more
/// than once (think several comment lines).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Stable identity for a file inside an `Editor`.
///
/// Positions change when files are inserted or sorted; ids don't. Selection is
/// keyed by id for that reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a change-count update should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A mutation happened.
    Done,
    /// A mutation was undone.
    Undone,
    /// State now matches disk (after parse, save or revert).
    Cleared,
}

/// What to do with unsaved edits when a file is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOptions {
    Yes,
    No,
}
