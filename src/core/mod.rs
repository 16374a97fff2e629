//! core/mod.rs
//!
//! The tag editing engine, with no UI in it:
//! - `TaggedFile`: one file's tags in memory, change tracking, typed accessors
//! - `Editor`: the open files, the selection, and edits broadcast over it
//! - `tags`: the codec boundary to ID3 on disk
//! - `guess`: filename patterns -> tag values
//!
//! Opening files is a two step pipeline:
//!   (A) discover paths -> Vec<PathBuf>   (`scan_paths`)
//!   (B) parse each path -> TaggedFile    (`Editor::add_files`)

pub mod editor;
pub mod error;
pub mod fields;
pub mod genres;
pub mod guess;
pub mod library;
pub mod observer;
pub mod tagged_file;
pub mod tags;
pub mod types;

use std::collections::HashSet;
use std::path::PathBuf;

pub use editor::{Editor, FileOutcome, SortKey};
pub use error::{CodecError, Result, ScanError, TagError};
pub use fields::{TagField, ValueKind};
pub use guess::Pattern;
pub use observer::TagObserver;
pub use tagged_file::TaggedFile;
pub use tags::{Id3Codec, TagCodec};
pub use types::{ChangeKind, FileId, SaveOptions, Tag};

/// Expand command line inputs into MP3 paths.
///
/// - Directories are walked recursively; files are taken as given
/// - De-dupes by resolved path, so overlapping inputs and symlinks open a file once
/// - Sorts paths once, so open order doesn't depend on directory order
pub fn scan_paths(inputs: &[PathBuf]) -> std::result::Result<Vec<PathBuf>, ScanError> {
    let mut seen: HashSet<PathBuf> = HashSet::with_capacity(inputs.len());
    let mut out: Vec<PathBuf> = Vec::new();

    for input in inputs {
        let paths = if input.is_dir() {
            library::scan_mp3s(input)?
        } else if input.is_file() {
            vec![input.clone()]
        } else {
            return Err(ScanError::Missing(input.clone()));
        };

        for path in paths {
            if seen.insert(library::file_key(&path)) {
                out.push(path);
            }
        }
    }

    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_paths_mixes_files_and_dirs_without_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("b.mp3");
        let b = dir.path().join("a.mp3");
        std::fs::write(&a, b"").unwrap();
        std::fs::write(&b, b"").unwrap();

        let got = scan_paths(&[a.clone(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(got, vec![b, a]);

        let err = scan_paths(&[dir.path().join("gone.mp3")]).unwrap_err();
        assert!(matches!(err, ScanError::Missing(_)));
    }

    #[cfg(unix)]
    #[test]
    fn scan_paths_opens_a_linked_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        std::fs::write(&a, b"").unwrap();
        std::os::unix::fs::symlink(&a, dir.path().join("alias.mp3")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let got = scan_paths(&[dir.path().to_path_buf(), a.clone()]).unwrap();
        assert_eq!(got.len(), 1);
    }
}
