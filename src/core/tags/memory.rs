//! In-memory `TagCodec` for tests: no disk, writes can be made to fail.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::super::error::CodecError;
use super::super::types::Tag;
use super::TagCodec;

#[derive(Default)]
pub(crate) struct MemoryCodec {
    files: Mutex<HashMap<PathBuf, Vec<Tag>>>,
    fail_writes: AtomicBool,
}

impl MemoryCodec {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, path: impl Into<PathBuf>, tags: Vec<Tag>) {
        self.files.lock().unwrap().insert(path.into(), tags);
    }

    pub(crate) fn remove(&self, path: &Path) {
        self.files.lock().unwrap().remove(path);
    }

    pub(crate) fn stored(&self, path: &Path) -> Option<Vec<Tag>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub(crate) fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl TagCodec for MemoryCodec {
    fn read_tags(&self, path: &Path) -> Result<Vec<Tag>, CodecError> {
        self.stored(path)
            .ok_or_else(|| CodecError::NotFound(path.to_path_buf()))
    }

    fn write_tags(&self, path: &Path, tags: &[Tag]) -> Result<(), CodecError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CodecError::Write("write denied".to_string()));
        }
        let mut files = self.files.lock().unwrap();
        if !files.contains_key(path) {
            return Err(CodecError::NotFound(path.to_path_buf()));
        }
        files.insert(path.to_path_buf(), tags.to_vec());
        Ok(())
    }
}
