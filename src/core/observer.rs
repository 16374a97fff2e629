//! Change notifications around tag store mutations.
//!
//! Every mutating call on a `TaggedFile` brackets its change with
//! `will_change` / `did_change` for each affected key, synchronously and in
//! that order. A UI can use the pair to coalesce several field updates into
//! one refresh.

use std::path::Path;

pub trait TagObserver: Send + Sync {
    fn will_change(&self, _file: &Path, _tag: &str) {}
    fn did_change(&self, _file: &Path, _tag: &str) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;
    use std::sync::Mutex;

    use super::TagObserver;

    /// Records every notification as "will:KEY" / "did:KEY".
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub events: Mutex<Vec<String>>,
    }

    impl Recorder {
        pub(crate) fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.events.lock().unwrap())
        }
    }

    impl TagObserver for Recorder {
        fn will_change(&self, _file: &Path, tag: &str) {
            self.events.lock().unwrap().push(format!("will:{tag}"));
        }

        fn did_change(&self, _file: &Path, tag: &str) {
            self.events.lock().unwrap().push(format!("did:{tag}"));
        }
    }
}
