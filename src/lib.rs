//! Batch tag editing for MP3 files.
//!
//! - `core`: the tag store, the multi-file editor and the ID3 codec
//! - `config`, `logging`, `cli`: the pieces the `sonora-tags` binary is built from

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
