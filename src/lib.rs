//! Canonical dotted names for TV seasons, multi-season shows and movies.
//!
//! Folder and file names are turned into `Show.Name.s01.e02.ext` or `Movie.Name.ext`.
//! Episode batches are validated (unparsable names, duplicates, gaps) before any
//! rename is planned, and plans never target an existing file.

pub mod config;
pub mod error;
pub mod mover;
pub mod rename_engine;
pub mod scanner;

pub use error::{RenameError, Result};
