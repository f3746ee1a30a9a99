//! Directory listing for video files and season subfolders.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::rename_engine::SeasonFolder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_file: bool,
    /// Lower-cased, without the dot. Empty when there is none.
    pub extension: String,
}

/// Lists a folder, sorted by name so plans come out the same on every run.
pub fn read_entries(folder: &Path) -> Result<Vec<DirectoryEntry>> {
    let mut entries: Vec<DirectoryEntry> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            let is_file = entry.file_type().map(|ft| ft.is_file()).unwrap_or(false);
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            DirectoryEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
                is_file,
                extension,
            }
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Video files directly inside `folder`.
pub fn list_video_files(folder: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let files: Vec<PathBuf> = read_entries(folder)?
        .into_iter()
        .filter(|entry| entry.is_file && config.is_video_extension(&entry.extension))
        .map(|entry| entry.path)
        .collect();

    debug!(folder = %folder.display(), count = files.len(), "listed video files");
    Ok(files)
}

/// Immediate subfolders of `parent` that contain video files.
pub fn discover_season_folders(parent: &Path, config: &Config) -> Result<Vec<SeasonFolder>> {
    let mut folders = Vec::new();

    for entry in read_entries(parent)? {
        if entry.is_file || !entry.path.is_dir() {
            continue;
        }
        let files = list_video_files(&entry.path, config)?;
        if files.is_empty() {
            debug!(folder = %entry.name, "no videos, ignoring subfolder");
            continue;
        }
        folders.push(SeasonFolder::new(entry.path, files));
    }

    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_list_video_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.MKV"));
        touch(&dir.path().join("a.mp4"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("noext"));
        fs::create_dir(dir.path().join("c.mkv")).unwrap();

        let files = list_video_files(dir.path(), &Config::default()).unwrap();
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect();
        assert_eq!(names, vec!["a.mp4", "b.MKV"]);
    }

    #[test]
    fn test_read_entries_lowercases_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Movie.M4V"));

        let entries = read_entries(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].extension, "m4v");
        assert!(entries[0].is_file);
    }

    #[test]
    fn test_discover_season_folders_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        for season in ["Season 2", "Season 1", "Extras"] {
            fs::create_dir(dir.path().join(season)).unwrap();
        }
        touch(&dir.path().join("Season 1").join("e01.mkv"));
        touch(&dir.path().join("Season 2").join("e01.mkv"));
        touch(&dir.path().join("Extras").join("cover.jpg"));

        let folders = discover_season_folders(dir.path(), &Config::default()).unwrap();
        let labels: Vec<_> = folders.iter().map(SeasonFolder::label).collect();
        assert_eq!(labels, vec!["Season 1", "Season 2"]);
    }

    #[test]
    fn test_missing_folder_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_entries(&dir.path().join("gone")).is_err());
    }
}
