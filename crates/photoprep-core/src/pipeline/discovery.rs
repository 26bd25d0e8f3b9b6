//! File discovery for finding images in directories.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::format;

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Discover all supported image files at a path.
///
/// If path is a file, returns it if supported. If path is a directory,
/// recursively finds all supported files, sorted by path so batches are
/// deterministic across runs.
pub fn discover(path: &Path) -> Vec<DiscoveredFile> {
    if path.is_file() {
        if format::is_supported(path) {
            if let Ok(meta) = std::fs::metadata(path) {
                return vec![DiscoveredFile {
                    path: path.to_path_buf(),
                    size: meta.len(),
                }];
            }
        }
        return vec![];
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let entry_path = entry.path();
        if entry_path.is_file() && format::is_supported(entry_path) {
            if let Ok(meta) = entry.metadata() {
                files.push(DiscoveredFile {
                    path: entry_path.to_path_buf(),
                    size: meta.len(),
                });
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// Get total size of all discovered files.
pub fn total_size(files: &[DiscoveredFile]) -> u64 {
    files.iter().map(|f| f.size).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_directory_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("c.nef"), b"x").unwrap();

        let files = discover(dir.path());
        let names: Vec<String> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.jpg", "c.nef"]);
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"data").unwrap();

        let files = discover(&path);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size, 4);
    }

    #[test]
    fn test_discover_unsupported_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"data").unwrap();
        assert!(discover(&path).is_empty());
    }

    #[test]
    fn test_total_size() {
        let files = vec![
            DiscoveredFile {
                path: PathBuf::from("a.jpg"),
                size: 100,
            },
            DiscoveredFile {
                path: PathBuf::from("b.jpg"),
                size: 200,
            },
        ];
        assert_eq!(total_size(&files), 300);
    }
}
