// driveupload/src/upload/resolve.rs
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Result of looking up a code's local folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderLookup {
    Found { path: PathBuf, file_count: usize },
    NotFound,
}

/// Maps a folder code to a local directory.
pub trait FolderResolver {
    fn resolve(&self, code: &str) -> FolderLookup;
}

/// Looks codes up as direct subdirectories of a base folder.
#[derive(Debug, Clone)]
pub struct LocalFolderResolver {
    base_folder: PathBuf,
}

impl LocalFolderResolver {
    pub fn new(base_folder: impl Into<PathBuf>) -> Self {
        LocalFolderResolver {
            base_folder: base_folder.into(),
        }
    }
}

impl FolderResolver for LocalFolderResolver {
    fn resolve(&self, code: &str) -> FolderLookup {
        if !is_single_folder_name(code) {
            log::warn!("Code {:?} is not a plain folder name, treating it as not found", code);
            return FolderLookup::NotFound;
        }
        let path = self.base_folder.join(code);
        if !path.is_dir() {
            return FolderLookup::NotFound;
        }
        let file_count = count_files(&path);
        FolderLookup::Found { path, file_count }
    }
}

/// A code must name a direct child of the base folder: no separators, `..` or roots.
fn is_single_folder_name(code: &str) -> bool {
    let mut components = Path::new(code).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == code
    )
}

/// Counts files anywhere below `dir`. Directories are not counted; symlinks
/// are counted as files without being followed.
///
/// Entries that can't be read are logged and left out of the count.
pub fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    for entry in WalkDir::new(dir) {
        match entry {
            Ok(entry) if !entry.file_type().is_dir() => count += 1,
            Ok(_) => {}
            Err(e) => log::warn!("Skipping unreadable entry under {}: {}", dir.display(), e),
        }
    }
    count
}
