//! File-system side of image and audio resolution.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Existence checks used to gate asset resolution.
pub trait AssetFs {
    fn exists(&self, path: &Path) -> bool;
}

/// The local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl AssetFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.try_exists().unwrap_or(false)
    }
}

/// A fixed set of paths that "exist". Directories of listed files exist too.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    paths: HashSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        MemoryFs::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_file(path);
        self
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.paths.insert(ancestor.to_path_buf());
        }
        self.paths.insert(path);
    }
}

impl AssetFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }
}

/// Where item assets come from and where they will be copied to.
#[derive(Clone, Copy)]
pub struct AssetContext<'a> {
    /// Directory holding the exported images and audio (`<data>/contents`).
    pub contents_dir: &'a Path,
    /// Destination the assets are copied into, if any.
    pub dest_dir: Option<&'a Path>,
    pub fs: &'a dyn AssetFs,
}

impl<'a> AssetContext<'a> {
    pub fn new(contents_dir: &'a Path, dest_dir: Option<&'a Path>, fs: &'a dyn AssetFs) -> Self {
        AssetContext { contents_dir, dest_dir, fs }
    }

    pub fn has_contents_dir(&self) -> bool {
        !self.contents_dir.as_os_str().is_empty() && self.fs.exists(self.contents_dir)
    }

    /// Destination dir, if set and non-empty.
    pub fn dest(&self) -> Option<&'a Path> {
        self.dest_dir.filter(|d| !d.as_os_str().is_empty())
    }

    pub fn source_path(&self, filename: &str) -> PathBuf {
        self.contents_dir.join(filename)
    }

    pub fn source_exists(&self, filename: &str) -> bool {
        self.fs.exists(&self.source_path(filename))
    }

    /// Destination path for `filename`, as a `/`-separated string.
    pub fn dest_path(&self, filename: &str) -> Option<String> {
        self.dest().map(|d| path_to_string(&d.join(filename)))
    }
}

pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
