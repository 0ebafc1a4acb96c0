// ============================================================
// FILE LOCATOR
// ============================================================
// Resolve a configured file or directory into an ordered list of CSV files

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::error::{AppError, Result};

/// Accepted file name suffix (case-sensitive)
pub const CSV_EXTENSION: &str = ".csv";

/// Resolves a path into eligible CSV files, once.
///
/// The first successful [`FileLocator::resolve`] freezes the list; later calls
/// return the same slice without touching the filesystem, so schema inference
/// and row streaming always see a single enumeration.
#[derive(Debug)]
pub struct FileLocator {
    root: PathBuf,
    paths: OnceCell<Vec<PathBuf>>,
}

impl FileLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            paths: OnceCell::new(),
        }
    }

    /// Return the cached file list, walking the filesystem on first call
    pub fn resolve(&self) -> Result<&[PathBuf]> {
        self.paths
            .get_or_try_init(|| self.discover())
            .map(|paths| paths.as_slice())
    }

    fn discover(&self) -> Result<Vec<PathBuf>> {
        let metadata = match fs::metadata(&self.root) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AppError::PathNotFound(format!(
                    "File path does not exist {}",
                    self.root.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let paths = if metadata.is_dir() {
            collect_csv_files(&self.root)?
        } else if is_valid_filename(&self.root) {
            vec![self.root.clone()]
        } else {
            Vec::new()
        };

        if paths.is_empty() {
            return Err(AppError::NoEligibleFiles(format!(
                "'{}' has no acceptable files, see warnings for more detail",
                self.root.display()
            )));
        }

        debug!(root = %self.root.display(), files = paths.len(), "Resolved CSV files");
        Ok(paths)
    }
}

/// Depth-first walk: a directory's own files (sorted by name) come before
/// those of its subdirectories (also visited in name order).
fn collect_csv_files(root: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    let mut paths = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        // symlinked files count, symlinked directories are not descended
        let path = entry.path();
        if path.is_file() {
            if is_valid_filename(path) {
                paths.push(path.to_path_buf());
            }
        } else {
            debug!(path = %path.display(), "Skipping non-regular file");
        }
    }
    Ok(paths)
}

fn is_valid_filename(path: &Path) -> bool {
    let valid = path.to_string_lossy().ends_with(CSV_EXTENSION);
    if !valid {
        warn!(
            path = %path.display(),
            "Skipping non-csv file, please provide a CSV file that ends with '.csv'; e.g. 'users.csv'"
        );
    }
    valid
}
