//! Finding a datatype's descriptor file by base name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Suffix of icon metadata files stored next to descriptor files.
pub const ICON_SUFFIX: &[u8] = b".info";

/// Looks up descriptor files in a single directory.
///
/// Lookups are not cached; every call reads the directory again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorLocator {
    directory: PathBuf,
}

impl DescriptorLocator {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory searched by this locator.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Find the descriptor file for `base_name`.
    ///
    /// Returns the first entry, in the order the platform enumerates the directory,
    /// whose name starts with `base_name` (ASCII case-insensitive). Icon files
    /// (`*.info`) and directories are never returned.
    ///
    /// A missing or unreadable directory, or an empty `base_name`, yields [`None`].
    pub fn locate(&self, base_name: &str) -> Option<PathBuf> {
        if base_name.is_empty() {
            return None;
        }

        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(error) => {
                debug!(
                    directory = %self.directory.display(),
                    %error,
                    "cannot read descriptor directory"
                );
                return None;
            }
        };

        let base = base_name.as_bytes();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    debug!(
                        directory = %self.directory.display(),
                        %error,
                        "cannot read directory entry"
                    );
                    continue;
                }
            };

            let file_name = entry.file_name();
            let name = file_name.as_encoded_bytes();
            if is_icon_file(name) || !starts_with_ignore_ascii_case(name, base) {
                continue;
            }

            let path = entry.path();
            if path.is_dir() {
                trace!(path = %path.display(), "skipping directory");
                continue;
            }

            trace!(base_name, path = %path.display(), "located descriptor file");
            return Some(path);
        }

        None
    }

    /// Every candidate descriptor file in the directory, in enumeration order.
    ///
    /// Icon files and directories are left out. Unreadable entries are skipped.
    pub fn descriptor_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let Ok(entry) = entry else {
                continue;
            };
            if is_icon_file(entry.file_name().as_encoded_bytes()) {
                continue;
            }

            let path = entry.path();
            if !path.is_dir() {
                files.push(path);
            }
        }
        Ok(files)
    }
}

/// Whether a file name ends in `.info`, ignoring ASCII case.
pub fn is_icon_file(name: &[u8]) -> bool {
    name.len() >= ICON_SUFFIX.len()
        && name[name.len() - ICON_SUFFIX.len()..].eq_ignore_ascii_case(ICON_SUFFIX)
}

fn starts_with_ignore_ascii_case(name: &[u8], prefix: &[u8]) -> bool {
    name.len() >= prefix.len() && name[..prefix.len()].eq_ignore_ascii_case(prefix)
}
