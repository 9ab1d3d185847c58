//! Registry backed by a directory of descriptor files.

use super::{DatatypeRegistry, Pattern, RegistryError};
use crate::descriptor_file::{
    read_descriptor_file, DescriptorFile, DescriptorHeader, DescriptorLocator, FileKind,
};
use crate::model::{DatatypeDescriptor, GroupId};
use datatype_query_iff::ID_FORM;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Number of leading bytes read from a file to classify it.
pub const SAMPLE_SIZE: usize = 64;

/// Base name of the fallback type for text files.
pub const ASCII_BASE_NAME: &str = "ascii";

/// Base name of the fallback type for everything else.
pub const BINARY_BASE_NAME: &str = "binary";

#[derive(Debug, Clone)]
struct RegisteredType {
    file: DescriptorFile,
    pattern: Option<Pattern>,
}

impl RegisteredType {
    fn new(file: DescriptorFile) -> Self {
        let pattern = match file.header.pattern.as_deref() {
            Some(source) if file.header.has_pattern() => match Pattern::parse(source) {
                Ok(pattern) => Some(pattern),
                Err(error) => {
                    warn!(
                        base_name = %file.header.base_name,
                        pattern = source,
                        %error,
                        "ignoring malformed pattern"
                    );
                    None
                }
            },
            _ => None,
        };
        Self { file, pattern }
    }

    fn header(&self) -> &DescriptorHeader {
        &self.file.header
    }

    fn matches(&self, file_name: &str, sample: &[u8]) -> bool {
        let header = self.header();
        let kind_matches = match header.kind() {
            FileKind::Iff => sample.starts_with(&ID_FORM.to_bytes()),
            FileKind::Ascii => looks_like_text(sample),
            FileKind::Binary | FileKind::Misc => true,
        };
        if !kind_matches {
            return false;
        }

        // Without any recognition data the type would claim every file.
        let has_mask = !header.mask.is_empty();
        if !has_mask && self.pattern.is_none() {
            return false;
        }
        if has_mask && !header.mask_matches(sample) {
            return false;
        }
        self.pattern
            .as_ref()
            .map_or(true, |pattern| pattern.matches(file_name))
    }
}

/// A [`DatatypeRegistry`] holding every descriptor file of a directory in memory.
///
/// Types are tried by descending priority, ties broken by base name. Files no
/// type claims fall back to the `ascii` or `binary` system type.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    types: Vec<RegisteredType>,
}

impl DescriptorRegistry {
    /// Load every descriptor file in `directory`.
    ///
    /// Icon files and directories are ignored. Files that cannot be read or decoded
    /// are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DescriptorDirectory`] if the directory cannot be listed.
    pub fn load(directory: &Path) -> Result<Self, RegistryError> {
        let files = DescriptorLocator::new(directory)
            .descriptor_files()
            .map_err(|source| RegistryError::DescriptorDirectory {
                path: directory.to_path_buf(),
                source,
            })?;

        let mut loaded = Vec::with_capacity(files.len());
        for path in files {
            match read_descriptor_file(&path) {
                Ok(file) => {
                    debug!(
                        path = %path.display(),
                        base_name = %file.header.base_name,
                        tools = file.tools.len(),
                        "loaded descriptor"
                    );
                    loaded.push(file);
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping descriptor file");
                }
            }
        }

        Ok(Self::from_descriptor_files(loaded))
    }

    /// Build a registry from already decoded descriptor files.
    pub fn from_descriptor_files(files: Vec<DescriptorFile>) -> Self {
        let mut types: Vec<RegisteredType> = files.into_iter().map(RegisteredType::new).collect();
        types.sort_by(|a, b| {
            b.header()
                .priority
                .cmp(&a.header().priority)
                .then_with(|| a.header().base_name.cmp(&b.header().base_name))
        });
        Self { types }
    }

    /// Number of loaded types, system types included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Headers of all loaded types, in classification order.
    pub fn headers(&self) -> impl Iterator<Item = &DescriptorHeader> {
        self.types.iter().map(RegisteredType::header)
    }

    /// The loaded type with `base_name` (ASCII case-insensitive), with its tool list.
    pub fn find_by_base_name(&self, base_name: &str) -> Option<DatatypeDescriptor> {
        self.types
            .iter()
            .find(|registered| registered.header().base_name.eq_ignore_ascii_case(base_name))
            .map(|registered| registered.file.to_descriptor())
    }

    /// Classify a file from its name and leading bytes.
    ///
    /// Never fails: unclaimed files get the `ascii` or `binary` fallback.
    pub fn classify(&self, file_name: &str, sample: &[u8]) -> DatatypeDescriptor {
        let claimed = self
            .types
            .iter()
            .filter(|registered| !registered.header().is_system())
            .find(|registered| registered.matches(file_name, sample));

        match claimed {
            Some(registered) => {
                trace!(file_name, base_name = %registered.header().base_name, "classified");
                registered.file.to_descriptor()
            }
            None => self.fallback(sample),
        }
    }

    fn fallback(&self, sample: &[u8]) -> DatatypeDescriptor {
        let (base_name, group) = if looks_like_text(sample) {
            (ASCII_BASE_NAME, GroupId::Text)
        } else {
            (BINARY_BASE_NAME, GroupId::System)
        };
        trace!(base_name, "no type claimed the file, using fallback");

        self.types
            .iter()
            .find(|registered| {
                registered.header().is_system()
                    && registered.header().base_name.eq_ignore_ascii_case(base_name)
            })
            .map(|registered| registered.file.to_descriptor())
            .unwrap_or_else(|| DatatypeDescriptor::new(group, base_name, base_name))
    }
}

impl DatatypeRegistry for DescriptorRegistry {
    fn obtain(&self, path: &Path) -> Result<DatatypeDescriptor, RegistryError> {
        let io_error = |source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(path).map_err(io_error)?;
        if !metadata.is_file() {
            return Err(RegistryError::NotAFile(path.to_path_buf()));
        }

        let mut sample = Vec::with_capacity(SAMPLE_SIZE);
        File::open(path)
            .and_then(|file| file.take(SAMPLE_SIZE as u64).read_to_end(&mut sample))
            .map_err(io_error)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        Ok(self.classify(&file_name, &sample))
    }
}

/// Whether a sample looks like text: UTF-8 or ISO-8859-1 without control
/// characters other than common whitespace. An empty sample is not text.
pub fn looks_like_text(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }

    let utf8 = match core::str::from_utf8(sample) {
        Ok(text) => Some(text),
        // The sample may end in the middle of a multi-byte character.
        Err(error) if error.error_len().is_none() => {
            core::str::from_utf8(&sample[..error.valid_up_to()]).ok()
        }
        Err(_) => None,
    };

    match utf8 {
        Some(text) => text.chars().all(|c| !c.is_control() || is_text_control(c)),
        None => sample.iter().all(|&byte| {
            matches!(byte, 0x20..=0x7E | 0xA0..=0xFF) || is_text_control(byte as char)
        }),
    }
}

fn is_text_control(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\x0C' | '\x1B')
}
