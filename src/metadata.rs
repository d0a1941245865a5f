//! Class metadata: how many classes the network predicts and what they are
//! called.
//!
//! The engine's own metadata loader returns the class count and a name
//! array; both are copied out immediately so no native pointer outlives the
//! call. The metadata file may also reference a newline-delimited names
//! file (`names = <path>`); when that file is readable it overrides the
//! embedded names. The override is an explicit field here, not process-wide
//! state, and every failure to load it is non-fatal.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::DetectorError;

/// Class count and names for a loaded network.
#[derive(Debug, Clone)]
pub struct Metadata {
    classes: usize,
    names: Vec<String>,
    alt_names: Option<Vec<String>>,
}

impl Metadata {
    /// Load metadata through the engine, then try the external names file.
    pub fn load(path: &Path) -> Result<Self, DetectorError> {
        let mut meta = Self::load_native(path)?;
        meta.alt_names = alt_names_for(path);
        Ok(meta)
    }

    #[cfg(feature = "ffi")]
    fn load_native(path: &Path) -> Result<Self, DetectorError> {
        use std::ffi::CStr;

        let c_path = crate::path_to_cstring(path)?;
        let raw = unsafe { crate::ffi::bindings::get_metadata(c_path.as_ptr()) };
        let classes = raw.classes.max(0) as usize;
        if classes > 0 && raw.names.is_null() {
            return Err(DetectorError::NativeCall("get_metadata returned no names"));
        }
        let names = (0..classes)
            .map(|i| {
                let ptr = unsafe { *raw.names.add(i) };
                if ptr.is_null() {
                    String::new()
                } else {
                    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
                }
            })
            .collect();
        Ok(Self {
            classes,
            names,
            alt_names: None,
        })
    }

    #[cfg(not(feature = "ffi"))]
    fn load_native(_path: &Path) -> Result<Self, DetectorError> {
        Err(DetectorError::FfiDisabled)
    }

    /// Number of classes the network predicts.
    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Resolve a class index to a label, preferring the external name list.
    pub fn label(&self, index: usize) -> &str {
        if let Some(alt) = &self.alt_names {
            if let Some(name) = alt.get(index) {
                return name;
            }
        }
        self.names.get(index).map(String::as_str).unwrap_or("")
    }

    /// Whether an external name list replaced the embedded names.
    pub fn has_alt_names(&self) -> bool {
        self.alt_names.is_some()
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        names: Vec<String>,
        alt_names: Option<Vec<String>>,
    ) -> Self {
        Self {
            classes: names.len(),
            names,
            alt_names,
        }
    }
}

/// Best-effort load of the names file referenced by a metadata file.
fn alt_names_for(meta_path: &Path) -> Option<Vec<String>> {
    let contents = match fs::read_to_string(meta_path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!("could not re-read metadata file {}: {err}", meta_path.display());
            return None;
        }
    };
    let names_path = names_file_path(&contents)?;
    match read_names(&names_path) {
        Ok(names) => Some(names),
        Err(err) => {
            debug!("names file {} not loaded: {err}", names_path.display());
            None
        }
    }
}

/// Find the `names = <path>` entry in a metadata file.
fn names_file_path(contents: &str) -> Option<PathBuf> {
    contents.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("names") {
            let value = value.trim();
            (!value.is_empty()).then(|| PathBuf::from(value))
        } else {
            None
        }
    })
}

/// Read a newline-delimited class-names file, trimming each entry.
fn read_names(path: &Path) -> std::io::Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .trim()
        .lines()
        .map(|line| line.trim().to_owned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn names_entry_is_found_case_insensitively() {
        let contents = "classes = 80\ntrain = train.txt\nNames = data/coco.names\nbackup = backup/";
        assert_eq!(
            names_file_path(contents),
            Some(PathBuf::from("data/coco.names"))
        );
    }

    #[test]
    fn missing_names_entry_yields_none() {
        assert_eq!(names_file_path("classes = 80\ntrain = train.txt"), None);
        assert_eq!(names_file_path("names ="), None);
    }

    #[test]
    fn names_file_entries_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coco.names");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "person\ncar \n motorbike\n").unwrap();

        let names = read_names(&path).unwrap();
        assert_eq!(names, vec!["person", "car", "motorbike"]);
    }

    #[test]
    fn alt_names_take_precedence() {
        let meta = Metadata::from_parts(
            vec!["a".into(), "b".into()],
            Some(vec!["person".into(), "car".into()]),
        );
        assert_eq!(meta.label(0), "person");
        assert_eq!(meta.label(1), "car");
    }

    #[test]
    fn embedded_names_back_fill_short_alt_list() {
        let meta = Metadata::from_parts(
            vec!["a".into(), "b".into()],
            Some(vec!["person".into()]),
        );
        assert_eq!(meta.label(1), "b");
        assert_eq!(meta.label(5), "");
    }
}
