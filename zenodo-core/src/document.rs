//! The `.zenodo.json` metadata document.
//!
//! The document is held as a `serde_json::Map` built with the `preserve_order`
//! feature, so top-level keys (and the keys of every nested object) are written
//! back in the order they were read. That keeps rewrites diff-friendly.
//!
//! Writes use the same `.tmp` sibling + rename pattern as every other file the
//! tool persists.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Serializer, Value};

use crate::error::{io_err, MetadataError};

/// Default document file name, relative to the project root.
pub const ZENODO_FILE: &str = ".zenodo.json";

/// Indent width used when writing `.zenodo.json`.
pub const ZENODO_INDENT: usize = 4;

/// An in-memory, order-preserving JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataDocument {
    data: Map<String, Value>,
}

impl MetadataDocument {
    /// An empty document (`{}`).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(data: Map<String, Value>) -> Self {
        Self { data }
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Load a document from `path`.
    ///
    /// Returns [`MetadataError::NotFound`] if absent, [`MetadataError::Parse`]
    /// (with path + line context) if the JSON is malformed and
    /// [`MetadataError::NotAnObject`] if the top level is not an object.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let value: Value =
            serde_json::from_str(&contents).map_err(|source| MetadataError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        match value {
            Value::Object(data) => Ok(Self { data }),
            _ => Err(MetadataError::NotAnObject {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Like [`load`](Self::load), but a missing file yields an empty document.
    pub fn load_or_default(path: &Path) -> Result<Self, MetadataError> {
        match Self::load(path) {
            Err(MetadataError::NotFound { path }) => {
                tracing::warn!(
                    "{} was not found; starting from an empty document",
                    path.display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    /// Render the document as pretty JSON indented by `indent_width` spaces.
    ///
    /// Non-ASCII characters are written literally and the text always ends
    /// with a single `\n`.
    pub fn to_json_string(&self, indent_width: usize) -> Result<String, MetadataError> {
        let indent = vec![b' '; indent_width];
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
        self.data.serialize(&mut ser)?;
        let mut text = String::from_utf8_lossy(&buf).into_owned();
        text.push('\n');
        Ok(text)
    }

    /// Atomically write the document to `path`.
    ///
    /// Write flow: render → `<path>.tmp` sibling → `rename`.
    pub fn save(&self, path: &Path, indent_width: usize) -> Result<(), MetadataError> {
        let text = self.to_json_string(indent_width)?;
        write_atomic(path, &text)
    }

    // -----------------------------------------------------------------------
    // Fields
    // -----------------------------------------------------------------------

    /// Set the `version` field, keeping its position if it already exists.
    pub fn set_version(&mut self, value: impl Into<String>) {
        self.data.insert("version".to_string(), Value::String(value.into()));
    }

    pub fn version(&self) -> Option<&str> {
        self.data.get("version").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Mutable access to the array stored under `field`, creating an empty
    /// array at the end of the document if the key is absent.
    pub fn person_list_mut(&mut self, field: &str) -> Result<&mut Vec<Value>, MetadataError> {
        let value = self
            .data
            .entry(field)
            .or_insert_with(|| Value::Array(Vec::new()));
        match value {
            Value::Array(list) => Ok(list),
            _ => Err(MetadataError::FieldNotArray {
                field: field.to_string(),
            }),
        }
    }
}

/// Write `content` to `<path>.tmp`, then rename it onto `path`.
///
/// An existing `path` is resolved first, so a symlinked document is written
/// through to its target and keeps its permissions. The `.tmp` sibling lives
/// next to the resolved file and is removed if the write does not complete.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), MetadataError> {
    let (target, permissions) = match std::fs::canonicalize(path) {
        Ok(resolved) => {
            let meta = std::fs::metadata(&resolved).map_err(|e| io_err(&resolved, e))?;
            (resolved, Some(meta.permissions()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (path.to_path_buf(), None),
        Err(e) => return Err(io_err(path, e)),
    };

    let mut tmp = target.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;

    let finished = match permissions {
        Some(perms) => std::fs::set_permissions(&tmp, perms).map_err(|e| io_err(&tmp, e)),
        None => Ok(()),
    }
    .and_then(|()| std::fs::rename(&tmp, &target).map_err(|e| io_err(&target, e)));
    if finished.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    finished
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> &'static str {
        r#"{
    "title": "R3BRoot",
    "version": "1.0.0",
    "upload_type": "software",
    "creators": [
        {
            "name": "Müller, Jörg",
            "affiliation": "GSI"
        }
    ],
    "license": "LGPL-3.0-or-later"
}
"#
    }

    #[test]
    fn load_preserves_key_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ZENODO_FILE);
        std::fs::write(&path, sample()).unwrap();

        let doc = MetadataDocument::load(&path).unwrap();
        let keys: Vec<_> = doc.as_map().keys().cloned().collect();
        assert_eq!(
            keys,
            ["title", "version", "upload_type", "creators", "license"]
        );
    }

    #[test]
    fn render_matches_four_space_layout_byte_for_byte() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ZENODO_FILE);
        std::fs::write(&path, sample()).unwrap();

        let doc = MetadataDocument::load(&path).unwrap();
        assert_eq!(doc.to_json_string(ZENODO_INDENT).unwrap(), sample());
    }

    #[test]
    fn non_ascii_is_written_literally() {
        let mut data = Map::new();
        data.insert("title".into(), json!("Ångström – 日本語"));
        let text = MetadataDocument::from_map(data).to_json_string(4).unwrap();
        assert!(text.contains("Ångström – 日本語"), "got: {text}");
        assert!(!text.contains("\\u"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn indent_width_is_honoured() {
        let mut data = Map::new();
        data.insert("a".into(), json!(1));
        let doc = MetadataDocument::from_map(data);
        assert_eq!(doc.to_json_string(2).unwrap(), "{\n  \"a\": 1\n}\n");
        assert_eq!(doc.to_json_string(4).unwrap(), "{\n    \"a\": 1\n}\n");
    }

    #[test]
    fn empty_document_renders_as_braces() {
        assert_eq!(MetadataDocument::new().to_json_string(4).unwrap(), "{}\n");
    }

    #[test]
    fn save_then_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ZENODO_FILE);
        std::fs::write(&path, sample()).unwrap();

        let doc = MetadataDocument::load(&path).unwrap();
        let out = tmp.path().join("copy.json");
        doc.save(&out, ZENODO_INDENT).unwrap();
        let reloaded = MetadataDocument::load(&out).unwrap();

        assert_eq!(reloaded, doc);
        let keys: Vec<_> = reloaded.as_map().keys().collect();
        let original: Vec<_> = doc.as_map().keys().collect();
        assert_eq!(keys, original);
    }

    #[test]
    fn save_cleans_up_tmp_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ZENODO_FILE);
        MetadataDocument::new().save(&path, ZENODO_INDENT).unwrap();
        assert!(path.exists());
        assert!(!tmp.path().join(".zenodo.json.tmp").exists());
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join(ZENODO_FILE);
        let err = MetadataDocument::new().save(&path, 4).unwrap_err();
        assert!(
            matches!(err, MetadataError::NotFound { .. } | MetadataError::Io { .. }),
            "got: {err}"
        );
    }

    #[test]
    fn set_version_overwrites_in_place() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ZENODO_FILE);
        std::fs::write(&path, sample()).unwrap();

        let mut doc = MetadataDocument::load(&path).unwrap();
        doc.set_version("2.3.0");
        assert_eq!(doc.version(), Some("2.3.0"));
        let keys: Vec<_> = doc.as_map().keys().cloned().collect();
        assert_eq!(keys[1], "version", "version must keep its position");
        assert_eq!(doc.get("title"), Some(&json!("R3BRoot")));
    }

    #[test]
    fn set_version_appends_when_absent() {
        let mut data = Map::new();
        data.insert("title".into(), json!("x"));
        let mut doc = MetadataDocument::from_map(data);
        doc.set_version("0.1");
        let keys: Vec<_> = doc.as_map().keys().cloned().collect();
        assert_eq!(keys, ["title", "version"]);
    }

    #[test]
    fn person_list_mut_creates_missing_array() {
        let mut doc = MetadataDocument::new();
        assert!(doc.person_list_mut("creators").unwrap().is_empty());
        assert_eq!(doc.get("creators"), Some(&json!([])));
    }

    #[test]
    fn person_list_mut_rejects_non_array() {
        let mut data = Map::new();
        data.insert("creators".into(), json!("nobody"));
        let mut doc = MetadataDocument::from_map(data);
        let err = doc.person_list_mut("creators").unwrap_err();
        assert!(matches!(err, MetadataError::FieldNotArray { ref field } if field == "creators"));
    }

    #[test]
    #[cfg(unix)]
    fn save_writes_through_symlink() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("real.json");
        std::fs::write(&target, "{}\n").unwrap();
        let link = tmp.path().join(ZENODO_FILE);
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let mut doc = MetadataDocument::load(&link).unwrap();
        doc.set_version("9");
        doc.save(&link, ZENODO_INDENT).unwrap();

        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "{\n    \"version\": \"9\"\n}\n"
        );
        assert!(!tmp.path().join("real.json.tmp").exists());
    }

    #[test]
    #[cfg(unix)]
    fn save_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ZENODO_FILE);
        std::fs::write(&path, "{}\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        let mut doc = MetadataDocument::new();
        doc.set_version("1");
        doc.save(&path, ZENODO_INDENT).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
