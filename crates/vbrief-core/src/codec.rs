//! JSON text <-> object tree conversion.
//!
//! Objects keep insertion order (serde_json `preserve_order`), so the same
//! writer serves both canonical output, where keys are sorted at every level
//! before printing, and preserve-format output, where they are printed as held.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::errors::{FormatError, Result};

/// Parse JSON text, requiring an object at the top level.
pub fn parse_json(text: &str) -> std::result::Result<Map<String, Value>, FormatError> {
    match serde_json::from_str(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(FormatError::NotAnObject),
    }
}

/// Read a UTF-8 file and parse it with [`parse_json`].
pub fn load_json_file(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_json(&content)?)
}

/// Render a document with two-space indentation and a trailing newline.
///
/// `preserve_format` wins over `canonical`: keys are emitted in the order
/// present in `document`. Otherwise `canonical` sorts keys recursively.
pub fn dumps_json(
    document: &Map<String, Value>,
    canonical: bool,
    preserve_format: bool,
) -> Result<String> {
    let mut rendered = if canonical && !preserve_format {
        serde_json::to_string_pretty(&sort_keys(document))?
    } else {
        serde_json::to_string_pretty(document)?
    };
    rendered.push('\n');
    Ok(rendered)
}

/// Serialize with [`dumps_json`] and replace `path` with the result.
pub fn dump_json_file(
    path: &Path,
    document: &Map<String, Value>,
    canonical: bool,
    preserve_format: bool,
) -> Result<()> {
    let output = dumps_json(document, canonical, preserve_format)?;
    write_bytes_atomic(path, output.as_bytes())
}

fn sort_keys(map: &Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|(left, _), (right, _)| left.cmp(right));
    entries
        .into_iter()
        .map(|(key, value)| (key.clone(), sort_value(value)))
        .collect()
}

fn sort_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(sort_keys(map)),
        Value::Array(values) => Value::Array(values.iter().map(sort_value).collect()),
        other => other.clone(),
    }
}

fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path);
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    if let Err(err) = file.write_all(data).and_then(|()| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    drop(file);

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
}
