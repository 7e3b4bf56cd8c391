//! High-level load/dump/validate entrypoints.
//!
//! Every entrypoint accepts anything implementing [`AsDocument`]; inputs are
//! normalised to a generic JSON value before the codec or the validator sees
//! them.

use std::borrow::Cow;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::codec::{dump_json_file, dumps_json, load_json_file, parse_json};
use crate::errors::{FormatError, Result, ValidationFailure, ValidationReport};
use crate::model::VBriefDocument;
use crate::validate::validate_document;

/// Serialization mode for [`dumps`] and [`dump_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// Sort keys at every nesting level.
    pub canonical: bool,
    /// Keep source key order; takes precedence over `canonical`.
    pub preserve_format: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            canonical: true,
            preserve_format: false,
        }
    }
}

impl DumpOptions {
    pub fn canonical() -> Self {
        Self::default()
    }

    pub fn preserve() -> Self {
        Self {
            canonical: false,
            preserve_format: true,
        }
    }
}

/// Anything that can project itself to a generic document value.
pub trait AsDocument {
    fn to_document(&self, preserve_order: bool) -> Cow<'_, Value>;
}

impl AsDocument for Value {
    fn to_document(&self, _preserve_order: bool) -> Cow<'_, Value> {
        Cow::Borrowed(self)
    }
}

impl AsDocument for Map<String, Value> {
    fn to_document(&self, _preserve_order: bool) -> Cow<'_, Value> {
        Cow::Owned(Value::Object(self.clone()))
    }
}

impl AsDocument for VBriefDocument {
    fn to_document(&self, preserve_order: bool) -> Cow<'_, Value> {
        Cow::Owned(Value::Object(self.to_map(preserve_order)))
    }
}

impl<T: AsDocument + ?Sized> AsDocument for &T {
    fn to_document(&self, preserve_order: bool) -> Cow<'_, Value> {
        (**self).to_document(preserve_order)
    }
}

/// Load a document from JSON text.
pub fn loads(text: &str, strict: bool) -> Result<Map<String, Value>> {
    let document = parse_json(text)?;
    debug!(keys = document.len(), strict, "document parsed");
    if strict {
        ensure_valid(&document)?;
    }
    Ok(document)
}

/// Load a document from a UTF-8 file.
pub fn load_file(path: impl AsRef<Path>, strict: bool) -> Result<Map<String, Value>> {
    let path = path.as_ref();
    let document = load_json_file(path)?;
    debug!(path = %path.display(), strict, "document loaded");
    if strict {
        ensure_valid(&document)?;
    }
    Ok(document)
}

/// Serialize a document or model to JSON text.
pub fn dumps<D: AsDocument + ?Sized>(document: &D, options: DumpOptions) -> Result<String> {
    let payload = to_payload(document, options)?;
    dumps_json(&payload, options.canonical, options.preserve_format)
}

/// Serialize a document or model to a file.
pub fn dump_file<D: AsDocument + ?Sized>(
    document: &D,
    path: impl AsRef<Path>,
    options: DumpOptions,
) -> Result<()> {
    let path = path.as_ref();
    let payload = to_payload(document, options)?;
    dump_json_file(path, &payload, options.canonical, options.preserve_format)?;
    debug!(
        path = %path.display(),
        canonical = options.canonical,
        preserve_format = options.preserve_format,
        "document written"
    );
    Ok(())
}

/// Validate a document or model. Never fails.
pub fn validate<D: AsDocument + ?Sized>(document: &D) -> ValidationReport {
    let report = validate_document(&document.to_document(false));
    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );
    report
}

fn to_payload<D: AsDocument + ?Sized>(
    document: &D,
    options: DumpOptions,
) -> Result<Map<String, Value>> {
    match document.to_document(options.preserve_format).into_owned() {
        Value::Object(map) => Ok(map),
        _ => Err(FormatError::NotAnObject.into()),
    }
}

fn ensure_valid(document: &Map<String, Value>) -> Result<()> {
    let report = validate(document);
    if report.is_valid() {
        return Ok(());
    }
    warn!(
        errors = report.errors.len(),
        "strict validation rejected document"
    );
    Err(ValidationFailure::new(report).into())
}
