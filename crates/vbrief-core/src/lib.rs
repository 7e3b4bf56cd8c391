//! Document model, JSON codec and conformance validator for vBRIEF v0.5.
//!
//! Documents load as generic JSON objects; the [`VBriefDocument`] model can
//! be built from them, mutated, and written back either canonically (sorted
//! keys) or in the key order of the source, without losing fields the schema
//! does not know about.

pub mod codec;
pub mod errors;
pub mod io;
pub mod model;
pub mod policy;
pub mod validate;

pub use errors::{
    FormatError, Issue, IssueCode, IssueSeverity, Result, VBriefError, ValidationFailure,
    ValidationReport,
};
pub use io::{AsDocument, DumpOptions, dump_file, dumps, load_file, loads, validate};
pub use model::{Plan, PlanItem, VBriefDocument};
pub use policy::{SUPPORTED_VERSION, Status};
pub use validate::validate_document;
