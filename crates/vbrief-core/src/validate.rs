//! Conformance rules for vBRIEF v0.5 documents.
//!
//! Validation walks the generic JSON tree, never mutates it and never fails:
//! every nonconformity becomes one issue in the returned report. Checks on a
//! single object are cumulative; only an unusable container (missing or
//! non-object `plan`, non-object `vBRIEFInfo`, non-array `items`/`subItems`,
//! non-object item) stops descent into that branch.

use serde_json::{Map, Value};

use crate::errors::{IssueCode, ValidationReport};
use crate::policy::{
    SUPPORTED_VERSION, Status, is_hierarchical_id, is_plan_ref, sorted_status_names,
};

const REQUIRED_PLAN_FIELDS: [&str; 3] = ["title", "status", "items"];
const REQUIRED_ITEM_FIELDS: [&str; 2] = ["title", "status"];

/// Validate a generic document value and return structured issues.
pub fn validate_document(document: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(root) = document.as_object() else {
        report.add_error(
            IssueCode::InvalidDocumentType,
            "$",
            "Document must be an object/dictionary",
        );
        return report;
    };

    validate_root(root, &mut report);
    report
}

fn validate_root(root: &Map<String, Value>, report: &mut ValidationReport) {
    match root.get("vBRIEFInfo") {
        None => report.add_error(
            IssueCode::MissingRootField,
            "vBRIEFInfo",
            "Missing required root field: vBRIEFInfo",
        ),
        Some(Value::Object(info)) => validate_version(info, report),
        Some(_) => report.add_error(
            IssueCode::InvalidRootFieldType,
            "vBRIEFInfo",
            "vBRIEFInfo must be an object",
        ),
    }

    match root.get("plan") {
        None => report.add_error(
            IssueCode::MissingRootField,
            "plan",
            "Missing required root field: plan",
        ),
        Some(Value::Object(plan)) => validate_plan(plan, report),
        Some(_) => report.add_error(
            IssueCode::InvalidRootFieldType,
            "plan",
            "plan must be an object",
        ),
    }
}

fn validate_version(info: &Map<String, Value>, report: &mut ValidationReport) {
    let version = info.get("version");
    if version.and_then(Value::as_str) != Some(SUPPORTED_VERSION) {
        report.add_error(
            IssueCode::InvalidVersion,
            "vBRIEFInfo.version",
            format!(
                "Expected version '{SUPPORTED_VERSION}', got {}",
                describe(version)
            ),
        );
    }
}

fn validate_plan(plan: &Map<String, Value>, report: &mut ValidationReport) {
    for field in REQUIRED_PLAN_FIELDS {
        if !plan.contains_key(field) {
            report.add_error(
                IssueCode::MissingPlanField,
                format!("plan.{field}"),
                format!("Missing required plan field: {field}"),
            );
        }
    }

    if let Some(status) = present(plan, "status")
        && !is_valid_status(status)
    {
        report.add_error(
            IssueCode::InvalidPlanStatus,
            "plan.status",
            format!(
                "Invalid plan status {}; expected one of {}",
                describe(Some(status)),
                allowed_statuses()
            ),
        );
    }

    if let Some(id) = present(plan, "id")
        && !is_valid_id(id)
    {
        report.add_error(
            IssueCode::InvalidIdFormat,
            "plan.id",
            "plan.id must match hierarchical ID pattern",
        );
    }

    match plan.get("items") {
        // Absence was reported above.
        None => {}
        Some(Value::Null) => report.add_warning(
            IssueCode::InvalidPlanFieldType,
            "plan.items",
            "plan.items is null; treated as an empty array",
        ),
        Some(Value::Array(items)) => validate_items(items, "plan.items", report),
        Some(_) => report.add_error(
            IssueCode::InvalidPlanFieldType,
            "plan.items",
            "plan.items must be an array",
        ),
    }
}

fn validate_items(items: &[Value], path: &str, report: &mut ValidationReport) {
    for (idx, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{idx}]");

        let Some(item) = item.as_object() else {
            report.add_error(
                IssueCode::InvalidItemType,
                item_path,
                "Plan item must be an object",
            );
            continue;
        };

        validate_item(item, &item_path, report);
    }
}

fn validate_item(item: &Map<String, Value>, item_path: &str, report: &mut ValidationReport) {
    for field in REQUIRED_ITEM_FIELDS {
        if !item.contains_key(field) {
            report.add_error(
                IssueCode::MissingItemField,
                format!("{item_path}.{field}"),
                format!("Missing required item field: {field}"),
            );
        }
    }

    if let Some(status) = present(item, "status")
        && !is_valid_status(status)
    {
        report.add_error(
            IssueCode::InvalidItemStatus,
            format!("{item_path}.status"),
            format!(
                "Invalid item status {}; expected one of {}",
                describe(Some(status)),
                allowed_statuses()
            ),
        );
    }

    if let Some(id) = present(item, "id")
        && !is_valid_id(id)
    {
        report.add_error(
            IssueCode::InvalidIdFormat,
            format!("{item_path}.id"),
            "item id must match hierarchical ID pattern",
        );
    }

    if let Some(plan_ref) = present(item, "planRef")
        && !plan_ref.as_str().is_some_and(is_plan_ref)
    {
        report.add_error(
            IssueCode::InvalidPlanref,
            format!("{item_path}.planRef"),
            "planRef must match #..., file://..., or https://...",
        );
    }

    match present(item, "subItems") {
        None => {}
        Some(Value::Array(sub_items)) => {
            validate_items(sub_items, &format!("{item_path}.subItems"), report);
        }
        Some(_) => report.add_error(
            IssueCode::InvalidSubitemsType,
            format!("{item_path}.subItems"),
            "subItems must be an array",
        ),
    }
}

/// Field value when present and not null.
fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|value| !value.is_null())
}

fn is_valid_status(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|status| status.parse::<Status>().is_ok())
}

fn is_valid_id(value: &Value) -> bool {
    value.as_str().is_some_and(is_hierarchical_id)
}

fn allowed_statuses() -> String {
    format!("[{}]", sorted_status_names().join(", "))
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "nothing".to_string(),
        Some(value) => value.to_string(),
    }
}
