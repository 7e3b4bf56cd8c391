use std::path::Path;

use serde_json::{Value, json};
use vbrief_core::{IssueCode, IssueSeverity, load_file, validate};

fn codes(issues: &[vbrief_core::Issue]) -> Vec<IssueCode> {
    issues.iter().map(|issue| issue.code()).collect()
}

fn paths(issues: &[vbrief_core::Issue]) -> Vec<&str> {
    issues.iter().map(|issue| issue.path()).collect()
}

#[test]
fn minimal_document_has_no_errors() {
    let doc = json!({
        "vBRIEFInfo": {"version": "0.5"},
        "plan": {
            "title": "Daily",
            "status": "running",
            "items": [{"title": "Task", "status": "pending"}],
        },
    });

    let report = validate(&doc);

    assert!(report.is_valid());
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn minimal_fixture_validates_strictly() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/minimal.vbrief.json");

    let document = load_file(&path, true).expect("minimal fixture should validate");
    let report = validate(&document);

    assert!(report.errors.is_empty(), "structural errors found");
    assert!(report.warnings.is_empty(), "unexpected warnings");
}

#[test]
fn empty_object_reports_both_root_fields() {
    let report = validate(&json!({}));

    assert_eq!(
        codes(&report.errors),
        [IssueCode::MissingRootField, IssueCode::MissingRootField]
    );
    assert_eq!(paths(&report.errors), ["vBRIEFInfo", "plan"]);
}

#[test]
fn non_object_document_is_terminal() {
    for doc in [json!([]), json!("plan"), json!(null), json!(5)] {
        let report = validate(&doc);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].code(), IssueCode::InvalidDocumentType);
        assert_eq!(report.errors[0].path(), "$");
    }
}

#[test]
fn plan_and_item_errors_are_reported() {
    let doc = json!({
        "vBRIEFInfo": {"version": "0.4"},
        "plan": {
            "title": "Bad",
            "status": "inProgress",
            "id": "bad id",
            "items": [
                {
                    "title": "x",
                    "status": "inProgress",
                    "id": "bad id",
                    "planRef": "http://example.com/plan.json",
                },
                {"status": "pending"},
            ],
        },
    });

    let report = validate(&doc);

    assert_eq!(
        codes(&report.errors),
        [
            IssueCode::InvalidVersion,
            IssueCode::InvalidPlanStatus,
            IssueCode::InvalidIdFormat,
            IssueCode::InvalidItemStatus,
            IssueCode::InvalidIdFormat,
            IssueCode::InvalidPlanref,
            IssueCode::MissingItemField,
        ]
    );
    assert_eq!(
        paths(&report.errors),
        [
            "vBRIEFInfo.version",
            "plan.status",
            "plan.id",
            "plan.items[0].status",
            "plan.items[0].id",
            "plan.items[0].planRef",
            "plan.items[1].title",
        ]
    );
    assert!(report.errors[0].message().contains("\"0.4\""));
    assert!(report.errors[1].message().contains("approved, blocked, cancelled"));
}

#[test]
fn missing_item_status_is_reported_at_its_path() {
    let doc = json!({
        "vBRIEFInfo": {"version": "0.5"},
        "plan": {"title": "P", "status": "draft", "items": [{"title": "x"}]},
    });

    let report = validate(&doc);

    assert_eq!(codes(&report.errors), [IssueCode::MissingItemField]);
    assert_eq!(paths(&report.errors), ["plan.items[0].status"]);
}

#[test]
fn non_object_info_skips_version_check() {
    let doc = json!({
        "vBRIEFInfo": "0.5",
        "plan": {"title": "P", "status": "draft", "items": []},
    });

    let report = validate(&doc);

    assert_eq!(codes(&report.errors), [IssueCode::InvalidRootFieldType]);
    assert_eq!(paths(&report.errors), ["vBRIEFInfo"]);
}

#[test]
fn missing_version_names_nothing() {
    let doc = json!({
        "vBRIEFInfo": {},
        "plan": {"title": "P", "status": "draft", "items": []},
    });

    let report = validate(&doc);

    assert_eq!(codes(&report.errors), [IssueCode::InvalidVersion]);
    assert!(report.errors[0].message().ends_with("got nothing"));
}

#[test]
fn numeric_version_is_rejected() {
    let doc = json!({
        "vBRIEFInfo": {"version": 0.5},
        "plan": {"title": "P", "status": "draft", "items": []},
    });

    assert_eq!(codes(&validate(&doc).errors), [IssueCode::InvalidVersion]);
}

#[test]
fn non_object_plan_stops_traversal() {
    let doc = json!({"vBRIEFInfo": {"version": "0.5"}, "plan": []});

    let report = validate(&doc);

    assert_eq!(codes(&report.errors), [IssueCode::InvalidRootFieldType]);
    assert_eq!(paths(&report.errors), ["plan"]);
}

#[test]
fn missing_plan_fields_are_each_reported() {
    let doc = json!({"vBRIEFInfo": {"version": "0.5"}, "plan": {}});

    let report = validate(&doc);

    assert_eq!(
        paths(&report.errors),
        ["plan.title", "plan.status", "plan.items"]
    );
    assert!(
        report
            .errors
            .iter()
            .all(|issue| issue.code() == IssueCode::MissingPlanField)
    );
}

#[test]
fn non_array_items_is_a_type_error() {
    let doc = json!({
        "vBRIEFInfo": {"version": "0.5"},
        "plan": {"title": "P", "status": "draft", "items": {"title": "x"}},
    });

    let report = validate(&doc);

    assert_eq!(codes(&report.errors), [IssueCode::InvalidPlanFieldType]);
    assert_eq!(paths(&report.errors), ["plan.items"]);
}

#[test]
fn null_items_warns_without_invalidating() {
    let doc = json!({
        "vBRIEFInfo": {"version": "0.5"},
        "plan": {"title": "P", "status": "draft", "items": null},
    });

    let report = validate(&doc);

    assert!(report.is_valid());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code(), IssueCode::InvalidPlanFieldType);
    assert_eq!(report.warnings[0].severity(), IssueSeverity::Warning);
    assert_eq!(report.warnings[0].path(), "plan.items");
}

#[test]
fn null_status_and_id_are_not_checked() {
    let doc = json!({
        "vBRIEFInfo": {"version": "0.5"},
        "plan": {"title": "P", "status": null, "id": null, "items": [
            {"title": "x", "status": null, "id": null, "planRef": null, "subItems": null}
        ]},
    });

    assert!(validate(&doc).is_valid());
}

#[test]
fn non_string_id_and_plan_ref_are_rejected() {
    let doc = json!({
        "vBRIEFInfo": {"version": "0.5"},
        "plan": {"title": "P", "status": "draft", "id": 7, "items": [
            {"title": "x", "status": "draft", "id": ["a"], "planRef": 3}
        ]},
    });

    let report = validate(&doc);

    assert_eq!(
        paths(&report.errors),
        ["plan.id", "plan.items[0].id", "plan.items[0].planRef"]
    );
}

#[test]
fn accepted_plan_ref_forms() {
    for plan_ref in ["#task.1", "file://plans/other.json", "https://example.com/p.json"] {
        let doc = json!({
            "vBRIEFInfo": {"version": "0.5"},
            "plan": {"title": "P", "status": "draft", "items": [
                {"title": "x", "status": "draft", "planRef": plan_ref}
            ]},
        });
        assert!(validate(&doc).is_valid(), "{plan_ref} should be accepted");
    }
}

#[test]
fn every_status_is_accepted() {
    for status in [
        "draft",
        "proposed",
        "approved",
        "pending",
        "running",
        "completed",
        "blocked",
        "cancelled",
    ] {
        let doc = json!({
            "vBRIEFInfo": {"version": "0.5"},
            "plan": {"title": "P", "status": status, "items": [{"title": "x", "status": status}]},
        });
        assert!(validate(&doc).is_valid(), "{status} should be accepted");
    }
}

#[test]
fn validation_does_not_mutate_input() {
    let doc = json!({
        "vBRIEFInfo": {"version": "1"},
        "plan": {"title": "P", "status": "nope", "items": [1, {"subItems": 3}]},
    });
    let before = doc.clone();

    let _ = validate(&doc);

    assert_eq!(doc, before);
}

#[test]
fn deeply_malformed_documents_never_panic() {
    let wrong_types = [
        json!(null),
        json!(1),
        json!("x"),
        json!([]),
        json!({}),
        json!([{}]),
        json!(true),
    ];

    for info in &wrong_types {
        for plan in &wrong_types {
            for items in &wrong_types {
                let doc = json!({
                    "vBRIEFInfo": info,
                    "plan": {"title": items, "status": items, "id": items, "items": [
                        items,
                        {"title": items, "status": items, "id": items, "planRef": items, "subItems": items},
                    ]},
                    "other": plan,
                });
                let _ = validate(&doc);
            }
        }
        let _ = validate(&Value::Array(vec![info.clone()]));
    }
}
