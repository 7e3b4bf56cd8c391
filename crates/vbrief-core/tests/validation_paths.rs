use serde_json::json;
use vbrief_core::{IssueCode, validate};

#[test]
fn paths_are_specific_for_nested_items() {
    let doc = json!({
        "vBRIEFInfo": {"version": "0.5"},
        "plan": {
            "title": "Nested",
            "status": "running",
            "items": [
                {
                    "title": "Parent",
                    "status": "pending",
                    "subItems": [{"title": "Child", "status": "bad-status"}],
                }
            ],
        },
    });

    let report = validate(&doc);

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code(), IssueCode::InvalidItemStatus);
    assert_eq!(report.errors[0].path(), "plan.items[0].subItems[0].status");
}

#[test]
fn indices_are_zero_based_at_every_depth() {
    let doc = json!({
        "vBRIEFInfo": {"version": "0.5"},
        "plan": {
            "title": "Deep",
            "status": "running",
            "items": [
                {"title": "a", "status": "pending"},
                {
                    "title": "b",
                    "status": "pending",
                    "subItems": [
                        {"title": "b0", "status": "pending"},
                        {
                            "title": "b1",
                            "status": "pending",
                            "subItems": [7, {"title": "b1-1", "status": "pending", "id": "no spaces"}],
                        },
                    ],
                },
            ],
        },
    });

    let report = validate(&doc);
    let paths: Vec<_> = report.errors.iter().map(|issue| issue.path()).collect();

    assert_eq!(
        paths,
        [
            "plan.items[1].subItems[1].subItems[0]",
            "plan.items[1].subItems[1].subItems[1].id",
        ]
    );
    assert_eq!(report.errors[0].code(), IssueCode::InvalidItemType);
}

#[test]
fn non_array_sub_items_are_not_descended() {
    let doc = json!({
        "vBRIEFInfo": {"version": "0.5"},
        "plan": {
            "title": "P",
            "status": "running",
            "items": [{"title": "a", "status": "pending", "subItems": {"title": 1}}],
        },
    });

    let report = validate(&doc);

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code(), IssueCode::InvalidSubitemsType);
    assert_eq!(report.errors[0].path(), "plan.items[0].subItems");
}
