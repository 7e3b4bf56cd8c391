//! Object model for vBRIEF v0.5 documents.
//!
//! Each node keeps its recognised fields in typed slots, everything else in
//! `extras`, and the key sequence it was built from in `field_order`. The
//! order list is only consulted when re-emitting in preserve mode.
//!
//! Nodes are built by a single pass over the source object; nested items
//! recurse through [`PlanItem::from_object`] only.

use std::path::Path;

use serde_json::{Map, Value};

use crate::codec::{dump_json_file, dumps_json, load_json_file, parse_json};
use crate::errors::{Result, VBriefError, ValidationFailure, ValidationReport};
use crate::io::DumpOptions;
use crate::policy::{SUPPORTED_VERSION, Status};
use crate::validate::validate_document;

/// A node in the plan's work tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanItem {
    pub title: Value,
    pub status: Value,
    pub id: Option<Value>,
    pub uid: Option<Value>,
    pub narrative: Option<Value>,
    /// `None` when the source had no `subItems` array.
    pub sub_items: Option<Vec<PlanItem>>,
    pub plan_ref: Option<Value>,
    pub tags: Option<Value>,
    pub metadata: Option<Value>,
    pub created: Option<Value>,
    pub updated: Option<Value>,
    pub completed: Option<Value>,
    pub priority: Option<Value>,
    pub due_date: Option<Value>,
    pub start_date: Option<Value>,
    pub end_date: Option<Value>,
    pub percent_complete: Option<Value>,
    pub participants: Option<Value>,
    pub location: Option<Value>,
    pub uris: Option<Value>,
    pub recurrence: Option<Value>,
    pub reminders: Option<Value>,
    pub classification: Option<Value>,
    pub related_comments: Option<Value>,
    pub timezone: Option<Value>,
    pub sequence: Option<Value>,
    pub last_modified_by: Option<Value>,
    pub locked_by: Option<Value>,
    /// Fields outside the recognised schema, kept verbatim.
    pub extras: Map<String, Value>,
    field_order: Vec<String>,
}

impl Default for PlanItem {
    fn default() -> Self {
        Self {
            title: empty_text(),
            status: empty_text(),
            id: None,
            uid: None,
            narrative: None,
            sub_items: None,
            plan_ref: None,
            tags: None,
            metadata: None,
            created: None,
            updated: None,
            completed: None,
            priority: None,
            due_date: None,
            start_date: None,
            end_date: None,
            percent_complete: None,
            participants: None,
            location: None,
            uris: None,
            recurrence: None,
            reminders: None,
            classification: None,
            related_comments: None,
            timezone: None,
            sequence: None,
            last_modified_by: None,
            locked_by: None,
            extras: Map::new(),
            field_order: Vec::new(),
        }
    }
}

impl PlanItem {
    pub fn new(title: impl Into<String>, status: Status) -> Self {
        Self {
            title: Value::String(title.into()),
            status: Value::String(status.as_str().to_string()),
            ..Self::default()
        }
    }

    /// Build an item from a generic value. Non-objects yield an empty item.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_object(map),
            _ => Self::default(),
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self::from_object(map.clone())
    }

    pub fn from_object(map: Map<String, Value>) -> Self {
        let mut item = Self::default();
        for (key, value) in map {
            item.field_order.push(key.clone());
            if let Some(value) = item.assign(&key, value) {
                item.extras.insert(key, value);
            }
        }
        item
    }

    /// Key sequence captured when the item was built.
    pub fn field_order(&self) -> &[String] {
        &self.field_order
    }

    pub fn add_sub_item(&mut self, item: PlanItem) {
        self.sub_items.get_or_insert_with(Vec::new).push(item);
    }

    /// Store a recognised field; hands the value back when the key is unknown.
    fn assign(&mut self, key: &str, value: Value) -> Option<Value> {
        let slot = match key {
            "title" => {
                self.title = value;
                return None;
            }
            "status" => {
                self.status = value;
                return None;
            }
            "subItems" => {
                self.sub_items = match value {
                    Value::Array(values) => Some(items_from_values(values)),
                    _ => None,
                };
                return None;
            }
            "id" => &mut self.id,
            "uid" => &mut self.uid,
            "narrative" => &mut self.narrative,
            "planRef" => &mut self.plan_ref,
            "tags" => &mut self.tags,
            "metadata" => &mut self.metadata,
            "created" => &mut self.created,
            "updated" => &mut self.updated,
            "completed" => &mut self.completed,
            "priority" => &mut self.priority,
            "dueDate" => &mut self.due_date,
            "startDate" => &mut self.start_date,
            "endDate" => &mut self.end_date,
            "percentComplete" => &mut self.percent_complete,
            "participants" => &mut self.participants,
            "location" => &mut self.location,
            "uris" => &mut self.uris,
            "recurrence" => &mut self.recurrence,
            "reminders" => &mut self.reminders,
            "classification" => &mut self.classification,
            "relatedComments" => &mut self.related_comments,
            "timezone" => &mut self.timezone,
            "sequence" => &mut self.sequence,
            "lastModifiedBy" => &mut self.last_modified_by,
            "lockedBy" => &mut self.locked_by,
            _ => return Some(value),
        };
        *slot = non_null(value);
        None
    }

    pub fn to_map(&self, preserve_order: bool) -> Map<String, Value> {
        let mut known = Map::new();
        known.insert("title".to_string(), self.title.clone());
        known.insert("status".to_string(), self.status.clone());
        insert_present(
            &mut known,
            [
                ("id", &self.id),
                ("uid", &self.uid),
                ("narrative", &self.narrative),
            ],
        );
        if let Some(sub_items) = &self.sub_items {
            known.insert(
                "subItems".to_string(),
                items_to_value(sub_items, preserve_order),
            );
        }
        insert_present(
            &mut known,
            [
                ("planRef", &self.plan_ref),
                ("tags", &self.tags),
                ("metadata", &self.metadata),
                ("created", &self.created),
                ("updated", &self.updated),
                ("completed", &self.completed),
                ("priority", &self.priority),
                ("dueDate", &self.due_date),
                ("startDate", &self.start_date),
                ("endDate", &self.end_date),
                ("percentComplete", &self.percent_complete),
                ("participants", &self.participants),
                ("location", &self.location),
                ("uris", &self.uris),
                ("recurrence", &self.recurrence),
                ("reminders", &self.reminders),
                ("classification", &self.classification),
                ("relatedComments", &self.related_comments),
                ("timezone", &self.timezone),
                ("sequence", &self.sequence),
                ("lastModifiedBy", &self.last_modified_by),
                ("lockedBy", &self.locked_by),
            ],
        );
        merge_values(known, &self.extras, &self.field_order, preserve_order)
    }
}

/// The top-level unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub title: Value,
    pub status: Value,
    pub items: Vec<PlanItem>,
    pub id: Option<Value>,
    pub uid: Option<Value>,
    pub narratives: Option<Value>,
    pub edges: Option<Value>,
    pub tags: Option<Value>,
    pub metadata: Option<Value>,
    pub created: Option<Value>,
    pub updated: Option<Value>,
    pub author: Option<Value>,
    pub reviewers: Option<Value>,
    pub uris: Option<Value>,
    pub references: Option<Value>,
    pub timezone: Option<Value>,
    pub agent: Option<Value>,
    pub last_modified_by: Option<Value>,
    pub change_log: Option<Value>,
    pub sequence: Option<Value>,
    pub fork: Option<Value>,
    pub extras: Map<String, Value>,
    field_order: Vec<String>,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            title: empty_text(),
            status: empty_text(),
            items: Vec::new(),
            id: None,
            uid: None,
            narratives: None,
            edges: None,
            tags: None,
            metadata: None,
            created: None,
            updated: None,
            author: None,
            reviewers: None,
            uris: None,
            references: None,
            timezone: None,
            agent: None,
            last_modified_by: None,
            change_log: None,
            sequence: None,
            fork: None,
            extras: Map::new(),
            field_order: Vec::new(),
        }
    }
}

impl Plan {
    pub fn new(title: impl Into<String>, status: Status) -> Self {
        Self {
            title: Value::String(title.into()),
            status: Value::String(status.as_str().to_string()),
            ..Self::default()
        }
    }

    /// Build a plan from a generic value. Non-objects yield an empty plan.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_object(map),
            _ => Self::default(),
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self::from_object(map.clone())
    }

    pub fn from_object(map: Map<String, Value>) -> Self {
        let mut plan = Self::default();
        for (key, value) in map {
            plan.field_order.push(key.clone());
            if let Some(value) = plan.assign(&key, value) {
                plan.extras.insert(key, value);
            }
        }
        plan
    }

    pub fn field_order(&self) -> &[String] {
        &self.field_order
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = Value::String(status.as_str().to_string());
    }

    pub fn add_item(&mut self, item: PlanItem) {
        self.items.push(item);
    }

    pub fn remove_item(&mut self, index: usize) -> Result<PlanItem> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    pub fn update_item_status(&mut self, index: usize, status: Status) -> Result<()> {
        self.check_index(index)?;
        self.items[index].status = Value::String(status.as_str().to_string());
        Ok(())
    }

    /// Insert or replace a narrative. A non-object `narratives` is replaced.
    pub fn set_narrative(&mut self, key: impl Into<String>, narrative: Value) {
        let narratives = self
            .narratives
            .get_or_insert_with(|| Value::Object(Map::new()));
        if !narratives.is_object() {
            *narratives = Value::Object(Map::new());
        }
        if let Value::Object(map) = narratives {
            map.insert(key.into(), narrative);
        }
    }

    pub fn remove_narrative(&mut self, key: &str) -> Option<Value> {
        match self.narratives.as_mut() {
            Some(Value::Object(map)) => map.shift_remove(key),
            _ => None,
        }
    }

    pub fn to_map(&self, preserve_order: bool) -> Map<String, Value> {
        let mut known = Map::new();
        known.insert("title".to_string(), self.title.clone());
        known.insert("status".to_string(), self.status.clone());
        known.insert(
            "items".to_string(),
            items_to_value(&self.items, preserve_order),
        );
        insert_present(
            &mut known,
            [
                ("id", &self.id),
                ("uid", &self.uid),
                ("narratives", &self.narratives),
                ("edges", &self.edges),
                ("tags", &self.tags),
                ("metadata", &self.metadata),
                ("created", &self.created),
                ("updated", &self.updated),
                ("author", &self.author),
                ("reviewers", &self.reviewers),
                ("uris", &self.uris),
                ("references", &self.references),
                ("timezone", &self.timezone),
                ("agent", &self.agent),
                ("lastModifiedBy", &self.last_modified_by),
                ("changeLog", &self.change_log),
                ("sequence", &self.sequence),
                ("fork", &self.fork),
            ],
        );
        merge_values(known, &self.extras, &self.field_order, preserve_order)
    }

    fn assign(&mut self, key: &str, value: Value) -> Option<Value> {
        let slot = match key {
            "title" => {
                self.title = value;
                return None;
            }
            "status" => {
                self.status = value;
                return None;
            }
            "items" => {
                self.items = match value {
                    Value::Array(values) => items_from_values(values),
                    _ => Vec::new(),
                };
                return None;
            }
            "id" => &mut self.id,
            "uid" => &mut self.uid,
            "narratives" => &mut self.narratives,
            "edges" => &mut self.edges,
            "tags" => &mut self.tags,
            "metadata" => &mut self.metadata,
            "created" => &mut self.created,
            "updated" => &mut self.updated,
            "author" => &mut self.author,
            "reviewers" => &mut self.reviewers,
            "uris" => &mut self.uris,
            "references" => &mut self.references,
            "timezone" => &mut self.timezone,
            "agent" => &mut self.agent,
            "lastModifiedBy" => &mut self.last_modified_by,
            "changeLog" => &mut self.change_log,
            "sequence" => &mut self.sequence,
            "fork" => &mut self.fork,
            _ => return Some(value),
        };
        *slot = non_null(value);
        None
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(VBriefError::InvalidIndex {
                index,
                len: self.items.len(),
            })
        }
    }
}

/// Root vBRIEF document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VBriefDocument {
    pub vbrief_info: Map<String, Value>,
    pub plan: Plan,
    pub extras: Map<String, Value>,
    field_order: Vec<String>,
}

impl VBriefDocument {
    /// New document for the supported format version.
    pub fn new(plan: Plan) -> Self {
        let mut vbrief_info = Map::new();
        vbrief_info.insert(
            "version".to_string(),
            Value::String(SUPPORTED_VERSION.to_string()),
        );
        Self {
            vbrief_info,
            plan,
            ..Self::default()
        }
    }

    /// Build a document from a generic value. Never fails: malformed nodes
    /// fall back to empty defaults and are left for the validator to report.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_object(map),
            _ => Self::default(),
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self::from_object(map.clone())
    }

    pub fn from_object(map: Map<String, Value>) -> Self {
        let mut document = Self::default();
        for (key, value) in map {
            document.field_order.push(key.clone());
            match key.as_str() {
                "vBRIEFInfo" => {
                    document.vbrief_info = match value {
                        Value::Object(info) => info,
                        _ => Map::new(),
                    };
                }
                "plan" => document.plan = Plan::from_value(value),
                _ => {
                    document.extras.insert(key, value);
                }
            }
        }
        document
    }

    pub fn from_json(text: &str, strict: bool) -> Result<Self> {
        let map = parse_json(text)?;
        Self::from_object(map).checked(strict)
    }

    pub fn from_file(path: impl AsRef<Path>, strict: bool) -> Result<Self> {
        let map = load_json_file(path.as_ref())?;
        Self::from_object(map).checked(strict)
    }

    pub fn field_order(&self) -> &[String] {
        &self.field_order
    }

    pub fn to_map(&self, preserve_order: bool) -> Map<String, Value> {
        let mut known = Map::new();
        known.insert(
            "vBRIEFInfo".to_string(),
            Value::Object(self.vbrief_info.clone()),
        );
        known.insert(
            "plan".to_string(),
            Value::Object(self.plan.to_map(preserve_order)),
        );
        merge_values(known, &self.extras, &self.field_order, preserve_order)
    }

    pub fn to_json(&self, options: DumpOptions) -> Result<String> {
        let payload = self.to_map(options.preserve_format);
        dumps_json(&payload, options.canonical, options.preserve_format)
    }

    pub fn to_file(&self, path: impl AsRef<Path>, options: DumpOptions) -> Result<()> {
        let payload = self.to_map(options.preserve_format);
        dump_json_file(
            path.as_ref(),
            &payload,
            options.canonical,
            options.preserve_format,
        )
    }

    pub fn validate(&self) -> ValidationReport {
        validate_document(&Value::Object(self.to_map(false)))
    }

    /// Return the document if it validates without errors.
    pub fn into_valid(self) -> Result<Self> {
        let report = self.validate();
        if report.is_valid() {
            Ok(self)
        } else {
            Err(ValidationFailure::new(report).into())
        }
    }

    fn checked(self, strict: bool) -> Result<Self> {
        if strict { self.into_valid() } else { Ok(self) }
    }
}

fn empty_text() -> Value {
    Value::String(String::new())
}

/// Explicit nulls in optional fields count as absent.
fn non_null(value: Value) -> Option<Value> {
    (!value.is_null()).then_some(value)
}

fn items_from_values(values: Vec<Value>) -> Vec<PlanItem> {
    values
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(map) => Some(PlanItem::from_object(map)),
            _ => None,
        })
        .collect()
}

fn items_to_value(items: &[PlanItem], preserve_order: bool) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| Value::Object(item.to_map(preserve_order)))
            .collect(),
    )
}

fn insert_present<const N: usize>(
    values: &mut Map<String, Value>,
    fields: [(&str, &Option<Value>); N],
) {
    for (key, value) in fields {
        if let Some(value) = value {
            values.insert(key.to_string(), value.clone());
        }
    }
}

/// Combine recognised values with extras.
///
/// Without `preserve_order` recognised fields come first in schema order,
/// then extras. With it, keys follow `field_order`; keys absent from the
/// captured order are appended, recognised fields before extras. Extras never
/// shadow a recognised field.
fn merge_values(
    known: Map<String, Value>,
    extras: &Map<String, Value>,
    field_order: &[String],
    preserve_order: bool,
) -> Map<String, Value> {
    let mut merged = Map::new();

    if preserve_order {
        for key in field_order {
            if merged.contains_key(key) {
                continue;
            }
            if let Some(value) = known.get(key).or_else(|| extras.get(key)) {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    for (key, value) in known {
        if !merged.contains_key(&key) {
            merged.insert(key, value);
        }
    }
    for (key, value) in extras {
        if !merged.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn keys(map: &Map<String, Value>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn merge_follows_captured_order_then_appends_new_keys() {
        let known = json!({"title": "t", "status": "draft", "id": "a"});
        let extras = json!({"x-new": 1, "x-old": 2});
        let order = vec![
            "x-old".to_string(),
            "status".to_string(),
            "title".to_string(),
        ];

        let merged = merge_values(
            known.as_object().cloned().unwrap_or_default(),
            extras.as_object().expect("extras object"),
            &order,
            true,
        );

        assert_eq!(keys(&merged), ["x-old", "status", "title", "id", "x-new"]);
    }

    #[test]
    fn merge_without_preserve_puts_known_first() {
        let known = json!({"title": "t", "status": "draft"});
        let extras = json!({"x-a": 1});
        let order = vec!["x-a".to_string(), "status".to_string()];

        let merged = merge_values(
            known.as_object().cloned().unwrap_or_default(),
            extras.as_object().expect("extras object"),
            &order,
            false,
        );

        assert_eq!(keys(&merged), ["title", "status", "x-a"]);
    }

    #[test]
    fn extras_never_shadow_recognised_fields() {
        let known = json!({"title": "known"});
        let extras = json!({"title": "shadow"});

        let merged = merge_values(
            known.as_object().cloned().unwrap_or_default(),
            extras.as_object().expect("extras object"),
            &["title".to_string()],
            true,
        );

        assert_eq!(merged["title"], "known");
    }

    #[test]
    fn non_object_sub_items_elements_are_dropped() {
        let item = PlanItem::from_value(json!({
            "title": "Parent",
            "status": "pending",
            "subItems": [1, {"title": "Child", "status": "draft"}, "x"],
        }));

        let sub_items = item.sub_items.expect("sub items");
        assert_eq!(sub_items.len(), 1);
        assert_eq!(sub_items[0].title, "Child");
    }

    #[test]
    fn non_object_input_builds_defaults() {
        let item = PlanItem::from_value(json!([1, 2]));
        assert_eq!(item, PlanItem::default());
        assert_eq!(item.title, "");

        let document = VBriefDocument::from_value(json!({"vBRIEFInfo": 3, "plan": "x"}));
        assert!(document.vbrief_info.is_empty());
        assert_eq!(document.plan.items.len(), 0);
        assert!(document.extras.is_empty());
    }
}
