//! Unified view over member and public registrations of one event.
//!
//! Public answers are schema driven, so their columns are derived from the
//! field list stored with the registrations rather than from the live form.

use serde::Serialize;
use serde_json::Value;

use crate::models::{EventRegistrations, MemberRegistration, PublicRegistration};

/// Placeholder for answers that cannot be resolved.
pub const MISSING: &str = "-";

/// A dynamic column of the public registrations table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub field_id: String,
    pub header: String,
}

/// A public registration with its answers laid out per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRow {
    pub id: String,
    pub submitted_at: String,
    pub cells: Vec<String>,
}

/// Both registration populations of an event, ready for display or export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationTable {
    pub columns: Vec<Column>,
    pub members: Vec<MemberRegistration>,
    pub public: Vec<PublicRow>,
    pub total: usize,
}

/// Columns come from the first public registration's stored field list only.
///
/// Later registrations are read by position against these columns, so fields
/// they carry beyond the first record's list are not shown.
pub fn derive_columns(public: &[PublicRegistration]) -> Vec<Column> {
    let Some(items) = public.first().and_then(stored_fields) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| {
            let field_id = item
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let label = item
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let header = if label.is_empty() {
                field_id.clone()
            } else {
                label.to_string()
            };
            Column { field_id, header }
        })
        .collect()
}

/// Display text of the answer in column `index` of a public registration.
///
/// The field id is taken from the registration's own stored list at the same
/// position; an unusable list resolves to [`MISSING`].
pub fn resolve_value(registration: &PublicRegistration, index: usize) -> String {
    let field_id = stored_fields(registration)
        .and_then(|items| items.get(index))
        .and_then(|item| item.get("id"))
        .and_then(Value::as_str);

    match field_id {
        Some(id) => display_value(registration.form_data.get(id)),
        None => MISSING.to_string(),
    }
}

/// Text for one stored answer.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other @ (Value::Object(_) | Value::Array(_))) => other.to_string(),
    }
}

pub fn aggregate(registrations: &EventRegistrations) -> RegistrationTable {
    let columns = derive_columns(&registrations.public_registrations);

    let public = registrations
        .public_registrations
        .iter()
        .map(|registration| PublicRow {
            id: registration.id.clone(),
            submitted_at: registration.submitted_at.clone(),
            cells: (0..columns.len())
                .map(|index| resolve_value(registration, index))
                .collect(),
        })
        .collect();

    RegistrationTable {
        columns,
        members: registrations.member_registrations.clone(),
        public,
        total: registrations.member_registrations.len()
            + registrations.public_registrations.len(),
    }
}

fn stored_fields(registration: &PublicRegistration) -> Option<&Vec<Value>> {
    registration.fields.as_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn public(id: &str, fields: Value, form_data: Value) -> PublicRegistration {
        serde_json::from_value(json!({
            "id": id,
            "formData": form_data,
            "fields": fields,
            "submittedAt": "2026-05-01T09:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_no_public_registrations_means_no_columns() {
        assert!(derive_columns(&[]).is_empty());
    }

    #[test]
    fn test_header_falls_back_to_id() {
        let regs = [public(
            "p1",
            json!([{ "id": "f1", "label": "Name" }, { "id": "f2", "label": "" }, { "id": "f3" }]),
            json!({}),
        )];
        let headers: Vec<String> = derive_columns(&regs).into_iter().map(|c| c.header).collect();
        assert_eq!(headers, ["Name", "f2", "f3"]);
    }

    #[test]
    fn test_columns_come_from_first_registration_only() {
        let regs = [
            public(
                "p1",
                json!([{ "id": "f1", "label": "Name" }, { "id": "f2", "label": "Diet" }]),
                json!({ "f1": "Asha", "f2": "Vegan" }),
            ),
            public(
                "p2",
                json!([
                    { "id": "f1", "label": "Name" },
                    { "id": "f2", "label": "Diet" },
                    { "id": "f3", "label": "Shirt" }
                ]),
                json!({ "f1": "Ben", "f2": "None", "f3": "L" }),
            ),
        ];

        let table = aggregate(&EventRegistrations {
            member_registrations: Vec::new(),
            public_registrations: regs.to_vec(),
        });

        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.public[1].cells, ["Ben", "None"]);
        assert!(!table.public[1].cells.contains(&"L".to_string()));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let regs = [public(
            "p1",
            json!([{ "id": "b", "label": "B" }, { "id": "a", "label": "A" }]),
            json!({}),
        )];
        assert_eq!(derive_columns(&regs), derive_columns(&regs));
    }

    #[test]
    fn test_value_formatting() {
        let reg = public(
            "p1",
            json!([
                { "id": "s" }, { "id": "t" }, { "id": "f" }, { "id": "o" },
                { "id": "n" }, { "id": "missing" }, { "id": "null" }
            ]),
            json!({
                "s": "He said \"hi\"",
                "t": true,
                "f": false,
                "o": { "k": 1 },
                "n": 42,
                "null": null
            }),
        );

        let cells: Vec<String> = (0..7).map(|i| resolve_value(&reg, i)).collect();
        assert_eq!(
            cells,
            ["He said \"hi\"", "Yes", "No", r#"{"k":1}"#, "42", "-", "-"]
        );
    }

    #[test]
    fn test_malformed_field_list_degrades_to_dashes() {
        let good = public("p1", json!([{ "id": "f1" }, { "id": "f2" }]), json!({}));
        let broken = public("p2", json!("not a list"), json!({ "f1": "x" }));
        let missing = public("p3", Value::Null, json!({ "f1": "x" }));

        let table = aggregate(&EventRegistrations {
            member_registrations: Vec::new(),
            public_registrations: vec![good, broken, missing],
        });

        assert_eq!(table.public[1].cells, ["-", "-"]);
        assert_eq!(table.public[2].cells, ["-", "-"]);
    }

    #[test]
    fn test_malformed_first_list_yields_no_columns() {
        let regs = [public("p1", json!({ "f1": "Name" }), json!({ "f1": "x" }))];
        assert!(derive_columns(&regs).is_empty());
    }

    #[test]
    fn test_resolution_is_positional() {
        let regs = [
            public("p1", json!([{ "id": "f1" }, { "id": "f2" }]), json!({})),
            public(
                "p2",
                json!([{ "id": "f2" }, { "id": "f1" }]),
                json!({ "f1": "one", "f2": "two" }),
            ),
        ];
        let table = aggregate(&EventRegistrations {
            member_registrations: Vec::new(),
            public_registrations: regs.to_vec(),
        });
        assert_eq!(table.public[1].cells, ["two", "one"]);
    }
}
