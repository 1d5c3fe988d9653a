use serde_json::Value;

use crate::model::CartItem;
use crate::value_str;

/// Deduplicated, order-preserving list of assignee display names for a cart
/// item. Prefers the saved assignment metadata, falling back to the legacy
/// `assigned_to` array; literal "extra"/"extras" entries are dropped since
/// extras are tracked by count, not by name. Returns `[]` when nothing is
/// assigned.
pub fn member_names(item: &CartItem) -> Vec<String> {
    let source = item
        .assignment
        .as_ref()
        .map(|meta| meta.display_names.clone())
        .filter(|names| !names.is_empty())
        .unwrap_or_else(|| assigned_to_names(&item.assigned_to));

    let mut names: Vec<String> = Vec::new();
    for raw in source {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("extra") || trimmed.eq_ignore_ascii_case("extras") {
            continue;
        }
        if names.iter().any(|existing| existing == trimmed) {
            continue;
        }
        names.push(trimmed.to_string());
    }
    names
}

fn assigned_to_names(assigned_to: &Value) -> Vec<String> {
    let Some(members) = assigned_to.as_array() else {
        return Vec::new();
    };
    members
        .iter()
        .filter_map(|member| value_str(member, &["name", "display_name", "displayName"]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_assignment_display_names() {
        let item = CartItem::from_value(&json!({
            "name": "Bowl",
            "assignedTo": [{ "id": "x", "name": "Legacy Name" }],
            "selectedOptions": {
                "__assignment__": { "display_names": ["Alice", "Bob"] }
            }
        }))
        .unwrap();
        assert_eq!(member_names(&item), vec!["Alice", "Bob"]);
    }

    #[test]
    fn falls_back_to_assigned_to() {
        let item = CartItem::from_value(&json!({
            "name": "Bowl",
            "assignedTo": [
                { "id": "1", "name": "Carol" },
                { "id": "2", "name": "Dan" }
            ]
        }))
        .unwrap();
        assert_eq!(member_names(&item), vec!["Carol", "Dan"]);
    }

    #[test]
    fn trims_dedupes_and_drops_extra_entries() {
        let item = CartItem::from_value(&json!({
            "name": "Bowl",
            "selectedOptions": {
                "__assignment__": {
                    "display_names": ["  Alice ", "Alice", "", "Extra", "extras", "Bob"]
                }
            }
        }))
        .unwrap();
        assert_eq!(member_names(&item), vec!["Alice", "Bob"]);
    }

    #[test]
    fn empty_display_names_fall_back_to_assigned_to() {
        let item = CartItem::from_value(&json!({
            "name": "Bowl",
            "assigned_to": [{ "name": "Eve" }],
            "selected_options": { "__assignment__": { "display_names": [] } }
        }))
        .unwrap();
        assert_eq!(member_names(&item), vec!["Eve"]);
    }

    #[test]
    fn missing_metadata_yields_empty_list() {
        let item = CartItem::from_value(&json!({ "name": "Bowl" })).unwrap();
        assert!(member_names(&item).is_empty());
        let malformed = CartItem::from_value(&json!({
            "name": "Bowl",
            "assignedTo": "not an array"
        }))
        .unwrap();
        assert!(member_names(&malformed).is_empty());
    }
}
