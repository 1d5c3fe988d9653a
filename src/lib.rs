//! Crew Cart - team order display core.
//!
//! A shared cart lets team members claim units of each line item; the saved
//! assignment metadata and the current quantity can drift apart when either
//! side is edited after the other. This crate reconstructs a consistent
//! per-unit breakdown for receipts and team summaries: normalize stored
//! customizations, extract assignee names, reconcile counts against the
//! quantity, expand to one row per physical unit, then sort and number the
//! rows deterministically so repeated renders never flicker.
//!
//! The display pipeline is pure and infallible by contract; only the
//! snapshot read path (Supabase REST) can fail.

mod assignment;
mod customizations;
mod model;
mod planner;
mod rows;
mod snapshot;
mod summary;

pub use assignment::member_names;
pub use customizations::{extract_customizations, normalize_options, OptionLine};
pub use model::{AssignmentMeta, CartItem, UnitKind, UnitRow, EXTRA_LABEL, UNASSIGNED_LABEL};
pub use planner::{plan_units_by_name, UnitPlan};
pub use rows::{
    add_line_numbers, compute_unit_price, expand_items_to_unit_rows, sort_assignee_rows,
};
pub use snapshot::{
    fetch_cart_snapshot, parse_cart_items, start_cart_watch, CartSnapshot, SnapshotError,
    SupabaseConfig,
};
pub use summary::{render_summary, SummaryLayout};

pub(crate) fn value_str(v: &serde_json::Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = v.get(*key).and_then(|x| x.as_str()) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

pub(crate) fn value_f64(v: &serde_json::Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        if let Some(n) = v.get(*key).and_then(|x| x.as_f64()) {
            return Some(n);
        }
    }
    None
}

pub(crate) fn value_u64(v: &serde_json::Value, keys: &[&str]) -> Option<u64> {
    for key in keys {
        if let Some(n) = v.get(*key).and_then(|x| x.as_u64()) {
            return Some(n);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // End-to-end: stale assignment metadata still yields exactly `quantity`
    // rows per item, deterministically ordered.
    #[test]
    fn stale_assignment_reconciles_into_full_table() {
        let raw = json!([
            {
                "id": "ci-1",
                "name": "Pad Thai",
                "quantity": 4,
                "price": 12.0,
                "selectedOptions": {
                    "Spice": "Medium",
                    "__assignment__": {
                        "display_names": ["Zoe", "Andy"],
                        "extra_count": 0
                    }
                }
            },
            {
                "id": "ci-2",
                "name": "Spring Rolls",
                "quantity": 1,
                "price": 5.0,
                "selectedOptions": {
                    "__assignment__": {
                        "display_names": ["Zoe", "Andy"],
                        "extra_count": 2
                    }
                }
            }
        ]);
        let items = parse_cart_items(&raw);
        let mut rows = expand_items_to_unit_rows(&items);
        sort_assignee_rows(&mut rows);
        add_line_numbers(&mut rows);

        // 4 + 1 physical units.
        assert_eq!(rows.len(), 5);
        // Pad Thai grew: Andy (trailing name) absorbs the extra units.
        assert_eq!(rows.iter().filter(|r| r.assignee == "Andy").count(), 3);
        // Spring Rolls shrank to 1: extras gone, Andy dropped, Zoe kept.
        assert_eq!(
            rows.iter()
                .filter(|r| r.item_name == "Spring Rolls")
                .map(|r| r.assignee.as_str())
                .collect::<Vec<_>>(),
            vec!["Zoe"]
        );
        // Named assignees sort case-insensitively ahead of placeholders.
        assert_eq!(rows[0].assignee, "Andy");
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows.last().unwrap().line, 5);
    }

    #[test]
    fn value_helpers_take_first_usable_key() {
        let v = json!({ "unitPrice": 4.5, "name": "  padded  ", "count": 3 });
        assert_eq!(value_f64(&v, &["price", "unitPrice"]), Some(4.5));
        assert_eq!(value_str(&v, &["title", "name"]).as_deref(), Some("padded"));
        assert_eq!(value_u64(&v, &["count"]), Some(3));
        assert_eq!(value_str(&v, &["missing"]), None);
    }
}
