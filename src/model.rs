use serde::Serialize;
use serde_json::Value;

use crate::{value_f64, value_str, value_u64};

/// Reserved key inside `selected_options` that carries assignment metadata
/// instead of a customization. Lifted into [`CartItem::assignment`] at parse
/// time; the normalizer still skips it unconditionally in case a raw record
/// bypassed [`CartItem::from_value`].
pub(crate) const ASSIGNMENT_KEY: &str = "__assignment__";

/// Synthetic bucket for units of a line nobody was ever assigned to.
pub const UNASSIGNED_LABEL: &str = "Unassigned";
/// Bucket for units assigned to no specific member on purpose.
pub const EXTRA_LABEL: &str = "Extra";

/// One line in a shared order cart, as read from the cart store.
///
/// `customizations`, `selected_options` and `assigned_to` are kept as raw
/// JSON: the stored shapes vary across frontend versions (plain arrays,
/// nested option groups, free-form objects) and are normalized on demand by
/// [`crate::normalize_options`] and [`crate::member_names`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CartItem {
    pub id: Option<String>,
    pub menu_item_id: Option<String>,
    pub name: String,
    /// Total physical units ordered for this line. May disagree with the
    /// saved assignment; the planner reconciles the two.
    pub quantity: i64,
    pub price: Option<f64>,
    pub customized_price: Option<f64>,
    pub customizations: Value,
    pub selected_options: Value,
    pub special_instructions: Option<String>,
    pub assigned_to: Value,
    /// Assignment metadata, separated from the options map so consumers
    /// never have to know about the sentinel key.
    pub assignment: Option<AssignmentMeta>,
}

impl CartItem {
    /// Lenient constructor for a raw cart-item record. Field names follow
    /// whichever convention the row was saved with (camelCase from the
    /// frontend, snake_case from Postgres); missing or malformed fields
    /// degrade to defaults. Returns `None` only for non-object input.
    pub fn from_value(v: &Value) -> Option<CartItem> {
        v.as_object()?;

        let mut selected_options = v
            .get("selectedOptions")
            .or_else(|| v.get("selected_options"))
            .cloned()
            .unwrap_or(Value::Null);
        let assignment = AssignmentMeta::from_options(&selected_options);
        if let Value::Object(map) = &mut selected_options {
            map.remove(ASSIGNMENT_KEY);
        }

        Some(CartItem {
            id: value_str(v, &["id"]),
            menu_item_id: value_str(v, &["menu_item_id", "menuItemId"]),
            name: value_str(v, &["name", "item_name", "title"])
                .unwrap_or_else(|| "Item".to_string()),
            quantity: value_f64(v, &["quantity"]).map(|q| q.round() as i64).unwrap_or(1),
            price: value_f64(v, &["price", "unit_price", "unitPrice"]),
            customized_price: value_f64(v, &["customizedPrice", "customized_price"]),
            customizations: v.get("customizations").cloned().unwrap_or(Value::Null),
            selected_options,
            special_instructions: value_str(
                v,
                &["specialInstructions", "special_instructions", "notes"],
            ),
            assigned_to: v
                .get("assignedTo")
                .or_else(|| v.get("assigned_to"))
                .cloned()
                .unwrap_or(Value::Null),
            assignment,
        })
    }
}

/// Saved per-line assignment: which members hold a unit and how many units
/// are deliberately left as "Extra". Each member id nominally consumes one
/// unit; the planner corrects the counts when the quantity changed after
/// this was saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentMeta {
    pub member_ids: Vec<String>,
    pub display_names: Vec<String>,
    pub extra_count: u32,
}

impl AssignmentMeta {
    pub(crate) fn from_options(options: &Value) -> Option<AssignmentMeta> {
        let meta = options.get(ASSIGNMENT_KEY)?;
        let extra_count = value_u64(meta, &["extra_count", "extras_count"])
            .or_else(|| {
                meta.get("extras")
                    .and_then(Value::as_array)
                    .map(|a| a.len() as u64)
            })
            .unwrap_or(0) as u32;
        Some(AssignmentMeta {
            member_ids: string_list(meta.get("member_ids")),
            display_names: string_list(meta.get("display_names")),
            extra_count,
        })
    }
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    let Some(values) = v.and_then(Value::as_array) else {
        return Vec::new();
    };
    values
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

/// Whether a unit row came out of the named-member allocation or the extras
/// bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Member,
    Extra,
}

impl Default for UnitKind {
    fn default() -> Self {
        UnitKind::Member
    }
}

/// One row per physical unit in the flattened receipt/summary view.
/// Recomputed on every render; carries no persisted identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitRow {
    /// 1-based position after sorting; 0 until numbered.
    pub line: u32,
    pub assignee: String,
    pub item_name: String,
    pub customizations: String,
    pub special: String,
    pub unit_price: f64,
    pub source_id: Option<String>,
    pub kind: UnitKind,
}
