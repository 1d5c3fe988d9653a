use std::cmp::Ordering;

use crate::assignment::member_names;
use crate::customizations::{extract_customizations, normalize_options};
use crate::model::{CartItem, UnitKind, UnitRow, EXTRA_LABEL, UNASSIGNED_LABEL};
use crate::planner::plan_units_by_name;

/// Per-unit price: the customized price when present, else the base price,
/// plus every customization's price delta. Stored deltas are already
/// per-unit, so nothing here scales by quantity.
pub fn compute_unit_price(item: &CartItem) -> f64 {
    let base = item.customized_price.or(item.price).unwrap_or(0.0);
    let deltas: f64 = normalize_options(item)
        .iter()
        .filter_map(|line| line.price_delta)
        .sum();
    base + deltas
}

/// Flattens the cart into one row per physical unit, in item-then-assignee
/// order: member rows in planner output order, then one "Extra" row per
/// extra unit. Pure and idempotent; line numbers stay 0 until
/// [`add_line_numbers`] runs after sorting.
pub fn expand_items_to_unit_rows(items: &[CartItem]) -> Vec<UnitRow> {
    let mut rows = Vec::new();
    for item in items {
        let customizations = extract_customizations(item);
        let special = item
            .special_instructions
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .to_string();
        let names = member_names(item);
        let extras_meta = item
            .assignment
            .as_ref()
            .map(|meta| meta.extra_count as i64)
            .unwrap_or(0);
        let plan = plan_units_by_name(item.quantity, &names, extras_meta);
        let unit_price = compute_unit_price(item);
        let source_id = item.id.clone().or_else(|| item.menu_item_id.clone());

        let row = |assignee: &str, kind: UnitKind| UnitRow {
            line: 0,
            assignee: assignee.to_string(),
            item_name: item.name.clone(),
            customizations: customizations.clone(),
            special: special.clone(),
            unit_price,
            source_id: source_id.clone(),
            kind,
        };
        for (name, count) in &plan.units {
            for _ in 0..*count {
                rows.push(row(name, UnitKind::Member));
            }
        }
        for _ in 0..plan.extras {
            rows.push(row(EXTRA_LABEL, UnitKind::Extra));
        }
    }
    rows
}

fn assignee_rank(assignee: &str) -> u8 {
    if assignee == EXTRA_LABEL {
        2
    } else if assignee == UNASSIGNED_LABEL {
        1
    } else {
        0
    }
}

fn compare_rows(a: &UnitRow, b: &UnitRow) -> Ordering {
    assignee_rank(&a.assignee)
        .cmp(&assignee_rank(&b.assignee))
        .then_with(|| a.assignee.to_lowercase().cmp(&b.assignee.to_lowercase()))
        .then_with(|| a.assignee.cmp(&b.assignee))
        .then_with(|| a.item_name.to_lowercase().cmp(&b.item_name.to_lowercase()))
        .then_with(|| a.item_name.cmp(&b.item_name))
}

/// Orders rows for display: named assignees A-Z (case-insensitive), then
/// "Unassigned", then "Extra". The comparator is a total order over
/// (assignee, item name), so the result is identical no matter how the
/// input was ordered; realtime refreshes must not make rows jump around.
pub fn sort_assignee_rows(rows: &mut [UnitRow]) {
    rows.sort_by(compare_rows);
}

/// 1-based sequential numbering in final display order.
pub fn add_line_numbers(rows: &mut [UnitRow]) {
    for (index, row) in rows.iter_mut().enumerate() {
        row.line = index as u32 + 1;
    }
}
