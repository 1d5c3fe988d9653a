use serde_json::Value;

use crate::model::{CartItem, ASSIGNMENT_KEY};
use crate::{value_f64, value_str};

/// Canonical customization line. Every stored option shape is reduced to a
/// display name plus an optional per-unit price delta before anything is
/// formatted or priced, so shape-sniffing lives in this module only.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLine {
    pub name: String,
    pub price_delta: Option<f64>,
}

impl OptionLine {
    fn plain(name: impl Into<String>) -> OptionLine {
        OptionLine {
            name: name.into(),
            price_delta: None,
        }
    }
}

/// Converts an item's stored customizations into the canonical sequence.
/// Prefers the typed `customizations` array saved by newer frontends, then
/// falls back to whatever shape `selected_options` is in. Malformed input
/// yields an empty or partial sequence, never a panic.
pub fn normalize_options(item: &CartItem) -> Vec<OptionLine> {
    if let Some(entries) = item.customizations.as_array() {
        if !entries.is_empty() {
            let mut out = Vec::new();
            for entry in entries {
                if let Some(name) = value_str(entry, &["name", "label", "title"]) {
                    out.push(OptionLine {
                        name,
                        price_delta: option_price(entry),
                    });
                } else if let Some(name) = trimmed_str(entry) {
                    out.push(OptionLine::plain(name));
                }
            }
            return out;
        }
    }
    normalize_selected(&item.selected_options)
}

/// Human-readable one-line summary of all selected customizations, or `""`
/// if there are none.
pub fn extract_customizations(item: &CartItem) -> String {
    normalize_options(item)
        .iter()
        .map(format_option)
        .collect::<Vec<String>>()
        .join(", ")
}

fn format_option(line: &OptionLine) -> String {
    match line.price_delta {
        Some(price) if price.abs() > f64::EPSILON => {
            format!("{} (+${:.2})", line.name, price)
        }
        _ => line.name.clone(),
    }
}

fn normalize_selected(options: &Value) -> Vec<OptionLine> {
    let mut out = Vec::new();
    match options {
        Value::Object(map) => {
            for (key, value) in map {
                if key == ASSIGNMENT_KEY {
                    continue;
                }
                collect_group(key, value, &mut out);
            }
        }
        Value::Array(values) => {
            for value in values {
                collect_element(value, &mut out);
            }
        }
        _ => {}
    }
    out
}

/// One entry of a `{group name -> selection}` options map.
fn collect_group(key: &str, value: &Value, out: &mut Vec<OptionLine>) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                out.push(OptionLine::plain(trimmed));
            }
        }
        Value::Number(n) => out.push(OptionLine::plain(format!("{key}: {n}"))),
        Value::Bool(b) => out.push(OptionLine::plain(format!("{key}: {b}"))),
        Value::Array(values) => {
            for element in values {
                collect_element(element, out);
            }
        }
        Value::Object(_) => collect_object(value, out),
        Value::Null => {}
    }
}

/// One element of an options array (either top-level or a group's list of
/// picked options).
fn collect_element(value: &Value, out: &mut Vec<OptionLine>) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                out.push(OptionLine::plain(trimmed));
            }
        }
        Value::Number(n) => out.push(OptionLine::plain(n.to_string())),
        Value::Bool(b) => out.push(OptionLine::plain(b.to_string())),
        Value::Object(_) => collect_object(value, out),
        _ => {}
    }
}

fn collect_object(value: &Value, out: &mut Vec<OptionLine>) {
    if let Some(name) = value_str(value, &["name", "label", "title"]) {
        out.push(OptionLine {
            name,
            price_delta: option_price(value),
        });
        return;
    }
    // No name field at all: keep whatever string-valued members it has.
    if let Some(map) = value.as_object() {
        for member in map.values() {
            if let Some(text) = trimmed_str(member) {
                out.push(OptionLine::plain(text));
            }
        }
    }
}

fn option_price(v: &Value) -> Option<f64> {
    value_f64(v, &["price"]).or_else(|| value_f64(v, &["price_cents"]).map(|cents| cents / 100.0))
}

fn trimmed_str(v: &Value) -> Option<String> {
    let trimmed = v.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
