use crate::model::UnitRow;

/// Layout knobs for the plain-text summary. Width is in characters, same as
/// a narrow receipt column.
#[derive(Debug, Clone)]
pub struct SummaryLayout {
    pub width: usize,
    pub title: String,
}

impl Default for SummaryLayout {
    fn default() -> Self {
        Self {
            width: 42,
            title: "TEAM ORDER".to_string(),
        }
    }
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn separator(width: usize) -> String {
    "-".repeat(width.max(8))
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(8);
    let mut out = Vec::new();
    let mut line = String::new();
    for token in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(token);
            continue;
        }
        if line.chars().count() + 1 + token.chars().count() > width {
            out.push(line);
            line = token.to_string();
        } else {
            line.push(' ');
            line.push_str(token);
        }
    }
    if !line.is_empty() {
        out.push(line);
    }
    out
}

/// Label on the left, value right-aligned; the label wraps onto its own
/// lines when the pair does not fit.
fn push_pair(out: &mut String, label: &str, value: &str, width: usize) {
    let label_len = label.chars().count();
    let value_len = value.chars().count();
    if label_len + value_len < width {
        let pad = width - label_len - value_len;
        out.push_str(label);
        out.push_str(&" ".repeat(pad));
        out.push_str(value);
        out.push('\n');
        return;
    }
    for line in wrap(label, width.saturating_sub(value_len + 1)) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&" ".repeat(width.saturating_sub(value_len)));
    out.push_str(value);
    out.push('\n');
}

fn push_note(out: &mut String, note: &str, width: usize) {
    for line in wrap(note, width.saturating_sub(4)) {
        out.push_str("    ");
        out.push_str(&line);
        out.push('\n');
    }
}

/// Renders pre-sorted, pre-numbered unit rows as a plain-text team summary:
/// one numbered line per unit with a right-aligned price, customization and
/// instruction notes underneath, then per-assignee subtotals (in the order
/// the rows arrive, so sorted input gives rank order) and a grand total.
pub fn render_summary(rows: &[UnitRow], layout: &SummaryLayout) -> String {
    let width = layout.width.max(24);
    let mut out = String::new();

    out.push_str(&center(&layout.title, width));
    out.push('\n');
    out.push_str(&separator(width));
    out.push('\n');

    if rows.is_empty() {
        out.push_str("No units\n");
        return out;
    }

    for row in rows {
        let label = format!("{:>2}. {} - {}", row.line, row.assignee, row.item_name);
        push_pair(&mut out, &label, &money(row.unit_price), width);
        if !row.customizations.is_empty() {
            push_note(&mut out, &format!("+ {}", row.customizations), width);
        }
        if !row.special.is_empty() {
            push_note(&mut out, &format!("Note: {}", row.special), width);
        }
    }

    out.push_str(&separator(width));
    out.push('\n');
    out.push_str("BY ASSIGNEE\n");

    // First-seen order; a grouped map would lose the caller's sort.
    let mut subtotals: Vec<(String, u32, f64)> = Vec::new();
    for row in rows {
        match subtotals.iter_mut().find(|(name, _, _)| *name == row.assignee) {
            Some((_, units, total)) => {
                *units += 1;
                *total += row.unit_price;
            }
            None => subtotals.push((row.assignee.clone(), 1, row.unit_price)),
        }
    }
    let mut grand_total = 0.0;
    for (name, units, total) in &subtotals {
        push_pair(
            &mut out,
            &format!("{name} x{units}"),
            &money(*total),
            width,
        );
        grand_total += total;
    }

    out.push_str(&separator(width));
    out.push('\n');
    push_pair(&mut out, "TOTAL", &money(grand_total), width);
    out
}
