//! Plain-text tables for terminal output.

use crate::model::{GoodsDescription, GoodsMeasures};

const DASH: &str = "-";

/// Terminal columns taken by `s`; CJK and fullwidth characters count double.
fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| match c as u32 {
            0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60 | 0xFFE0..=0xFFE6 => 2,
            _ => 1,
        })
        .sum()
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(fill))
}

#[derive(Debug, Default)]
pub struct Table {
    title: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Table {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, cells: &[&str]) {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(display_width(cell));
                }
            }
        }

        let separator = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");
        let separator = format!("+{separator}+");

        let line = |cells: &[String]| {
            let inner = widths
                .iter()
                .enumerate()
                .map(|(i, w)| format!(" {} ", pad(cells.get(i).map(String::as_str).unwrap_or(""), *w)))
                .collect::<Vec<_>>()
                .join("|");
            format!("|{inner}|")
        };

        let mut out = String::new();
        if !self.title.is_empty() {
            out.push_str(&self.title);
            out.push('\n');
        }
        out.push_str(&separator);
        out.push('\n');
        out.push_str(&line(&self.headers));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out.push_str(&separator);
        out.push('\n');
        out
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or(DASH)
}

pub fn description_table(d: &GoodsDescription) -> String {
    let mut t = Table::new("Goods description", &["Field", "Value"]);
    t.add_row(&["Goods code", &d.goods_code]);
    t.add_row(&["Language", &d.language_code]);
    t.add_row(&["Reference date", &d.reference_date.to_string()]);
    t.add_row(&["Description", &d.description]);
    if let Some(lang) = &d.original_language {
        t.add_row(&["Original language", lang]);
    }
    t.add_row(&["Source", &d.source.to_string()]);
    t.render()
}

pub fn measures_tables(m: &GoodsMeasures) -> String {
    let mut info = Table::new("Query", &["Field", "Value"]);
    info.add_row(&["Goods code", &m.goods_code]);
    if let Some(description) = &m.description {
        info.add_row(&["Description", description]);
    }
    info.add_row(&["Country", &m.country_code]);
    info.add_row(&["Trade movement", m.trade_movement.label()]);
    info.add_row(&["Reference date", &m.reference_date.to_string()]);
    info.add_row(&["Source", &m.source.to_string()]);

    let mut out = info.render();

    if m.measures.is_empty() {
        out.push_str("No applicable measures found\n");
        return out;
    }

    let mut table = Table::new(
        format!("Applicable measures ({})", m.measures.len()),
        &[
            "Type",
            "Description",
            "Duty rate",
            "Additional code",
            "Validity",
            "Regulation",
            "Order no.",
        ],
    );
    for measure in &m.measures {
        let additional = measure
            .additional_code
            .as_ref()
            .map(|a| format!("{}{} {}", a.code_id, a.code, a.description).trim().to_string())
            .unwrap_or_else(|| DASH.to_string());
        table.add_row(&[
            measure.measure_type.as_str(),
            &measure.measure_type_description,
            or_dash(measure.duty_rate.as_deref()),
            &additional,
            &measure.validity(),
            or_dash(measure.regulation_id.as_deref()),
            or_dash(measure.order_number.as_deref()),
        ]);
    }
    out.push('\n');
    out.push_str(&table.render());
    out
}
