//! Spreadsheet-driven measures lookup: one CSV column of goods codes in,
//! one CSV row per measure out.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info};
use regex::Regex;
use serde::Serialize;

use crate::error::{TaricError, TaricResult};
use crate::model::{DataSource, GoodsMeasures, Measure, TradeMovement};
use crate::services::client::TaricClient;
use crate::services::encoding;

pub const DEFAULT_COLUMN: &str = "goods_code";

const PLACEHOLDER: &str = "-";

// Spreadsheet exports turn numeric cells into floats: "87032319.0".
static FLOAT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.0+$").expect("float suffix pattern"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s.]+").expect("separator pattern"));

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub column: String,
    pub country_code: Option<String>,
    pub trade_movement: TradeMovement,
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BatchRow {
    pub goods_code: String,
    pub country_code: String,
    pub trade_movement: String,
    pub reference_date: String,
    pub measure_type: String,
    pub measure_type_description: String,
    pub duty_rate: String,
    pub additional_code: String,
    pub validity_start_date: String,
    pub validity_end_date: String,
    pub regulation_id: String,
    pub order_number: String,
    pub source: String,
    pub error: String,
}

impl BatchRow {
    pub const HEADERS: [&'static str; 14] = [
        "goods_code",
        "country_code",
        "trade_movement",
        "reference_date",
        "measure_type",
        "measure_type_description",
        "duty_rate",
        "additional_code",
        "validity_start_date",
        "validity_end_date",
        "regulation_id",
        "order_number",
        "source",
        "error",
    ];

    fn placeholder(goods_code: &str, error: &str) -> Self {
        BatchRow {
            goods_code: goods_code.to_string(),
            country_code: PLACEHOLDER.into(),
            trade_movement: PLACEHOLDER.into(),
            reference_date: PLACEHOLDER.into(),
            measure_type: PLACEHOLDER.into(),
            measure_type_description: PLACEHOLDER.into(),
            duty_rate: PLACEHOLDER.into(),
            additional_code: PLACEHOLDER.into(),
            validity_start_date: PLACEHOLDER.into(),
            validity_end_date: PLACEHOLDER.into(),
            regulation_id: PLACEHOLDER.into(),
            order_number: PLACEHOLDER.into(),
            source: PLACEHOLDER.into(),
            error: error.to_string(),
        }
    }

    fn from_measure(result: &GoodsMeasures, m: &Measure) -> Self {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| PLACEHOLDER.to_string());

        BatchRow {
            goods_code: result.goods_code.clone(),
            country_code: result.country_code.clone(),
            trade_movement: result.trade_movement.code().to_string(),
            reference_date: result.reference_date.to_string(),
            measure_type: m.measure_type.clone(),
            measure_type_description: m.measure_type_description.clone(),
            duty_rate: or_dash(&m.duty_rate),
            additional_code: m
                .additional_code
                .as_ref()
                .map(|a| format!("{}{}", a.code_id, a.code))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            validity_start_date: or_dash(&m.validity_start_date),
            validity_end_date: or_dash(&m.validity_end_date),
            regulation_id: or_dash(&m.regulation_id),
            order_number: or_dash(&m.order_number),
            source: result.source.to_string(),
            error: String::new(),
        }
    }

    fn no_measures(result: &GoodsMeasures) -> Self {
        BatchRow {
            country_code: result.country_code.clone(),
            trade_movement: result.trade_movement.code().to_string(),
            reference_date: result.reference_date.to_string(),
            source: result.source.to_string(),
            ..BatchRow::placeholder(&result.goods_code, "")
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct BatchReport {
    pub codes: usize,
    pub rows: usize,
    pub placeholders: usize,
    pub substituted: usize,
}

/// Cleans up a spreadsheet cell into a goods code.
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    let digits = FLOAT_SUFFIX.replace(trimmed, "$1");
    SEPARATORS.replace_all(&digits, "").into_owned()
}

pub fn read_codes(path: &Path, column: &str) -> TaricResult<Vec<String>> {
    let decoded = encoding::decode_file(path)?;
    debug!("{} read as {}", path.display(), decoded.encoding);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(decoded.text.as_bytes());

    let headers = reader.headers()?.clone();
    let wanted = column.trim();
    let idx = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| TaricError::MissingColumn {
            column: wanted.to_string(),
            available: headers.iter().map(|h| h.trim().to_string()).collect(),
        })?;

    let mut codes = Vec::new();
    for record in reader.records() {
        let record = record?;
        codes.push(normalize_code(record.get(idx).unwrap_or("")));
    }

    Ok(codes)
}

pub fn run(client: &TaricClient, opts: &BatchOptions) -> TaricResult<BatchReport> {
    let codes = read_codes(&opts.input, &opts.column)?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(&opts.output)?;
    writer.write_record(BatchRow::HEADERS)?;

    let mut report = BatchReport {
        codes: codes.len(),
        ..BatchReport::default()
    };

    for (i, code) in codes.iter().enumerate() {
        let rows = lookup_rows(client, opts, code);
        debug!("[{}/{}] {code}: {} row(s)", i + 1, codes.len(), rows.len());

        for row in rows {
            if row.measure_type == PLACEHOLDER {
                report.placeholders += 1;
            }
            if row.source == DataSource::Substitute.to_string() {
                report.substituted += 1;
            }
            writer.serialize(&row)?;
            report.rows += 1;
        }
    }

    writer.flush()?;

    info!(
        "batch done: {} code(s), {} row(s), {} placeholder(s), {} substituted row(s) -> {}",
        report.codes,
        report.rows,
        report.placeholders,
        report.substituted,
        opts.output.display()
    );

    Ok(report)
}

fn lookup_rows(client: &TaricClient, opts: &BatchOptions, code: &str) -> Vec<BatchRow> {
    if code.is_empty() {
        return vec![BatchRow::placeholder(code, "empty goods code")];
    }

    let result = client.lookup_measures(
        code,
        opts.country_code.as_deref(),
        opts.trade_movement,
        opts.reference_date,
    );

    if result.measures.is_empty() {
        return vec![BatchRow::no_measures(&result)];
    }

    result
        .measures
        .iter()
        .map(|m| BatchRow::from_measure(&result, m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_spreadsheet_cells() {
        assert_eq!(normalize_code(" 87032319 "), "87032319");
        assert_eq!(normalize_code("87032319.0"), "87032319");
        assert_eq!(normalize_code("8703.23.19"), "87032319");
        assert_eq!(normalize_code("8703 23 19"), "87032319");
        assert_eq!(normalize_code(""), "");
    }

    #[test]
    fn placeholder_row_is_dashed() {
        let row = BatchRow::placeholder("", "empty goods code");
        assert_eq!(row.duty_rate, "-");
        assert_eq!(row.error, "empty goods code");
    }
}
