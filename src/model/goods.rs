use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::measure::Measure;

/// Marker the service puts in front of descriptions it could only serve in English.
pub const ENGLISH_FALLBACK_MARKER: &str = "[EN] ";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    #[default]
    Remote,
    Substitute,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote => f.write_str("remote"),
            DataSource::Substitute => f.write_str("substitute"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeMovement {
    #[default]
    #[serde(rename = "I")]
    Import,
    #[serde(rename = "E")]
    Export,
    #[serde(rename = "IE")]
    Both,
}

impl TradeMovement {
    pub fn code(self) -> &'static str {
        match self {
            TradeMovement::Import => "I",
            TradeMovement::Export => "E",
            TradeMovement::Both => "IE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TradeMovement::Import => "Import",
            TradeMovement::Export => "Export",
            TradeMovement::Both => "Import/Export",
        }
    }
}

impl fmt::Display for TradeMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TradeMovement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "I" | "IMPORT" => Ok(TradeMovement::Import),
            "E" | "EXPORT" => Ok(TradeMovement::Export),
            "IE" | "EI" | "BOTH" => Ok(TradeMovement::Both),
            other => Err(format!("unknown trade movement '{other}' (expected I, E or IE)")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GoodsDescription {
    pub goods_code: String,
    pub language_code: String,
    pub reference_date: NaiveDate,
    pub description: String,

    #[serde(default)]
    pub original_language: Option<String>,

    #[serde(default)]
    pub source: DataSource,
}

impl GoodsDescription {
    pub fn new(
        goods_code: impl Into<String>,
        language_code: &str,
        reference_date: NaiveDate,
        description: &str,
        source: DataSource,
    ) -> Self {
        let (description, original_language) =
            match description.strip_prefix(ENGLISH_FALLBACK_MARKER) {
                Some(rest) => (rest.to_string(), Some("EN".to_string())),
                None => (description.to_string(), None),
            };

        GoodsDescription {
            goods_code: goods_code.into(),
            language_code: language_code.to_uppercase(),
            reference_date,
            description,
            original_language,
            source,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GoodsMeasures {
    pub goods_code: String,
    pub country_code: String,
    pub reference_date: NaiveDate,
    pub trade_movement: TradeMovement,

    #[serde(default)]
    pub measures: Vec<Measure>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub source: DataSource,
}
