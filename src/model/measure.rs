use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AdditionalCode {
    pub code: String,
    pub code_id: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Measure {
    pub measure_type: String,

    #[serde(default)]
    pub measure_type_description: String,

    #[serde(default)]
    pub duty_rate: Option<String>,

    #[serde(default)]
    pub additional_code: Option<AdditionalCode>,

    #[serde(default)]
    pub validity_start_date: Option<String>,

    #[serde(default)]
    pub validity_end_date: Option<String>,

    #[serde(default)]
    pub regulation_id: Option<String>,

    #[serde(default)]
    pub order_number: Option<String>,
}

/// Maps wire text to an optional value; blank text means absent.
pub fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl Measure {
    pub fn validity(&self) -> String {
        format!(
            "{} - {}",
            self.validity_start_date.as_deref().unwrap_or(""),
            self.validity_end_date.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty("10%"), Some("10%".to_string()));
    }

    #[test]
    fn validity_renders_open_end() {
        let m = Measure {
            measure_type: "103".into(),
            measure_type_description: "Third country duty".into(),
            duty_rate: Some("10%".into()),
            additional_code: None,
            validity_start_date: Some("2024-01-01".into()),
            validity_end_date: None,
            regulation_id: None,
            order_number: None,
        };
        assert_eq!(m.validity(), "2024-01-01 - ");
    }
}
