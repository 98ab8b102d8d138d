//! SOAP 1.1 request envelopes for the TARIC goods service.

use chrono::NaiveDate;
use quick_xml::escape::escape;

use crate::model::TradeMovement;

mod operation;
pub use operation::{Operation, SERVICE_NS, SOAP_ENV_NS};

pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Date format used on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn envelope(op: Operation, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!("      <{name}>{}</{name}>\n", escape(*value)));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="{SOAP_ENV_NS}" xmlns:good="{SERVICE_NS}">
  <soapenv:Header/>
  <soapenv:Body>
    <good:{op}>
{body}    </good:{op}>
  </soapenv:Body>
</soapenv:Envelope>"#,
        op = op.element(),
    )
}

pub fn goods_description_request(
    goods_code: &str,
    language_code: &str,
    reference_date: NaiveDate,
) -> String {
    let language = language_code.to_uppercase();
    let date = reference_date.format(DATE_FORMAT).to_string();

    envelope(
        Operation::GoodsDescription,
        &[
            ("goodsCode", goods_code),
            ("languageCode", &language),
            ("referenceDate", &date),
        ],
    )
}

pub fn goods_measures_request(
    goods_code: &str,
    country_code: &str,
    reference_date: NaiveDate,
    trade_movement: TradeMovement,
) -> String {
    let country = country_code.to_uppercase();
    let date = reference_date.format(DATE_FORMAT).to_string();

    envelope(
        Operation::GoodsMeasures,
        &[
            ("goodsCode", goods_code),
            ("countryCode", &country),
            ("referenceDate", &date),
            ("tradeMovement", trade_movement.code()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn description_envelope_carries_fields() {
        let xml = goods_description_request("87032319", "zh", date());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<good:goodsDescrForWs>"));
        assert!(xml.contains("<goodsCode>87032319</goodsCode>"));
        assert!(xml.contains("<languageCode>ZH</languageCode>"));
        assert!(xml.contains("<referenceDate>2024-03-05</referenceDate>"));
        assert!(xml.contains(SERVICE_NS));
    }

    #[test]
    fn measures_envelope_carries_fields() {
        let xml = goods_measures_request("8703", "cn", date(), TradeMovement::Both);
        assert!(xml.contains("<good:goodsMeasForWs>"));
        assert!(xml.contains("<countryCode>CN</countryCode>"));
        assert!(xml.contains("<tradeMovement>IE</tradeMovement>"));
        assert!(xml.contains("</good:goodsMeasForWs>"));
    }

    #[test]
    fn interpolated_values_are_escaped() {
        let xml = goods_description_request("87<03>&19", "EN", date());
        assert!(xml.contains("<goodsCode>87&lt;03&gt;&amp;19</goodsCode>"));
        assert!(!xml.contains("87<03>"));
    }

    #[test]
    fn envelope_is_well_formed() {
        let xml = goods_measures_request("a&b", "US", date(), TradeMovement::Import);
        let mut reader = quick_xml::Reader::from_str(&xml);
        loop {
            match reader.read_event() {
                Ok(quick_xml::events::Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("envelope not well-formed: {e}"),
            }
        }
    }
}
