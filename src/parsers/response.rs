//! Tolerant parsing of TARIC SOAP responses. `Ok(None)` means the body had
//! no `return` element.

use chrono::{Local, NaiveDate};
use log::{debug, warn};

use crate::error::TaricResult;
use crate::model::measure::non_empty;
use crate::model::{
    AdditionalCode, DataSource, GoodsDescription, GoodsMeasures, Measure, TradeMovement,
};
use crate::parsers::xml::{field, parse_document, Element, Tag};
use crate::protocol::{DATE_FORMAT, SOAP_ENV_NS};

fn soap_tag(name: &str) -> [Tag<'_>; 2] {
    [Tag::Qualified(SOAP_ENV_NS, name), Tag::Bare(name)]
}

/// Finds `return` inside the SOAP body (or anywhere, for body-less fragments).
fn find_return(root: &Element) -> Option<&Element> {
    if field("return").iter().any(|t| t.matches(root)) {
        return Some(root);
    }

    let body = root.find_descendant(&soap_tag("Body")).unwrap_or(root);

    if let Some(ret) = body.find_descendant(&field("return")) {
        return Some(ret);
    }

    if let Some(fault) = body.find_descendant(&soap_tag("Fault")) {
        let reason = fault.child_text(&[Tag::Bare("faultstring")]);
        if reason.is_empty() {
            warn!("TARIC service returned a SOAP fault without faultstring");
        } else {
            warn!("TARIC service returned a SOAP fault: {reason}");
        }
    }

    None
}

fn parse_reference_date(text: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(text.trim(), DATE_FORMAT) {
        Ok(d) => d,
        Err(_) => {
            debug!("unparsable referenceDate {text:?}, using today");
            Local::now().date_naive()
        }
    }
}

// Blank identifying fields keep the value that was asked for.
fn text_or(ret: &Element, name: &str, requested: &str) -> String {
    let text = ret.child_text(&field(name));
    if text.is_empty() {
        requested.to_string()
    } else {
        text
    }
}

pub fn parse_goods_description(
    xml: &str,
    goods_code: &str,
    language_code: &str,
) -> TaricResult<Option<GoodsDescription>> {
    let root = parse_document(xml)?;
    let Some(ret) = find_return(&root) else {
        return Ok(None);
    };

    Ok(Some(GoodsDescription::new(
        text_or(ret, "goodsCode", goods_code),
        &text_or(ret, "languageCode", language_code),
        parse_reference_date(&ret.child_text(&field("referenceDate"))),
        &ret.child_text(&field("description")),
        DataSource::Remote,
    )))
}

pub fn parse_goods_measures(
    xml: &str,
    goods_code: &str,
    country_code: &str,
    requested: TradeMovement,
) -> TaricResult<Option<GoodsMeasures>> {
    let root = parse_document(xml)?;
    let Some(ret) = find_return(&root) else {
        return Ok(None);
    };

    let trade_movement = ret
        .child_text(&field("tradeMovement"))
        .parse()
        .unwrap_or(requested);

    let measure_tags = field("measure");
    let measures = ret
        .find(&field("measures"))
        .map(|list| {
            list.children_matching(&measure_tags)
                .into_iter()
                .filter_map(parse_measure)
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(GoodsMeasures {
        goods_code: text_or(ret, "goodsCode", goods_code),
        country_code: text_or(ret, "countryCode", country_code).to_uppercase(),
        reference_date: parse_reference_date(&ret.child_text(&field("referenceDate"))),
        trade_movement,
        measures,
        description: non_empty(ret.child_text(&field("description"))),
        source: DataSource::Remote,
    }))
}

fn parse_measure(el: &Element) -> Option<Measure> {
    let measure_type = el.child_text(&field("measureType"));
    if measure_type.is_empty() {
        debug!("dropping measure entry without measureType");
        return None;
    }

    Some(Measure {
        measure_type,
        measure_type_description: el.child_text(&field("measureTypeDescription")),
        duty_rate: non_empty(el.child_text(&field("dutyRate"))),
        additional_code: el.find(&field("additionalCode")).and_then(parse_additional_code),
        validity_start_date: non_empty(el.child_text(&field("validityStartDate"))),
        validity_end_date: non_empty(el.child_text(&field("validityEndDate"))),
        regulation_id: non_empty(el.child_text(&field("regulationId"))),
        order_number: non_empty(el.child_text(&field("orderNumber"))),
    })
}

fn parse_additional_code(el: &Element) -> Option<AdditionalCode> {
    let code = el.child_text(&field("code"));
    let code_id = el.child_text(&field("codeId"));
    if code.is_empty() && code_id.is_empty() {
        return None;
    }

    Some(AdditionalCode {
        code,
        code_id,
        description: el.child_text(&field("description")),
    })
}
