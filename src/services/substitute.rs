//! Fixed local data served when the TARIC service is unreachable or the
//! client is forced offline.

use chrono::NaiveDate;

use crate::model::{
    AdditionalCode, DataSource, GoodsDescription, GoodsMeasures, Measure, TradeMovement,
};

struct CannedMeasure {
    measure_type: &'static str,
    description: &'static str,
    duty_rate: Option<&'static str>,
    additional_code: Option<(&'static str, &'static str, &'static str)>,
    validity_start: Option<&'static str>,
    validity_end: Option<&'static str>,
    regulation_id: Option<&'static str>,
    order_number: Option<&'static str>,
}

struct CannedGoods {
    goods_code: &'static str,
    en: &'static str,
    zh: &'static str,
    measures: &'static [CannedMeasure],
}

const GOODS: &[CannedGoods] = &[
    CannedGoods {
        goods_code: "87032319",
        en: "Vehicles with only spark-ignition internal combustion engine, of a cylinder capacity exceeding 1 500 cm³ but not exceeding 3 000 cm³, new",
        zh: "仅装有点燃式活塞内燃发动机的车辆，气缸容量超过1500立方厘米但不超过3000立方厘米，新的",
        measures: &[
            CannedMeasure {
                measure_type: "103",
                description: "Third country duty",
                duty_rate: Some("10%"),
                additional_code: None,
                validity_start: Some("2024-01-01"),
                validity_end: None,
                regulation_id: Some("R(2024)1234"),
                order_number: None,
            },
            CannedMeasure {
                measure_type: "VTS",
                description: "VAT standard rate",
                duty_rate: Some("20%"),
                additional_code: None,
                validity_start: Some("2023-01-01"),
                validity_end: None,
                regulation_id: None,
                order_number: None,
            },
        ],
    },
    CannedGoods {
        goods_code: "85171300",
        en: "Smartphones",
        zh: "智能手机",
        measures: &[CannedMeasure {
            measure_type: "103",
            description: "Third country duty",
            duty_rate: Some("0%"),
            additional_code: None,
            validity_start: Some("2022-01-01"),
            validity_end: None,
            regulation_id: Some("R(2021)1832"),
            order_number: None,
        }],
    },
    CannedGoods {
        goods_code: "61091000",
        en: "T-shirts, singlets and other vests, knitted or crocheted, of cotton",
        zh: "棉制针织或钩编的T恤衫、汗衫及其他背心",
        measures: &[
            CannedMeasure {
                measure_type: "103",
                description: "Third country duty",
                duty_rate: Some("12%"),
                additional_code: None,
                validity_start: Some("2024-01-01"),
                validity_end: None,
                regulation_id: Some("R(2023)2364"),
                order_number: None,
            },
            CannedMeasure {
                measure_type: "143",
                description: "Preferential tariff quota",
                duty_rate: Some("0%"),
                additional_code: None,
                validity_start: Some("2024-01-01"),
                validity_end: Some("2024-12-31"),
                regulation_id: Some("R(2023)0980"),
                order_number: Some("091234"),
            },
        ],
    },
    CannedGoods {
        goods_code: "73181595",
        en: "Other screws and bolts, of iron or steel, with heads",
        zh: "钢铁制带头螺钉及螺栓",
        measures: &[
            CannedMeasure {
                measure_type: "103",
                description: "Third country duty",
                duty_rate: Some("3.7%"),
                additional_code: None,
                validity_start: Some("2024-01-01"),
                validity_end: None,
                regulation_id: Some("R(2023)2364"),
                order_number: None,
            },
            CannedMeasure {
                measure_type: "552",
                description: "Definitive anti-dumping duty",
                duty_rate: Some("22.1%"),
                additional_code: Some(("C999", "C", "Other")),
                validity_start: Some("2022-02-17"),
                validity_end: None,
                regulation_id: Some("R(2022)0191"),
                order_number: None,
            },
        ],
    },
];

fn lookup(goods_code: &str) -> Option<&'static CannedGoods> {
    GOODS.iter().find(|g| g.goods_code == goods_code.trim())
}

fn text_for(goods: &CannedGoods, language_code: &str) -> &'static str {
    match language_code.to_uppercase().as_str() {
        "ZH" => goods.zh,
        _ => goods.en,
    }
}

impl CannedMeasure {
    fn to_measure(&self) -> Measure {
        Measure {
            measure_type: self.measure_type.to_string(),
            measure_type_description: self.description.to_string(),
            duty_rate: self.duty_rate.map(str::to_string),
            additional_code: self.additional_code.map(|(code, code_id, description)| AdditionalCode {
                code: code.to_string(),
                code_id: code_id.to_string(),
                description: description.to_string(),
            }),
            validity_start_date: self.validity_start.map(str::to_string),
            validity_end_date: self.validity_end.map(str::to_string),
            regulation_id: self.regulation_id.map(str::to_string),
            order_number: self.order_number.map(str::to_string),
        }
    }
}

pub fn goods_description(
    goods_code: &str,
    language_code: &str,
    reference_date: NaiveDate,
) -> GoodsDescription {
    let text = match lookup(goods_code) {
        Some(goods) => text_for(goods, language_code).to_string(),
        None => format!("Goods code {goods_code}"),
    };

    GoodsDescription::new(goods_code, language_code, reference_date, &text, DataSource::Substitute)
}

pub fn goods_measures(
    goods_code: &str,
    country_code: &str,
    reference_date: NaiveDate,
    trade_movement: TradeMovement,
) -> GoodsMeasures {
    let goods = lookup(goods_code);

    GoodsMeasures {
        goods_code: goods_code.to_string(),
        country_code: country_code.to_uppercase(),
        reference_date,
        trade_movement,
        measures: goods
            .map(|g| g.measures.iter().map(CannedMeasure::to_measure).collect())
            .unwrap_or_default(),
        description: goods.map(|g| g.en.to_string()),
        source: DataSource::Substitute,
    }
}

#[cfg(test)]
fn known_codes() -> impl Iterator<Item = &'static str> {
    GOODS.iter().map(|g| g.goods_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn languages_differ_for_known_codes() {
        for code in known_codes() {
            let en = goods_description(code, "en", date());
            let zh = goods_description(code, "zh", date());
            assert_eq!(en.language_code, "EN");
            assert_eq!(zh.language_code, "ZH");
            assert_ne!(en.description, zh.description);
        }
    }

    #[test]
    fn other_languages_fall_back_to_english() {
        let fr = goods_description("85171300", "fr", date());
        assert_eq!(fr.description, "Smartphones");
        assert_eq!(fr.language_code, "FR");
    }

    #[test]
    fn unknown_code_is_synthesized() {
        let d = goods_description("01012100", "EN", date());
        assert_eq!(d.description, "Goods code 01012100");
        let m = goods_measures("01012100", "us", date(), TradeMovement::Export);
        assert!(m.measures.is_empty());
        assert_eq!(m.country_code, "US");
        assert_eq!(m.description, None);
    }

    #[test]
    fn canned_additional_code() {
        let m = goods_measures("73181595", "CN", date(), TradeMovement::Import);
        let ad = m.measures[1].additional_code.as_ref().unwrap();
        assert_eq!(ad.code, "C999");
        assert_eq!(m.source, DataSource::Substitute);
    }
}
