use chrono::{Local, NaiveDate};
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::config::{ClientConfig, DEFAULT_LANGUAGE};
use crate::error::{TaricError, TaricResult};
use crate::model::{GoodsDescription, GoodsMeasures, TradeMovement};
use crate::parsers::response;
use crate::protocol::{self, Operation};
use crate::services::substitute;
use crate::services::throttle::Throttle;

const ERROR_SNIPPET_CHARS: usize = 400;

/// TARIC goods service client.
pub struct TaricClient {
    config: ClientConfig,
    http: Client,
    throttle: Throttle,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl TaricClient {
    pub fn new(config: ClientConfig) -> TaricResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        let throttle = Throttle::per_second(config.max_requests_per_second);

        Ok(TaricClient {
            config,
            http,
            throttle,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn describe(
        &self,
        goods_code: &str,
        language_code: Option<&str>,
        reference_date: Option<NaiveDate>,
    ) -> GoodsDescription {
        let language = language_code.unwrap_or(DEFAULT_LANGUAGE).to_uppercase();
        let date = reference_date.unwrap_or_else(today);

        if self.config.force_substitute {
            return substitute::goods_description(goods_code, &language, date);
        }

        match self.fetch_description(goods_code, &language, date) {
            Ok(Some(description)) => description,
            Ok(None) => {
                warn!("no description returned for {goods_code}, serving substitute data");
                substitute::goods_description(goods_code, &language, date)
            }
            Err(e) => {
                log_fallback(Operation::GoodsDescription, goods_code, &e);
                substitute::goods_description(goods_code, &language, date)
            }
        }
    }

    pub fn lookup_measures(
        &self,
        goods_code: &str,
        country_code: Option<&str>,
        trade_movement: TradeMovement,
        reference_date: Option<NaiveDate>,
    ) -> GoodsMeasures {
        let country = country_code
            .unwrap_or(self.config.default_country.as_str())
            .to_uppercase();
        let date = reference_date.unwrap_or_else(today);

        if self.config.force_substitute {
            return substitute::goods_measures(goods_code, &country, date, trade_movement);
        }

        match self.fetch_measures(goods_code, &country, trade_movement, date) {
            Ok(Some(measures)) => measures,
            Ok(None) => {
                warn!("no measures returned for {goods_code}, serving substitute data");
                substitute::goods_measures(goods_code, &country, date, trade_movement)
            }
            Err(e) => {
                log_fallback(Operation::GoodsMeasures, goods_code, &e);
                substitute::goods_measures(goods_code, &country, date, trade_movement)
            }
        }
    }

    /// Remote description lookup without fallback. `Ok(None)` means the
    /// service answered without data.
    pub fn fetch_description(
        &self,
        goods_code: &str,
        language_code: &str,
        reference_date: NaiveDate,
    ) -> TaricResult<Option<GoodsDescription>> {
        let envelope = protocol::goods_description_request(goods_code, language_code, reference_date);
        let body = self.post(Operation::GoodsDescription, envelope)?;
        response::parse_goods_description(&body, goods_code, language_code)
    }

    pub fn fetch_measures(
        &self,
        goods_code: &str,
        country_code: &str,
        trade_movement: TradeMovement,
        reference_date: NaiveDate,
    ) -> TaricResult<Option<GoodsMeasures>> {
        let envelope =
            protocol::goods_measures_request(goods_code, country_code, reference_date, trade_movement);
        let body = self.post(Operation::GoodsMeasures, envelope)?;
        response::parse_goods_measures(&body, goods_code, country_code, trade_movement)
    }

    fn post(&self, op: Operation, envelope: String) -> TaricResult<String> {
        self.throttle.wait();
        debug!("POST {} ({})", self.config.api_url, op.element());

        let resp = self
            .http
            .post(&self.config.api_url)
            .header(CONTENT_TYPE, protocol::CONTENT_TYPE)
            .header("SOAPAction", "")
            .body(envelope)
            .send()?;

        let status = resp.status();
        if status == StatusCode::BAD_GATEWAY {
            return Err(TaricError::RateLimited);
        }

        // Read as text first so a failing status keeps its body for the log.
        let text = resp.text()?;

        if !status.is_success() {
            return Err(TaricError::Status {
                status: status.as_u16(),
                body: snippet(&text),
            });
        }

        Ok(text)
    }
}

fn log_fallback(op: Operation, goods_code: &str, err: &TaricError) {
    match err {
        TaricError::RateLimited => warn!(
            "{} for {goods_code} was rate-limited (HTTP 502), serving substitute data",
            op.element()
        ),
        e if e.is_timeout() => warn!(
            "{} for {goods_code} timed out, serving substitute data",
            op.element()
        ),
        e => warn!(
            "{} for {goods_code} failed ({e}), serving substitute data",
            op.element()
        ),
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > ERROR_SNIPPET_CHARS {
        let cut: String = trimmed.chars().take(ERROR_SNIPPET_CHARS).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}
