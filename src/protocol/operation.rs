/// Service namespace shared by both goods operations.
pub const SERVICE_NS: &str = "http://goodsNomenclatureForWS.ws.taric.dds.s/";

pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GoodsDescription,
    GoodsMeasures,
}

impl Operation {
    pub fn element(self) -> &'static str {
        match self {
            Operation::GoodsDescription => "goodsDescrForWs",
            Operation::GoodsMeasures => "goodsMeasForWs",
        }
    }
}
