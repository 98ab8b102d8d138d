pub mod goods;
pub mod measure;

pub use goods::{DataSource, GoodsDescription, GoodsMeasures, TradeMovement};
pub use measure::{AdditionalCode, Measure};
