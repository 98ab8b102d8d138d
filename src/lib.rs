//! EU TARIC goods lookups over the SOAP goods service, with a deterministic
//! local substitute dataset when the service cannot answer.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;

pub use config::ClientConfig;
pub use error::{TaricError, TaricResult};
pub use model::{
    AdditionalCode, DataSource, GoodsDescription, GoodsMeasures, Measure, TradeMovement,
};
pub use services::TaricClient;
