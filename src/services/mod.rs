pub mod batch;
pub mod client;
pub mod encoding;
pub mod substitute;
pub mod throttle;

pub use client::TaricClient;
