pub mod response;
pub mod xml;
