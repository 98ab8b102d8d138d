//! Error types for TARIC lookups.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TaricError {
    #[error("http error: {0}")]
    Http(
        #[from]
        #[source]
        reqwest::Error,
    ),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request filtered by the service (HTTP 502)")]
    RateLimited,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("i/o error: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),

    #[error("csv error: {0}")]
    Csv(
        #[from]
        #[source]
        csv::Error,
    ),

    #[error("column '{column}' not found (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("json error: {0}")]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TaricError {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TaricError::Http(_)
                | TaricError::Status { .. }
                | TaricError::RateLimited
                | TaricError::MalformedResponse(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            TaricError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

impl From<quick_xml::Error> for TaricError {
    fn from(e: quick_xml::Error) -> Self {
        TaricError::MalformedResponse(e.to_string())
    }
}

pub type TaricResult<T> = Result<T, TaricError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        assert!(TaricError::RateLimited.is_transport());
        assert!(TaricError::Status {
            status: 500,
            body: String::new()
        }
        .is_transport());
        assert!(TaricError::MalformedResponse("eof".into()).is_transport());
        assert!(!TaricError::InvalidInput("x".into()).is_transport());
        assert!(!TaricError::MissingColumn {
            column: "code".into(),
            available: vec![]
        }
        .is_transport());
    }

    #[test]
    fn missing_column_lists_available_headers() {
        let e = TaricError::MissingColumn {
            column: "hs".into(),
            available: vec!["goods_code".into(), "name".into()],
        };
        assert_eq!(e.to_string(), "column 'hs' not found (available: goods_code, name)");
    }
}
