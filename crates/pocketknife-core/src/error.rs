use thiserror::Error;

/// Fatal errors for a treasury run. Any of these aborts before a single
/// chain query is dispatched.
#[derive(Debug, Error)]
pub enum TreasuryError {
    /// The input document does not match the expected shape.
    #[error("Input parse error: {0}")]
    InputParse(String),

    /// Invalid runtime configuration (worker count, denomination, endpoint).
    #[error("Config error: {0}")]
    Config(String),

    /// Reading an input or configuration file failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for TreasuryError {
    fn from(e: serde_json::Error) -> Self {
        TreasuryError::InputParse(e.to_string())
    }
}

impl From<std::io::Error> for TreasuryError {
    fn from(e: std::io::Error) -> Self {
        TreasuryError::Io(e.to_string())
    }
}

/// Per-address lookup failure.
///
/// Recovered locally: the scheduler stores it in the address's
/// `FetchResult` and the aggregator lists it in the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, reset, etc.
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint did not answer within the per-request timeout.
    #[error("Endpoint timeout: {0}")]
    Timeout(String),

    /// The endpoint has no record of the address.
    #[error("Address not found: {0}")]
    NotFound(String),

    /// The address could not be decoded or has the wrong prefix.
    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    /// Any other non-success HTTP status.
    #[error("Endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The endpoint answered with a body we could not decode.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The fetch task itself failed (worker panic or similar).
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_is_input_parse() {
        let err: TreasuryError = serde_json::from_str::<Vec<String>>("{").unwrap_err().into();
        assert!(matches!(err, TreasuryError::InputParse(_)));
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Http {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Endpoint returned HTTP 503: unavailable");
    }
}
