//! Error type shared by every lookup operation.
//!
//! Messages only ever carry the public prefix. The password and its full digest
//! never appear in an error.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("failed to compute password digest: {0}")]
    Hashing(#[source] std::io::Error),

    #[error("digest has {len} hex characters but splitting off the prefix needs {required}")]
    InsufficientDigestLength { len: usize, required: usize },

    #[error("HTTP request failed for prefix {prefix}: {source}")]
    Transport {
        prefix: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for prefix {prefix}")]
    HttpStatus { prefix: String, status: u16 },

    #[error("malformed range response for prefix {prefix} at line {line}: {reason}")]
    MalformedResponse { prefix: String, line: usize, reason: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Returns true for failures reaching the range service, as opposed to
    /// failures interpreting what it sent back.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::HttpStatus { .. })
    }

    /// Transport failures may succeed on a later attempt. Everything else is
    /// either a caller mistake or a contract change on the service side.
    pub fn is_retryable(&self) -> bool {
        self.is_transport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        let status = Error::HttpStatus { prefix: "5BAA6".into(), status: 503 };
        assert!(status.is_transport());
        assert!(status.is_retryable());

        let malformed =
            Error::MalformedResponse { prefix: "5BAA6".into(), line: 3, reason: "missing ':'" };
        assert!(!malformed.is_transport());
        assert!(!malformed.is_retryable());
        assert!(!Error::InvalidInput("empty password").is_retryable());
    }

    #[test]
    fn test_messages_name_only_the_prefix() {
        let err =
            Error::MalformedResponse { prefix: "5BAA6".into(), line: 2, reason: "bad frequency" };
        assert_eq!(
            err.to_string(),
            "malformed range response for prefix 5BAA6 at line 2: bad frequency"
        );
        let err = Error::HttpStatus { prefix: "CBFDA".into(), status: 429 };
        assert_eq!(err.to_string(), "HTTP 429 for prefix CBFDA");
    }
}
