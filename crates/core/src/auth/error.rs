use thiserror::Error;

/// Why a request was not admitted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("invalid bearer credential")]
    InvalidCredential,
}

impl AuthRejection {
    /// Stable identifier used as a structured log field.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader => "malformed_header",
            Self::InvalidCredential => "invalid_credential",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasons_are_distinct() {
        assert_eq!(AuthRejection::MissingHeader.reason(), "missing_header");
        assert_eq!(AuthRejection::MalformedHeader.reason(), "malformed_header");
        assert_eq!(AuthRejection::InvalidCredential.reason(), "invalid_credential");
    }
}
