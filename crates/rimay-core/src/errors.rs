use std::time::Duration;

/// Errors raised while talking to the translation backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    #[error("server error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network_error",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "server_error",
            Self::NotFound(_) => "not_found",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Decode(_) => "decode_error",
        }
    }

    /// Whether the backend answered with a non-success HTTP status.
    pub fn is_status(&self) -> bool {
        matches!(
            self,
            Self::Status { .. } | Self::NotFound(_) | Self::InvalidRequest(_)
        )
    }

    /// Classify an HTTP status code. The backend reports failures as
    /// `{"error": "..."}`; that message is preferred over the raw body.
    pub fn from_status(status: u16, body: String) -> Self {
        let message = extract_error_message(&body).unwrap_or(body);
        match status {
            400 | 422 => Self::InvalidRequest(message),
            404 => Self::NotFound(message),
            _ => Self::Status {
                status,
                body: message,
            },
        }
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str())
        .map(str::to_string)
}

/// Errors surfaced by the translation resolver.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("unsupported language pair: {src} -> {dest}")]
    UnsupportedPair { src: String, dest: String },
    #[error("remote translation failed: {0}")]
    Remote(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(400, "bad".into()),
            ApiError::InvalidRequest(_)
        ));
        assert!(matches!(
            ApiError::from_status(404, "missing".into()),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(500, "boom".into()),
            ApiError::Status { status: 500, .. }
        ));
    }

    #[test]
    fn from_status_prefers_backend_error_field() {
        let err = ApiError::from_status(404, r#"{"error": "Palabra no encontrada"}"#.into());
        assert_eq!(err, ApiError::NotFound("Palabra no encontrada".into()));
    }

    #[test]
    fn from_status_keeps_plain_body() {
        let err = ApiError::from_status(502, "Bad Gateway".into());
        assert_eq!(
            err.to_string(),
            "server error 502: Bad Gateway"
        );
    }

    #[test]
    fn status_classification() {
        assert!(ApiError::from_status(503, String::new()).is_status());
        assert!(ApiError::NotFound("x".into()).is_status());
        assert!(!ApiError::Network("refused".into()).is_status());
        assert!(!ApiError::Decode("eof".into()).is_status());
    }

    #[test]
    fn error_kind_strings() {
        assert_eq!(ApiError::Network("x".into()).error_kind(), "network_error");
        assert_eq!(ApiError::Timeout(Duration::from_secs(1)).error_kind(), "timeout");
        assert_eq!(ApiError::Decode("x".into()).error_kind(), "decode_error");
    }

    #[test]
    fn translate_error_wraps_api_error() {
        let err: TranslateError = ApiError::Network("refused".into()).into();
        assert_eq!(
            err.to_string(),
            "remote translation failed: network error: refused"
        );
    }
}
