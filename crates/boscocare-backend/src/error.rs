use serde::Deserialize;
use thiserror::Error;

/// Error code the data service returns when a single-row select matched
/// nothing.
pub const NO_ROWS_CODE: &str = "PGRST116";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("no rows returned")]
    NoRows,

    #[error("unexpected backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Both services report errors as JSON, with different field names.
#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    code: Option<serde_json::Value>,
    error_code: Option<String>,
}

impl BackendError {
    pub fn api(status: u16, code: Option<&str>, message: impl Into<String>) -> Self {
        BackendError::Api {
            status,
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// Builds an error from a non-success response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let code = parsed.error_code.or(match parsed.code {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        });

        if code.as_deref() == Some(NO_ROWS_CODE) {
            return BackendError::NoRows;
        }

        let message = parsed
            .message
            .or(parsed.msg)
            .or(parsed.error_description)
            .or(parsed.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("backend returned status {status}")
                } else {
                    body.trim().to_string()
                }
            });

        BackendError::Api {
            status,
            code,
            message,
        }
    }

    /// A single-row lookup that matched nothing. Callers treat this as
    /// absence, not failure.
    pub fn is_no_rows(&self) -> bool {
        match self {
            BackendError::NoRows => true,
            BackendError::Api { code, .. } => code.as_deref() == Some(NO_ROWS_CODE),
            _ => false,
        }
    }

    /// Reads a response body, turning non-success statuses into errors.
    pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(BackendError::from_response(status.as_u16(), &body))
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::Transport(err) => err.status().map(|s| s.as_u16()),
            BackendError::NoRows => Some(406),
            BackendError::Decode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rows_code_maps_to_no_rows() {
        let body = r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#;
        let err = BackendError::from_response(406, body);
        assert!(matches!(err, BackendError::NoRows));
        assert!(err.is_no_rows());
    }

    #[test]
    fn test_auth_error_body() {
        let body = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        let err = BackendError::from_response(400, body);
        match err {
            BackendError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("invalid_credentials"));
                assert_eq!(message, "Invalid login credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_legacy_oauth_error_body() {
        let body = r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#;
        let err = BackendError::from_response(400, body);
        assert_eq!(err.to_string(), "Email not confirmed");
        assert!(!err.is_no_rows());
    }

    #[test]
    fn test_non_json_body() {
        let err = BackendError::from_response(502, "upstream unavailable");
        assert_eq!(err.to_string(), "upstream unavailable");
        assert_eq!(err.status(), Some(502));

        let err = BackendError::from_response(500, "");
        assert_eq!(err.to_string(), "backend returned status 500");
    }

    #[test]
    fn test_data_error_body() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"new row violates row-level security policy"}"#;
        let err = BackendError::from_response(403, body);
        assert_eq!(err.to_string(), "new row violates row-level security policy");
        assert!(!err.is_no_rows());
    }
}
