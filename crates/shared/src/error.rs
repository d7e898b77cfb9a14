use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Upstream,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_serializes_as_snake_case() {
        let body = serde_json::to_value(ApiError::new(ErrorCode::NotFound, "missing"))
            .expect("serialize");
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["message"], "missing");

        for (code, wire) in [
            (ErrorCode::Validation, "validation"),
            (ErrorCode::Upstream, "upstream"),
        ] {
            assert_eq!(serde_json::to_value(code).expect("serialize"), wire);
        }
    }
}
