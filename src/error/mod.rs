// Error types for the nl2formula gate

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("empty input")]
    InputEmpty,

    #[error("input exceeds {0} characters")]
    InputTooLong(usize),

    #[error("daily generation quota exhausted")]
    QuotaExceeded,

    #[error("client request rate exceeded")]
    RateLimited,

    #[error("generator output failed validation: {0}")]
    GenerationInvalid(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl GateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::InputEmpty
            | GateError::InputTooLong(_)
            | GateError::GenerationInvalid(_) => StatusCode::BAD_REQUEST,
            GateError::QuotaExceeded | GateError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GateError::Provider(_) | GateError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short localized message surfaced to the caller; internals stay in logs.
    pub fn client_message(&self) -> String {
        match self {
            GateError::InputEmpty => "입력을 입력해주세요.".to_string(),
            GateError::InputTooLong(max) => format!("입력은 {max}자 이내여야 합니다."),
            GateError::QuotaExceeded => {
                "일일 사용 한도를 초과했습니다. 내일 다시 시도해주세요.".to_string()
            }
            GateError::RateLimited => {
                "요청이 너무 많습니다. 잠시 후 다시 시도해주세요.".to_string()
            }
            GateError::GenerationInvalid(_) => {
                "유효한 수식을 생성하지 못했습니다. 표현을 조금 바꿔보세요.".to_string()
            }
            GateError::Provider(_) | GateError::Config(_) => {
                "수식을 생성하는 중 오류가 발생했습니다.".to_string()
            }
        }
    }
}

// Convert GateError to HTTP responses for Axum
impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({ "error": self.client_message() });
        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
