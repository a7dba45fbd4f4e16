use crate::domain::errors::{LicenseError, UpstreamError, WebhookError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// Errors returned by handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    License(LicenseError),
    Webhook(WebhookError),
    Upstream(UpstreamError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::License(e) => license_status(e),
            Self::Webhook(e) => match e {
                WebhookError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
                WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
                WebhookError::License(e) => license_status(e),
            },
            Self::Upstream(e) => match e {
                UpstreamError::Status { .. } => StatusCode::BAD_GATEWAY,
                UpstreamError::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::License(e) => e.to_string(),
            Self::Webhook(e) => e.to_string(),
            Self::Upstream(e) => e.to_string(),
        }
    }
}

fn license_status(error: &LicenseError) -> StatusCode {
    match error {
        LicenseError::Missing | LicenseError::UnknownTier(_) => StatusCode::BAD_REQUEST,
        LicenseError::InvalidFormat
        | LicenseError::NotFound
        | LicenseError::Inactive
        | LicenseError::Expired => StatusCode::FORBIDDEN,
        LicenseError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        LicenseError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<LicenseError> for ApiError {
    fn from(error: LicenseError) -> Self {
        Self::License(error)
    }
}

impl From<WebhookError> for ApiError {
    fn from(error: WebhookError) -> Self {
        Self::Webhook(error)
    }
}

impl From<UpstreamError> for ApiError {
    fn from(error: UpstreamError) -> Self {
        Self::Upstream(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        }
        // Storage failures stay in the log
        let message = match &self {
            Self::License(LicenseError::Storage(_))
            | Self::Webhook(WebhookError::License(LicenseError::Storage(_))) => {
                "Internal server error".to_string()
            }
            _ => self.message(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(LicenseError::NotFound).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(LicenseError::QuotaExceeded {
                calls_today: 11,
                limit: 10
            })
            .status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::from(WebhookError::InvalidSignature).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(WebhookError::NotConfigured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(UpstreamError::Status {
                source_name: "Binance".to_string(),
                status: 418
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_storage_error_is_not_leaked() {
        let response =
            ApiError::from(LicenseError::Storage(anyhow::anyhow!("disk I/O error"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
