use thiserror::Error;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Non-2xx response, carrying the status code and response body.
    #[error("shopify API error: status {status}, body: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not decode as the expected shape.
    #[error("failed to decode response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShopifyError {
    /// The HTTP status code, when the platform answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ShopifyError::Api { status, .. } => Some(*status),
            ShopifyError::Http(e) => e.status().map(|s| s.as_u16()),
            ShopifyError::Json(_) => None,
        }
    }
}

/// Result type for Shopify client operations.
pub type Result<T> = std::result::Result<T, ShopifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_carries_status_and_body() {
        let err = ShopifyError::Api {
            status: 500,
            message: "Internal Server Error".to_owned(),
        };
        assert_eq!(err.status(), Some(500));
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("Internal Server Error"));
    }
}
