/*!
 * Client Module
 * Typed HTTP clients for the portfolio API: an admin session client that
 * manages login state and bearer credentials, and a public content client
 * for unauthenticated reads.
 */
pub mod content;
pub mod session;

use thiserror::Error;

use crate::error::ErrorResponse;

/// Failures a client call can surface. Transport problems, API rejections
/// and session-state problems stay distinct so callers can route them to
/// different UI states.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("session expired")]
    SessionExpired,

    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Pull the caller-facing message out of an error response body, falling
/// back to the status line when the body is not the expected shape.
pub(crate) async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
