//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "target_url": "https://example.com", "expires_in_days": 7 }
/// ```
///
/// `expires_in_days` defaults to 7 when omitted; `null` creates a link
/// that never expires.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "target_url": "https://example.com/",
///   "short_url": "http://localhost:3000/aZ3k9Q",
///   "admin_url": "http://localhost:3000/stats/aZ3k9Q",
///   "expires_at": "2025-01-08T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL or expiry is invalid.
/// Returns 503 Service Unavailable if no free key could be generated.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;
    let expires_in_days = payload.expiry_days()?;

    let link = state
        .link_service
        .create_short_link(&payload.target_url, expires_in_days)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_url: state.short_url(&link.key),
            admin_url: state.admin_url(&link.key),
            target_url: link.target_url,
            expires_at: link.expires_at,
        }),
    ))
}
