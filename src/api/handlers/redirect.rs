//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use std::net::SocketAddr;

use crate::application::services::VisitContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short key to its target URL.
///
/// # Endpoint
///
/// `GET /{key}`
///
/// Resolution is cache-first; see
/// [`ResolutionService`](crate::application::services::ResolutionService).
/// The visit is queued for background recording and never delays the
/// response.
///
/// # Errors
///
/// Returns 404 Not Found if the key is unknown or the link is inactive.
/// Returns 410 Gone if the link has expired.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let context = VisitContext {
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ip: Some(client_ip(&headers, addr, state.behind_proxy)),
    };

    let target = state.resolution_service.resolve(&key, context).await?;

    Ok(Redirect::temporary(&target))
}
