//! Natural-language assistant endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;

use crate::auth::bearer_token;
use crate::dispatch;
use crate::error::ApiResult;
use crate::state::AppState;
use sp_protocol::{AssistantQuery, AssistantReply};

/// POST /api/v1/assistant — route a free-text query.
///
/// The caller identity is resolved from the bearer token before dispatch;
/// small talk is answered even without one.
pub async fn ask(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AssistantQuery>,
) -> ApiResult<Json<AssistantReply>> {
    let caller = match bearer_token(&headers) {
        Some(token) => state.auth.authenticate(token).await,
        None => None,
    };

    let reply = dispatch::handle_query(&state, &req.query, caller.as_ref()).await?;
    Ok(Json(reply))
}
