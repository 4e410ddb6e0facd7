//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    infrastructure::{
        dto::http::{CallbackQuery, RoomDetailDto, RoomSummaryDto},
        spotify::frontend_redirect_url,
    },
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(room) => Ok(Json((&room).into())),
        Err(GetRoomDetailError::InvalidRoomId) => Err(StatusCode::BAD_REQUEST),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

/// Redirect the browser to the Spotify consent page
pub async fn login(State(state): State<Arc<AppState>>) -> Response {
    match state.auth_client.authorize_url() {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            tracing::error!("Failed to build authorize URL: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// OAuth redirect target: exchange the code and hand the token to the front end
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = query.error {
        tracing::warn!("Authorization denied: {}", error);
        return json_error(StatusCode::BAD_REQUEST, error);
    }
    let Some(code) = query.code else {
        return json_error(StatusCode::BAD_REQUEST, "Missing authorization code");
    };

    let token = match state.auth_client.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Failed to exchange authorization code: {}", e);
            return json_error(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match frontend_redirect_url(&state.frontend_url, &token) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            tracing::error!("Invalid frontend URL '{}': {}", state.frontend_url, e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
