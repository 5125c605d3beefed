//! Ticket API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::AppState;
use crate::utils::{AppError, AppResult};
use shared::item::ItemInput;
use shared::models::TicketView;

#[derive(Debug, Deserialize, Validate)]
pub struct TicketCreateRequest {
    #[validate(length(min = 1, max = 16, message = "room number must be 1-16 characters"))]
    pub room_number: String,
    #[validate(length(max = 64, message = "guest name too long"))]
    #[serde(default)]
    pub guest_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddItemsRequest {
    #[validate(length(max = 64, message = "guest name too long"))]
    #[serde(default)]
    pub guest_name: String,
    pub items: Vec<ItemInput>,
}

/// GET /api/tickets/:room - the room's open ticket
pub async fn get_by_room(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> AppResult<Json<TicketView>> {
    let view = state
        .tickets
        .get_ticket(&room)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Room {room} has no open ticket")))?;
    Ok(Json(view))
}

/// POST /api/tickets - open (or return) the room's ticket
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<TicketCreateRequest>,
) -> AppResult<Json<TicketView>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let view = state
        .tickets
        .create_ticket(&payload.room_number, &payload.guest_name)
        .await?;
    Ok(Json(view))
}

/// POST /api/tickets/:room/items - append items to the room's ticket
pub async fn add_items(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(payload): Json<AddItemsRequest>,
) -> AppResult<Json<TicketView>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let view = state
        .tickets
        .add_items(&room, &payload.guest_name, payload.items)
        .await?;
    Ok(Json(view))
}

/// POST /api/tickets/:room/checkout - complete the room's open ticket
pub async fn checkout(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> AppResult<Json<bool>> {
    let completed = state.tickets.checkout(&room).await?;
    Ok(Json(completed))
}
