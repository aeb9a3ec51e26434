use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::domain::{Contact, NewContact};
use crate::interface::http::problem::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn list_contacts(State(state): State<AppState>) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = state
        .contact_service
        .get_all()
        .await
        .map_err(ApiError::from_domain)?;
    Ok(Json(contacts))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Contact>> {
    let id = parse_id(&id)?;
    let contact = state
        .contact_service
        .get_by_id(id)
        .await
        .map_err(ApiError::from_domain)?;
    Ok(Json(contact))
}

pub async fn create_contact(
    State(state): State<AppState>,
    Json(request): Json<NewContact>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    let created = state
        .contact_service
        .create(request)
        .await
        .map_err(ApiError::from_domain)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<NewContact>,
) -> ApiResult<Json<Contact>> {
    let id = parse_id(&id)?;
    let updated = state
        .contact_service
        .update_and_notify(request.into_contact(id))
        .await
        .map_err(ApiError::from_domain)?;
    Ok(Json(updated))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state
        .contact_service
        .delete(id)
        .await
        .map_err(ApiError::from_domain)?;
    Ok(Json(MessageResponse {
        message: "contact deleted",
    }))
}

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("id must be an integer"))
}
