use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{debug, info};

use common::types::Message;
use service::coffee::domain::{Coffee, CoffeeId, CoffeeInput};

use crate::errors::ApiError;
use crate::state::AppState;
use crate::vote_cookie;

/// Request body for create and update. `id` and `votes` are accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct CoffeePayload {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub votes: Option<i64>,
}

impl CoffeePayload {
    fn input(&self) -> CoffeeInput {
        CoffeeInput::new(self.name.clone(), self.description.as_deref(), self.image_url.as_deref())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Invalid(rejection.status(), rejection.body_text())
    }
}

#[utoipa::path(
    get,
    path = "/coffees",
    responses(
        (status = 200, description = "All coffees", body = [crate::openapi::CoffeeDoc]),
        (status = 500, description = "Store failure", body = crate::openapi::DetailDoc)
    ),
    tag = "coffees"
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Coffee>>, ApiError> {
    let coffees = state.coffees.list().await?;
    Ok(Json(coffees))
}

#[utoipa::path(
    post,
    path = "/coffees",
    request_body = crate::openapi::CoffeeInputDoc,
    responses(
        (status = 201, description = "Coffee created with zero votes", body = crate::openapi::CoffeeDoc),
        (status = 422, description = "Invalid body", body = crate::openapi::DetailDoc),
        (status = 500, description = "Store failure", body = crate::openapi::DetailDoc)
    ),
    tag = "coffees"
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CoffeePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Coffee>), ApiError> {
    let Json(payload) = payload?;
    if payload.id.is_some() || payload.votes.is_some() {
        debug!("ignoring client supplied id/votes on create");
    }
    let created = state
        .coffees
        .create(payload.input())
        .await
        .map_err(|e| ApiError::from(e).with_store_detail("Failed to create coffee."))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/coffees/{id}",
    params(("id" = String, Path, description = "Coffee id")),
    request_body = crate::openapi::CoffeeInputDoc,
    responses(
        (status = 200, description = "Coffee updated", body = crate::openapi::CoffeeDoc),
        (status = 404, description = "Unknown id", body = crate::openapi::DetailDoc),
        (status = 422, description = "Invalid body", body = crate::openapi::DetailDoc)
    ),
    tag = "coffees"
)]
/// The response echoes the submitted fields under the path id. Stored votes
/// are not read back, so `votes` is reported as 0.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CoffeePayload>, JsonRejection>,
) -> Result<Json<Coffee>, ApiError> {
    let Json(payload) = payload?;
    let input = payload.input();
    state.coffees.update(&id, &input).await?;
    Ok(Json(input.into_coffee(CoffeeId::from_path(&id))))
}

#[utoipa::path(
    delete,
    path = "/coffees/{id}",
    params(("id" = String, Path, description = "Coffee id")),
    responses(
        (status = 204, description = "Coffee deleted"),
        (status = 404, description = "Unknown id", body = crate::openapi::DetailDoc)
    ),
    tag = "coffees"
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.coffees.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/coffees/{id}/vote",
    params(("id" = String, Path, description = "Coffee id")),
    responses(
        (status = 200, description = "Vote counted, `voted_for_{id}` cookie set", body = crate::openapi::MessageDoc),
        (status = 400, description = "Already voted from this browser", body = crate::openapi::DetailDoc),
        (status = 404, description = "Unknown id", body = crate::openapi::DetailDoc)
    ),
    tag = "coffees"
)]
pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Message>), ApiError> {
    if vote_cookie::has_voted(&jar, &id) {
        info!(%id, "duplicate vote refused");
        return Err(ApiError::AlreadyVoted);
    }
    state.coffees.vote(&id).await?;
    let jar = jar.add(vote_cookie::marker(&id));
    Ok((jar, Json(Message::new("Vote recorded successfully!"))))
}
