//! Radio inventory API handlers

use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{RadioId, UpdateRadioInput};
use crate::error::Result;
use crate::middleware::TenantContext;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

/// GET /api/v1.0/radios
pub async fn list<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (radios, total) = state
        .radio_service()
        .list(&ctx.scope, pagination.offset(), pagination.per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(
        radios,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// GET /api/v1.0/radio/{id}
pub async fn get<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(id): Path<RadioId>,
) -> Result<impl IntoResponse> {
    let radio = state.radio_service().get(&ctx.scope, id).await?;
    Ok(Json(SuccessResponse::new(radio)))
}

/// GET /api/v1.0/radio/lookup/{dealer_radio_id}
pub async fn lookup<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(dealer_radio_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let radio = state
        .radio_service()
        .lookup(&ctx.scope, dealer_radio_id)
        .await?;
    Ok(Json(SuccessResponse::new(radio)))
}

/// PUT /api/v1.0/radio/{id}
pub async fn update<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(id): Path<RadioId>,
    Json(input): Json<UpdateRadioInput>,
) -> Result<impl IntoResponse> {
    let radio = state.radio_service().update(&ctx.scope, id, input).await?;
    Ok(Json(SuccessResponse::new(radio)))
}
