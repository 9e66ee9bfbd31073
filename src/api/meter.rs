//! Meter API handlers

use crate::api::tank::EquipmentListQuery;
use crate::api::{PaginatedResponse, SuccessResponse};
use crate::domain::{CreateMeterInput, MeterId, UpdateMeterInput};
use crate::error::Result;
use crate::middleware::TenantContext;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// GET /api/v1.0/meters
pub async fn list<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Query(query): Query<EquipmentListQuery>,
) -> Result<impl IntoResponse> {
    let (meters, total) = state
        .meter_service()
        .list(
            &ctx.scope,
            query.service_address_id,
            query.offset(),
            query.per_page,
        )
        .await?;

    Ok(Json(PaginatedResponse::new(
        meters,
        query.page,
        query.per_page,
        total,
    )))
}

/// GET /api/v1.0/meter/{id}
pub async fn get<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(id): Path<MeterId>,
) -> Result<impl IntoResponse> {
    let meter = state.meter_service().get(&ctx.scope, id).await?;
    Ok(Json(SuccessResponse::new(meter)))
}

/// POST /api/v1.0/meters
pub async fn create<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Json(input): Json<CreateMeterInput>,
) -> Result<impl IntoResponse> {
    let meter = state.meter_service().create(&ctx.scope, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(meter))))
}

/// PUT /api/v1.0/meter/{id}
pub async fn update<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(id): Path<MeterId>,
    Json(input): Json<UpdateMeterInput>,
) -> Result<impl IntoResponse> {
    let meter = state.meter_service().update(&ctx.scope, id, input).await?;
    Ok(Json(SuccessResponse::new(meter)))
}
