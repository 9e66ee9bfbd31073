//! Tank API handlers

use crate::api::{
    default_page, default_per_page, deserialize_page, deserialize_per_page, PaginatedResponse,
    SuccessResponse,
};
use crate::domain::{CreateTankInput, ServiceAddressId, TankId, UpdateTankInput};
use crate::error::Result;
use crate::middleware::TenantContext;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

/// Listing query shared by tanks and meters
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentListQuery {
    #[serde(default = "default_page", deserialize_with = "deserialize_page")]
    pub page: i64,
    #[serde(
        default = "default_per_page",
        deserialize_with = "deserialize_per_page",
        alias = "limit"
    )]
    pub per_page: i64,
    pub service_address_id: Option<ServiceAddressId>,
}

impl EquipmentListQuery {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// GET /api/v1.0/tanks
pub async fn list<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Query(query): Query<EquipmentListQuery>,
) -> Result<impl IntoResponse> {
    let (tanks, total) = state
        .tank_service()
        .list(
            &ctx.scope,
            query.service_address_id,
            query.offset(),
            query.per_page,
        )
        .await?;

    Ok(Json(PaginatedResponse::new(
        tanks,
        query.page,
        query.per_page,
        total,
    )))
}

/// GET /api/v1.0/tank/{id}
pub async fn get<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(id): Path<TankId>,
) -> Result<impl IntoResponse> {
    let tank = state.tank_service().get(&ctx.scope, id).await?;
    Ok(Json(SuccessResponse::new(tank)))
}

/// POST /api/v1.0/tanks
pub async fn create<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Json(input): Json<CreateTankInput>,
) -> Result<impl IntoResponse> {
    let tank = state.tank_service().create(&ctx.scope, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(tank))))
}

/// PUT /api/v1.0/tank/{id}
pub async fn update<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(id): Path<TankId>,
    Json(input): Json<UpdateTankInput>,
) -> Result<impl IntoResponse> {
    let tank = state.tank_service().update(&ctx.scope, id, input).await?;
    Ok(Json(SuccessResponse::new(tank)))
}
