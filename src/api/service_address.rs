//! Service address API handlers (nested under a customer)

use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{
    CreateServiceAddressInput, CustomerId, ServiceAddressId, UpdateServiceAddressInput,
};
use crate::error::Result;
use crate::middleware::TenantContext;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// GET /api/v1.0/customer/{id}/service-addresses
pub async fn list<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(customer_id): Path<CustomerId>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (rows, total) = state
        .service_address_service()
        .list(
            &ctx.scope,
            customer_id,
            pagination.offset(),
            pagination.per_page,
        )
        .await?;

    Ok(Json(PaginatedResponse::new(
        rows,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// GET /api/v1.0/customer/{id}/service-address/{sa_id}
pub async fn get<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path((customer_id, id)): Path<(CustomerId, ServiceAddressId)>,
) -> Result<impl IntoResponse> {
    let sa = state
        .service_address_service()
        .get(&ctx.scope, customer_id, id)
        .await?;
    Ok(Json(SuccessResponse::new(sa)))
}

/// POST /api/v1.0/customer/{id}/service-addresses
pub async fn create<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(customer_id): Path<CustomerId>,
    Json(input): Json<CreateServiceAddressInput>,
) -> Result<impl IntoResponse> {
    let sa = state
        .service_address_service()
        .create(&ctx.scope, customer_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(sa))))
}

/// PUT /api/v1.0/customer/{id}/service-address/{sa_id}
pub async fn update<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path((customer_id, id)): Path<(CustomerId, ServiceAddressId)>,
    Json(input): Json<UpdateServiceAddressInput>,
) -> Result<impl IntoResponse> {
    let sa = state
        .service_address_service()
        .update(&ctx.scope, customer_id, id, input)
        .await?;
    Ok(Json(SuccessResponse::new(sa)))
}
