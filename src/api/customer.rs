//! Customer API handlers

use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{CreateCustomerInput, CustomerId, UpdateCustomerInput};
use crate::error::Result;
use crate::middleware::TenantContext;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// GET /api/v1.0/customers
pub async fn list<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (customers, total) = state
        .customer_service()
        .list(&ctx.scope, pagination.offset(), pagination.per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(
        customers,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// GET /api/v1.0/customer/{id}
pub async fn get<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(id): Path<CustomerId>,
) -> Result<impl IntoResponse> {
    let customer = state.customer_service().get(&ctx.scope, id).await?;
    Ok(Json(SuccessResponse::new(customer)))
}

/// POST /api/v1.0/customers
pub async fn create<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Json(input): Json<CreateCustomerInput>,
) -> Result<impl IntoResponse> {
    let customer = state.customer_service().create(&ctx.scope, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(customer))))
}

/// PUT /api/v1.0/customer/{id}
pub async fn update<S: HasServices>(
    State(state): State<S>,
    ctx: TenantContext,
    Path(id): Path<CustomerId>,
    Json(input): Json<UpdateCustomerInput>,
) -> Result<impl IntoResponse> {
    let customer = state
        .customer_service()
        .update(&ctx.scope, id, input)
        .await?;
    Ok(Json(SuccessResponse::new(customer)))
}
