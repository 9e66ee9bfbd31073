//! Endpoint index

use crate::api::SuccessResponse;
use crate::middleware::AuthUser;
use axum::{response::IntoResponse, Json};
use serde::Serialize;

/// Routes advertised by the index, kept in sync with `server::build_router`.
const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", "/api/v1.0/auth/me"),
    ("PUT", "/api/v1.0/auth/password"),
    ("POST", "/api/v1.0/auth/login"),
    ("GET", "/api/v1.0/logout"),
    ("POST", "/api/v1.0/logout"),
    ("GET", "/api/v1.0/customers"),
    ("POST", "/api/v1.0/customers"),
    ("GET", "/api/v1.0/customer/{id}"),
    ("PUT", "/api/v1.0/customer/{id}"),
    ("GET", "/api/v1.0/customer/{id}/service-addresses"),
    ("POST", "/api/v1.0/customer/{id}/service-addresses"),
    ("GET", "/api/v1.0/customer/{id}/service-address/{sa_id}"),
    ("PUT", "/api/v1.0/customer/{id}/service-address/{sa_id}"),
    ("GET", "/api/v1.0/tanks"),
    ("POST", "/api/v1.0/tanks"),
    ("GET", "/api/v1.0/tank/{id}"),
    ("PUT", "/api/v1.0/tank/{id}"),
    ("GET", "/api/v1.0/meters"),
    ("POST", "/api/v1.0/meters"),
    ("GET", "/api/v1.0/meter/{id}"),
    ("PUT", "/api/v1.0/meter/{id}"),
    ("GET", "/api/v1.0/radios"),
    ("GET", "/api/v1.0/radio/{id}"),
    ("PUT", "/api/v1.0/radio/{id}"),
    ("GET", "/api/v1.0/radio/lookup/{dealer_radio_id}"),
];

#[derive(Debug, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct EndpointEntry {
    pub path: &'static str,
    pub method: &'static str,
}

/// Endpoints ordered by path, then method.
pub fn endpoints() -> Vec<EndpointEntry> {
    let mut entries: Vec<EndpointEntry> = ENDPOINTS
        .iter()
        .map(|&(method, path)| EndpointEntry { path, method })
        .collect();
    entries.sort();
    entries
}

/// GET /, /api, /api/v1.0, /api/v1.0/index
pub async fn index(_user: AuthUser) -> impl IntoResponse {
    Json(SuccessResponse::new(endpoints()))
}
