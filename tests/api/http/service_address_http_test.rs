//! Service address endpoints nested under a customer

use super::{data_ids, get_json, post_json, put_json, seeded_app};
use axum::http::StatusCode;
use serde_json::json;

fn new_service_address(short_code: &str) -> serde_json::Value {
    json!({
        "service_address_account_number": "SA-100",
        "address1": "77 Grain Rd",
        "city": "Nevada",
        "state": "IA",
        "postal_code": "50201",
        "short_code": short_code,
        "product_rate": 2.35
    })
}

#[tokio::test]
async fn test_list_service_addresses_of_own_customer() {
    let (app, state, seed) = seeded_app().await;
    let alice = state.token_for(seed.a.user, "alice");

    let (status, body) = get_json(
        &app,
        &format!("/api/v1.0/customer/{}/service-addresses", seed.a.customer),
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_ids(&body), vec![seed.a.service_address.get()]);
}

#[tokio::test]
async fn test_create_binds_to_path_customer() {
    let (app, state, seed) = seeded_app().await;
    let alice = state.token_for(seed.a.user, "alice");

    let mut input = new_service_address("NP-002");
    input["customer_id"] = json!(seed.b.customer.get());

    let (status, body) = post_json(
        &app,
        &format!("/api/v1.0/customer/{}/service-addresses", seed.a.customer),
        Some(&alice),
        &input,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let data = &body.unwrap()["data"];
    assert_eq!(data["customer_id"], seed.a.customer.get());
    assert_eq!(data["product_rate"], 2.35);
}

#[tokio::test]
async fn test_create_under_foreign_customer_is_not_found() {
    let (app, state, seed) = seeded_app().await;
    let alice = state.token_for(seed.a.user, "alice");

    let (status, _) = post_json(
        &app,
        &format!("/api/v1.0/customer/{}/service-addresses", seed.b.customer),
        Some(&alice),
        &new_service_address("NP-003"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let tables = state.store.tables.read().await;
    assert_eq!(tables.service_addresses.len(), 2);
}

#[tokio::test]
async fn test_duplicate_short_code_is_constraint_violation() {
    let (app, state, seed) = seeded_app().await;
    let alice = state.token_for(seed.a.user, "alice");

    // SG-001 belongs to the other dealer; the response must not say so
    let (status, body) = post_json(
        &app,
        &format!("/api/v1.0/customer/{}/service-addresses", seed.a.customer),
        Some(&alice),
        &new_service_address("SG-001"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body.unwrap();
    assert_eq!(body["error"], "constraint_violation");
    assert!(!body["message"].as_str().unwrap().contains("SG-001"));
}

#[tokio::test]
async fn test_update_service_address() {
    let (app, state, seed) = seeded_app().await;
    let alice = state.token_for(seed.a.user, "alice");

    let (status, body) = put_json(
        &app,
        &format!(
            "/api/v1.0/customer/{}/service-address/{}",
            seed.a.customer, seed.a.service_address
        ),
        Some(&alice),
        &json!({ "notes": "Dog on premises", "tax_rate": 0.07 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body.unwrap()["data"];
    assert_eq!(data["notes"], "Dog on premises");
    assert_eq!(data["tax_rate"], 0.07);
    assert_eq!(data["short_code"], "NP-001");
}
