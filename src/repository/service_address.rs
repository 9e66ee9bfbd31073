//! Service address repository

use super::scope_sql::{self, ScopedUpdate};
use crate::domain::{NewServiceAddress, ServiceAddress, ServiceAddressId, UpdateServiceAddressInput};
use crate::error::{AppError, Result};
use crate::policy::{ResourceKind, ScopedPredicate};
use async_trait::async_trait;
use sqlx::MySqlPool;

const COLUMNS: &str = "sa.id, sa.customer_id, sa.service_address_account_number, sa.address1, \
                       sa.address2, sa.city, sa.state, sa.postal_code, sa.country, sa.phone, \
                       sa.latitude, sa.longitude, sa.notes, sa.routing_zone, sa.product_rate, \
                       sa.tax_rate, sa.management_rate, sa.current_balance, sa.short_code, \
                       sa.coordinates_locked";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceAddressRepository: Send + Sync {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<ServiceAddress>>;
    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ServiceAddress>>;
    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64>;
    async fn insert(&self, record: &NewServiceAddress) -> Result<ServiceAddress>;
    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateServiceAddressInput,
    ) -> Result<Option<ServiceAddress>>;
}

pub struct ServiceAddressRepositoryImpl {
    pool: MySqlPool,
}

impl ServiceAddressRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_inserted(&self, id: ServiceAddressId) -> Result<ServiceAddress> {
        sqlx::query_as::<_, ServiceAddress>(&format!(
            "SELECT {} FROM frontend_serviceaddress sa WHERE sa.id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create service address")))
    }
}

#[async_trait]
impl ServiceAddressRepository for ServiceAddressRepositoryImpl {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<ServiceAddress>> {
        predicate.expect_kind(ResourceKind::ServiceAddress)?;
        let mut qb = scope_sql::select(COLUMNS, predicate)?;
        qb.push(" LIMIT 1");
        let sa = qb
            .build_query_as::<ServiceAddress>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(sa)
    }

    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ServiceAddress>> {
        predicate.expect_kind(ResourceKind::ServiceAddress)?;
        let mut qb = scope_sql::select(COLUMNS, predicate)?;
        qb.push(" ORDER BY sa.id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = qb
            .build_query_as::<ServiceAddress>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64> {
        predicate.expect_kind(ResourceKind::ServiceAddress)?;
        scope_sql::count(&self.pool, predicate).await
    }

    async fn insert(&self, record: &NewServiceAddress) -> Result<ServiceAddress> {
        let input = record.fields();
        let result = sqlx::query(
            r#"
            INSERT INTO frontend_serviceaddress
                (customer_id, service_address_account_number, address1, address2, city, state,
                 postal_code, country, phone, latitude, longitude, notes, routing_zone,
                 product_rate, tax_rate, management_rate, short_code, coordinates_locked)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.customer_id())
        .bind(&input.service_address_account_number)
        .bind(&input.address1)
        .bind(&input.address2)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(&input.phone)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(&input.notes)
        .bind(&input.routing_zone)
        .bind(input.product_rate)
        .bind(input.tax_rate)
        .bind(input.management_rate)
        .bind(&input.short_code)
        .bind(input.coordinates_locked)
        .execute(&self.pool)
        .await?;

        self.fetch_inserted(ServiceAddressId(result.last_insert_id() as i64))
            .await
    }

    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateServiceAddressInput,
    ) -> Result<Option<ServiceAddress>> {
        predicate.expect_kind(ResourceKind::ServiceAddress)?;
        let mut update = ScopedUpdate::new(ResourceKind::ServiceAddress);
        update
            .set(
                "sa.service_address_account_number",
                input.service_address_account_number.clone(),
            )
            .set("sa.address1", input.address1.clone())
            .set("sa.address2", input.address2.clone())
            .set("sa.city", input.city.clone())
            .set("sa.state", input.state.clone())
            .set("sa.postal_code", input.postal_code.clone())
            .set("sa.country", input.country.clone())
            .set("sa.phone", input.phone.clone())
            .set("sa.latitude", input.latitude)
            .set("sa.longitude", input.longitude)
            .set("sa.notes", input.notes.clone())
            .set("sa.routing_zone", input.routing_zone.clone())
            .set("sa.product_rate", input.product_rate)
            .set("sa.tax_rate", input.tax_rate)
            .set("sa.management_rate", input.management_rate)
            .set("sa.short_code", input.short_code.clone())
            .set("sa.coordinates_locked", input.coordinates_locked);
        update.execute(&self.pool, predicate).await?;

        self.find_one(predicate).await
    }
}
