//! Customer repository

use super::scope_sql::{self, ScopedUpdate};
use crate::domain::{Customer, CustomerId, NewCustomer, UpdateCustomerInput};
use crate::error::{AppError, Result};
use crate::policy::{ResourceKind, ScopedPredicate};
use async_trait::async_trait;
use sqlx::MySqlPool;

const COLUMNS: &str = "c.id, c.dealer_id, c.account_id, c.customer_name, c.customer_number, \
                       c.address1, c.address2, c.city, c.state, c.postal_code, c.country, \
                       c.email, c.phone, c.latitude, c.longitude, c.active";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Customer>>;
    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Customer>>;
    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64>;
    async fn insert(&self, record: &NewCustomer) -> Result<Customer>;
    /// Apply `input` to the customer matched by `predicate`; `None` when no row matched.
    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateCustomerInput,
    ) -> Result<Option<Customer>>;
}

pub struct CustomerRepositoryImpl {
    pool: MySqlPool,
}

impl CustomerRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_inserted(&self, id: CustomerId) -> Result<Customer> {
        sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM frontend_customer c WHERE c.id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create customer")))
    }
}

#[async_trait]
impl CustomerRepository for CustomerRepositoryImpl {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Customer>> {
        predicate.expect_kind(ResourceKind::Customer)?;
        let mut qb = scope_sql::select(COLUMNS, predicate)?;
        qb.push(" LIMIT 1");
        let customer = qb
            .build_query_as::<Customer>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Customer>> {
        predicate.expect_kind(ResourceKind::Customer)?;
        let mut qb = scope_sql::select(COLUMNS, predicate)?;
        qb.push(" ORDER BY c.customer_name, c.id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let customers = qb
            .build_query_as::<Customer>()
            .fetch_all(&self.pool)
            .await?;
        Ok(customers)
    }

    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64> {
        predicate.expect_kind(ResourceKind::Customer)?;
        scope_sql::count(&self.pool, predicate).await
    }

    async fn insert(&self, record: &NewCustomer) -> Result<Customer> {
        let input = record.fields();
        let result = sqlx::query(
            r#"
            INSERT INTO frontend_customer
                (dealer_id, customer_name, customer_number, address1, address2, city, state,
                 postal_code, country, email, phone, latitude, longitude, active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.dealer_id())
        .bind(&input.customer_name)
        .bind(&input.customer_number)
        .bind(&input.address1)
        .bind(&input.address2)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.active.unwrap_or(true))
        .execute(&self.pool)
        .await?;

        self.fetch_inserted(CustomerId(result.last_insert_id() as i64))
            .await
    }

    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateCustomerInput,
    ) -> Result<Option<Customer>> {
        predicate.expect_kind(ResourceKind::Customer)?;
        let mut update = ScopedUpdate::new(ResourceKind::Customer);
        update
            .set("c.customer_name", input.customer_name.clone())
            .set("c.customer_number", input.customer_number.clone())
            .set("c.address1", input.address1.clone())
            .set("c.address2", input.address2.clone())
            .set("c.city", input.city.clone())
            .set("c.state", input.state.clone())
            .set("c.postal_code", input.postal_code.clone())
            .set("c.country", input.country.clone())
            .set("c.email", input.email.clone())
            .set("c.phone", input.phone.clone())
            .set("c.latitude", input.latitude)
            .set("c.longitude", input.longitude)
            .set("c.active", input.active);
        update.execute(&self.pool, predicate).await?;

        self.find_one(predicate).await
    }
}
