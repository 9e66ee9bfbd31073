//! Dealer repository (`frontend_dealer`, `frontend_dealer_account`)

use crate::domain::{Dealer, DealerId, UserId};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DealerRepository: Send + Sync {
    /// Distinct dealers linked to `user_id`. At most two are returned, which is
    /// enough to tell "one" from "more than one".
    async fn find_dealer_ids_by_user(&self, user_id: UserId) -> Result<Vec<DealerId>>;
    async fn find_by_id(&self, id: DealerId) -> Result<Option<Dealer>>;
}

pub struct DealerRepositoryImpl {
    pool: MySqlPool,
}

impl DealerRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DealerRepository for DealerRepositoryImpl {
    async fn find_dealer_ids_by_user(&self, user_id: UserId) -> Result<Vec<DealerId>> {
        let rows: Vec<(DealerId,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT dealer_id
            FROM frontend_dealer_account
            WHERE user_id = ?
            ORDER BY dealer_id
            LIMIT 2
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn find_by_id(&self, id: DealerId) -> Result<Option<Dealer>> {
        let dealer = sqlx::query_as::<_, Dealer>(
            r#"
            SELECT id, dealer_name, address1, address2, city, state, postal_code, country,
                   email, phone, timezone, website_url, start_of_billing_cycle, logo_image,
                   color_navbar_top, color_navbar_bottom
            FROM frontend_dealer
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dealer)
    }
}
