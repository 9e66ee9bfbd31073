//! Radio inventory business logic

use crate::domain::{Radio, RadioId, UpdateRadioInput};
use crate::error::Result;
use crate::policy::{ResourceKind, ScopedQueryAuthorizer, TenantScope};
use crate::repository::RadioRepository;
use std::sync::Arc;
use validator::Validate;

pub struct RadioService<R: RadioRepository> {
    repo: Arc<R>,
}

impl<R: RadioRepository> RadioService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        scope: &TenantScope,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Radio>, i64)> {
        let predicate =
            ScopedQueryAuthorizer::new(scope).predicate(ResourceKind::Radio, &[], None)?;
        let radios = self.repo.find_many(&predicate, offset, limit).await?;
        let total = self.repo.count(&predicate).await?;
        Ok((radios, total))
    }

    pub async fn get(&self, scope: &TenantScope, id: RadioId) -> Result<Radio> {
        let predicate = ScopedQueryAuthorizer::new(scope).predicate(
            ResourceKind::Radio,
            &[],
            Some(id.get()),
        )?;
        self.repo
            .find_one(&predicate)
            .await?
            .ok_or_else(|| ResourceKind::Radio.not_found())
    }

    /// Find a radio by the number the dealer assigned to it.
    pub async fn lookup(&self, scope: &TenantScope, dealer_radio_id: i64) -> Result<Radio> {
        let predicate = ScopedQueryAuthorizer::new(scope).radio_by_dealer_radio_id(dealer_radio_id);
        self.repo
            .find_one(&predicate)
            .await?
            .ok_or_else(|| ResourceKind::Radio.not_found())
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: RadioId,
        input: UpdateRadioInput,
    ) -> Result<Radio> {
        input.validate()?;

        let predicate = ScopedQueryAuthorizer::new(scope).predicate(
            ResourceKind::Radio,
            &[],
            Some(id.get()),
        )?;
        self.repo
            .update(&predicate, &input)
            .await?
            .ok_or_else(|| ResourceKind::Radio.not_found())
    }
}
