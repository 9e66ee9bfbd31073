//! Service address business logic
//!
//! Every operation addresses the service address through its customer, and the
//! customer is looked up under the caller's dealer first.

use crate::domain::{
    CreateServiceAddressInput, CustomerId, ServiceAddress, ServiceAddressId,
    UpdateServiceAddressInput,
};
use crate::error::Result;
use crate::policy::{ResourceKind, ScopedQueryAuthorizer, TenantScope};
use crate::repository::{CustomerRepository, ServiceAddressRepository};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct ServiceAddressService<S: ServiceAddressRepository, C: CustomerRepository> {
    repo: Arc<S>,
    customer_repo: Arc<C>,
}

impl<S: ServiceAddressRepository, C: CustomerRepository> ServiceAddressService<S, C> {
    pub fn new(repo: Arc<S>, customer_repo: Arc<C>) -> Self {
        Self {
            repo,
            customer_repo,
        }
    }

    /// Service addresses of one customer. A customer outside the caller's
    /// dealer is reported as missing rather than as an empty list.
    pub async fn list(
        &self,
        scope: &TenantScope,
        customer_id: CustomerId,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ServiceAddress>, i64)> {
        let auth = ScopedQueryAuthorizer::new(scope);
        let parent = auth.predicate(ResourceKind::Customer, &[], Some(customer_id.get()))?;
        self.customer_repo
            .find_one(&parent)
            .await?
            .ok_or_else(|| ResourceKind::Customer.not_found())?;

        let predicate = auth.predicate(ResourceKind::ServiceAddress, &[customer_id.get()], None)?;
        let rows = self.repo.find_many(&predicate, offset, limit).await?;
        let total = self.repo.count(&predicate).await?;
        Ok((rows, total))
    }

    pub async fn get(
        &self,
        scope: &TenantScope,
        customer_id: CustomerId,
        id: ServiceAddressId,
    ) -> Result<ServiceAddress> {
        let predicate = ScopedQueryAuthorizer::new(scope).predicate(
            ResourceKind::ServiceAddress,
            &[customer_id.get()],
            Some(id.get()),
        )?;
        self.repo
            .find_one(&predicate)
            .await?
            .ok_or_else(|| ResourceKind::ServiceAddress.not_found())
    }

    pub async fn create(
        &self,
        scope: &TenantScope,
        customer_id: CustomerId,
        input: CreateServiceAddressInput,
    ) -> Result<ServiceAddress> {
        input.validate()?;

        let auth = ScopedQueryAuthorizer::new(scope);
        let parent_scope = auth.predicate(ResourceKind::Customer, &[], Some(customer_id.get()))?;
        let parent = self
            .customer_repo
            .find_one(&parent_scope)
            .await?
            .ok_or_else(|| ResourceKind::Customer.not_found())?;

        let record = auth.service_address_record(&parent, input)?;
        let sa = self.repo.insert(&record).await?;
        info!(
            service_address_id = %sa.id,
            customer_id = %sa.customer_id,
            "Service address created"
        );
        Ok(sa)
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        customer_id: CustomerId,
        id: ServiceAddressId,
        input: UpdateServiceAddressInput,
    ) -> Result<ServiceAddress> {
        input.validate()?;

        let predicate = ScopedQueryAuthorizer::new(scope).predicate(
            ResourceKind::ServiceAddress,
            &[customer_id.get()],
            Some(id.get()),
        )?;
        self.repo
            .update(&predicate, &input)
            .await?
            .ok_or_else(|| ResourceKind::ServiceAddress.not_found())
    }
}
