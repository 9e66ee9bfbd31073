//! Customer business logic

use crate::domain::{CreateCustomerInput, Customer, CustomerId, UpdateCustomerInput};
use crate::error::Result;
use crate::policy::{ResourceKind, ScopedQueryAuthorizer, TenantScope};
use crate::repository::CustomerRepository;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct CustomerService<R: CustomerRepository> {
    repo: Arc<R>,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        scope: &TenantScope,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Customer>, i64)> {
        let predicate =
            ScopedQueryAuthorizer::new(scope).predicate(ResourceKind::Customer, &[], None)?;
        let customers = self.repo.find_many(&predicate, offset, limit).await?;
        let total = self.repo.count(&predicate).await?;
        Ok((customers, total))
    }

    pub async fn get(&self, scope: &TenantScope, id: CustomerId) -> Result<Customer> {
        let predicate = ScopedQueryAuthorizer::new(scope).predicate(
            ResourceKind::Customer,
            &[],
            Some(id.get()),
        )?;
        self.repo
            .find_one(&predicate)
            .await?
            .ok_or_else(|| ResourceKind::Customer.not_found())
    }

    pub async fn create(
        &self,
        scope: &TenantScope,
        input: CreateCustomerInput,
    ) -> Result<Customer> {
        input.validate()?;

        let record = ScopedQueryAuthorizer::new(scope).customer_record(input);
        let customer = self.repo.insert(&record).await?;
        info!(
            customer_id = %customer.id,
            dealer_id = %customer.dealer_id,
            "Customer created"
        );
        Ok(customer)
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: CustomerId,
        input: UpdateCustomerInput,
    ) -> Result<Customer> {
        input.validate()?;

        let predicate = ScopedQueryAuthorizer::new(scope).predicate(
            ResourceKind::Customer,
            &[],
            Some(id.get()),
        )?;
        self.repo
            .update(&predicate, &input)
            .await?
            .ok_or_else(|| ResourceKind::Customer.not_found())
    }
}
