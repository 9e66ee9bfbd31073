//! Tenant isolation policy

pub mod scope;
pub mod tenant;

pub use scope::{
    Constraint, Lineage, ResourceKind, ScopeColumn, ScopedPredicate, ScopedQueryAuthorizer,
};
pub use tenant::{TenantResolver, TenantScope};
