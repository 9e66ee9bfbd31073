//! Translation of scoped predicates into MySQL.
//!
//! Each resource kind is selected through the joins that reach its dealer:
//!
//! | kind            | FROM                                                  |
//! |-----------------|-------------------------------------------------------|
//! | customer        | `frontend_customer c`                                 |
//! | service address | `frontend_serviceaddress sa` + `c`                    |
//! | tank            | `frontend_tank t` + `sa` + `c`                        |
//! | meter           | `frontend_meter m` + `sa` + `c`                       |
//! | radio           | `frontend_radio r`                                    |

use crate::error::{AppError, Result};
use crate::policy::{ResourceKind, ScopeColumn, ScopedPredicate};
use sqlx::{Encode, MySql, MySqlPool, QueryBuilder, Type};

pub(crate) fn from_clause(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Customer => "frontend_customer c",
        ResourceKind::ServiceAddress => {
            "frontend_serviceaddress sa \
             INNER JOIN frontend_customer c ON c.id = sa.customer_id"
        }
        ResourceKind::Tank => {
            "frontend_tank t \
             INNER JOIN frontend_serviceaddress sa ON sa.id = t.service_address_id \
             INNER JOIN frontend_customer c ON c.id = sa.customer_id"
        }
        ResourceKind::Meter => {
            "frontend_meter m \
             INNER JOIN frontend_serviceaddress sa ON sa.id = m.service_address_id \
             INNER JOIN frontend_customer c ON c.id = sa.customer_id"
        }
        ResourceKind::Radio => "frontend_radio r",
    }
}

/// Physical column for a logical constraint, or `None` when the kind has no
/// such column.
pub(crate) fn column_sql(kind: ResourceKind, column: ScopeColumn) -> Option<&'static str> {
    use ResourceKind as K;
    use ScopeColumn as C;

    match (kind, column) {
        (K::Customer, C::Id | C::CustomerId) => Some("c.id"),
        (K::Customer, C::DealerId) => Some("c.dealer_id"),

        (K::ServiceAddress, C::Id | C::ServiceAddressId) => Some("sa.id"),
        (K::ServiceAddress, C::CustomerId) => Some("sa.customer_id"),
        (K::ServiceAddress, C::DealerId) => Some("c.dealer_id"),

        (K::Tank, C::Id) => Some("t.id"),
        (K::Tank, C::ServiceAddressId) => Some("t.service_address_id"),
        (K::Tank, C::CustomerId) => Some("sa.customer_id"),
        (K::Tank, C::DealerId) => Some("c.dealer_id"),

        (K::Meter, C::Id) => Some("m.id"),
        (K::Meter, C::ServiceAddressId) => Some("m.service_address_id"),
        (K::Meter, C::CustomerId) => Some("sa.customer_id"),
        (K::Meter, C::DealerId) => Some("c.dealer_id"),

        (K::Radio, C::Id) => Some("r.id"),
        (K::Radio, C::DealerId) => Some("r.dealer_id"),
        (K::Radio, C::DealerRadioId) => Some("r.dealer_radio_id"),

        _ => None,
    }
}

/// Append `WHERE` with every constraint of `predicate`.
///
/// A constraint without a column mapping aborts the query instead of being
/// dropped from the filter.
pub(crate) fn push_scope(
    qb: &mut QueryBuilder<'_, MySql>,
    predicate: &ScopedPredicate,
) -> Result<()> {
    let kind = predicate.kind();
    for (i, constraint) in predicate.constraints().into_iter().enumerate() {
        let column = column_sql(kind, constraint.column).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "No column mapping for {:?} on {:?}",
                constraint.column,
                kind
            ))
        })?;
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(column).push(" = ").push_bind(constraint.value);
    }
    Ok(())
}

/// `SELECT <columns> FROM <joins> WHERE <scope>`
pub(crate) fn select<'args>(
    columns: &str,
    predicate: &ScopedPredicate,
) -> Result<QueryBuilder<'args, MySql>> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM {}",
        columns,
        from_clause(predicate.kind())
    ));
    push_scope(&mut qb, predicate)?;
    Ok(qb)
}

pub(crate) async fn count(pool: &MySqlPool, predicate: &ScopedPredicate) -> Result<i64> {
    let mut qb = select("COUNT(*)", predicate)?;
    let row: (i64,) = qb.build_query_as::<(i64,)>().fetch_one(pool).await?;
    Ok(row.0)
}

/// Scoped multi-table `UPDATE`. Only fields that are present are assigned.
pub(crate) struct ScopedUpdate<'args> {
    qb: QueryBuilder<'args, MySql>,
    assignments: usize,
}

impl<'args> ScopedUpdate<'args> {
    pub(crate) fn new(kind: ResourceKind) -> Self {
        Self {
            qb: QueryBuilder::new(format!("UPDATE {} SET ", from_clause(kind))),
            assignments: 0,
        }
    }

    pub(crate) fn set<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, MySql> + Type<MySql> + Send,
    {
        if let Some(value) = value {
            if self.assignments > 0 {
                self.qb.push(", ");
            }
            self.qb.push(column).push(" = ").push_bind(value);
            self.assignments += 1;
        }
        self
    }

    /// Run the update restricted to `predicate`; a no-op when nothing was set.
    pub(crate) async fn execute(
        mut self,
        pool: &MySqlPool,
        predicate: &ScopedPredicate,
    ) -> Result<()> {
        if self.assignments == 0 {
            return Ok(());
        }
        push_scope(&mut self.qb, predicate)?;
        self.qb.build().execute(pool).await?;
        Ok(())
    }
}
