// src/store.rs
//! Store collaborator for donation requests.
//!
//! The listing engine only needs two operations: a count over a filter and a
//! sorted window over the same filter. Keeping them behind a trait lets the
//! engine run against a fake store in tests.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::donation_query::{RequestFilter, SortOrder};
use crate::error::ApiResult;
use crate::models::DonationRequest;

#[async_trait]
pub trait DonationRequestStore: Send + Sync {
    /// Total number of documents matching the filter, independent of any
    /// pagination window.
    async fn count_matching(&self, filter: &RequestFilter) -> ApiResult<i64>;

    /// A sorted skip/limit window over the documents matching the filter.
    /// Ordering must be deterministic for identical arguments against an
    /// unchanged store.
    async fn find_matching(
        &self,
        filter: &RequestFilter,
        sort: SortOrder,
        skip: i64,
        limit: i64,
    ) -> ApiResult<Vec<DonationRequest>>;
}

pub struct SqliteDonationRequestStore {
    pool: SqlitePool,
}

impl SqliteDonationRequestStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonationRequestStore for SqliteDonationRequestStore {
    async fn count_matching(&self, filter: &RequestFilter) -> ApiResult<i64> {
        let (conditions, params) = filter.sql_conditions();

        let mut sql = "SELECT COUNT(*) FROM donation_requests".to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for param in &params {
            query = query.bind(param);
        }

        let total = query.fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn find_matching(
        &self,
        filter: &RequestFilter,
        sort: SortOrder,
        skip: i64,
        limit: i64,
    ) -> ApiResult<Vec<DonationRequest>> {
        let (conditions, params) = filter.sql_conditions();

        let mut sql = "SELECT * FROM donation_requests".to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        // Secondary order on id keeps pages stable when timestamps collide
        sql.push_str(&format!(
            " ORDER BY created_at {dir}, id ASC LIMIT ? OFFSET ?",
            dir = sort.as_sql()
        ));

        let mut query = sqlx::query_as::<_, DonationRequest>(&sql);
        for param in &params {
            query = query.bind(param);
        }
        query = query.bind(limit).bind(skip);

        let data = query.fetch_all(&self.pool).await?;
        Ok(data)
    }
}
