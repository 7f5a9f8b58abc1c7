// src/donation_query.rs
//! Query and pagination engine for the donation-request listing endpoint.
//!
//! Combines optional filtering (owner email, blood group), sorting on the
//! creation timestamp, and two mutually exclusive pagination modes:
//! flat-limit (`limit` > 0, first N sorted matches) and paged
//! (`page`/`size` skip window). The reported count always reflects the
//! filter before pagination.

use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::models::DonationRequest;
use crate::store::DonationRequestStore;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_SIZE: i64 = 10;

// ==================== QUERY PARAMETERS ====================

/// Raw query parameters as they arrive on the wire. Numeric parameters are
/// kept as strings: malformed values fall back to the defaults instead of
/// rejecting the request.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ListDonationRequestsQuery {
    pub email: Option<String>,
    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

impl ListDonationRequestsQuery {
    /// Resolves the raw parameters once at the boundary into a filter, a
    /// sort direction, and a pagination window.
    pub fn normalize(&self) -> ListParams {
        let filter = RequestFilter {
            email: non_empty(self.email.as_deref()),
            blood_group: non_empty(self.blood_group.as_deref()),
        };

        let sort = if self.sort_order.as_deref() == Some("newest") {
            SortOrder::Newest
        } else {
            SortOrder::Oldest
        };

        // limit > 0 switches to flat-limit mode; page/size are ignored there
        let window = match parse_positive(self.limit.as_deref()) {
            Some(n) => PageWindow::FlatLimit(n),
            None => PageWindow::Paged {
                page: parse_positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE),
                size: parse_positive(self.size.as_deref()).unwrap_or(DEFAULT_SIZE),
            },
        };

        ListParams {
            filter,
            sort,
            window,
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
}

// ==================== NORMALIZED PARAMETERS ====================

#[derive(Debug, Clone)]
pub struct ListParams {
    pub filter: RequestFilter,
    pub sort: SortOrder,
    pub window: PageWindow,
}

/// Predicate over donation-request fields. Absent fields impose no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFilter {
    pub email: Option<String>,
    pub blood_group: Option<String>,
}

impl RequestFilter {
    /// SQL conditions and bind parameters for this filter.
    pub fn sql_conditions(&self) -> (Vec<String>, Vec<String>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(ref email) = self.email {
            conditions.push("email = ?".to_string());
            params.push(email.clone());
        }
        if let Some(ref blood_group) = self.blood_group {
            // Anchored full-string match, case-insensitive
            conditions.push("LOWER(blood_group) = LOWER(?)".to_string());
            params.push(blood_group.clone());
        }

        (conditions, params)
    }

    /// In-memory equivalent of `sql_conditions`, used by fake stores.
    pub fn matches(&self, doc: &DonationRequest) -> bool {
        if let Some(ref email) = self.email {
            if doc.email != *email {
                return false;
            }
        }
        if let Some(ref blood_group) = self.blood_group {
            if !doc.blood_group.eq_ignore_ascii_case(blood_group) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Descending on creation timestamp (`sortOrder=newest`).
    Newest,
    /// Ascending on creation timestamp (anything else).
    Oldest,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Newest => "DESC",
            SortOrder::Oldest => "ASC",
        }
    }
}

/// Pagination window, chosen once during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageWindow {
    /// First N sorted matches, page/size ignored.
    FlatLimit(i64),
    /// Skip/limit window computed from page number and page size.
    Paged { page: i64, size: i64 },
}

impl PageWindow {
    pub fn skip(&self) -> i64 {
        match self {
            PageWindow::FlatLimit(_) => 0,
            // Saturate on extreme page numbers; an offset past the end of
            // the collection just yields an empty page
            PageWindow::Paged { page, size } => (*page - 1).saturating_mul(*size),
        }
    }

    pub fn limit(&self) -> i64 {
        match self {
            PageWindow::FlatLimit(n) => *n,
            PageWindow::Paged { size, .. } => *size,
        }
    }
}

// ==================== RESPONSE ====================

/// One page of matching documents plus the total matching count.
#[derive(Debug, Serialize)]
pub struct DonationRequestPage {
    pub data: Vec<DonationRequest>,
    pub count: i64,
}

// ==================== ENGINE ====================

/// Executes the listing: one count query over the filter, one sorted
/// skip/limit query for the page. Either both succeed or the whole call
/// fails; nothing is retried here.
pub async fn list_donation_requests(
    store: &dyn DonationRequestStore,
    params: &ListParams,
) -> ApiResult<DonationRequestPage> {
    let count = store.count_matching(&params.filter).await?;
    let data = store
        .find_matching(
            &params.filter,
            params.sort,
            params.window.skip(),
            params.window.limit(),
        )
        .await?;

    Ok(DonationRequestPage { data, count })
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    struct FakeStore {
        docs: Vec<DonationRequest>,
    }

    #[async_trait]
    impl DonationRequestStore for FakeStore {
        async fn count_matching(&self, filter: &RequestFilter) -> ApiResult<i64> {
            Ok(self.docs.iter().filter(|d| filter.matches(d)).count() as i64)
        }

        async fn find_matching(
            &self,
            filter: &RequestFilter,
            sort: SortOrder,
            skip: i64,
            limit: i64,
        ) -> ApiResult<Vec<DonationRequest>> {
            let mut matched: Vec<DonationRequest> = self
                .docs
                .iter()
                .filter(|d| filter.matches(d))
                .cloned()
                .collect();
            match sort {
                SortOrder::Newest => matched
                    .sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id))),
                SortOrder::Oldest => matched
                    .sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))),
            }
            Ok(matched
                .into_iter()
                .skip(skip as usize)
                .take(limit as usize)
                .collect())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl DonationRequestStore for FailingStore {
        async fn count_matching(&self, _filter: &RequestFilter) -> ApiResult<i64> {
            Err(ApiError::DatabaseError(sqlx::Error::PoolClosed))
        }

        async fn find_matching(
            &self,
            _filter: &RequestFilter,
            _sort: SortOrder,
            _skip: i64,
            _limit: i64,
        ) -> ApiResult<Vec<DonationRequest>> {
            Err(ApiError::DatabaseError(sqlx::Error::PoolClosed))
        }
    }

    fn timestamp(offset_secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + offset_secs, 0).unwrap()
    }

    fn doc(id: &str, blood_group: &str, email: &str, offset_secs: i64) -> DonationRequest {
        DonationRequest {
            id: id.to_string(),
            name: "Requester".to_string(),
            recipient_name: "Recipient".to_string(),
            hospital_name: "Dhaka Medical".to_string(),
            phone: "01700000000".to_string(),
            blood_group: blood_group.to_string(),
            district: "Dhaka".to_string(),
            donation_date: "2025-01-15".to_string(),
            donation_time: "10:00".to_string(),
            full_address: "Dhaka Medical College Hospital".to_string(),
            request_message: "Urgent".to_string(),
            email: email.to_string(),
            created_at: timestamp(offset_secs),
        }
    }

    fn store_with(count: i64, blood_group: &str) -> FakeStore {
        let docs = (0..count)
            .map(|i| doc(&format!("req-{:03}", i), blood_group, "owner@example.com", i))
            .collect();
        FakeStore { docs }
    }

    fn query(pairs: &[(&str, &str)]) -> ListDonationRequestsQuery {
        let mut q = ListDonationRequestsQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "email" => q.email = value,
                "bloodGroup" => q.blood_group = value,
                "limit" => q.limit = value,
                "page" => q.page = value,
                "size" => q.size = value,
                "sortOrder" => q.sort_order = value,
                other => panic!("unknown query key: {}", other),
            }
        }
        q
    }

    #[test]
    fn test_normalize_defaults_to_paged_mode() {
        let params = ListDonationRequestsQuery::default().normalize();
        assert_eq!(
            params.window,
            PageWindow::Paged {
                page: DEFAULT_PAGE,
                size: DEFAULT_SIZE
            }
        );
        assert_eq!(params.sort, SortOrder::Oldest);
        assert_eq!(params.filter, RequestFilter::default());
    }

    #[test]
    fn test_normalize_positive_limit_wins_over_page_and_size() {
        let params = query(&[("limit", "5"), ("page", "3"), ("size", "20")]).normalize();
        assert_eq!(params.window, PageWindow::FlatLimit(5));
    }

    #[test]
    fn test_normalize_zero_or_negative_limit_selects_paged_mode() {
        for limit in ["0", "-3"] {
            let params = query(&[("limit", limit), ("page", "2"), ("size", "7")]).normalize();
            assert_eq!(params.window, PageWindow::Paged { page: 2, size: 7 });
        }
    }

    #[test]
    fn test_normalize_malformed_numbers_fall_back_to_defaults() {
        let params = query(&[("limit", "abc"), ("page", "xyz"), ("size", "1.5")]).normalize();
        assert_eq!(
            params.window,
            PageWindow::Paged {
                page: DEFAULT_PAGE,
                size: DEFAULT_SIZE
            }
        );
    }

    #[test]
    fn test_normalize_sort_order_newest_only() {
        assert_eq!(
            query(&[("sortOrder", "newest")]).normalize().sort,
            SortOrder::Newest
        );
        assert_eq!(
            query(&[("sortOrder", "oldest")]).normalize().sort,
            SortOrder::Oldest
        );
        assert_eq!(
            query(&[("sortOrder", "anything")]).normalize().sort,
            SortOrder::Oldest
        );
    }

    #[test]
    fn test_normalize_blank_filters_impose_no_constraint() {
        let params = query(&[("email", "   "), ("bloodGroup", "")]).normalize();
        assert_eq!(params.filter, RequestFilter::default());
    }

    #[test]
    fn test_paged_window_skip() {
        let window = PageWindow::Paged { page: 3, size: 10 };
        assert_eq!(window.skip(), 20);
        assert_eq!(window.limit(), 10);
        assert_eq!(PageWindow::FlatLimit(7).skip(), 0);
    }

    #[test]
    fn test_paged_window_skip_saturates_on_huge_page() {
        let window = PageWindow::Paged {
            page: 4_611_686_018_427_387_904,
            size: 10,
        };
        assert_eq!(window.skip(), i64::MAX);
    }

    #[test]
    fn test_filter_sql_conditions() {
        let filter = RequestFilter {
            email: Some("owner@example.com".to_string()),
            blood_group: Some("o+".to_string()),
        };
        let (conditions, params) = filter.sql_conditions();
        assert_eq!(
            conditions,
            vec![
                "email = ?".to_string(),
                "LOWER(blood_group) = LOWER(?)".to_string()
            ]
        );
        assert_eq!(params, vec!["owner@example.com", "o+"]);

        let (conditions, params) = RequestFilter::default().sql_conditions();
        assert!(conditions.is_empty());
        assert!(params.is_empty());
    }

    #[actix_rt::test]
    async fn test_blood_group_match_is_case_insensitive_and_anchored() {
        let store = FakeStore {
            docs: vec![
                doc("a", "O+", "x@example.com", 0),
                doc("b", "O++", "x@example.com", 1),
                doc("c", "AO+", "x@example.com", 2),
            ],
        };
        let params = query(&[("bloodGroup", "o+")]).normalize();
        let page = list_donation_requests(&store, &params).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, "a");
    }

    #[actix_rt::test]
    async fn test_email_filter_is_exact() {
        let store = FakeStore {
            docs: vec![
                doc("a", "A+", "one@example.com", 0),
                doc("b", "A+", "two@example.com", 1),
            ],
        };
        let params = query(&[("email", "one@example.com")]).normalize();
        let page = list_donation_requests(&store, &params).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].id, "a");
    }

    #[actix_rt::test]
    async fn test_flat_limit_returns_sorted_prefix() {
        let store = store_with(10, "B+");
        let params = query(&[("limit", "3"), ("sortOrder", "newest")]).normalize();
        let page = list_donation_requests(&store, &params).await.unwrap();

        assert_eq!(page.count, 10);
        let ids: Vec<&str> = page.data.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["req-009", "req-008", "req-007"]);
    }

    #[actix_rt::test]
    async fn test_flat_limit_larger_than_matches_returns_everything() {
        let store = store_with(4, "B+");
        let params = query(&[("limit", "50")]).normalize();
        let page = list_donation_requests(&store, &params).await.unwrap();
        assert_eq!(page.count, 4);
        assert_eq!(page.data.len(), 4);
    }

    #[actix_rt::test]
    async fn test_consecutive_pages_partition_the_sorted_set() {
        let store = store_with(12, "AB-");

        let first = list_donation_requests(&store, &query(&[("size", "5")]).normalize())
            .await
            .unwrap();
        let second = list_donation_requests(
            &store,
            &query(&[("page", "2"), ("size", "5")]).normalize(),
        )
        .await
        .unwrap();

        assert_eq!(first.count, 12);
        assert_eq!(second.count, 12);
        assert_eq!(first.data.len(), 5);
        assert_eq!(second.data.len(), 5);

        let mut seen: Vec<&str> = first
            .data
            .iter()
            .chain(second.data.iter())
            .map(|d| d.id.as_str())
            .collect();
        let expected: Vec<String> = (0..10).map(|i| format!("req-{:03}", i)).collect();
        assert_eq!(seen.len(), 10);
        seen.dedup();
        assert_eq!(seen.len(), 10, "pages must not overlap");
        assert_eq!(seen, expected.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    }

    #[actix_rt::test]
    async fn test_newest_page_two_returns_the_oldest_remainder() {
        // 15 documents with strictly increasing created_at; page 2 of 10 in
        // newest order is the 5 oldest
        let store = store_with(15, "A+");
        let params = query(&[
            ("bloodGroup", "A+"),
            ("page", "2"),
            ("size", "10"),
            ("sortOrder", "newest"),
        ])
        .normalize();
        let page = list_donation_requests(&store, &params).await.unwrap();

        assert_eq!(page.count, 15);
        let ids: Vec<&str> = page.data.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["req-004", "req-003", "req-002", "req-001", "req-000"]
        );
    }

    #[actix_rt::test]
    async fn test_page_beyond_results_is_empty_with_full_count() {
        let store = store_with(3, "O-");
        let params = query(&[("page", "5"), ("size", "10")]).normalize();
        let page = list_donation_requests(&store, &params).await.unwrap();
        assert_eq!(page.count, 3);
        assert!(page.data.is_empty());
    }

    #[actix_rt::test]
    async fn test_huge_page_number_yields_empty_page() {
        let store = store_with(3, "O-");
        let params = query(&[("page", "4611686018427387904"), ("size", "10")]).normalize();
        let page = list_donation_requests(&store, &params).await.unwrap();
        assert_eq!(page.count, 3);
        assert!(page.data.is_empty());
    }

    #[actix_rt::test]
    async fn test_malformed_page_behaves_like_omitted_page() {
        let store = store_with(25, "B-");

        let malformed = list_donation_requests(
            &store,
            &query(&[("page", "abc"), ("size", "10")]).normalize(),
        )
        .await
        .unwrap();
        let omitted = list_donation_requests(&store, &query(&[("size", "10")]).normalize())
            .await
            .unwrap();

        let malformed_ids: Vec<&str> = malformed.data.iter().map(|d| d.id.as_str()).collect();
        let omitted_ids: Vec<&str> = omitted.data.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(malformed_ids, omitted_ids);
        assert_eq!(malformed.count, omitted.count);
    }

    #[actix_rt::test]
    async fn test_repeated_calls_return_identical_pages() {
        // All documents share one timestamp; the id tiebreak keeps the
        // ordering deterministic anyway
        let store = FakeStore {
            docs: (0..8).map(|i| doc(&format!("req-{}", i), "A-", "x@example.com", 0)).collect(),
        };
        let params = query(&[("size", "4"), ("sortOrder", "newest")]).normalize();

        let first = list_donation_requests(&store, &params).await.unwrap();
        let second = list_donation_requests(&store, &params).await.unwrap();

        let first_ids: Vec<&str> = first.data.iter().map(|d| d.id.as_str()).collect();
        let second_ids: Vec<&str> = second.data.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[actix_rt::test]
    async fn test_store_failure_surfaces_as_error() {
        let params = ListDonationRequestsQuery::default().normalize();
        let result = list_donation_requests(&FailingStore, &params).await;
        assert!(matches!(result, Err(ApiError::DatabaseError(_))));
    }
}
