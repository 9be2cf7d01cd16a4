use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

pub mod rules;

use crate::catalog::{Catalog, Deal};
use crate::config::SearchConfig;
use crate::error::{BargainError, BargainResult};
use crate::logging::{LogContext, PerformanceLogger};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Order applied to matches before pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortPolicy {
    /// Keep catalog order
    #[default]
    CatalogOrder,
    /// Hot deals first, then by discount descending
    HotThenDiscount,
}

impl std::str::FromStr for SortPolicy {
    type Err = BargainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "catalog-order" | "catalog" | "none" => Ok(Self::CatalogOrder),
            "hot-then-discount" | "hot" | "discount" => Ok(Self::HotThenDiscount),
            other => Err(BargainError::config(format!("Unknown sort policy: {}", other))),
        }
    }
}

/// Query for a page of deals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub category: Option<String>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// One page of matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealsResponse {
    pub deals: Vec<Deal>,
    pub total: usize,
    pub has_more: bool,
}

impl DealsResponse {
    pub fn empty() -> Self {
        Self {
            deals: Vec::new(),
            total: 0,
            has_more: false,
        }
    }
}

/// Advisory progress events; never affect the returned data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchProgress {
    Started { query: String },
    Matched { total: usize },
    Completed { returned: usize },
}

/// Keyword and rule based filter over the catalog
pub struct SearchEngine {
    catalog: Arc<Catalog>,
    config: SearchConfig,
    affiliate_tag: String,
}

impl SearchEngine {
    pub fn new(catalog: Arc<Catalog>, config: &SearchConfig, affiliate_tag: impl Into<String>) -> Self {
        Self {
            catalog,
            config: config.clone(),
            affiliate_tag: affiliate_tag.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sort_policy(&self) -> SortPolicy {
        self.config.sort_policy
    }

    /// Search after the simulated latency; internal faults yield an empty page
    pub async fn search(
        &self,
        params: &SearchParams,
        progress: Option<&UnboundedSender<SearchProgress>>,
    ) -> DealsResponse {
        let notify = |event: SearchProgress| {
            if let Some(tx) = progress {
                let _ = tx.send(event);
            }
        };

        notify(SearchProgress::Started { query: params.query.clone() });

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        let mut context = LogContext::new("search", "search_deals")
            .with_query(params.query.clone());
        if let Some(category) = &params.category {
            context = context.with_category(category.clone());
        }
        let perf = PerformanceLogger::new(context);

        match self.try_search(params) {
            Ok(response) => {
                notify(SearchProgress::Matched { total: response.total });
                notify(SearchProgress::Completed { returned: response.deals.len() });
                perf.finish_with_status("Deal search completed", "ok");
                response
            }
            Err(e) => {
                perf.finish_with_error("Deal search failed, returning no results", &e);
                notify(SearchProgress::Completed { returned: 0 });
                DealsResponse::empty()
            }
        }
    }

    /// Synchronous filter, sort and paginate
    pub fn try_search(&self, params: &SearchParams) -> BargainResult<DealsResponse> {
        if params.query.is_empty() {
            return Ok(DealsResponse::empty());
        }

        let page = params.page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = params.limit.unwrap_or(self.config.default_limit);

        let lower_query = params.query.to_lowercase();
        let mut matches: Vec<&Deal> = self
            .catalog
            .deals()
            .iter()
            .filter(|deal| matches_query(deal, &lower_query))
            .filter(|deal| {
                params
                    .category
                    .as_deref()
                    .map_or(true, |category| deal.category == category)
            })
            .collect();

        if self.config.sort_policy == SortPolicy::HotThenDiscount {
            // Stable: equal keys keep catalog order
            matches.sort_by(|a, b| {
                b.is_hot
                    .cmp(&a.is_hot)
                    .then(b.discount_percentage.cmp(&a.discount_percentage))
            });
        }

        let total = matches.len();
        let (start, end) = page_bounds(page, limit, total)?;

        let deals: Vec<Deal> = matches[start..end]
            .iter()
            .map(|deal| Deal {
                url: deal.affiliate_url(&self.affiliate_tag),
                ..(*deal).clone()
            })
            .collect();

        debug!("Query '{}' matched {} deals, returning {}", params.query, total, deals.len());

        // A page end past usize::MAX is past every match
        let has_more = page.checked_mul(limit).map_or(false, |page_end| page_end < total);

        Ok(DealsResponse { deals, total, has_more })
    }
}

/// True if the lowercased query matches the deal by text, coupon, or rule
pub fn matches_query(deal: &Deal, lower_query: &str) -> bool {
    let text_match = [&deal.title, &deal.description, &deal.merchant, &deal.category]
        .iter()
        .any(|field| field.to_lowercase().contains(lower_query));

    let coupon_match = deal
        .coupon_code
        .as_deref()
        .map_or(false, |code| code.to_lowercase() == lower_query);

    text_match || coupon_match || rules::any_rule_fires(lower_query, deal)
}

/// Slice bounds for a 1-based page, clamped to `total`
fn page_bounds(page: usize, limit: usize, total: usize) -> BargainResult<(usize, usize)> {
    let start = (page - 1)
        .checked_mul(limit)
        .ok_or(BargainError::InvalidPagination { page, limit })?;
    let start = start.min(total);
    let end = start.saturating_add(limit).min(total);
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::deal;

    fn engine_with(catalog: Catalog, sort_policy: SortPolicy) -> SearchEngine {
        let config = SearchConfig {
            latency_ms: 0,
            default_limit: DEFAULT_LIMIT,
            sort_policy,
        };
        SearchEngine::new(Arc::new(catalog), &config, "test-tag")
    }

    fn builtin_engine() -> SearchEngine {
        engine_with(Catalog::builtin(), SortPolicy::CatalogOrder)
    }

    fn ids(response: &DealsResponse) -> Vec<String> {
        response.deals.iter().map(|d| d.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_empty_query_returns_nothing() {
        let engine = builtin_engine();
        let response = engine.search(&SearchParams::new(""), None).await;
        assert_eq!(response, DealsResponse::empty());
    }

    #[tokio::test]
    async fn test_whitespace_query_is_matched_as_given() {
        let engine = builtin_engine();

        // Every bundled title contains a space
        let response = engine.search(&SearchParams::new(" ").with_limit(100), None).await;
        assert_eq!(response.total, 15);
        assert_eq!(response.deals.len(), 15);

        // Surrounding spaces are part of the substring
        let padded = engine.try_search(&SearchParams::new(" macbook ")).unwrap();
        assert_eq!(ids(&padded), vec!["1"]);
        let doubled = engine.try_search(&SearchParams::new("  macbook")).unwrap();
        assert_eq!(doubled.total, 0);
    }

    #[test]
    fn test_amazon_query_counts_only_amazon_merchants() {
        let mut deals: Vec<Deal> = (0..5)
            .map(|i| deal(&format!("a{}", i), "Amazon", "Furniture"))
            .collect();
        deals.extend((0..10).map(|i| deal(&format!("o{}", i), "REI", "Furniture")));
        let engine = engine_with(Catalog::from_deals(deals).unwrap(), SortPolicy::CatalogOrder);

        let response = engine.try_search(&SearchParams::new("amazon")).unwrap();
        assert_eq!(response.total, 5);
        assert!(response.deals.iter().all(|d| d.merchant == "Amazon"));
        assert!(!response.has_more);
    }

    #[test]
    fn test_text_match_is_case_insensitive() {
        let response = builtin_engine().try_search(&SearchParams::new("MacBook")).unwrap();
        assert_eq!(ids(&response), vec!["1"]);
    }

    #[test]
    fn test_coupon_requires_exact_match() {
        let engine = builtin_engine();
        let exact = engine.try_search(&SearchParams::new("runfast")).unwrap();
        assert_eq!(ids(&exact), vec!["4"]);

        let partial = engine.try_search(&SearchParams::new("runf")).unwrap();
        assert_eq!(partial.total, 0);
    }

    #[test]
    fn test_natural_language_rules_widen_matches() {
        let engine = builtin_engine();

        let coupons = engine.try_search(&SearchParams::new("anything with a coupon")).unwrap();
        assert_eq!(ids(&coupons), vec!["1", "4", "7", "15"]);

        let hot = engine.try_search(&SearchParams::new("hot deals")).unwrap();
        assert!(hot.deals.iter().all(|d| d.is_hot));
        assert_eq!(hot.total, 6);
    }

    #[test]
    fn test_category_filter_never_widens() {
        let engine = builtin_engine();
        let unfiltered = engine.try_search(&SearchParams::new("amazon").with_limit(100)).unwrap();
        let filtered = engine
            .try_search(&SearchParams::new("amazon").with_limit(100).with_category("Electronics"))
            .unwrap();

        assert!(filtered.total <= unfiltered.total);
        assert_eq!(ids(&filtered), vec!["1", "3"]);
        for d in &filtered.deals {
            assert!(unfiltered.deals.iter().any(|u| u.id == d.id));
        }

        let none = engine
            .try_search(&SearchParams::new("amazon").with_category("Automotive"))
            .unwrap();
        assert_eq!(none.total, 0);
    }

    #[tokio::test]
    async fn test_category_search_through_engine() {
        let response = builtin_engine()
            .search(&SearchParams::new("amazon").with_category("Electronics"), None)
            .await;
        assert_eq!(ids(&response), vec!["1", "3"]);
        assert_eq!(response.total, 2);
    }

    #[test]
    fn test_page_sizes_follow_total() {
        let engine = builtin_engine();
        let total = engine.try_search(&SearchParams::new("amazon")).unwrap().total;
        assert_eq!(total, 8);

        for limit in 1..=10 {
            for page in 1..=10 {
                let response = engine
                    .try_search(&SearchParams::new("amazon").with_page(page).with_limit(limit))
                    .unwrap();
                let expected = limit.min(total.saturating_sub((page - 1) * limit));
                assert_eq!(response.deals.len(), expected, "page {} limit {}", page, limit);
                assert_eq!(response.total, total);
                assert_eq!(response.has_more, page * limit < total);
            }
        }
    }

    #[test]
    fn test_pages_concatenate_to_full_result() {
        let engine = engine_with(Catalog::builtin(), SortPolicy::HotThenDiscount);
        let full = engine.try_search(&SearchParams::new("e").with_limit(100)).unwrap();

        let mut collected = Vec::new();
        let mut page = 1;
        loop {
            let response = engine
                .try_search(&SearchParams::new("e").with_page(page).with_limit(4))
                .unwrap();
            collected.extend(ids(&response));
            if !response.has_more {
                break;
            }
            page += 1;
        }

        assert_eq!(collected, ids(&full));
        let mut deduped = collected.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), collected.len());
    }

    #[test]
    fn test_hot_then_discount_ordering() {
        let engine = engine_with(Catalog::builtin(), SortPolicy::HotThenDiscount);
        let response = engine.try_search(&SearchParams::new("amazon").with_limit(100)).unwrap();

        // Hot Amazon deals by discount: KitchenAid 38, Kindle 29, then the 25% tie in catalog order
        assert_eq!(ids(&response)[..4], ["7", "11", "1", "3"]);
        let first_cold = response.deals.iter().position(|d| !d.is_hot).unwrap();
        assert!(response.deals[first_cold..].iter().all(|d| !d.is_hot));
        assert_eq!(response.deals[first_cold].id, "5");
    }

    #[test]
    fn test_page_zero_and_limit_zero() {
        let engine = builtin_engine();
        let page_zero = engine.try_search(&SearchParams::new("amazon").with_page(0)).unwrap();
        let page_one = engine.try_search(&SearchParams::new("amazon").with_page(1)).unwrap();
        assert_eq!(page_zero, page_one);

        let limit_zero = engine.try_search(&SearchParams::new("amazon").with_limit(0)).unwrap();
        assert!(limit_zero.deals.is_empty());
        assert_eq!(limit_zero.total, 8);
        assert!(limit_zero.has_more);
    }

    #[test]
    fn test_huge_limit_keeps_total() {
        let engine = builtin_engine();
        let response = engine
            .try_search(&SearchParams::new("amazon").with_page(2).with_limit(usize::MAX / 2 + 1))
            .unwrap();
        assert_eq!(response.total, 8);
        assert!(response.deals.is_empty());
        assert!(!response.has_more);

        let first = engine
            .try_search(&SearchParams::new("amazon").with_limit(usize::MAX))
            .unwrap();
        assert_eq!(first.total, 8);
        assert_eq!(first.deals.len(), 8);
        assert!(!first.has_more);
    }

    #[test]
    fn test_overflowing_page_is_an_error() {
        let engine = builtin_engine();
        let result = engine.try_search(
            &SearchParams::new("amazon").with_page(usize::MAX).with_limit(usize::MAX),
        );
        assert!(matches!(result, Err(BargainError::InvalidPagination { .. })));
    }

    #[tokio::test]
    async fn test_internal_fault_degrades_to_empty() {
        let engine = builtin_engine();
        let response = engine
            .search(
                &SearchParams::new("amazon").with_page(usize::MAX).with_limit(usize::MAX),
                None,
            )
            .await;
        assert_eq!(response, DealsResponse::empty());
    }

    #[tokio::test]
    async fn test_affiliate_links_rewritten_in_results() {
        let engine = builtin_engine();
        let response = engine.search(&SearchParams::new("kindle"), None).await;
        assert_eq!(response.deals[0].url, "https://amazon.com/deal/kindle?tag=test-tag");
    }

    #[tokio::test]
    async fn test_progress_events_are_advisory() {
        let engine = builtin_engine();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let with_progress = engine.search(&SearchParams::new("gaming"), Some(&tx)).await;
        let without = engine.search(&SearchParams::new("gaming"), None).await;
        assert_eq!(with_progress, without);

        assert_eq!(rx.recv().await, Some(SearchProgress::Started { query: "gaming".to_string() }));
        assert_eq!(rx.recv().await, Some(SearchProgress::Matched { total: 2 }));
        assert_eq!(rx.recv().await, Some(SearchProgress::Completed { returned: 2 }));

        // A dropped receiver must not disturb the search
        drop(rx);
        let after_drop = engine.search(&SearchParams::new("gaming"), Some(&tx)).await;
        assert_eq!(after_drop.total, 2);
    }

    #[test]
    fn test_sort_policy_parsing() {
        assert_eq!("hot-then-discount".parse::<SortPolicy>().unwrap(), SortPolicy::HotThenDiscount);
        assert_eq!("Catalog-Order".parse::<SortPolicy>().unwrap(), SortPolicy::CatalogOrder);
        assert!("random".parse::<SortPolicy>().is_err());
    }

    #[test]
    fn test_response_serializes_has_more_camel_case() {
        let json = serde_json::to_value(DealsResponse::empty()).unwrap();
        assert_eq!(json, serde_json::json!({ "deals": [], "total": 0, "hasMore": false }));
    }
}
