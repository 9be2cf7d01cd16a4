use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{BargainError, BargainResult};

mod data;

/// Window before expiry in which a deal is flagged as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 3;

/// Placeholder embedded in affiliate-enabled merchant URLs.
pub const AFFILIATE_PLACEHOLDER: &str = "AFFILIATE_ID";

/// A single discounted product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub original_price: f64,
    pub discount_percentage: u32,
    pub merchant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_logo: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub category: String,
    #[serde(default)]
    pub is_hot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub affiliate_enabled: bool,
}

impl Deal {
    /// Amount saved against the original price
    pub fn savings(&self) -> f64 {
        self.original_price - self.price
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.map_or(false, |expiry| expiry <= now)
    }

    /// Still valid but expiring within [`EXPIRING_SOON_DAYS`]
    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.map_or(false, |expiry| {
            expiry > now && expiry - now < Duration::days(EXPIRING_SOON_DAYS)
        })
    }

    /// URL with the affiliate placeholder filled in, for Amazon deals that opt in.
    /// An empty tag leaves the URL untouched.
    pub fn affiliate_url(&self, affiliate_tag: &str) -> String {
        if self.affiliate_enabled && self.merchant == "Amazon" && !affiliate_tag.is_empty() {
            self.url.replace(AFFILIATE_PLACEHOLDER, affiliate_tag)
        } else {
            self.url.clone()
        }
    }

    fn validate(&self) -> BargainResult<()> {
        let invalid = |reason: &str| BargainError::InvalidDeal {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if self.price < 0.0 || !self.price.is_finite() {
            return Err(invalid("price must be a non-negative number"));
        }
        if self.original_price < self.price {
            return Err(invalid("original price below price"));
        }
        if self.discount_percentage > 100 {
            return Err(invalid("discount above 100%"));
        }
        Ok(())
    }
}

/// Read-only list of deals, loaded once
#[derive(Debug, Clone)]
pub struct Catalog {
    deals: Vec<Deal>,
}

impl Catalog {
    /// Catalog with the bundled demo deals
    pub fn builtin() -> Self {
        Self { deals: data::builtin_deals() }
    }

    /// Build a catalog from arbitrary deals, rejecting invalid or duplicate records
    pub fn from_deals(deals: Vec<Deal>) -> BargainResult<Self> {
        let mut seen = HashSet::new();
        for deal in &deals {
            deal.validate()?;
            if !seen.insert(deal.id.as_str()) {
                return Err(BargainError::InvalidDeal {
                    id: deal.id.clone(),
                    reason: "duplicate id".to_string(),
                });
            }
        }

        debug!("Catalog built with {} deals", deals.len());
        Ok(Self { deals })
    }

    /// Load a catalog from a JSON array of deals
    pub async fn load_json<P: AsRef<Path>>(path: P) -> BargainResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            BargainError::catalog(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let deals: Vec<Deal> = serde_json::from_str(&content).map_err(|e| {
            BargainError::catalog(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let catalog = Self::from_deals(deals)?;
        info!("Loaded {} deals from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    pub fn get(&self, id: &str) -> Option<&Deal> {
        self.deals.iter().find(|deal| deal.id == id)
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.deals
            .iter()
            .filter(|deal| seen.insert(deal.category.as_str()))
            .map(|deal| deal.category.clone())
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
