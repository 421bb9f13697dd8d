use chrono::{DateTime, Utc};
use serde::Serialize;

pub const PRICE_NOT_FOUND: &str = "Price Not Found";
pub const SKU_NOT_FOUND: &str = "SKU Not Found";
pub const DEFAULT_ITEM_TYPE: &str = "Online";

/// Result of one stock check. Built fresh on every tick and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockVerdict {
    pub in_stock: bool,
    pub price: Option<String>,
    pub sku: Option<String>,
    pub item_type: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl StockVerdict {
    /// A verdict with no extracted metadata, stamped with the current time.
    #[must_use]
    pub fn bare(in_stock: bool) -> Self {
        Self {
            in_stock,
            price: None,
            sku: None,
            item_type: None,
            observed_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn price_or_default(&self) -> &str {
        self.price.as_deref().unwrap_or(PRICE_NOT_FOUND)
    }

    #[must_use]
    pub fn sku_or_default(&self) -> &str {
        self.sku.as_deref().unwrap_or(SKU_NOT_FOUND)
    }

    #[must_use]
    pub fn item_type_or_default(&self) -> &str {
        self.item_type.as_deref().unwrap_or(DEFAULT_ITEM_TYPE)
    }
}
