//! Scanner configuration: sources, request settings and screening thresholds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

pub const DEFAULT_LISTING_URL: &str = "https://www.benzinga.com/premarket";
pub const DEFAULT_QUOTE_URL_TEMPLATE: &str = "https://finviz.com/quote.ashx?t={ticker}";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_FLOAT_LABEL: &str = "Shs Float";
pub const DEFAULT_NEWS_TABLE_CLASS: &str = "fullview-news-outer";

pub const DEFAULT_SYMBOL_COLUMN: &str = "ticker";
pub const DEFAULT_NAME_COLUMN: &str = "company";
pub const DEFAULT_PRICE_COLUMN: &str = "close▲▼";
pub const DEFAULT_CHANGE_COLUMN: &str = "±%";
pub const DEFAULT_VOLUME_COLUMN: &str = "avg. vol▲▼";

const TICKER_PLACEHOLDER: &str = "{ticker}";

/// Header labels of the listing table, matched exactly after lower-casing.
///
/// The glyphs are part of the source page's markup; keep them byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub volume: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL_COLUMN.to_string(),
            name: DEFAULT_NAME_COLUMN.to_string(),
            price: DEFAULT_PRICE_COLUMN.to_string(),
            change: DEFAULT_CHANGE_COLUMN.to_string(),
            volume: DEFAULT_VOLUME_COLUMN.to_string(),
        }
    }
}

/// Qualification thresholds. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub min_price: f64,
    pub max_price: f64,
    pub min_change_pct: f64,
    pub min_volume: u64,
    pub max_float: u64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_price: 1.0,
            max_price: 25.0,
            min_change_pct: 5.0,
            min_volume: 100_000,
            max_float: 5_000_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub listing_url: String,
    /// Quote page URL with a `{ticker}` placeholder.
    pub quote_url_template: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Upper bound on in-flight per-symbol requests.
    pub concurrency: usize,
    pub float_label: String,
    pub news_table_class: String,
    pub columns: ColumnMap,
    pub criteria: FilterCriteria,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            quote_url_template: DEFAULT_QUOTE_URL_TEMPLATE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
            float_label: DEFAULT_FLOAT_LABEL.to_string(),
            news_table_class: DEFAULT_NEWS_TABLE_CLASS.to_string(),
            columns: ColumnMap::default(),
            criteria: FilterCriteria::default(),
        }
    }
}

impl ScannerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn quote_url(&self, symbol: &str) -> String {
        quote_url(&self.quote_url_template, symbol)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(ScanError::Config("concurrency must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ScanError::Config("timeout must be at least 1 second".into()));
        }
        let c = &self.criteria;
        if c.min_price > c.max_price {
            return Err(ScanError::Config(format!(
                "price band is inverted: {} > {}",
                c.min_price, c.max_price
            )));
        }
        if !self.quote_url_template.contains(TICKER_PLACEHOLDER) {
            return Err(ScanError::Config(format!(
                "quote URL template must contain {TICKER_PLACEHOLDER}"
            )));
        }
        Ok(())
    }
}

pub(crate) fn quote_url(template: &str, symbol: &str) -> String {
    template.replace(TICKER_PLACEHOLDER, symbol)
}
