//! Shares-float lookup from a symbol's quote page.

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use tracing::debug;

use crate::config;
use crate::html::{self, TableLocator, TableWithLabel};
use crate::http;
use crate::numeric::parse_magnitude;

/// Outcome of a float lookup. Callers that only care whether a usable value
/// exists should go through [`FloatLookup::shares`].
#[derive(Debug, Clone, PartialEq)]
pub enum FloatLookup {
    /// Share count as read from the page, before rounding.
    Found(f64),
    /// The page loaded but had no readable float value.
    Unavailable,
    TransportError(String),
}

impl FloatLookup {
    pub fn magnitude(&self) -> Option<f64> {
        match self {
            FloatLookup::Found(shares) => Some(*shares),
            _ => None,
        }
    }

    /// Whole shares, rounded.
    pub fn shares(&self) -> Option<u64> {
        self.magnitude().map(|shares| shares.round() as u64)
    }
}

#[async_trait]
pub trait FloatSource: Send + Sync {
    async fn lookup(&self, symbol: &str) -> FloatLookup;
}

pub struct FloatFetcher {
    client: Client,
    url_template: String,
    locator: TableWithLabel,
}

impl FloatFetcher {
    pub fn new(client: Client, url_template: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
            locator: TableWithLabel::new(label),
        }
    }
}

#[async_trait]
impl FloatSource for FloatFetcher {
    async fn lookup(&self, symbol: &str) -> FloatLookup {
        let url = config::quote_url(&self.url_template, symbol);
        match http::fetch_html(&self.client, &url).await {
            Ok(body) => match parse_float(&body, &self.locator) {
                Some(shares) => FloatLookup::Found(shares),
                None => {
                    debug!(symbol, "no float value on quote page");
                    FloatLookup::Unavailable
                }
            },
            Err(e) => {
                debug!(symbol, error = %e, "float lookup failed");
                FloatLookup::TransportError(e.to_string())
            }
        }
    }
}

/// Read the float from a quote page. Only the first table mentioning the
/// label is inspected. The value is left unrounded so the ceiling check
/// sees what the page reported.
pub fn parse_float(body: &str, locator: &TableWithLabel) -> Option<f64> {
    let document = Html::parse_document(body);
    let table = locator.locate(&document)?;
    let value = html::value_after_label(table, &locator.label)?;
    parse_magnitude(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label() -> TableWithLabel {
        TableWithLabel::new("Shs Float")
    }

    fn quote_page(value: &str) -> String {
        format!(
            r#"<table><tr><td>Index</td><td>-</td></tr></table>
               <table class="snapshot-table2">
                 <tr><td>Shs Outstand</td><td><b>8.40M</b></td><td>Shs Float</td><td><b>{value}</b></td></tr>
               </table>"#
        )
    }

    fn shares(body: &str) -> Option<u64> {
        parse_float(body, &label()).map(|v| FloatLookup::Found(v).shares().unwrap())
    }

    #[test]
    fn reads_suffixed_float() {
        assert_eq!(shares(&quote_page("2.1M")), Some(2_100_000));
        assert_eq!(shares(&quote_page("650K")), Some(650_000));
        assert_eq!(shares(&quote_page("1.25B")), Some(1_250_000_000));
    }

    #[test]
    fn fractional_float_is_not_rounded_before_use() {
        let float = parse_float(&quote_page("5.0000004M"), &label()).unwrap();
        assert!(float > 5_000_000.0);
        assert_eq!(FloatLookup::Found(float).shares(), Some(5_000_000));
    }

    #[test]
    fn placeholder_value_is_unavailable() {
        assert_eq!(parse_float(&quote_page("-"), &label()), None);
    }

    #[test]
    fn missing_label_is_unavailable() {
        let body = "<table><tr><td>Shs Outstand</td><td>8.40M</td></tr></table>";
        assert_eq!(parse_float(body, &label()), None);
        assert_eq!(parse_float("<p>no tables</p>", &label()), None);
    }

    #[test]
    fn only_first_labelled_table_is_read() {
        let body = r#"<table><tr><td>Shs Float</td></tr></table>
                      <table><tr><td>Shs Float</td><td>1M</td></tr></table>"#;
        assert_eq!(parse_float(body, &label()), None);
    }

    #[test]
    fn shares_collapses_failures() {
        assert_eq!(FloatLookup::Found(42.4).shares(), Some(42));
        assert_eq!(FloatLookup::Found(42.4).magnitude(), Some(42.4));
        assert_eq!(FloatLookup::Unavailable.shares(), None);
        assert_eq!(FloatLookup::TransportError("timeout".into()).shares(), None);
    }
}
