//! Best-effort "why is it moving" from a symbol's latest headlines.

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use tracing::{debug, warn};

use crate::config;
use crate::error::Result;
use crate::html::{self, TableLocator, TableWithClass};
use crate::http;
use crate::models::{Headline, MoveReason, ReasonCategory};

pub const MAX_HEADLINES: usize = 5;

/// A keyword rule: any keyword found in the headline text selects the
/// category.
pub struct ReasonRule {
    pub keywords: &'static [&'static str],
    pub category: ReasonCategory,
}

impl ReasonRule {
    pub fn new(keywords: &'static [&'static str], category: ReasonCategory) -> Self {
        Self { keywords, category }
    }
}

/// Rules in precedence order. Matching is plain substring search on the
/// lower-cased text, so "sec" also hits "second".
pub fn default_rules() -> Vec<ReasonRule> {
    vec![
        ReasonRule::new(&["fda", "approval"], ReasonCategory::FdaApproval),
        ReasonRule::new(&["beats", "earnings"], ReasonCategory::EarningsBeat),
        ReasonRule::new(&["upgrade", "initiated"], ReasonCategory::AnalystUpgrade),
        ReasonRule::new(&["merger", "acquire"], ReasonCategory::MergerOrAcquisition),
        ReasonRule::new(&["contract", "deal"], ReasonCategory::NewContract),
        ReasonRule::new(&["lawsuit", "sec"], ReasonCategory::LegalRegulatory),
        ReasonRule::new(&["offering", "dilution"], ReasonCategory::ShareOffering),
    ]
}

/// First matching rule wins; no match means a generic news-driven move.
pub fn classify_text(text: &str, rules: &[ReasonRule]) -> ReasonCategory {
    let text = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| text.contains(k)))
        .map(|rule| rule.category.clone())
        .unwrap_or(ReasonCategory::NewsDriven)
}

pub fn classify_headlines(headlines: &[Headline], rules: &[ReasonRule]) -> ReasonCategory {
    let text = headlines
        .iter()
        .map(Headline::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    classify_text(&text, rules)
}

#[async_trait]
pub trait ReasonSource: Send + Sync {
    /// Never fails; problems are reported through the category.
    async fn reason_for(&self, symbol: &str) -> MoveReason;
}

pub struct MoveReasonClassifier {
    client: Client,
    url_template: String,
    news_table: TableWithClass,
    rules: Vec<ReasonRule>,
}

impl MoveReasonClassifier {
    pub fn new(
        client: Client,
        url_template: impl Into<String>,
        news_table_class: &str,
    ) -> Result<Self> {
        Ok(Self {
            client,
            url_template: url_template.into(),
            news_table: TableWithClass::new(news_table_class)?,
            rules: default_rules(),
        })
    }

    async fn try_reason(&self, symbol: &str) -> Result<MoveReason> {
        let url = config::quote_url(&self.url_template, symbol);
        let body = http::fetch_html(&self.client, &url).await?;
        Ok(reason_from_page(&body, &self.news_table, &self.rules))
    }
}

#[async_trait]
impl ReasonSource for MoveReasonClassifier {
    async fn reason_for(&self, symbol: &str) -> MoveReason {
        match self.try_reason(symbol).await {
            Ok(reason) => {
                debug!(symbol, category = %reason.category, "classified move");
                reason
            }
            Err(e) => {
                warn!(symbol, error = %e, "could not classify move");
                MoveReason::without_headlines(ReasonCategory::Error(e.to_string()))
            }
        }
    }
}

/// Extract up to [`MAX_HEADLINES`] headlines from the news table and
/// classify them.
pub fn reason_from_page(
    body: &str,
    locator: &dyn TableLocator,
    rules: &[ReasonRule],
) -> MoveReason {
    let headlines = {
        let document = Html::parse_document(body);
        let Some(table) = locator.locate(&document) else {
            return MoveReason::without_headlines(ReasonCategory::NoRecentNews);
        };
        html::rows(table)
            .into_iter()
            .take(MAX_HEADLINES)
            .filter_map(|row| {
                let cells = html::data_cells(row);
                if cells.len() < 2 {
                    return None;
                }
                Some(Headline {
                    timestamp: cells[0].clone(),
                    headline: cells[1].clone(),
                })
            })
            .collect::<Vec<_>>()
    };
    let category = classify_headlines(&headlines, rules);
    MoveReason { category, headlines }
}
