//! One scan cycle: listing, screening, float enrichment and (optionally)
//! move reasons.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::ScannerConfig;
use crate::error::Result;
use crate::fanout;
use crate::filter::GapperFilter;
use crate::float::FloatFetcher;
use crate::http;
use crate::models::{Candidate, Gapper, MoveReason, ReasonCategory, ScanReport};
use crate::movers::MoversFetcher;
use crate::reason::{MoveReasonClassifier, ReasonSource};

pub struct Scanner {
    movers: MoversFetcher,
    filter: GapperFilter,
    reasons: Arc<dyn ReasonSource>,
    concurrency: usize,
}

impl Scanner {
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        config.validate()?;
        let client = http::build_client(config)?;

        let template = &config.quote_url_template;
        let columns = config.columns.clone();
        let movers = MoversFetcher::new(client.clone(), &config.listing_url, columns);
        let floats = FloatFetcher::new(client.clone(), template, &config.float_label);
        let filter = GapperFilter::new(config.criteria, Arc::new(floats), config.concurrency);
        let reasons = MoveReasonClassifier::new(client, template, &config.news_table_class)?;

        Ok(Self {
            movers,
            filter,
            reasons: Arc::new(reasons),
            concurrency: config.concurrency,
        })
    }

    /// Listing and screening only. A listing failure is returned as an error
    /// and yields no candidates.
    pub async fn candidates(&self) -> Result<(usize, Vec<Candidate>)> {
        let rows = self.movers.fetch().await?;
        let listed = rows.len();
        Ok((listed, self.filter.screen(rows).await))
    }

    /// Reasons for each candidate, in the same order.
    pub async fn reasons(&self, candidates: &[Candidate]) -> Vec<MoveReason> {
        let symbols: Vec<String> = candidates.iter().map(|c| c.symbol().to_string()).collect();
        let source = Arc::clone(&self.reasons);
        fanout::ordered(symbols, self.concurrency, move |symbol| {
            let source = Arc::clone(&source);
            async move { source.reason_for(&symbol).await }
        })
        .await
        .into_iter()
        .map(|reason| {
            reason.unwrap_or_else(|| {
                let cause = "classification task failed".to_string();
                MoveReason::without_headlines(ReasonCategory::Error(cause))
            })
        })
        .collect()
    }

    /// Run a full cycle.
    pub async fn scan(&self, with_reasons: bool) -> Result<ScanReport> {
        let scanned_at = Utc::now();
        let (listed, candidates) = self.candidates().await?;

        let gappers: Vec<Gapper> = if with_reasons {
            let reasons = self.reasons(&candidates).await;
            candidates
                .into_iter()
                .zip(reasons)
                .map(|(candidate, reason)| Gapper { candidate, reason: Some(reason) })
                .collect()
        } else {
            candidates
                .into_iter()
                .map(|candidate| Gapper { candidate, reason: None })
                .collect()
        };

        info!(listed, gappers = gappers.len(), "scan complete");
        Ok(ScanReport { scanned_at, listed, gappers })
    }
}
