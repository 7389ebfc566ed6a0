//! Gapper screening.
//!
//! Rows are first checked against the price band, the percent-change floor
//! and the volume floor. Only rows passing all three cost a float lookup,
//! and a row becomes a [`Candidate`] only with a known float under the
//! ceiling.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::FilterCriteria;
use crate::fanout;
use crate::float::{FloatLookup, FloatSource};
use crate::models::{Candidate, MoverRow};

impl FilterCriteria {
    /// Price, change and volume screens. Needs no network.
    pub fn passes_quote(&self, row: &MoverRow) -> bool {
        (self.min_price..=self.max_price).contains(&row.price)
            && row.percent_change >= self.min_change_pct
            && row.volume >= self.min_volume
    }

    /// Compared unrounded, so 5,000,000.4 shares is over a 5M ceiling.
    pub fn passes_float(&self, float_shares: f64) -> bool {
        float_shares <= self.max_float as f64
    }
}

pub struct GapperFilter {
    criteria: FilterCriteria,
    floats: Arc<dyn FloatSource>,
    concurrency: usize,
}

impl GapperFilter {
    pub fn new(criteria: FilterCriteria, floats: Arc<dyn FloatSource>, concurrency: usize) -> Self {
        Self { criteria, floats, concurrency }
    }

    /// Screen listing rows into candidates, keeping listing order.
    pub async fn screen(&self, rows: Vec<MoverRow>) -> Vec<Candidate> {
        let total = rows.len();
        let survivors: Vec<MoverRow> = rows
            .into_iter()
            .filter(|row| self.criteria.passes_quote(row))
            .collect();
        debug!(total, survivors = survivors.len(), "quote screen done");

        let symbols: Vec<String> = survivors.iter().map(|r| r.symbol.clone()).collect();
        let floats = Arc::clone(&self.floats);
        let lookups = fanout::ordered(symbols, self.concurrency, move |symbol| {
            let floats = Arc::clone(&floats);
            async move { floats.lookup(&symbol).await }
        })
        .await;

        let mut candidates = Vec::new();
        for (row, lookup) in survivors.into_iter().zip(lookups) {
            let lookup = lookup
                .unwrap_or_else(|| FloatLookup::TransportError("lookup task failed".into()));
            match lookup.magnitude() {
                Some(float) if self.criteria.passes_float(float) => {
                    let float_shares = float.round() as u64;
                    candidates.push(Candidate { row, float_shares });
                }
                Some(float) => {
                    debug!(symbol = %row.symbol, float, "float above ceiling");
                }
                None => {
                    debug!(symbol = %row.symbol, ?lookup, "float unknown, excluding");
                }
            }
        }
        info!(candidates = candidates.len(), "screening complete");
        candidates
    }
}
