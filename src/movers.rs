//! Premarket movers listing: fetch the page, find the table, map the
//! columns by header name and turn each data row into a [`MoverRow`].

use reqwest::Client;
use scraper::Html;
use tracing::{debug, info};

use crate::config::ColumnMap;
use crate::error::{Result, ScanError};
use crate::html::{self, FirstTable, TableLocator};
use crate::http;
use crate::models::MoverRow;
use crate::numeric::{parse_percent, parse_price, parse_volume};

/// Positions of the required columns within a listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub symbol: usize,
    pub name: usize,
    pub price: usize,
    pub change: usize,
    pub volume: usize,
}

impl ColumnIndex {
    /// Resolve every required column against a lower-cased, trimmed header.
    /// The first missing name is reported.
    pub fn resolve(header: &[String], columns: &ColumnMap) -> Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ScanError::HeaderParsing(name.to_string()))
        };
        Ok(Self {
            symbol: find(&columns.symbol)?,
            name: find(&columns.name)?,
            price: find(&columns.price)?,
            change: find(&columns.change)?,
            volume: find(&columns.volume)?,
        })
    }

    /// Minimum number of cells a row needs to be readable.
    pub fn width(&self) -> usize {
        [self.symbol, self.name, self.price, self.change, self.volume]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Build a row from its cells, or `None` if any field fails to parse.
    pub fn parse_row(&self, cells: &[String]) -> Option<MoverRow> {
        if cells.len() < self.width() {
            return None;
        }
        let symbol = cells[self.symbol].trim().to_uppercase();
        if symbol.is_empty() {
            return None;
        }
        Some(MoverRow {
            symbol,
            name: cells[self.name].clone(),
            price: parse_price(&cells[self.price])?,
            percent_change: parse_percent(&cells[self.change])?,
            volume: parse_volume(&cells[self.volume])?,
        })
    }
}

pub struct MoversFetcher {
    client: Client,
    url: String,
    columns: ColumnMap,
    locator: Box<dyn TableLocator>,
}

impl MoversFetcher {
    pub fn new(client: Client, url: impl Into<String>, columns: ColumnMap) -> Self {
        Self {
            client,
            url: url.into(),
            columns,
            locator: Box::new(FirstTable),
        }
    }

    /// Use a different strategy for finding the listing table.
    pub fn with_locator(mut self, locator: impl TableLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Fetch and parse the listing. Unreadable rows are dropped; a transport
    /// failure, a missing table or a missing header column is an error.
    pub async fn fetch(&self) -> Result<Vec<MoverRow>> {
        let body = http::fetch_html(&self.client, &self.url).await?;
        let rows = parse_listing(&body, &self.columns, self.locator.as_ref())?;
        info!(rows = rows.len(), url = %self.url, "parsed premarket listing");
        Ok(rows)
    }
}

/// Parse a listing page already in memory.
pub fn parse_listing(
    body: &str,
    columns: &ColumnMap,
    locator: &dyn TableLocator,
) -> Result<Vec<MoverRow>> {
    let document = Html::parse_document(body);
    let table = locator.locate(&document).ok_or(ScanError::TableNotFound)?;

    let rows = html::rows(table);
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Err(ScanError::HeaderParsing(columns.symbol.clone()));
    };
    let header: Vec<String> = html::header_cells(*header_row)
        .into_iter()
        .map(|h| h.to_lowercase())
        .collect();
    let index = ColumnIndex::resolve(&header, columns)?;

    let mut parsed = Vec::with_capacity(data_rows.len());
    for row in data_rows {
        let cells = html::data_cells(*row);
        match index.parse_row(&cells) {
            Some(mover) => parsed.push(mover),
            None => debug!(?cells, "skipping unreadable listing row"),
        }
    }
    Ok(parsed)
}
