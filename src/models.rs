use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// One parsed row of the premarket listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoverRow {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub percent_change: f64,
    pub volume: u64,
}

/// A listing row that passed every screen, float included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub row: MoverRow,
    pub float_shares: u64,
}

impl Candidate {
    pub fn symbol(&self) -> &str {
        &self.row.symbol
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headline {
    pub headline: String,
    pub timestamp: String,
}

impl fmt::Display for Headline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.headline, self.timestamp)
    }
}

/// Why a symbol is moving, as far as its recent headlines tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonCategory {
    FdaApproval,
    EarningsBeat,
    AnalystUpgrade,
    MergerOrAcquisition,
    NewContract,
    LegalRegulatory,
    ShareOffering,
    NewsDriven,
    NoRecentNews,
    /// Fetching or reading the news failed; carries the cause.
    Error(String),
}

impl fmt::Display for ReasonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReasonCategory::FdaApproval => "FDA Approval or Clinical Results",
            ReasonCategory::EarningsBeat => "Earnings Beat",
            ReasonCategory::AnalystUpgrade => "Analyst Upgrade",
            ReasonCategory::MergerOrAcquisition => "Merger or Acquisition",
            ReasonCategory::NewContract => "New Contract",
            ReasonCategory::LegalRegulatory => "Legal/Regulatory",
            ReasonCategory::ShareOffering => "Share Offering",
            ReasonCategory::NewsDriven => "News-driven move",
            ReasonCategory::NoRecentNews => "No recent news",
            ReasonCategory::Error(message) => return write!(f, "Error: {message}"),
        };
        f.write_str(label)
    }
}

impl Serialize for ReasonCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReason {
    pub category: ReasonCategory,
    /// At most five, in page order.
    pub headlines: Vec<Headline>,
}

impl MoveReason {
    pub fn without_headlines(category: ReasonCategory) -> Self {
        Self { category, headlines: Vec::new() }
    }
}

/// A candidate together with its (optional) reason for moving.
#[derive(Debug, Clone, Serialize)]
pub struct Gapper {
    #[serde(flatten)]
    pub candidate: Candidate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<MoveReason>,
}

/// Result of one scan cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scanned_at: DateTime<Utc>,
    pub listed: usize,
    pub gappers: Vec<Gapper>,
}
