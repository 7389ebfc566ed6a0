//! Premarket gapper scanner.
//!
//! Scrapes a premarket movers listing, keeps small-float stocks making big
//! moves, and labels each with a best-effort reason taken from its recent
//! headlines.

pub mod config;
pub mod error;
pub mod fanout;
pub mod filter;
pub mod float;
pub mod html;
pub mod http;
pub mod models;
pub mod movers;
pub mod numeric;
pub mod pipeline;
pub mod reason;

pub use config::{ColumnMap, FilterCriteria, ScannerConfig};
pub use error::ScanError;
pub use models::{Candidate, Gapper, Headline, MoveReason, MoverRow, ReasonCategory, ScanReport};
pub use pipeline::Scanner;
