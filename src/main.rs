use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gap_scanner::config::{self, ColumnMap, ScannerConfig};
use gap_scanner::{FilterCriteria, ScanReport, Scanner};

/// Momentum gap scanner: low-float premarket movers and why they move.
#[derive(Debug, Parser)]
#[command(name = "gap-scanner", version)]
struct Cli {
    /// Premarket movers listing page
    #[arg(long, env = "GAP_SCANNER_LISTING_URL", default_value = config::DEFAULT_LISTING_URL)]
    listing_url: String,

    /// Quote page URL, `{ticker}` is replaced by the symbol
    #[arg(long, env = "GAP_SCANNER_QUOTE_URL", default_value = config::DEFAULT_QUOTE_URL_TEMPLATE)]
    quote_url: String,

    #[arg(long, default_value = config::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Maximum concurrent quote page requests (1 = sequential)
    #[arg(long, default_value_t = config::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Label cell preceding the float value on the quote page
    #[arg(long, default_value = config::DEFAULT_FLOAT_LABEL)]
    float_label: String,

    /// CSS class of the quote page's news table
    #[arg(long, default_value = config::DEFAULT_NEWS_TABLE_CLASS)]
    news_table_class: String,

    /// Listing header names, lower-cased
    #[arg(long, default_value = config::DEFAULT_SYMBOL_COLUMN)]
    symbol_column: String,

    #[arg(long, default_value = config::DEFAULT_NAME_COLUMN)]
    name_column: String,

    #[arg(long, default_value = config::DEFAULT_PRICE_COLUMN)]
    price_column: String,

    #[arg(long, default_value = config::DEFAULT_CHANGE_COLUMN)]
    change_column: String,

    #[arg(long, default_value = config::DEFAULT_VOLUME_COLUMN)]
    volume_column: String,

    #[arg(long, default_value_t = 1.0)]
    min_price: f64,

    #[arg(long, default_value_t = 25.0)]
    max_price: f64,

    /// Minimum percent change
    #[arg(long, default_value_t = 5.0)]
    min_change: f64,

    #[arg(long, default_value_t = 100_000)]
    min_volume: u64,

    /// Float ceiling in shares
    #[arg(long, default_value_t = 5_000_000)]
    max_float: u64,

    /// Skip headline lookups
    #[arg(long)]
    no_reasons: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> ScannerConfig {
        ScannerConfig {
            listing_url: self.listing_url.clone(),
            quote_url_template: self.quote_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout_secs: self.timeout,
            concurrency: self.concurrency,
            float_label: self.float_label.clone(),
            news_table_class: self.news_table_class.clone(),
            columns: ColumnMap {
                symbol: self.symbol_column.to_lowercase(),
                name: self.name_column.to_lowercase(),
                price: self.price_column.to_lowercase(),
                change: self.change_column.to_lowercase(),
                volume: self.volume_column.to_lowercase(),
            },
            criteria: FilterCriteria {
                min_price: self.min_price,
                max_price: self.max_price,
                min_change_pct: self.min_change,
                min_volume: self.min_volume,
                max_float: self.max_float,
            },
        }
    }
}

fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn print_report(report: &ScanReport) {
    if report.gappers.is_empty() {
        println!("No stocks met the criteria today.");
        return;
    }

    println!(
        "Found {} qualifying gappers ({} listed, scanned {})",
        report.gappers.len(),
        report.listed,
        report.scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
    println!(
        "{:<8} {:<32} {:>10} {:>10} {:>14} {:>12}",
        "Symbol", "Name", "Price", "% Change", "Volume", "Float"
    );
    for g in &report.gappers {
        let row = &g.candidate.row;
        println!(
            "{:<8} {:<32} {:>10.2} {:>10.2} {:>14} {:>12}",
            row.symbol,
            row.name.chars().take(32).collect::<String>(),
            row.price,
            row.percent_change,
            with_commas(row.volume),
            with_commas(g.candidate.float_shares)
        );
    }

    for g in &report.gappers {
        let Some(reason) = &g.reason else { continue };
        let row = &g.candidate.row;
        println!();
        println!("{} | {} | {}%", row.symbol, row.name, row.percent_change);
        println!("  Price:  ${}", row.price);
        println!("  Volume: {}", with_commas(row.volume));
        println!("  Float:  {}", with_commas(g.candidate.float_shares));
        println!("  Reason for move: {}", reason.category);
        if !reason.headlines.is_empty() {
            println!("  Latest headlines:");
            for h in &reason.headlines {
                println!("    - {}", h);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let scanner = Scanner::new(&cli.to_config())?;
    let report = match scanner.scan(!cli.no_reasons).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            return Err(e.into());
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
