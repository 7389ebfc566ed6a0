use std::time::Duration;

use gap_scanner::{Candidate, MoverRow, ReasonCategory, ScanError, Scanner, ScannerConfig};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str =
    "<tr><th>Ticker</th><th>Company</th><th>Close▲▼</th><th>±%</th><th>Avg. Vol▲▼</th></tr>";

fn listing(rows: &[[&str; 5]]) -> String {
    let body: String = rows
        .iter()
        .map(|cells| {
            let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
            format!("<tr>{tds}</tr>")
        })
        .collect();
    format!("<html><body><h1>Premarket</h1><table>{HEADER}{body}</table></body></html>")
}

fn quote_page(float: &str, news: &[(&str, &str)]) -> String {
    let news_rows: String = news
        .iter()
        .map(|(ts, h)| format!("<tr><td>{ts}</td><td><a>{h}</a></td></tr>"))
        .collect();
    format!(
        r#"<html><body>
            <table class="snapshot-table2">
              <tr><td>Shs Outstand</td><td><b>9.80M</b></td></tr>
              <tr><td>Shs Float</td><td><b>{float}</b></td></tr>
            </table>
            <table class="fullview-news-outer">{news_rows}</table>
        </body></html>"#
    )
}

fn config_for(server: &MockServer) -> ScannerConfig {
    ScannerConfig {
        listing_url: format!("{}/premarket", server.uri()),
        quote_url_template: format!("{}/quote.ashx?t={{ticker}}", server.uri()),
        timeout_secs: 2,
        ..ScannerConfig::default()
    }
}

async fn mount_listing(server: &MockServer, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path("/premarket"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_quote(server: &MockServer, symbol: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/quote.ashx"))
        .and(query_param("t", symbol))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

fn candidate(symbol: &str) -> Candidate {
    Candidate {
        row: MoverRow {
            symbol: symbol.into(),
            name: format!("{symbol} Inc"),
            price: 4.0,
            percent_change: 15.0,
            volume: 250_000,
        },
        float_shares: 1_000_000,
    }
}

#[tokio::test]
async fn low_float_gapper_is_found_with_reason() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        200,
        listing(&[
            ["ABCD", "Abc Corp", "$3.50", "+12.00%", "500K"],
            ["PRCY", "Pricey Co", "$31.00", "+40.00%", "2M"],
            ["SLOW", "Slow Co", "$5.00", "+4.99%", "2M"],
            ["QUIE", "Quiet Co", "$5.00", "+9.00%", "99,999"],
        ]),
    )
    .await;
    mount_quote(
        &server,
        "ABCD",
        ResponseTemplate::new(200).set_body_string(quote_page(
            "2.1M",
            &[
                ("08:02AM", "Abc Corp receives FDA approval"),
                ("07:15AM", "Abc Corp beats Q3 estimates"),
            ],
        )),
        2,
    )
    .await;
    for symbol in ["PRCY", "SLOW", "QUIE"] {
        mount_quote(&server, symbol, ResponseTemplate::new(200), 0).await;
    }

    let scanner = Scanner::new(&config_for(&server)).unwrap();
    let report = scanner.scan(true).await.unwrap();

    assert_eq!(report.listed, 4);
    assert_eq!(report.gappers.len(), 1);
    let gapper = &report.gappers[0];
    assert_eq!(
        gapper.candidate,
        Candidate {
            row: MoverRow {
                symbol: "ABCD".into(),
                name: "Abc Corp".into(),
                price: 3.5,
                percent_change: 12.0,
                volume: 500_000,
            },
            float_shares: 2_100_000,
        }
    );
    let reason = gapper.reason.as_ref().unwrap();
    assert_eq!(reason.category, ReasonCategory::FdaApproval);
    assert_eq!(reason.headlines.len(), 2);
    assert_eq!(reason.headlines[0].to_string(), "Abc Corp receives FDA approval (08:02AM)");
}

#[tokio::test]
async fn float_above_ceiling_or_missing_is_excluded() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        200,
        listing(&[
            ["EDGE", "Edge Co", "$2.00", "+10%", "300K"],
            ["BIGF", "Big Float", "$2.00", "+10%", "300K"],
            ["NOFL", "No Float", "$2.00", "+10%", "300K"],
            ["DOWN", "Down Co", "$2.00", "+10%", "300K"],
            ["FRAC", "Fraction Co", "$2.00", "+10%", "300K"],
            ["NEGV", "Negative Vol", "$2.00", "+10%", "-500K"],
        ]),
    )
    .await;
    let float_page =
        |float: &str| ResponseTemplate::new(200).set_body_string(quote_page(float, &[]));
    mount_quote(&server, "EDGE", float_page("5M"), 1).await;
    mount_quote(&server, "BIGF", float_page("5.01M"), 1).await;
    let no_float = "<table><tr><td>Shs Outstand</td><td>3M</td></tr></table>";
    mount_quote(&server, "NOFL", ResponseTemplate::new(200).set_body_string(no_float), 1).await;
    mount_quote(&server, "DOWN", ResponseTemplate::new(503), 1).await;
    mount_quote(&server, "FRAC", float_page("5.0000004M"), 1).await;
    mount_quote(&server, "NEGV", ResponseTemplate::new(200), 0).await;

    let scanner = Scanner::new(&config_for(&server)).unwrap();
    let report = scanner.scan(false).await.unwrap();

    assert_eq!(report.listed, 5);
    let symbols: Vec<_> = report.gappers.iter().map(|g| g.candidate.symbol()).collect();
    assert_eq!(symbols, ["EDGE"]);
    assert!(report.gappers[0].reason.is_none());
}

#[tokio::test]
async fn slow_float_page_times_out_and_is_excluded() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        200,
        listing(&[
            ["LAGG", "Lagging Co", "$2.00", "+10%", "300K"],
            ["FAST", "Fast Co", "$3.00", "+10%", "300K"],
        ]),
    )
    .await;
    mount_quote(
        &server,
        "LAGG",
        ResponseTemplate::new(200)
            .set_body_string(quote_page("1M", &[]))
            .set_delay(Duration::from_secs(5)),
        1,
    )
    .await;
    let fast_page = ResponseTemplate::new(200).set_body_string(quote_page("1M", &[]));
    mount_quote(&server, "FAST", fast_page, 1).await;

    let config = ScannerConfig { timeout_secs: 1, ..config_for(&server) };
    let scanner = Scanner::new(&config).unwrap();
    let (_, candidates) = scanner.candidates().await.unwrap();

    let symbols: Vec<_> = candidates.iter().map(|c| c.symbol()).collect();
    assert_eq!(symbols, ["FAST"]);
}

#[tokio::test]
async fn missing_header_fails_the_cycle() {
    let server = MockServer::start().await;
    let body = "<table>\
        <tr><th>Ticker</th><th>Company</th><th>Close▲▼</th><th>Chg</th><th>Avg. Vol▲▼</th></tr>\
        <tr><td>ABCD</td><td>Abc Corp</td><td>$3.50</td><td>+12.00%</td><td>500K</td></tr>\
        </table>";
    mount_listing(&server, 200, body.to_string()).await;
    mount_quote(&server, "ABCD", ResponseTemplate::new(200), 0).await;

    let scanner = Scanner::new(&config_for(&server)).unwrap();
    let err = scanner.scan(true).await.unwrap_err();
    assert!(matches!(err, ScanError::HeaderParsing(ref name) if name == "±%"));
    assert_eq!(err.to_string(), "Header parsing failed: '±%' is not in list");
}

#[tokio::test]
async fn missing_table_fails_the_cycle() {
    let server = MockServer::start().await;
    mount_listing(&server, 200, "<html><body>Come back later</body></html>".into()).await;

    let scanner = Scanner::new(&config_for(&server)).unwrap();
    let err = scanner.scan(true).await.unwrap_err();
    assert!(matches!(err, ScanError::TableNotFound));
}

#[tokio::test]
async fn listing_http_error_fails_the_cycle() {
    let server = MockServer::start().await;
    mount_listing(&server, 403, "denied".into()).await;

    let scanner = Scanner::new(&config_for(&server)).unwrap();
    let err = scanner.scan(false).await.unwrap_err();
    assert!(matches!(err, ScanError::Status { status: 403, .. }));
    assert!(err.to_string().starts_with("Request failed:"));
}

#[tokio::test]
async fn reasons_absorb_failures_and_keep_order() {
    let server = MockServer::start().await;
    mount_quote(
        &server,
        "DEAL",
        ResponseTemplate::new(200)
            .set_body_string(quote_page("1M", &[("09:00AM", "Signs supply deal")])),
        1,
    )
    .await;
    mount_quote(
        &server,
        "NONE",
        ResponseTemplate::new(200)
            .set_body_string("<table><tr><td>Shs Float</td><td>1M</td></tr></table>"),
        1,
    )
    .await;
    mount_quote(&server, "FAIL", ResponseTemplate::new(500), 1).await;

    let scanner = Scanner::new(&config_for(&server)).unwrap();
    let candidates = vec![candidate("DEAL"), candidate("NONE"), candidate("FAIL")];
    let reasons = scanner.reasons(&candidates).await;

    assert_eq!(reasons.len(), 3);
    assert_eq!(reasons[0].category, ReasonCategory::NewContract);
    assert_eq!(reasons[1].category, ReasonCategory::NoRecentNews);
    assert!(reasons[1].headlines.is_empty());
    assert!(matches!(reasons[2].category, ReasonCategory::Error(_)));
    assert!(reasons[2].category.to_string().starts_with("Error: "));
    assert!(reasons[2].headlines.is_empty());
}

#[tokio::test]
async fn invalid_config_is_rejected() {
    let config = ScannerConfig { concurrency: 0, ..ScannerConfig::default() };
    assert!(matches!(Scanner::new(&config), Err(ScanError::Config(_))));
}
