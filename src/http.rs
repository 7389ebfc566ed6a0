use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use crate::config::ScannerConfig;
use crate::error::{Result, ScanError};

/// Build the client shared by every fetcher: static User-Agent and a hard
/// per-request timeout.
pub fn build_client(config: &ScannerConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    let agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|e| ScanError::Config(format!("user agent: {e}")))?;
    headers.insert(USER_AGENT, agent);

    let client = Client::builder()
        .default_headers(headers)
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}

/// GET `url` and return the body, failing on non-success status.
pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    debug!(url, "GET");
    let resp = client.get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ScanError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(resp.text().await?)
}
