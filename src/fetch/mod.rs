mod basic;
mod client;
mod coords;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use coords::Coordinates;

use anyhow::{Result, anyhow};

/// Fetches the feed body as UTF-8 text.
///
/// # Errors
///
/// Fails on transport errors and on any non-success HTTP status; both are
/// fatal for the poll cycle.
pub async fn fetch_text<C: HttpClient>(client: &C, url: &str) -> Result<String> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse()?,
    );

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        return Err(anyhow!("feed returned status {}", resp.status()));
    }
    Ok(resp.text().await?)
}
