// src/fetch/mod.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// B3 "sistema pregão" bulletin page (English edition).
pub const DEFAULT_URL: &str =
    "http://www2.bmf.com.br/pages/portal/bmfbovespa/lumis/lum-sistema-pregao-enUS.asp";

/// Date format the bulletin page expects in its `Data` parameter.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Anything that can hand back the raw page body for one contract and day.
#[allow(async_fn_in_trait)]
pub trait BulletinSource {
    async fn fetch(&self, contract: &str, date: NaiveDate) -> Result<String>;
}

/// Fetches bulletins over HTTP. No retries: a failed request fails the date.
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Self::with_client(client, url)
    }

    pub fn with_client(client: Client, url: &str) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("parsing bulletin URL {}", url))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl BulletinSource for HttpSource {
    async fn fetch(&self, contract: &str, date: NaiveDate) -> Result<String> {
        let day = date.format(DATE_FORMAT).to_string();
        debug!(url = %self.url, contract, date = %day, "GET bulletin");

        let body = self
            .client
            .get(self.url.clone())
            .query(&[("Data", day.as_str()), ("Mercadoria", contract)])
            .send()
            .await
            .with_context(|| format!("GET {} for {} on {}", self.url, contract, day))?
            .error_for_status()?
            .text()
            .await
            .with_context(|| format!("reading bulletin body for {} on {}", contract, day))?;

        Ok(body)
    }
}
