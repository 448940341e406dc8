// src/scrape/mod.rs

use anyhow::{Context, Result};
use tracing::{debug, info};

mod dates;

pub use dates::{parse_bulletin_date, IntoBulletinDate};

use crate::config::ConnectionParams;
use crate::error::ExtractError;
use crate::fetch::{BulletinSource, DATE_FORMAT};
use crate::process::{extract_bulletin, BulletinTable};
use crate::schema::registry;
use crate::store::postgres;

/// Scrape `contract` for every calendar day in `[start, end]`, in date order.
///
/// Days without rows contribute nothing; a fetch failure aborts the whole call.
#[tracing::instrument(level = "info", skip(source, start, end))]
pub async fn scrape_range<S: BulletinSource>(
    source: &S,
    contract: &str,
    start: impl IntoBulletinDate,
    end: impl IntoBulletinDate,
) -> Result<BulletinTable> {
    let schema = registry::lookup(contract)?;
    let start = start.into_bulletin_date()?;
    let end = end.into_bulletin_date()?;

    let mut combined = BulletinTable::default();
    for date in start.iter_days().take_while(|d| *d <= end) {
        let day = date.format(DATE_FORMAT).to_string();
        info!(contract = %schema.contract, date = %day, "scraping");

        let text = source
            .fetch(&schema.contract, date)
            .await
            .with_context(|| format!("fetching {} for {}", schema.contract, day))?;
        let table = extract_bulletin(&text, &schema, date)?;

        if table.is_empty() {
            debug!(date = %day, "no rows");
            continue;
        }
        info!(date = %day, rows = table.len(), "extracted");
        combined.concat(table);
    }

    Ok(combined)
}

/// Public entry point.
///
/// With `persist == false` the combined table is returned. With
/// `persist == true` it is uploaded through `connection` instead and
/// `None` is returned; a missing `connection` fails before any fetch.
pub async fn scrape<S: BulletinSource>(
    source: &S,
    contract: &str,
    start: impl IntoBulletinDate,
    end: impl IntoBulletinDate,
    persist: bool,
    connection: Option<&ConnectionParams>,
) -> Result<Option<BulletinTable>> {
    let target = match (persist, connection) {
        (true, None) => return Err(ExtractError::MissingConnection.into()),
        (true, Some(params)) => Some(params),
        (false, _) => None,
    };

    let table = scrape_range(source, contract, start, end).await?;

    match target {
        Some(params) => {
            let code = registry::lookup(contract)?.contract;
            postgres::send_to_db(&table, &code, params).await?;
            Ok(None)
        }
        None => Ok(Some(table)),
    }
}
