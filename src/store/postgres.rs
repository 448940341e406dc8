//! Upload of scraped bulletins into the `B3futures` table.
//!
//! Rows already present for the same (date, maturity) are skipped before
//! inserting; a unique-constraint violation during the append is logged
//! and swallowed so whatever was inserted before it stays committed.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Row};
use std::{
    collections::HashSet,
    time::{Duration, Instant},
};
use tracing::{info, warn};

use crate::config::ConnectionParams;
use crate::process::{BulletinRecord, BulletinTable};
use crate::schema::{registry::is_numeric, registry::MATURITY_CODE, DATE_COLUMN};

pub const TABLE_NAME: &str = "B3futures";

/// Rows per INSERT statement.
const INSERT_CHUNK: usize = 500;

/// (trading date, maturity code) pairs already stored for one contract.
pub type ExistingKeys = HashSet<(NaiveDate, String)>;

pub async fn connect(params: &ConnectionParams) -> Result<PgPool> {
    if !matches!(params.flavor.as_str(), "postgres" | "postgresql") {
        bail!("unsupported database flavor `{}`", params.flavor);
    }
    let url = params.url()?;
    PgPoolOptions::new()
        .max_connections(1)
        .connect(url.as_str())
        .await
        .with_context(|| format!("connecting to {}:{}/{}", params.host, params.port, params.database))
}

/// Append `table` to the database, skipping rows that are already stored.
#[tracing::instrument(level = "info", skip(table, params), fields(rows = table.len()))]
pub async fn send_to_db(table: &BulletinTable, contract: &str, params: &ConnectionParams) -> Result<()> {
    let started = Instant::now();

    let Some((min_date, max_date)) = table.date_span() else {
        info!("nothing to upload");
        return Ok(());
    };

    let pool = connect(params).await?;
    let existing = existing_keys(&pool, &params.schema, contract, min_date, max_date).await?;
    let pending = pending_records(table, &existing);
    info!(
        already_stored = table.len() - pending.len(),
        pending = pending.len(),
        "deduplicated against database"
    );

    let inserted = insert_records(&pool, &params.schema, table.columns(), &pending).await?;
    pool.close().await;

    info!(inserted, minutes = elapsed_minutes(started.elapsed()), "upload finished");
    Ok(())
}

async fn existing_keys(
    pool: &PgPool,
    schema: &str,
    contract: &str,
    min_date: NaiveDate,
    max_date: NaiveDate,
) -> Result<ExistingKeys> {
    let sql = existing_keys_query(schema);
    let rows = sqlx::query(&sql)
        .bind(contract)
        .bind(min_date)
        .bind(max_date)
        .fetch_all(pool)
        .await
        .context("querying stored bulletin keys")?;

    let mut keys = ExistingKeys::with_capacity(rows.len());
    for row in rows {
        let date: NaiveDate = row.try_get("time_stamp")?;
        let maturity: Option<String> = row.try_get("maturity_code")?;
        if let Some(m) = maturity {
            keys.insert((date, m));
        }
    }
    Ok(keys)
}

/// Records of `table` whose (date, maturity) pair is not in `existing`.
pub fn pending_records<'a>(table: &'a BulletinTable, existing: &ExistingKeys) -> Vec<&'a BulletinRecord> {
    table
        .records()
        .iter()
        .filter(|r| match r.text(MATURITY_CODE) {
            Some(m) => !existing.contains(&(r.date, m.to_string())),
            None => true,
        })
        .collect()
}

async fn insert_records(
    pool: &PgPool,
    schema: &str,
    columns: &[String],
    records: &[&BulletinRecord],
) -> Result<u64> {
    let mut inserted = 0;

    for chunk in records.chunks(INSERT_CHUNK) {
        let mut qb = insert_statement(schema, columns);
        qb.push_values(chunk, |mut b, record| {
            b.push_bind(record.date);
            for col in columns {
                if is_numeric(col) {
                    b.push_bind(record.number(col));
                } else {
                    b.push_bind(record.get(col).map(|v| v.to_string()));
                }
            }
        });

        match qb.build().execute(pool).await {
            Ok(done) => inserted += done.rows_affected(),
            Err(e) if is_duplicate(&e) => {
                warn!(error = %e, "there are duplicate entries in the table; stopping upload");
                break;
            }
            Err(e) => return Err(e).context("inserting bulletin rows"),
        }
    }

    Ok(inserted)
}

/// Stored (date, maturity) pairs for one contract within a date span.
fn existing_keys_query(schema: &str) -> String {
    format!(
        "SELECT time_stamp::date AS time_stamp, maturity_code FROM {} \
         WHERE contract = $1 AND time_stamp BETWEEN $2 AND $3",
        qualified_table(schema)
    )
}

/// Unique-constraint violations end the upload quietly; anything else is an error.
fn is_duplicate(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(e) => e.is_unique_violation(),
        _ => false,
    }
}

fn elapsed_minutes(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() / 60.0 * 100.0).round() / 100.0
}

/// `INSERT INTO "schema"."B3futures" (time_stamp, <lower-cased columns>) VALUES `
fn insert_statement(schema: &str, columns: &[String]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "INSERT INTO {} ({}",
        qualified_table(schema),
        quote_ident(&DATE_COLUMN.to_lowercase())
    ));
    for col in columns {
        qb.push(", ");
        qb.push(quote_ident(&col.to_lowercase()));
    }
    qb.push(") ");
    qb
}

fn qualified_table(schema: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(TABLE_NAME))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
