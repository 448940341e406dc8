// src/process/mod.rs
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, warn};

pub mod maturity;
pub mod normalize;
pub mod scan;
pub mod slice;
pub mod table;

pub use table::{BulletinRecord, BulletinTable, Value};

use crate::error::ExtractError;
use crate::schema::{registry::MATURITY_CODE, ContractSchema};

/// Extract one day's bulletin for `schema.contract` out of a raw page body.
///
/// Steps, in order:
/// 1. scan the body for row fragments
/// 2. slice each fragment into the schema's fields
/// 3. coerce numbers, drop noise columns, tag the contract
/// 4. rewrite legacy maturity codes against `date`
///
/// A page without rows (holidays, weekends) yields an empty table.
#[tracing::instrument(level = "debug", skip(text, schema), fields(contract = %schema.contract, %date))]
pub fn extract_bulletin(
    text: &str,
    schema: &ContractSchema,
    date: NaiveDate,
) -> Result<BulletinTable, ExtractError> {
    let mut table = BulletinTable::with_fields(schema.fields());

    for fragment in scan::fragments(text) {
        let mut record = BulletinRecord::new(date);
        for (field, value) in schema.fields().iter().zip(slice::slice_fields(fragment, schema)) {
            if let Some(v) = value {
                record.set(field, Value::Text(v));
            }
        }
        table.push(record);
    }

    normalize::normalize(&mut table, &schema.contract);

    if table.is_empty() {
        debug!("no bulletin rows found");
        return Ok(table);
    }

    maturity::translate(&mut table, date)?;
    warn_duplicate_maturities(&table);

    debug!(rows = table.len(), "extracted bulletin");
    Ok(table)
}

fn warn_duplicate_maturities(table: &BulletinTable) {
    let mut seen = HashSet::new();
    for record in table.records() {
        if let Some(code) = record.text(MATURITY_CODE) {
            if !seen.insert(code) {
                warn!(maturity = code, date = %record.date, "duplicate maturity in one bulletin");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::scan::{ROW_END, ROW_START};
    use super::slice::{CELL_END, CELL_RIGHT};

    /// Script tail that closes each row; splits into five artifact pieces.
    const TRAILER: &str = "'</tr>';&nbsp;&nbsp;&nbsp;\n";

    /// One embedded row: the maturity in the opening centre cell, the rest right-aligned.
    pub fn row(maturity: &str, cells: &[&str]) -> String {
        let mut pieces = vec![format!("{ROW_START}{maturity}{CELL_END}")];
        pieces.extend(cells.iter().map(|c| format!("{CELL_RIGHT}{c}{CELL_END}")));
        format!("{ROW_END}'{};{TRAILER}", pieces.join(";"))
    }

    /// A page body wrapping `rows` the way the bulletin script does.
    pub fn page(rows: &[String]) -> String {
        format!(
            "<html><body><script>\nvar MercFut3 = '<table>';\n{}{ROW_END}'</table>';\n</script></body></html>",
            rows.concat()
        )
    }

    /// Seventeen cells following the maturity in a rate/spread row.
    pub fn rate_spread_cells(last_price: &'static str) -> Vec<&'static str> {
        vec![
            "120,500", "118,250", "1,015", "85,300", "8,123,456.78", "&nbsp", "93,120.45",
            "93,200.10", "6.515", "6.490", "6.530", "6.512", last_price, "6.520", "+0.005",
            "6.515", "6.525",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{page, rate_spread_cells, row};
    use super::*;
    use crate::schema::lookup;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 8, 1).unwrap()
    }

    #[test]
    fn test_extract_three_rows() {
        let cells = rate_spread_cells("6.510");
        let blob = page(&[row("F19", &cells), row("G19", &cells), row("H19", &cells)]);
        let schema = lookup("di1").unwrap();

        let table = extract_bulletin(&blob, &schema, date()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.columns()[0], "CONTRACT");
        for col in ["JUNK1", "CHANGE"] {
            assert!(!table.has_column(col), "{col} should be dropped");
        }

        let codes: Vec<_> = table.records().iter().map(|r| r.text("MATURITY_CODE")).collect();
        assert_eq!(codes, [Some("F19"), Some("G19"), Some("H19")]);

        for r in table.records() {
            assert_eq!(r.text("CONTRACT"), Some("DI1"));
            assert_eq!(r.date, date());
            assert_eq!(r.number("OPEN_INTEREST_OPEN"), Some(120500.0));
            assert_eq!(r.number("FINANCIAL_VOLUME"), Some(8123456.78));
            assert_eq!(r.number("LAST_PRICE"), Some(6.51));
            assert_eq!(r.number("LAST_OFFER"), Some(6.525));
            assert_eq!(r.get("JUNK1"), None);
        }
    }

    #[test]
    fn test_extract_legacy_maturities() {
        let cells = rate_spread_cells("18.10");
        let blob = page(&[row("JAN9", &cells), row("JUL0", &cells)]);
        let schema = lookup("DI1").unwrap();
        let day = NaiveDate::from_ymd_opt(2009, 6, 1).unwrap();

        let table = extract_bulletin(&blob, &schema, day).unwrap();
        let codes: Vec<_> = table.records().iter().map(|r| r.text("MATURITY_CODE")).collect();
        assert_eq!(codes, [Some("F09"), Some("N10")]);
    }

    #[test]
    fn test_empty_page() {
        let schema = lookup("DOL").unwrap();
        let table = extract_bulletin("<html>no trading today</html>", &schema, date()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_unknown_month_aborts_extraction() {
        let cells = rate_spread_cells("1");
        let blob = page(&[row("JAN9", &cells), row("XXX9", &cells)]);
        let schema = lookup("DI1").unwrap();
        let err = extract_bulletin(&blob, &schema, date()).unwrap_err();
        assert_eq!(err, ExtractError::UnknownMonth("XXX".into()));
    }

    #[test]
    fn test_missing_quotes_become_null() {
        let mut cells = rate_spread_cells("-");
        cells[15] = " ";
        let blob = page(&[row("F19", &cells)]);
        let schema = lookup("DI1").unwrap();

        let table = extract_bulletin(&blob, &schema, date()).unwrap();
        let r = &table.records()[0];
        assert_eq!(r.get("LAST_PRICE"), None);
        assert_eq!(r.get("LAST_BID"), None);
        assert_eq!(r.number("LAST_OFFER"), Some(6.525));
    }
}
