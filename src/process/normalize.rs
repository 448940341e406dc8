use once_cell::sync::Lazy;
use regex::Regex;

use super::table::{BulletinTable, Value};
use crate::schema::registry::{CONTRACT, NOISE_FIELDS, NUMERIC_FIELDS};

static NON_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9.]").expect("numeric filter regex should compile"));

/// Keep digits and `.` only, then parse. Anything unparsable is a null.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = NON_NUMERIC.replace_all(raw, "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Coerce numeric fields, drop display-only columns and tag every row with
/// `contract`. Running it again on its own output changes nothing.
pub fn normalize(table: &mut BulletinTable, contract: &str) {
    coerce_numeric(table);
    drop_noise(table);
    tag_contract(table, contract);
}

fn coerce_numeric(table: &mut BulletinTable) {
    for record in table.records_mut() {
        for field in NUMERIC_FIELDS {
            let parsed = match record.get(field) {
                Some(Value::Text(raw)) => parse_number(raw),
                _ => continue,
            };
            match parsed {
                Some(n) => record.set(field, Value::Number(n)),
                None => {
                    record.remove(field);
                }
            }
        }
    }
}

fn drop_noise(table: &mut BulletinTable) {
    for field in NOISE_FIELDS {
        table.drop_column(field);
    }
}

fn tag_contract(table: &mut BulletinTable, contract: &str) {
    table.prepend_column(CONTRACT);
    for record in table.records_mut() {
        record.set(CONTRACT, Value::Text(contract.to_string()));
    }
}
