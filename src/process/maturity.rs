// src/process/maturity.rs

use chrono::{Datelike, NaiveDate};

use super::table::{BulletinTable, Value};
use crate::error::ExtractError;
use crate::schema::registry::MATURITY_CODE;

/// Portuguese month abbreviations → futures month letters.
const MONTH_CODES: [(&str, char); 12] = [
    ("JAN", 'F'),
    ("FEV", 'G'),
    ("MAR", 'H'),
    ("ABR", 'J'),
    ("MAI", 'K'),
    ("JUN", 'M'),
    ("JUL", 'N'),
    ("AGO", 'Q'),
    ("SET", 'U'),
    ("OUT", 'V'),
    ("NOV", 'X'),
    ("DEZ", 'Z'),
];

/// Codes at least this long use the legacy month + single year digit form.
const LEGACY_MIN_LEN: usize = 4;

pub fn month_letter(abbr: &str) -> Option<char> {
    MONTH_CODES
        .iter()
        .find(|(name, _)| *name == abbr)
        .map(|(_, letter)| *letter)
}

/// Rewrite a legacy code such as `JAN8` into `F08` / `F18`.
///
/// The legacy form only carries the last year digit: a digit at or above
/// the bulletin year's last digit stays in the current decade, anything
/// below rolls into the next one. Shorter codes are returned unchanged.
pub fn canonical_code(code: &str, bulletin_date: NaiveDate) -> Result<String, ExtractError> {
    if code.chars().count() < LEGACY_MIN_LEN {
        return Ok(code.to_string());
    }

    let mut chars = code.chars();
    let last = chars.next_back();
    let abbr = chars.as_str();

    let letter = month_letter(abbr).ok_or_else(|| ExtractError::UnknownMonth(abbr.to_string()))?;
    let digit = last
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| ExtractError::MalformedMaturity(code.to_string()))?;

    let year_digit = bulletin_date.year().rem_euclid(10) as u32;
    let decade = if digit >= year_digit { '0' } else { '1' };

    Ok(format!("{}{}{}", letter, decade, digit))
}

/// Translate every legacy `MATURITY_CODE` in `table` in place.
pub fn translate(table: &mut BulletinTable, bulletin_date: NaiveDate) -> Result<(), ExtractError> {
    for record in table.records_mut() {
        let Some(code) = record.text(MATURITY_CODE) else {
            continue;
        };
        if code.chars().count() < LEGACY_MIN_LEN {
            continue;
        }
        let canonical = canonical_code(code, bulletin_date)?;
        record.set(MATURITY_CODE, Value::Text(canonical));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::table::BulletinRecord;

    fn in_year(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 3, 15).unwrap()
    }

    #[test]
    fn test_decade_boundary() {
        assert_eq!(canonical_code("JAN8", in_year(2000)).unwrap(), "F08");
        assert_eq!(canonical_code("JAN8", in_year(2009)).unwrap(), "F18");
        // equal digits stay in the current decade
        assert_eq!(canonical_code("JAN8", in_year(2008)).unwrap(), "F08");
        assert_eq!(canonical_code("DEZ0", in_year(2001)).unwrap(), "Z10");
    }

    #[test]
    fn test_all_months_map() {
        let letters: String = ["JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ"]
            .iter()
            .map(|m| month_letter(m).unwrap())
            .collect();
        assert_eq!(letters, "FGHJKMNQUVXZ");
    }

    #[test]
    fn test_canonical_passes_through() {
        assert_eq!(canonical_code("F23", in_year(2023)).unwrap(), "F23");
        assert_eq!(canonical_code("", in_year(2023)).unwrap(), "");
    }

    #[test]
    fn test_unknown_month_is_fatal() {
        assert_eq!(
            canonical_code("FEB8", in_year(2005)),
            Err(ExtractError::UnknownMonth("FEB".into()))
        );
        assert_eq!(
            canonical_code("JANX", in_year(2005)),
            Err(ExtractError::MalformedMaturity("JANX".into()))
        );
    }

    #[test]
    fn test_translate_table() {
        let date = in_year(2005);
        let mut t = BulletinTable::with_fields(&["MATURITY_CODE"]);
        for code in ["JUL5", "JAN6", "F07"] {
            let mut r = BulletinRecord::new(date);
            r.set("MATURITY_CODE", Value::Text(code.into()));
            t.push(r);
        }
        t.push(BulletinRecord::new(date));

        translate(&mut t, date).unwrap();
        let codes: Vec<Option<&str>> = t.records().iter().map(|r| r.text("MATURITY_CODE")).collect();
        assert_eq!(codes, [Some("N05"), Some("F06"), Some("F07"), None]);
    }

    #[test]
    fn test_translate_propagates_bad_month() {
        let date = in_year(2005);
        let mut t = BulletinTable::with_fields(&["MATURITY_CODE"]);
        let mut r = BulletinRecord::new(date);
        r.set("MATURITY_CODE", Value::Text("XYZ5".into()));
        t.push(r);
        assert!(matches!(
            translate(&mut t, date),
            Err(ExtractError::UnknownMonth(m)) if m == "XYZ"
        ));
    }
}
