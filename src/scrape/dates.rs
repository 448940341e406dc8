use chrono::{NaiveDate, NaiveDateTime};

use crate::error::ExtractError;

/// Anything accepted as a bulletin date: dates, datetimes, or strings in
/// `mm/dd/yyyy`, `yyyy-mm-dd` or `yyyymmdd` form.
pub trait IntoBulletinDate {
    fn into_bulletin_date(self) -> Result<NaiveDate, ExtractError>;
}

impl IntoBulletinDate for NaiveDate {
    fn into_bulletin_date(self) -> Result<NaiveDate, ExtractError> {
        Ok(self)
    }
}

impl IntoBulletinDate for NaiveDateTime {
    fn into_bulletin_date(self) -> Result<NaiveDate, ExtractError> {
        Ok(self.date())
    }
}

impl IntoBulletinDate for &str {
    fn into_bulletin_date(self) -> Result<NaiveDate, ExtractError> {
        parse_bulletin_date(self)
    }
}

impl IntoBulletinDate for &String {
    fn into_bulletin_date(self) -> Result<NaiveDate, ExtractError> {
        parse_bulletin_date(self)
    }
}

impl IntoBulletinDate for String {
    fn into_bulletin_date(self) -> Result<NaiveDate, ExtractError> {
        parse_bulletin_date(&self)
    }
}

const SEPARATED_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

pub fn parse_bulletin_date(raw: &str) -> Result<NaiveDate, ExtractError> {
    let s = raw.trim();

    if let Some(d) = SEPARATED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Ok(d);
    }

    // compact YYYYMMDD
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s[0..4].parse().map_err(|_| invalid(raw))?;
        let month: u32 = s[4..6].parse().map_err(|_| invalid(raw))?;
        let day: u32 = s[6..8].parse().map_err(|_| invalid(raw))?;
        return NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid(raw));
    }

    Err(invalid(raw))
}

fn invalid(raw: &str) -> ExtractError {
    ExtractError::InvalidDate(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_forms() {
        let expected = NaiveDate::from_ymd_opt(2018, 8, 1).unwrap();
        assert_eq!("08/01/2018".into_bulletin_date().unwrap(), expected);
        assert_eq!("2018-08-01".into_bulletin_date().unwrap(), expected);
        assert_eq!(" 20180801 ".into_bulletin_date().unwrap(), expected);
        assert_eq!(String::from("2018-08-01").into_bulletin_date().unwrap(), expected);
        assert_eq!(expected.into_bulletin_date().unwrap(), expected);
        assert_eq!(
            expected.and_hms_opt(15, 30, 0).unwrap().into_bulletin_date().unwrap(),
            expected
        );
    }

    #[test]
    fn test_rejected_forms() {
        for bad in ["", "yesterday", "2018/13/01", "13/01/2018", "20181301", "2018-8"] {
            assert_eq!(
                parse_bulletin_date(bad),
                Err(ExtractError::InvalidDate(bad.to_string())),
                "{bad}"
            );
        }
    }
}
