use chrono::NaiveDate;
use std::{
    collections::HashMap,
    fmt,
    io::{self, Write},
};

use crate::schema::DATE_COLUMN;

/// A single cell. Nulls are represented by the cell being absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One bulletin row: the trading date plus its named cells.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletinRecord {
    pub date: NaiveDate,
    values: HashMap<String, Value>,
}

impl BulletinRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            values: HashMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.values.remove(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_number)
    }
}

/// Ordered records sharing one ordered column list.
///
/// Records may lack some columns (outer-join semantics after `concat`);
/// a missing cell reads as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulletinTable {
    columns: Vec<String>,
    records: Vec<BulletinRecord>,
}

impl BulletinTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn with_fields(fields: &[&str]) -> Self {
        Self::new(fields.iter().map(|f| f.to_string()).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[BulletinRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut BulletinRecord> {
        self.records.iter_mut()
    }

    pub fn push(&mut self, record: BulletinRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Remove `name` from the column list and from every record.
    /// Returns whether the column existed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c != name);
        for record in &mut self.records {
            record.remove(name);
        }
        self.columns.len() != before
    }

    /// Insert `name` as the first column if it is not already present.
    pub fn prepend_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.insert(0, name.to_string());
        }
    }

    /// Append `other`'s records, widening the column list to the union of both.
    /// Empty tables contribute nothing, not even their columns.
    pub fn concat(&mut self, other: BulletinTable) {
        if other.is_empty() {
            return;
        }
        for col in other.columns {
            if !self.has_column(&col) {
                self.columns.push(col);
            }
        }
        self.records.extend(other.records);
    }

    pub fn retain<F: FnMut(&BulletinRecord) -> bool>(&mut self, f: F) {
        self.records.retain(f);
    }

    /// Earliest and latest trading dates present.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Tab-separated dump with a header row; nulls are written as empty cells.
    pub fn write_tsv<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "{}", DATE_COLUMN)?;
        for col in &self.columns {
            write!(out, "\t{}", col)?;
        }
        writeln!(out)?;

        for record in &self.records {
            write!(out, "{}", record.date.format("%Y-%m-%d"))?;
            for col in &self.columns {
                match record.get(col) {
                    Some(v) => write!(out, "\t{}", v)?,
                    None => write!(out, "\t")?,
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
