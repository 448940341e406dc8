// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use std::sync::Arc;

use super::registry::is_numeric;

/// Name of the trading-date column in exported batches and in the database.
pub const DATE_COLUMN: &str = "TIME_STAMP";

/// Map a bulletin column into an Arrow DataType.
///
/// - TIME_STAMP        → Date32
/// - numeric fields    → Float64
/// - everything else   → Utf8 (contract, maturity code, unknown columns)
pub fn map_to_arrow_type(column: &str) -> DataType {
    if column == DATE_COLUMN {
        DataType::Date32
    } else if is_numeric(column) {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}

/// Build an ArrowSchema (inside an Arc) for a table with the given columns.
/// The date column always comes first and is the only non-nullable field.
pub fn build_arrow_schema(columns: &[String]) -> Arc<ArrowSchema> {
    let mut fields = Vec::with_capacity(columns.len() + 1);
    fields.push(ArrowField::new(DATE_COLUMN, DataType::Date32, false));
    fields.extend(
        columns
            .iter()
            .filter(|name| name.as_str() != DATE_COLUMN)
            .map(|name| ArrowField::new(name, map_to_arrow_type(name), true)),
    );

    Arc::new(ArrowSchema::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_types() {
        let cols = vec![
            "CONTRACT".to_string(),
            "MATURITY_CODE".to_string(),
            "LAST_PRICE".to_string(),
        ];
        let schema = build_arrow_schema(&cols);

        assert_eq!(schema.fields().len(), 4);
        assert_eq!(schema.field(0).name(), DATE_COLUMN);
        assert_eq!(schema.field(0).data_type(), &DataType::Date32);
        assert!(!schema.field(0).is_nullable());
        assert_eq!(schema.field(1).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(3).data_type(), &DataType::Float64);
        assert!(schema.field(3).is_nullable());
    }
}
