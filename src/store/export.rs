// src/store/export.rs

use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Date32Array, Float64Array, StringArray},
    datatypes::{DataType, Date32Type},
    record_batch::RecordBatch,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

use crate::process::{BulletinRecord, BulletinTable, Value};
use crate::schema::{build_arrow_schema, map_to_arrow_type, DATE_COLUMN};

/// Convert a table into a single Arrow batch: the date column first, then
/// every table column, numeric fields as Float64 and the rest as Utf8.
pub fn to_record_batch(table: &BulletinTable) -> Result<RecordBatch> {
    let schema = build_arrow_schema(table.columns());
    let records = table.records();

    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    let dates: Date32Array = records
        .iter()
        .map(|r| Some(Date32Type::from_naive_date(r.date)))
        .collect();
    arrays.push(Arc::new(dates));

    for col in table.columns().iter().filter(|c| c.as_str() != DATE_COLUMN) {
        let arr: ArrayRef = match map_to_arrow_type(col) {
            DataType::Float64 => Arc::new(
                records
                    .iter()
                    .map(|r| r.number(col))
                    .collect::<Float64Array>(),
            ),
            _ => Arc::new(
                records
                    .iter()
                    .map(|r| r.get(col).map(|v| v.to_string()))
                    .collect::<StringArray>(),
            ),
        };
        arrays.push(arr);
    }

    RecordBatch::try_new(schema, arrays).context("building bulletin record batch")
}

/// Write `table` to `<dir>/<file_stem>.parquet` (SNAPPY), via a tmp file + rename.
pub fn write_table(table: &BulletinTable, dir: impl AsRef<Path>, file_stem: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating output directory {:?}", dir))?;

    let final_path = dir.join(format!("{}.parquet", file_stem));
    let tmp_path = dir.join(format!(".{}.parquet.tmp", file_stem));

    let batch = to_record_batch(table)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let file = File::create(&tmp_path).with_context(|| format!("creating {:?}", tmp_path))?;
    let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), Some(props))
        .context("creating Arrow writer for bulletin")?;
    writer.write(&batch).context("writing bulletin batch")?;
    writer.close().context("closing bulletin writer")?;

    fs::rename(&tmp_path, &final_path)
        .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, final_path))?;

    info!(path = %final_path.display(), rows = table.len(), "wrote bulletin parquet");
    Ok(final_path)
}

/// Read a file produced by [`write_table`] back into a table.
pub fn read_table(path: impl AsRef<Path>) -> Result<BulletinTable> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .filter(|name| name != DATE_COLUMN)
        .collect();
    let mut table = BulletinTable::new(columns);

    let mut reader = builder.with_batch_size(1024).build()?;
    while let Some(batch) = reader.next().transpose()? {
        append_batch(&mut table, &batch)
            .with_context(|| format!("decoding `{}`", path.display()))?;
    }
    Ok(table)
}

fn append_batch(table: &mut BulletinTable, batch: &RecordBatch) -> Result<()> {
    let schema = batch.schema();
    let dates = batch
        .column_by_name(DATE_COLUMN)
        .and_then(|c| c.as_any().downcast_ref::<Date32Array>())
        .ok_or_else(|| anyhow!("missing Date32 column `{}`", DATE_COLUMN))?;

    for row in 0..batch.num_rows() {
        let mut record = BulletinRecord::new(Date32Type::to_naive_date(dates.value(row)));

        for (idx, field) in schema.fields().iter().enumerate() {
            if field.name() == DATE_COLUMN {
                continue;
            }
            let col = batch.column(idx);
            if col.is_null(row) {
                continue;
            }
            let value = if let Some(nums) = col.as_any().downcast_ref::<Float64Array>() {
                Value::Number(nums.value(row))
            } else if let Some(strs) = col.as_any().downcast_ref::<StringArray>() {
                Value::Text(strs.value(row).to_string())
            } else {
                return Err(anyhow!(
                    "unsupported column type {:?} for `{}`",
                    field.data_type(),
                    field.name()
                ));
            };
            record.set(field.name(), value);
        }

        table.push(record);
    }
    Ok(())
}
