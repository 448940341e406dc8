pub mod export;
pub mod postgres;

pub use export::{read_table, to_record_batch, write_table};
