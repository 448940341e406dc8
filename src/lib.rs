pub mod config;
pub mod error;
pub mod fetch;
pub mod process;
pub mod schema;
pub mod scrape;
pub mod store;

pub use error::ExtractError;
pub use process::{BulletinRecord, BulletinTable, Value};
pub use scrape::{scrape, scrape_range, IntoBulletinDate};
