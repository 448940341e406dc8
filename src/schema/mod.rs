pub mod arrow;
pub mod registry;

pub use self::arrow::{build_arrow_schema, map_to_arrow_type, DATE_COLUMN};
pub use registry::{lookup, supported_contracts, ContractFamily, ContractSchema};
