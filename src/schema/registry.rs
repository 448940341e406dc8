// src/schema/registry.rs

use crate::error::ExtractError;

pub const CONTRACT: &str = "CONTRACT";
pub const MATURITY_CODE: &str = "MATURITY_CODE";

/// Interest-rate and FX-spread contracts (DI1, DAP, DDI).
const RATE_SPREAD_FIELDS: &[&str] = &[
    MATURITY_CODE,
    "OPEN_INTEREST_OPEN",
    "OPEN_INTEREST_CLOSE",
    "NUMBER_OF_TRADES",
    "TRADING_VOLUME",
    "FINANCIAL_VOLUME",
    "JUNK1",
    "PREVIOUS_SETTLEMENT",
    "INDEXED_SETTLEMENT",
    "OPENING_PRICE",
    "MINIMUM_PRICE",
    "MAXIMUM_PRICE",
    "AVERAGE_PRICE",
    "LAST_PRICE",
    "SETTLEMENT_PRICE",
    "CHANGE",
    "LAST_BID",
    "LAST_OFFER",
];

/// Generic futures: same layout minus the two settlement reference columns.
const FUTURES_FIELDS: &[&str] = &[
    MATURITY_CODE,
    "OPEN_INTEREST_OPEN",
    "OPEN_INTEREST_CLOSE",
    "NUMBER_OF_TRADES",
    "TRADING_VOLUME",
    "FINANCIAL_VOLUME",
    "JUNK1",
    "OPENING_PRICE",
    "MINIMUM_PRICE",
    "MAXIMUM_PRICE",
    "AVERAGE_PRICE",
    "LAST_PRICE",
    "SETTLEMENT_PRICE",
    "CHANGE",
    "LAST_BID",
    "LAST_OFFER",
];

/// Forward-rate agreements carry no open interest.
const FORWARD_RATE_FIELDS: &[&str] = &[
    MATURITY_CODE,
    "NUMBER_OF_TRADES",
    "TRADING_VOLUME",
    "FINANCIAL_VOLUME",
    "JUNK1",
    "OPENING_PRICE",
    "MINIMUM_PRICE",
    "MAXIMUM_PRICE",
    "AVERAGE_PRICE",
    "LAST_PRICE",
    "SETTLEMENT_PRICE",
    "CHANGE",
    "LAST_BID",
    "LAST_OFFER",
];

/// Fields parsed as decimals after stripping everything but digits and `.`.
pub const NUMERIC_FIELDS: &[&str] = &[
    "OPEN_INTEREST_OPEN",
    "OPEN_INTEREST_CLOSE",
    "NUMBER_OF_TRADES",
    "TRADING_VOLUME",
    "FINANCIAL_VOLUME",
    "PREVIOUS_SETTLEMENT",
    "INDEXED_SETTLEMENT",
    "OPENING_PRICE",
    "MINIMUM_PRICE",
    "MAXIMUM_PRICE",
    "AVERAGE_PRICE",
    "LAST_PRICE",
    "SETTLEMENT_PRICE",
    "LAST_BID",
    "LAST_OFFER",
];

/// Display-only columns: an alignment cell and the day's change/variation.
pub const NOISE_FIELDS: &[&str] = &["JUNK1", "CHANGE", "VARIATION"];

/// Which positional layout a contract's bulletin rows follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractFamily {
    RateSpread,
    Futures,
    ForwardRate,
}

impl ContractFamily {
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            ContractFamily::RateSpread => RATE_SPREAD_FIELDS,
            ContractFamily::Futures => FUTURES_FIELDS,
            ContractFamily::ForwardRate => FORWARD_RATE_FIELDS,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContractFamily::RateSpread => "rate/spread",
            ContractFamily::Futures => "futures",
            ContractFamily::ForwardRate => "forward-rate",
        }
    }
}

static FAMILIES: &[(ContractFamily, &[&str])] = &[
    (ContractFamily::RateSpread, &["DI1", "DAP", "DDI"]),
    (ContractFamily::Futures, &["DOL", "BGI", "ICF", "CCM", "AUD"]),
    (ContractFamily::ForwardRate, &["FRC"]),
];

/// The resolved field layout for one queried contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSchema {
    /// Upper-cased contract code, as sent to the feed and tagged on records.
    pub contract: String,
    pub family: ContractFamily,
}

impl ContractSchema {
    pub fn fields(&self) -> &'static [&'static str] {
        self.family.fields()
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

/// Resolve `contract` (case-insensitive) to its schema.
pub fn lookup(contract: &str) -> Result<ContractSchema, ExtractError> {
    let code = contract.trim().to_ascii_uppercase();
    FAMILIES
        .iter()
        .find(|(_, members)| members.contains(&code.as_str()))
        .map(|(family, _)| ContractSchema {
            contract: code.clone(),
            family: *family,
        })
        .ok_or_else(|| ExtractError::UnsupportedContract(contract.to_string()))
}

/// Every supported contract code with its family, in registry order.
pub fn supported_contracts() -> impl Iterator<Item = (&'static str, ContractFamily)> {
    FAMILIES
        .iter()
        .flat_map(|(family, members)| members.iter().map(move |code| (*code, *family)))
}

pub fn is_numeric(field: &str) -> bool {
    NUMERIC_FIELDS.contains(&field)
}

pub fn is_noise(field: &str) -> bool {
    NOISE_FIELDS.contains(&field)
}
