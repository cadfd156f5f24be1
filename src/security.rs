//! Mapping of security identifiers found in statements to tickers.

use std::collections::{BTreeSet, HashSet};

use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::error::{ImportError, ImportResult};

/// One row of the security table.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(from = "(String, String, String)")]
pub struct SecurityInfo {
    pub ticker: String,
    /// CUSIP, ISIN, or whatever code the institution reports.
    pub id: String,
    pub long_name: String,
}

impl From<(String, String, String)> for SecurityInfo {
    fn from((ticker, id, long_name): (String, String, String)) -> Self {
        SecurityInfo {
            ticker,
            id,
            long_name,
        }
    }
}

impl SecurityInfo {
    pub fn new(ticker: &str, id: &str, long_name: &str) -> Self {
        SecurityInfo {
            ticker: ticker.to_string(),
            id: id.to_string(),
            long_name: long_name.to_string(),
        }
    }
}

/// The securities an account may hold, and which of them are money market funds.
///
/// Money market funds are held at price rather than at cost.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, TypedBuilder)]
pub struct SecurityTable {
    #[serde(default)]
    #[builder(default)]
    pub fund_data: Vec<SecurityInfo>,

    #[serde(default)]
    #[builder(default)]
    pub money_market: HashSet<String>,
}

/// Which column of the security table statements refer to securities by.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LookupKey {
    ById,
    ByTicker,
}

impl Default for LookupKey {
    fn default() -> Self {
        LookupKey::ById
    }
}

/// Resolves identifiers to tickers. Read-only once built.
#[derive(Clone, Debug)]
pub struct SecurityResolver {
    table: SecurityTable,
    key: LookupKey,
}

impl SecurityResolver {
    pub fn new(table: SecurityTable, key: LookupKey) -> Self {
        SecurityResolver { table, key }
    }

    fn key_of<'t>(&self, info: &'t SecurityInfo) -> &'t str {
        match self.key {
            LookupKey::ById => &info.id,
            LookupKey::ByTicker => &info.ticker,
        }
    }

    /// Looks up `identifier`, first exactly and then as a code containing a table entry's key
    /// (statements sometimes report an ISIN where the table has the CUSIP inside it).
    pub fn resolve(&self, identifier: &str) -> Option<&SecurityInfo> {
        let entries = &self.table.fund_data;
        entries
            .iter()
            .find(|info| self.key_of(info) == identifier)
            .or_else(|| {
                entries.iter().find(|info| {
                    let key = self.key_of(info);
                    !key.is_empty() && identifier.contains(key)
                })
            })
    }

    /// Like [`resolve`](#method.resolve), for identifiers already known to resolve.
    pub(crate) fn resolved(&self, identifier: &str) -> ImportResult<&SecurityInfo> {
        self.resolve(identifier)
            .ok_or_else(|| ImportError::UnresolvedSecurities {
                identifiers: vec![identifier.to_string()],
            })
    }

    pub fn is_money_market(&self, ticker: &str) -> bool {
        self.table.money_market.contains(ticker)
    }

    /// Checks that every identifier resolves. Fails with the complete list of those that don't.
    pub fn check_all<'i, I>(&self, identifiers: I) -> ImportResult<()>
    where
        I: IntoIterator<Item = &'i str>,
    {
        let missing: BTreeSet<&str> = identifiers
            .into_iter()
            .filter(|id| self.resolve(id).is_none())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        let identifiers: Vec<String> = missing.into_iter().map(String::from).collect();
        log::error!(
            "fund info not found for {} securities: {}",
            identifiers.len(),
            identifiers.join(", ")
        );
        Err(ImportError::UnresolvedSecurities { identifiers })
    }
}
