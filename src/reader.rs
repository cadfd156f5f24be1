//! The interface between format-specific statement readers and the importer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::error::ImportResult;
use crate::record::{
    AccountRecord, BalanceRecord, CommodityRecord, PositionRecord, TransactionRecord,
};

/// A parsed statement.
///
/// Only the currency and the transaction and position streams are required; everything else
/// is reported by some institutions and not others.
pub trait Reader {
    /// The currency amounts in the statement are denominated in.
    fn currency(&self) -> &str;

    /// Account activity, in statement order. An `Err` aborts the import.
    fn transactions(&self) -> Box<dyn Iterator<Item = ImportResult<TransactionRecord>> + '_>;

    /// Holdings at the end of the statement.
    fn positions(&self) -> Box<dyn Iterator<Item = ImportResult<PositionRecord>> + '_>;

    /// Uninvested cash, including any held in the settlement fund.
    fn available_cash(&self) -> Option<Decimal> {
        None
    }

    /// Units held in the settlement fund, when reported separately from the positions.
    fn settlement_fund_balance(&self) -> Option<Decimal> {
        None
    }

    /// End of the period the statement covers, or the date the file was produced.
    fn statement_end_date(&self) -> Option<NaiveDate> {
        None
    }

    fn available_balance_date(&self) -> Option<NaiveDate> {
        None
    }

    fn balance_date(&self) -> Option<NaiveDate> {
        None
    }

    /// Balances of a bank account, each asserted on its own date.
    fn balance_statement(&self) -> Vec<BalanceRecord> {
        Vec::new()
    }

    fn commodities(&self) -> Vec<CommodityRecord> {
        Vec::new()
    }

    fn accounts(&self) -> Vec<AccountRecord> {
        Vec::new()
    }

    /// Name of the file the statement was read from, recorded on every directive.
    fn file_name(&self) -> Option<&str> {
        None
    }
}

/// A statement already held in memory.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, TypedBuilder)]
pub struct Statement {
    pub currency: String,

    #[serde(default)]
    #[builder(default)]
    pub transactions: Vec<TransactionRecord>,

    #[serde(default)]
    #[builder(default)]
    pub positions: Vec<PositionRecord>,

    #[serde(default)]
    #[builder(default)]
    pub available_cash: Option<Decimal>,

    #[serde(default)]
    #[builder(default)]
    pub settlement_fund_balance: Option<Decimal>,

    #[serde(default)]
    #[builder(default)]
    pub statement_end_date: Option<NaiveDate>,

    #[serde(default)]
    #[builder(default)]
    pub available_balance_date: Option<NaiveDate>,

    #[serde(default)]
    #[builder(default)]
    pub balance_date: Option<NaiveDate>,

    #[serde(default)]
    #[builder(default)]
    pub balance_statement: Vec<BalanceRecord>,

    #[serde(default)]
    #[builder(default)]
    pub commodities: Vec<CommodityRecord>,

    #[serde(default)]
    #[builder(default)]
    pub accounts: Vec<AccountRecord>,

    #[serde(default)]
    #[builder(default)]
    pub file_name: Option<String>,
}

impl Reader for Statement {
    fn currency(&self) -> &str {
        &self.currency
    }

    fn transactions(&self) -> Box<dyn Iterator<Item = ImportResult<TransactionRecord>> + '_> {
        Box::new(self.transactions.iter().cloned().map(Ok))
    }

    fn positions(&self) -> Box<dyn Iterator<Item = ImportResult<PositionRecord>> + '_> {
        Box::new(self.positions.iter().cloned().map(Ok))
    }

    fn available_cash(&self) -> Option<Decimal> {
        self.available_cash
    }

    fn settlement_fund_balance(&self) -> Option<Decimal> {
        self.settlement_fund_balance
    }

    fn statement_end_date(&self) -> Option<NaiveDate> {
        self.statement_end_date
    }

    fn available_balance_date(&self) -> Option<NaiveDate> {
        self.available_balance_date
    }

    fn balance_date(&self) -> Option<NaiveDate> {
        self.balance_date
    }

    fn balance_statement(&self) -> Vec<BalanceRecord> {
        self.balance_statement.clone()
    }

    fn commodities(&self) -> Vec<CommodityRecord> {
        self.commodities.clone()
    }

    fn accounts(&self) -> Vec<AccountRecord> {
        self.accounts.clone()
    }

    fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AccountAction, TransactionKind};

    #[test]
    fn statement_from_json() {
        let statement: Statement = serde_json::from_str(
            r#"{
                "currency": "USD",
                "transactions": [
                    {"type": "dep", "date": "2021-01-04", "memo": "ACH DEPOSIT", "amount": 1000}
                ],
                "positions": [{"security": "922908769", "units": 3}],
                "available_cash": 12.5,
                "statement_end_date": "2021-01-31",
                "balance_statement": [{"date": "2021-02-01", "amount": 1012.5}],
                "accounts": [{"date": "2021-01-01", "type": "open", "name": "Assets:Bank"}]
            }"#,
        )
        .unwrap();
        let records: Vec<_> = statement.transactions().collect::<ImportResult<_>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, TransactionKind::Deposit);
        assert_eq!(statement.positions().count(), 1);
        assert_eq!(statement.available_cash(), Some(Decimal::new(125, 1)));
        assert_eq!(statement.balance_statement()[0].amount, Decimal::new(10125, 1));
        assert_eq!(statement.accounts()[0].action, AccountAction::Open);
        assert_eq!(statement.file_name(), None);
    }
}
