//! Canonical records produced by statement readers.
//!
//! Readers for a particular file format (OFX, CSV exports, PDF tables, ...) turn whatever the
//! institution emits into these shapes. Everything downstream of a reader only ever sees these.

use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use rust_decimal::Decimal;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::error::{ImportError, ImportResult};
use crate::template::AccountRole;

/// The closed set of transaction kinds a record can carry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum TransactionKind {
    BuyFund,
    SellFund,
    BuyStock,
    SellStock,
    BuyOther,
    SellOther,
    Reinvest,
    /// In-kind transfer of units, with or without a security.
    Transfer,
    /// Cash movement that fits none of the more specific kinds.
    Other,
    Credit,
    Debit,
    Deposit,
    Cash,
    Check,
    Payment,
    /// Interest income, or a dividend when the record's `income_type` says so.
    Income,
    Dividends,
    CapGainsLongTerm,
    CapGainsShortTerm,
    Fee,
    InvestmentExpense,
}

lazy_static! {
    static ref KINDS_BY_NAME: HashMap<&'static str, TransactionKind> = {
        use TransactionKind::*;
        [
            BuyFund, SellFund, BuyStock, SellStock, BuyOther, SellOther, Reinvest, Transfer, Other,
            Credit, Debit, Deposit, Cash, Check, Payment, Income, Dividends, CapGainsLongTerm,
            CapGainsShortTerm, Fee, InvestmentExpense,
        ]
        .iter()
        .map(|kind| (kind.name(), *kind))
        .collect()
    };
}

/// Which record field carries the quantity a transfer-path record moves.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuantityField {
    Units,
    Amount,
    Total,
}

impl QuantityField {
    fn name(self) -> &'static str {
        match self {
            QuantityField::Units => "units",
            QuantityField::Amount => "amount",
            QuantityField::Total => "total",
        }
    }
}

impl TransactionKind {
    /// The name readers use for this kind.
    pub fn name(self) -> &'static str {
        use TransactionKind::*;
        match self {
            BuyFund => "buymf",
            SellFund => "sellmf",
            BuyStock => "buystock",
            SellStock => "sellstock",
            BuyOther => "buyother",
            SellOther => "sellother",
            Reinvest => "reinvest",
            Transfer => "transfer",
            Other => "other",
            Credit => "credit",
            Debit => "debit",
            Deposit => "dep",
            Cash => "cash",
            Check => "check",
            Payment => "payment",
            Income => "income",
            Dividends => "dividends",
            CapGainsLongTerm => "capgains_lt",
            CapGainsShortTerm => "capgains_st",
            Fee => "fee",
            InvestmentExpense => "invexpense",
        }
    }

    /// Trades involve a commodity bought or sold against cash.
    pub fn is_trade(self) -> bool {
        use TransactionKind::*;
        matches!(
            self,
            BuyFund | SellFund | BuyStock | SellStock | BuyOther | SellOther | Reinvest
        )
    }

    pub fn is_sell(self) -> bool {
        use TransactionKind::*;
        matches!(self, SellFund | SellStock | SellOther)
    }

    /// Income kinds move cash from an income account into the cash account.
    pub fn is_income(self) -> bool {
        use TransactionKind::*;
        matches!(
            self,
            Income | Dividends | CapGainsLongTerm | CapGainsShortTerm
        )
    }

    /// The account role the non-main leg of this kind is booked against.
    pub fn target_role(self) -> AccountRole {
        use TransactionKind::*;
        match self {
            BuyFund | SellFund | BuyStock | SellStock | BuyOther | SellOther => AccountRole::Cash,
            Reinvest | Dividends => AccountRole::Dividends,
            CapGainsLongTerm => AccountRole::CapGainsLongTerm,
            CapGainsShortTerm => AccountRole::CapGainsShortTerm,
            Income => AccountRole::Interest,
            Transfer | Other | Credit | Debit | Deposit | Cash | Check | Payment => {
                AccountRole::Transfer
            }
            Fee => AccountRole::Fees,
            InvestmentExpense => AccountRole::InvestmentExpense,
        }
    }

    /// The field a transfer-path record of this kind takes its quantity from.
    pub fn quantity_field(self) -> QuantityField {
        use TransactionKind::*;
        match self {
            Transfer => QuantityField::Units,
            Income | Dividends | CapGainsLongTerm | CapGainsShortTerm => QuantityField::Total,
            _ => QuantityField::Amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransactionKind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KINDS_BY_NAME
            .get(s)
            .copied()
            .ok_or_else(|| ImportError::UnknownTransactionKind(s.to_string()))
    }
}

impl TryFrom<String> for TransactionKind {
    type Error = ImportError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One row of account activity.
#[derive(Clone, Debug, PartialEq, Deserialize, TypedBuilder)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Date the trade executed. Records without one (most banking rows) use `date`.
    #[serde(rename = "tradeDate", default)]
    #[builder(default)]
    pub trade_date: Option<NaiveDate>,

    pub date: NaiveDate,

    #[serde(rename = "settleDate", default)]
    #[builder(default)]
    pub settle_date: Option<NaiveDate>,

    #[serde(default)]
    #[builder(default)]
    pub memo: String,

    /// Main description of a bank row. Investment records leave it empty.
    #[serde(default)]
    #[builder(default)]
    pub payee: Option<String>,

    /// Security identifier: a CUSIP/ISIN-style code or a ticker, depending on the reader.
    #[serde(default)]
    #[builder(default)]
    pub security: Option<String>,

    #[serde(default)]
    #[builder(default)]
    pub units: Option<Decimal>,

    #[serde(default)]
    #[builder(default)]
    pub unit_price: Option<Decimal>,

    #[serde(default)]
    #[builder(default)]
    pub total: Option<Decimal>,

    #[serde(default)]
    #[builder(default)]
    pub amount: Option<Decimal>,

    #[serde(default)]
    #[builder(default)]
    pub fees: Option<Decimal>,

    #[serde(default)]
    #[builder(default)]
    pub commission: Option<Decimal>,

    /// Sub-classification of `income` records; `DIV` books them as dividends.
    #[serde(default)]
    #[builder(default)]
    pub income_type: Option<String>,

    /// Source of funds within the account, e.g. the contribution source of a retirement plan.
    #[serde(rename = "sub-source", default)]
    #[builder(default)]
    pub sub_source: Option<String>,
}

impl TransactionRecord {
    /// The date postings are booked on.
    pub fn posting_date(&self) -> NaiveDate {
        self.trade_date.unwrap_or(self.date)
    }

    pub fn is_dividend_income(&self) -> bool {
        self.kind == TransactionKind::Income && self.income_type.as_deref() == Some("DIV")
    }

    /// The security identifier, if the record carries a non-empty one.
    pub fn security_id(&self) -> Option<&str> {
        self.security.as_deref().filter(|s| !s.is_empty())
    }

    fn missing(&self, field: &'static str) -> ImportError {
        ImportError::MissingField {
            kind: self.kind.name(),
            field,
            date: self.posting_date(),
        }
    }

    pub(crate) fn require(
        &self,
        value: Option<Decimal>,
        field: &'static str,
    ) -> ImportResult<Decimal> {
        value.ok_or_else(|| self.missing(field))
    }

    pub(crate) fn require_security(&self) -> ImportResult<&str> {
        self.security_id().ok_or_else(|| self.missing("security"))
    }

    pub(crate) fn quantity(&self, field: QuantityField) -> ImportResult<Decimal> {
        let value = match field {
            QuantityField::Units => self.units,
            QuantityField::Amount => self.amount,
            QuantityField::Total => self.total,
        };
        self.require(value, field.name())
    }
}

/// A holding at the end of the statement.
#[derive(Clone, Debug, PartialEq, Deserialize, TypedBuilder)]
pub struct PositionRecord {
    pub security: String,

    pub units: Decimal,

    #[serde(default)]
    #[builder(default)]
    pub unit_price: Option<Decimal>,

    /// Date the price was quoted on.
    #[serde(default)]
    #[builder(default)]
    pub date: Option<NaiveDate>,
}

/// A balance the statement reports for the account, e.g. the ledger balance of a bank account.
#[derive(Clone, Debug, PartialEq, Deserialize, TypedBuilder)]
pub struct BalanceRecord {
    pub date: NaiveDate,

    pub amount: Decimal,
}

/// A commodity the statement declares.
#[derive(Clone, Debug, PartialEq, Deserialize, TypedBuilder)]
pub struct CommodityRecord {
    pub date: NaiveDate,

    pub security: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum AccountAction {
    Open,
    Close,
}

impl TryFrom<String> for AccountAction {
    type Error = ImportError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "open" => Ok(AccountAction::Open),
            "close" => Ok(AccountAction::Close),
            _ => Err(ImportError::UnknownAccountLifecycle(s)),
        }
    }
}

/// An account opening or closing the statement reports.
#[derive(Clone, Debug, PartialEq, Deserialize, TypedBuilder)]
pub struct AccountRecord {
    pub date: NaiveDate,

    #[serde(rename = "type")]
    pub action: AccountAction,

    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for name in &[
            "buymf", "sellmf", "buystock", "sellstock", "buyother", "sellother", "reinvest",
            "transfer", "other", "credit", "debit", "dep", "cash", "check", "payment", "income",
            "dividends", "capgains_lt", "capgains_st", "fee", "invexpense",
        ] {
            let kind: TransactionKind = name.parse().unwrap();
            assert_eq!(kind.name(), *name);
        }
    }

    #[test]
    fn unknown_kind_is_an_error() {
        match "buyoption".parse::<TransactionKind>() {
            Err(ImportError::UnknownTransactionKind(name)) => assert_eq!(name, "buyoption"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn every_kind_has_one_role() {
        assert_eq!(TransactionKind::BuyStock.target_role(), AccountRole::Cash);
        assert_eq!(TransactionKind::Reinvest.target_role(), AccountRole::Dividends);
        assert_eq!(TransactionKind::Income.target_role(), AccountRole::Interest);
        assert_eq!(TransactionKind::Check.target_role(), AccountRole::Transfer);
        assert_eq!(
            TransactionKind::InvestmentExpense.target_role(),
            AccountRole::InvestmentExpense
        );
    }

    #[test]
    fn deserialize_record() {
        let record: TransactionRecord = serde_json::from_str(
            r#"{
                "type": "buymf",
                "tradeDate": "2018-06-25",
                "date": "2018-06-25",
                "settleDate": "2018-06-27",
                "memo": "MONEY FUND PURCHASE",
                "security": "922906300",
                "units": 2345.67,
                "unit_price": 1.0,
                "total": -2345.67
            }"#,
        )
        .unwrap();
        assert_eq!(record.kind, TransactionKind::BuyFund);
        assert_eq!(record.units, Some(Decimal::new(234567, 2)));
        assert_eq!(
            record.settle_date,
            Some(NaiveDate::from_ymd_opt(2018, 6, 27).unwrap())
        );
        assert_eq!(record.fees, None);

        let err = serde_json::from_str::<TransactionRecord>(
            r#"{"type": "split", "date": "2018-06-25"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown transaction kind 'split'"));
    }
}
