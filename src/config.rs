use rust_decimal::Decimal;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::balance::BalanceDateStrategy;
use crate::template::{AccountTemplate, AccountTemplates};

fn default_max_rounding_error() -> Decimal {
    Decimal::new(4, 2)
}

fn default_fudge() -> i64 {
    2
}

fn default_true() -> bool {
    true
}

/// Per-institution importer configuration. Never modified by an import.
///
/// ```text
/// {
///     "main_account": "Assets:Investments:Vanguard:{ticker}",
///     "cash_account": "Assets:Investments:Vanguard:{currency}",
///     ...
///     "max_rounding_error": 0.04,
///     "balance_assertion_date_type": "smart"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, TypedBuilder)]
pub struct ImporterConfig {
    #[serde(flatten)]
    pub accounts: AccountTemplates,

    /// Account statements are filed under, if it can't be derived from `main_account`.
    #[serde(default)]
    #[builder(default)]
    pub filing_account: Option<String>,

    /// Largest difference between a trade's total and units times price that is booked to the
    /// rounding error account.
    #[serde(default = "default_max_rounding_error")]
    #[builder(default = default_max_rounding_error())]
    pub max_rounding_error: Decimal,

    #[serde(default)]
    #[builder(default)]
    pub balance_assertion_date_type: BalanceDateStrategy,

    /// Days statement-reported balance dates are moved back by.
    #[serde(default = "default_fudge")]
    #[builder(default = default_fudge())]
    pub balance_assertion_date_fudge: i64,

    /// Currency of rounding error postings. Defaults to the statement currency.
    #[serde(default)]
    #[builder(default)]
    pub operating_currency: Option<String>,

    /// Ticker of the money market fund the account sweeps cash into.
    #[serde(default)]
    #[builder(default)]
    pub settlement_fund: Option<String>,

    /// Records the filing account on every directive. Set to `false` when the ledger doesn't
    /// expect it.
    #[serde(default = "default_true")]
    #[builder(default = true)]
    pub emit_filing_account_metadata: bool,
}

/// Configuration of a bank or credit card account import.
///
/// ```text
/// {
///     "main_account": "Liabilities:Credit-Cards:Chase",
///     "emit_filing_account_metadata": false
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, TypedBuilder)]
pub struct BankingConfig {
    /// Account every row is posted to. May contain `{currency}`.
    pub main_account: AccountTemplate,

    #[serde(default)]
    #[builder(default)]
    pub filing_account: Option<String>,

    #[serde(default = "default_true")]
    #[builder(default = true)]
    pub emit_filing_account_metadata: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn deserialize_with_defaults() {
        let config: ImporterConfig = serde_json::from_str(
            r#"{
                "main_account": "Assets:Investments:Vanguard:{ticker}",
                "cash_account": "Assets:Investments:Vanguard:{currency}",
                "transfer": "Assets:Zero-Sum-Accounts:Transfers:Bank-Account",
                "dividends": "Income:Dividends:{ticker}",
                "interest": "Income:Interest:{ticker}",
                "cg": "Income:Capital-Gains:{ticker}",
                "capgains_lt": "Income:Capital-Gains-Distributions:Long:{ticker}",
                "capgains_st": "Income:Capital-Gains-Distributions:Short:{ticker}",
                "fees": "Expenses:Fees-and-Charges:Brokerage-Fees:Vanguard",
                "invexpense": "Expenses:Investment-Expenses",
                "rounding_error": "Equity:Rounding-Errors:Imports"
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_rounding_error, dec!(0.04));
        assert_eq!(config.balance_assertion_date_fudge, 2);
        assert_eq!(
            config.balance_assertion_date_type,
            BalanceDateStrategy::Smart
        );
        assert_eq!(config.accounts.capital_gains.as_str(), "Income:Capital-Gains:{ticker}");
        assert!(config.emit_filing_account_metadata);
    }

    #[test]
    fn deserialize_overrides() {
        let config: ImporterConfig = serde_json::from_str(
            r#"{
                "main_account": "Assets:Etrade:{ticker}",
                "cash_account": "Assets:Etrade:{currency}",
                "transfer": "Assets:Transfers",
                "dividends": "Income:Dividends:{ticker}",
                "interest": "Income:Interest:{ticker}",
                "cg": "Income:Capital-Gains:{ticker}",
                "capgains_lt": "Income:CGDist:Long:{ticker}",
                "capgains_st": "Income:CGDist:Short:{ticker}",
                "fees": "Expenses:Fees",
                "invexpense": "Expenses:Investment-Expenses",
                "rounding_error": "Equity:Rounding-Errors",
                "max_rounding_error": 0.11,
                "balance_assertion_date_type": "today",
                "balance_assertion_date_fudge": 0,
                "settlement_fund": "VMFXX",
                "emit_filing_account_metadata": false
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_rounding_error, dec!(0.11));
        assert_eq!(config.balance_assertion_date_type, BalanceDateStrategy::Today);
        assert_eq!(config.balance_assertion_date_fudge, 0);
        assert_eq!(config.settlement_fund.as_deref(), Some("VMFXX"));
        assert!(!config.emit_filing_account_metadata);
    }

    #[test]
    fn deserialize_banking() {
        let config: BankingConfig =
            serde_json::from_str(r#"{"main_account": "Liabilities:Credit-Cards:Chase"}"#).unwrap();
        assert_eq!(config.main_account.as_str(), "Liabilities:Credit-Cards:Chase");
        assert_eq!(config.filing_account, None);
        assert!(config.emit_filing_account_metadata);
    }

    #[test]
    fn builder_defaults_match_serde_defaults() {
        let config = ImporterConfig::builder()
            .accounts(
                AccountTemplates::builder()
                    .main_account("Assets:Bank:{currency}")
                    .cash_account("Assets:Bank:{currency}")
                    .transfer("Assets:Transfers")
                    .dividends("Income:Dividends:{ticker}")
                    .interest("Income:Interest:{ticker}")
                    .capital_gains("Income:Capital-Gains:{ticker}")
                    .capgains_lt("Income:CGDist:Long:{ticker}")
                    .capgains_st("Income:CGDist:Short:{ticker}")
                    .fees("Expenses:Fees")
                    .investment_expense("Expenses:Investment-Expenses")
                    .rounding_error("Equity:Rounding-Errors")
                    .build(),
            )
            .build();
        assert_eq!(config.max_rounding_error, dec!(0.04));
        assert_eq!(config.balance_assertion_date_fudge, 2);
        assert!(config.emit_filing_account_metadata);
    }
}
