//! Balance assertions and price points derived from the holdings at the end of a statement.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;

use beancount_core::{Amount, Balance, Directive, Price};

use crate::error::ImportResult;
use crate::record::PositionRecord;
use crate::security::SecurityResolver;
use crate::template::{AccountRole, ResolvedAccounts};

/// Which date a statement's balance assertions are made on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceDateStrategy {
    /// The latest of every date the statement offers.
    Smart,
    /// The date the statement itself carries (for OFX files, the download date).
    OfxDate,
    LastTransaction,
    Today,
}

impl Default for BalanceDateStrategy {
    fn default() -> Self {
        BalanceDateStrategy::Smart
    }
}

/// Candidate dates for the balance assertion. Any of them may be unknown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BalanceDateInputs {
    pub statement_end: Option<NaiveDate>,
    pub last_transaction: Option<NaiveDate>,
    /// Date the statement reports its available balance as of.
    pub available_balance: Option<NaiveDate>,
    pub balance_date: Option<NaiveDate>,
    pub today: Option<NaiveDate>,
}

/// The date to assert balances on, or `None` if no candidate date is known.
///
/// Statement-reported balance dates are moved back by `fudge_days`, since transactions pending
/// on those dates may only show up in a later statement. The result is the day after the chosen
/// date: Beancount checks a balance at the beginning of its day.
pub fn balance_assertion_date(
    strategy: BalanceDateStrategy,
    inputs: &BalanceDateInputs,
    fudge_days: i64,
) -> Option<NaiveDate> {
    let fudge = Duration::days(fudge_days);
    let date = match strategy {
        BalanceDateStrategy::Smart => vec![
            inputs.statement_end,
            inputs.last_transaction,
            inputs.available_balance.map(|d| d - fudge),
            inputs.balance_date.map(|d| d - fudge),
        ]
        .into_iter()
        .flatten()
        .max(),
        BalanceDateStrategy::OfxDate => inputs.statement_end,
        BalanceDateStrategy::LastTransaction => inputs.last_transaction,
        BalanceDateStrategy::Today => inputs.today,
    };
    date.map(|d| d + Duration::days(1))
}

/// Emits balance assertions and prices for the positions of one statement.
pub struct BalanceExtractor<'a> {
    pub resolver: &'a SecurityResolver,
    pub accounts: &'a ResolvedAccounts,
    /// Ticker of the fund uninvested cash is swept into, if configured.
    pub settlement_fund: Option<&'a str>,
}

impl BalanceExtractor<'_> {
    /// One balance assertion per position on `date`, a price per position that is quoted, and,
    /// given `available_cash`, a cash balance net of the settlement fund.
    ///
    /// Without a `date` no assertions are emitted; prices carry their own dates.
    pub fn extract(
        &self,
        positions: &[PositionRecord],
        date: Option<NaiveDate>,
        available_cash: Option<Decimal>,
        settlement_fund_balance: Option<Decimal>,
    ) -> ImportResult<Vec<Directive<'static>>> {
        let currency = self.accounts.currency();
        let mut directives = Vec::new();
        let mut held_settlement_fund = Decimal::new(0, 0);

        for pos in positions {
            let info = self.resolver.resolved(&pos.security)?;
            let ticker = info.ticker.as_str();

            if let Some(date) = date {
                directives.push(Directive::Balance(
                    Balance::builder()
                        .date(date)
                        .account(self.accounts.main_account(ticker)?)
                        .amount(Amount::new(pos.units, ticker.to_string()))
                        .build(),
                ));
            }
            if self.is_settlement_fund(ticker) {
                held_settlement_fund = pos.units;
            }

            if let (Some(price), Some(price_date)) = (pos.unit_price, pos.date) {
                directives.push(Directive::Price(
                    Price::builder()
                        .date(price_date)
                        .currency(ticker.to_string())
                        .amount(Amount::new(price, currency.to_string()))
                        .build(),
                ));
            }
        }

        match (date, available_cash) {
            (Some(date), Some(cash)) => {
                let swept = settlement_fund_balance.unwrap_or(held_settlement_fund);
                directives.push(Directive::Balance(
                    Balance::builder()
                        .date(date)
                        .account(self.accounts.account(AccountRole::Cash, None, None)?)
                        .amount(Amount::new(cash - swept, currency.to_string()))
                        .build(),
                ));
            }
            (None, _) => log::info!("no balance assertion date available, skipping assertions"),
            _ => {}
        }
        Ok(directives)
    }

    fn is_settlement_fund(&self, ticker: &str) -> bool {
        match self.settlement_fund {
            Some(fund) => fund == ticker,
            None => self.resolver.is_money_market(ticker),
        }
    }
}
