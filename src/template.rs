//! Account name templates.
//!
//! Configured account names may contain placeholders that are filled in per statement and per
//! posting:
//!
//! ```text
//! Assets:Investments:Vanguard:{ticker}      -> Assets:Investments:Vanguard:VTI
//! Assets:Investments:Vanguard:{currency}    -> Assets:Investments:Vanguard:USD
//! Assets:Retirement:401k:{sub-source}:Cash  -> Assets:Retirement:401k:PreTax:Cash
//! ```

use std::fmt;

use beancount_core::Account;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::error::{ImportError, ImportResult};

const TICKER: &str = "{ticker}";
const CURRENCY: &str = "{currency}";
const SUB_SOURCE: &str = "{sub-source}";

/// The purpose an account serves in an import.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AccountRole {
    /// Holds the securities; usually ends in `{ticker}`.
    Main,
    Cash,
    Transfer,
    Dividends,
    Interest,
    /// Realized gains and losses on sales.
    CapitalGains,
    CapGainsLongTerm,
    CapGainsShortTerm,
    Fees,
    InvestmentExpense,
    RoundingError,
}

/// An account name possibly containing placeholders.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(transparent)]
pub struct AccountTemplate(String);

/// Values placeholders are replaced with. A `None` leaves the placeholder in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct Substitutions<'s> {
    pub ticker: Option<&'s str>,
    pub currency: Option<&'s str>,
    pub sub_source: Option<&'s str>,
}

impl AccountTemplate {
    pub fn new<S: Into<String>>(template: S) -> Self {
        AccountTemplate(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a new template with the given placeholders filled in.
    pub fn substitute(&self, substs: &Substitutions<'_>) -> AccountTemplate {
        let mut s = self.0.clone();
        if let Some(ticker) = substs.ticker {
            s = s.replace(TICKER, ticker);
        }
        if let Some(currency) = substs.currency {
            s = s.replace(CURRENCY, currency);
        }
        if let Some(sub_source) = substs.sub_source {
            s = s.replace(SUB_SOURCE, sub_source);
        }
        AccountTemplate(s)
    }

    /// Fills in every placeholder and collapses the empty components this leaves behind.
    pub fn resolve(&self, ticker: &str, currency: &str, sub_source: Option<&str>) -> String {
        let filled = self.substitute(&Substitutions {
            ticker: Some(ticker),
            currency: Some(currency),
            sub_source: Some(sub_source.unwrap_or("")),
        });
        remove_empty_subaccounts(&filled.0)
    }

    /// Resolves the template and parses the result as an account.
    pub fn to_account(
        &self,
        ticker: &str,
        currency: &str,
        sub_source: Option<&str>,
    ) -> ImportResult<Account<'static>> {
        let resolved = self.resolve(ticker, currency, sub_source);
        resolved
            .parse()
            .map_err(|source| ImportError::InvalidAccount {
                template: self.0.clone(),
                resolved,
                source,
            })
    }
}

impl fmt::Display for AccountTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountTemplate {
    fn from(s: &str) -> Self {
        AccountTemplate::new(s)
    }
}

/// Translates `Assets:Foo::Bar` to `Assets:Foo:Bar`.
pub fn remove_empty_subaccounts(account: &str) -> String {
    account
        .split(':')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(":")
}

/// Account templates by role, as configured.
#[derive(Clone, Debug, PartialEq, Deserialize, TypedBuilder)]
pub struct AccountTemplates {
    pub main_account: AccountTemplate,
    pub cash_account: AccountTemplate,
    pub transfer: AccountTemplate,
    pub dividends: AccountTemplate,
    pub interest: AccountTemplate,
    #[serde(rename = "cg")]
    pub capital_gains: AccountTemplate,
    pub capgains_lt: AccountTemplate,
    pub capgains_st: AccountTemplate,
    pub fees: AccountTemplate,
    #[serde(rename = "invexpense")]
    pub investment_expense: AccountTemplate,
    pub rounding_error: AccountTemplate,
}

impl AccountTemplates {
    pub fn get(&self, role: AccountRole) -> &AccountTemplate {
        match role {
            AccountRole::Main => &self.main_account,
            AccountRole::Cash => &self.cash_account,
            AccountRole::Transfer => &self.transfer,
            AccountRole::Dividends => &self.dividends,
            AccountRole::Interest => &self.interest,
            AccountRole::CapitalGains => &self.capital_gains,
            AccountRole::CapGainsLongTerm => &self.capgains_lt,
            AccountRole::CapGainsShortTerm => &self.capgains_st,
            AccountRole::Fees => &self.fees,
            AccountRole::InvestmentExpense => &self.investment_expense,
            AccountRole::RoundingError => &self.rounding_error,
        }
    }

    fn map(&self, f: impl Fn(&AccountTemplate) -> AccountTemplate) -> AccountTemplates {
        AccountTemplates {
            main_account: f(&self.main_account),
            cash_account: f(&self.cash_account),
            transfer: f(&self.transfer),
            dividends: f(&self.dividends),
            interest: f(&self.interest),
            capital_gains: f(&self.capital_gains),
            capgains_lt: f(&self.capgains_lt),
            capgains_st: f(&self.capgains_st),
            fees: f(&self.fees),
            investment_expense: f(&self.investment_expense),
            rounding_error: f(&self.rounding_error),
        }
    }
}

/// Account templates with the statement currency filled in.
///
/// Derived from the configuration once per statement; the configuration itself is not touched.
#[derive(Clone, Debug)]
pub struct ResolvedAccounts {
    templates: AccountTemplates,
    currency: String,
    filing_account: String,
}

impl ResolvedAccounts {
    pub fn for_statement(
        templates: &AccountTemplates,
        currency: &str,
        filing_account: Option<&str>,
    ) -> Self {
        let filing_account = match filing_account {
            Some(account) => account.to_string(),
            None => templates.main_account.resolve("", "", None),
        };
        let templates = templates.map(|t| {
            t.substitute(&Substitutions {
                currency: Some(currency),
                ..Substitutions::default()
            })
        });
        ResolvedAccounts {
            templates,
            currency: currency.to_string(),
            filing_account,
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn template(&self, role: AccountRole) -> &AccountTemplate {
        self.templates.get(role)
    }

    /// Account for `role`, with `{ticker}` set to `ticker`, or to the statement currency for
    /// cash legs.
    pub fn account(
        &self,
        role: AccountRole,
        ticker: Option<&str>,
        sub_source: Option<&str>,
    ) -> ImportResult<Account<'static>> {
        self.account_from(self.template(role), ticker, sub_source)
    }

    /// Like [`account`](#method.account) for a template chosen outside the configured roles.
    pub fn account_from(
        &self,
        template: &AccountTemplate,
        ticker: Option<&str>,
        sub_source: Option<&str>,
    ) -> ImportResult<Account<'static>> {
        let ticker = ticker.unwrap_or(&self.currency);
        template.to_account(ticker, &self.currency, sub_source)
    }

    pub fn main_account(&self, ticker: &str) -> ImportResult<Account<'static>> {
        self.account(AccountRole::Main, Some(ticker), None)
    }

    /// The account statements are filed under. Only used for routing files, never for postings.
    pub fn filing_account(&self) -> &str {
        &self.filing_account
    }
}
