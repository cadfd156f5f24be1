use typed_builder::TypedBuilder;

use std::borrow::Cow;
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use super::account_types::AccountType;

/// Represents an account.
///
/// Beancount accumulates commodities in accounts.  An account name is a
/// colon-separated list of capitalized words which begin with a letter, and whose first word must
/// be one of the five acceptable account types.
///
/// Some example accounts:
///
/// ```text
/// Assets:US:BofA:Checking
/// Liabilities:CA:RBC:CreditCard
/// Equity:Retained-Earnings
/// Income:US:Acme:Salary
/// Expenses:Food:Groceries
/// ```
///
/// <https://docs.google.com/document/d/1wAMVrKIA2qtRGmoVDSUBJGmYZSygUaR0uOMW1GV3YE0/edit#heading=h.17ry42rqbuiu>
#[derive(Clone, Debug, Eq, PartialEq, Hash, TypedBuilder)]
pub struct Account<'a> {
    /// Type of the account.
    pub ty: AccountType,

    /// Optional parts of the account following the account type.
    pub parts: Vec<Cow<'a, str>>,
}

impl fmt::Display for Account<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty.default_name())?;
        for part in &self.parts {
            write!(f, ":{}", part)?;
        }
        Ok(())
    }
}

/// Returned when a string is not a valid account name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountParseError {
    pub name: String,
    pub reason: &'static str,
}

impl fmt::Display for AccountParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid account name '{}': {}", self.name, self.reason)
    }
}

impl Error for AccountParseError {}

impl FromStr for Account<'static> {
    type Err = AccountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| AccountParseError {
            name: s.to_string(),
            reason,
        };
        let mut pieces = s.split(':');
        let ty = pieces
            .next()
            .and_then(|root| AccountType::try_from(root).ok())
            .ok_or_else(|| err("first component must be one of the five account types"))?;
        let mut parts = Vec::new();
        for piece in pieces {
            if piece.is_empty() {
                return Err(err("empty component"));
            }
            if piece.chars().any(|c| c.is_whitespace() || c == '{' || c == '}') {
                return Err(err("component contains whitespace or an unresolved placeholder"));
            }
            parts.push(Cow::Owned(piece.to_string()));
        }
        Ok(Account { ty, parts })
    }
}
