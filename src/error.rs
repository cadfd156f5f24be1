use beancount_core::AccountParseError;
use chrono::NaiveDate;
use thiserror::Error;

pub type ImportResult<T> = Result<T, ImportError>;

/// Conditions that abort the import of a statement.
///
/// None of these are recoverable per record: the caller decides whether to skip the file or
/// stop the batch.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Securities the statement refers to that the security table cannot map to a ticker.
    #[error("fund info not found for securities: {}", .identifiers.join(", "))]
    UnresolvedSecurities { identifiers: Vec<String> },

    #[error("unknown transaction kind '{0}'")]
    UnknownTransactionKind(String),

    #[error("neither price nor cost given for {commodity} posting to {account} on {date}")]
    MissingPriceAndCost {
        account: String,
        commodity: String,
        date: NaiveDate,
    },

    #[error("{kind} record on {date} is missing required field '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
        date: NaiveDate,
    },

    #[error("account template '{template}' resolved to '{resolved}'")]
    InvalidAccount {
        template: String,
        resolved: String,
        #[source]
        source: AccountParseError,
    },

    #[error("unknown account lifecycle action '{0}'")]
    UnknownAccountLifecycle(String),
}
