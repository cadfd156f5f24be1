//! Turns canonical bank and brokerage statement records into Beancount directives.
//!
//! A format-specific [`Reader`](reader/trait.Reader.html) produces records; an
//! [`InvestmentTransactionBuilder`](builder/struct.InvestmentTransactionBuilder.html) turns them
//! into transactions, balance assertions and prices, which `beancount-render` can write out.
//! Bank and credit card statements go through a
//! [`BankingTransactionBuilder`](banking/struct.BankingTransactionBuilder.html) instead.

pub use balance::{balance_assertion_date, BalanceDateInputs, BalanceDateStrategy};
pub use banking::BankingTransactionBuilder;
pub use builder::InvestmentTransactionBuilder;
pub use config::{BankingConfig, ImporterConfig};
pub use error::{ImportError, ImportResult};
pub use hooks::{DefaultHooks, ImportHooks};
pub use posting::{PostingFactory, Valuation, ZeroPriceHandler};
pub use reader::{Reader, Statement};
pub use record::{
    AccountAction, AccountRecord, BalanceRecord, CommodityRecord, PositionRecord,
    TransactionKind, TransactionRecord,
};
pub use security::{LookupKey, SecurityInfo, SecurityResolver, SecurityTable};
pub use template::{
    remove_empty_subaccounts, AccountRole, AccountTemplate, AccountTemplates, ResolvedAccounts,
};

pub mod balance;
pub mod banking;
pub mod builder;
pub mod config;
mod error;
pub mod hooks;
pub mod posting;
pub mod reader;
pub mod record;
pub mod rounding;
pub mod security;
pub mod template;
