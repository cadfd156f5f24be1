//! Imports of bank and credit card statements.
//!
//! Each row becomes a transaction with a single posting to the main account. The other leg is
//! left for the user, or for a tool that predicts it from earlier entries.

use std::collections::HashSet;

use beancount_core::{Account, Amount, Balance, Directive, Meta, Transaction};

use crate::builder::annotate;
use crate::config::BankingConfig;
use crate::error::ImportResult;
use crate::hooks::{DefaultHooks, ImportHooks};
use crate::posting::PostingFactory;
use crate::reader::Reader;
use crate::record::{BalanceRecord, TransactionRecord};

/// Builds transactions and balance assertions from banking statements.
///
/// ```ignore
/// let builder = BankingTransactionBuilder::new(&config);
/// let directives = builder.extract(&statement)?;
/// ```
pub struct BankingTransactionBuilder<'c> {
    config: &'c BankingConfig,
    hooks: Box<dyn ImportHooks + 'c>,
}

impl<'c> BankingTransactionBuilder<'c> {
    pub fn new(config: &'c BankingConfig) -> Self {
        BankingTransactionBuilder {
            config,
            hooks: Box::new(DefaultHooks),
        }
    }

    /// Only `skip_transaction`, `tags` and `transaction_metadata` apply to bank rows.
    pub fn with_hooks<H: ImportHooks + 'c>(mut self, hooks: H) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// The account statements are filed under, with every placeholder left empty.
    pub fn file_account(&self) -> String {
        match &self.config.filing_account {
            Some(account) => account.clone(),
            None => self.config.main_account.resolve("", "", None),
        }
    }

    /// Imports one statement. A reader error fails the whole statement.
    pub fn extract(&self, reader: &dyn Reader) -> ImportResult<Vec<Directive<'static>>> {
        let transactions: Vec<TransactionRecord> =
            reader.transactions().collect::<ImportResult<_>>()?;
        let currency = reader.currency();
        let main = self.config.main_account.to_account("", currency, None)?;
        let postings = PostingFactory::new(currency, None);

        let mut directives = Vec::new();
        for record in &transactions {
            if self.hooks.skip_transaction(record) {
                log::debug!("skipping {} record on {}", record.kind, record.posting_date());
                continue;
            }
            let amount = record.require(record.amount, "amount")?;
            let mut entry = self.new_transaction(record);
            entry.postings.push(postings.cash(main.clone(), amount));
            directives.push(Directive::Transaction(entry));
        }

        let balances = reader.balance_statement();
        log::debug!("{} balance assertions for {}", balances.len(), main);
        directives.extend(
            balances
                .iter()
                .map(|balance| balance_entry(balance, &main, currency)),
        );

        let filing_account = if self.config.emit_filing_account_metadata {
            Some(self.file_account())
        } else {
            None
        };
        annotate(&mut directives, reader.file_name(), filing_account.as_deref());
        Ok(directives)
    }

    fn new_transaction(&self, record: &TransactionRecord) -> Transaction<'static> {
        let mut meta = Meta::new();
        self.hooks.transaction_metadata(record, &mut meta);
        let narration = record.payee.clone().unwrap_or_else(|| record.memo.clone());
        log::debug!("{} {}: {}", record.posting_date(), record.kind, narration);
        Transaction::builder()
            .date(record.posting_date())
            .narration(narration)
            .tags(self.hooks.tags(record).into_iter().collect::<HashSet<_>>())
            .meta(meta)
            .build()
    }
}

fn balance_entry(
    balance: &BalanceRecord,
    account: &Account<'static>,
    currency: &str,
) -> Directive<'static> {
    Directive::Balance(
        Balance::builder()
            .date(balance.date)
            .account(account.clone())
            .amount(Amount::new(balance.amount, currency.to_string()))
            .build(),
    )
}
