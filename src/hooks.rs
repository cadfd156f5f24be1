//! Extension points for institution-specific behavior.

use beancount_core::{Meta, Tag};

use crate::record::TransactionRecord;
use crate::template::{AccountTemplate, ResolvedAccounts};

/// Customizes how records become transactions. Every method defaults to the standard behavior.
pub trait ImportHooks {
    /// Records to leave out of the import entirely, e.g. duplicates an institution reports twice.
    fn skip_transaction(&self, _record: &TransactionRecord) -> bool {
        false
    }

    /// A target account template to use instead of the one configured for the record's kind.
    fn custom_target_account(
        &self,
        _record: &TransactionRecord,
        _accounts: &ResolvedAccounts,
    ) -> Option<AccountTemplate> {
        None
    }

    fn payee(&self, record: &TransactionRecord) -> Option<String> {
        if record.memo.is_empty() {
            None
        } else {
            Some(record.memo.clone())
        }
    }

    fn tags(&self, _record: &TransactionRecord) -> Vec<Tag<'static>> {
        Vec::new()
    }

    /// Extra metadata for the transaction built from `record`.
    fn transaction_metadata(&self, _record: &TransactionRecord, _meta: &mut Meta<'static>) {}
}

/// The standard behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHooks;

impl ImportHooks for DefaultHooks {}
