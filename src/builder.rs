//! Turns the records of one statement into ledger directives.

use std::borrow::Cow;
use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use beancount_core::{Account, Close, Commodity, Directive, Meta, MetaValue, Open, Transaction};

use crate::balance::{balance_assertion_date, BalanceDateInputs, BalanceExtractor};
use crate::config::ImporterConfig;
use crate::error::{ImportError, ImportResult};
use crate::hooks::{DefaultHooks, ImportHooks};
use crate::posting::{PostingFactory, ZeroPriceHandler};
use crate::reader::Reader;
use crate::record::{
    AccountAction, AccountRecord, CommodityRecord, PositionRecord, TransactionKind,
    TransactionRecord,
};
use crate::rounding;
use crate::security::{SecurityInfo, SecurityResolver};
use crate::template::{AccountRole, ResolvedAccounts};

const LOT_SELECTION_TODO: &str =
    "TODO: this entry is incomplete until lots are selected (bean-doctor context <filename> <lineno>)";

/// Builds transactions, balance assertions and prices from investment statements.
///
/// ```ignore
/// let builder = InvestmentTransactionBuilder::new(&config, resolver)
///     .with_zero_price_handler(|r: &TransactionRecord| r.memo.contains("EXPIRED"));
/// let directives = builder.extract(&statement)?;
/// ```
pub struct InvestmentTransactionBuilder<'c> {
    config: &'c ImporterConfig,
    resolver: SecurityResolver,
    hooks: Box<dyn ImportHooks + 'c>,
    zero_price_handler: Option<Box<dyn ZeroPriceHandler + 'c>>,
    today: NaiveDate,
}

impl<'c> InvestmentTransactionBuilder<'c> {
    pub fn new(config: &'c ImporterConfig, resolver: SecurityResolver) -> Self {
        InvestmentTransactionBuilder {
            config,
            resolver,
            hooks: Box::new(DefaultHooks),
            zero_price_handler: None,
            today: chrono::Local::now().naive_local().date(),
        }
    }

    pub fn with_hooks<H: ImportHooks + 'c>(mut self, hooks: H) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Accepts postings that have neither a price nor a cost for the records `handler` allows.
    pub fn with_zero_price_handler<Z: ZeroPriceHandler + 'c>(mut self, handler: Z) -> Self {
        self.zero_price_handler = Some(Box::new(handler));
        self
    }

    /// The date the `today` balance assertion strategy uses.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The account statements in `currency` are filed under.
    pub fn file_account(&self, currency: &str) -> String {
        ResolvedAccounts::for_statement(
            &self.config.accounts,
            currency,
            self.config.filing_account.as_deref(),
        )
        .filing_account()
        .to_string()
    }

    /// Imports one statement.
    ///
    /// Every record is read before anything is built, so a reader error, an unknown security or
    /// a malformed record fails the whole statement and no directives are returned.
    pub fn extract(&self, reader: &dyn Reader) -> ImportResult<Vec<Directive<'static>>> {
        let transactions: Vec<TransactionRecord> =
            reader.transactions().collect::<ImportResult<_>>()?;
        let positions: Vec<PositionRecord> = reader.positions().collect::<ImportResult<_>>()?;

        self.resolver.check_all(
            transactions
                .iter()
                .filter_map(TransactionRecord::security_id)
                .chain(positions.iter().map(|p| p.security.as_str())),
        )?;

        let currency = reader.currency();
        let import = StatementImport {
            builder: self,
            accounts: ResolvedAccounts::for_statement(
                &self.config.accounts,
                currency,
                self.config.filing_account.as_deref(),
            ),
            postings: PostingFactory::new(currency, self.zero_price_handler.as_deref()),
        };

        let mut directives = Vec::new();
        let mut last_transaction = None;
        for record in &transactions {
            if self.hooks.skip_transaction(record) {
                log::debug!("skipping {} record on {}", record.kind, record.posting_date());
                continue;
            }
            last_transaction = last_transaction.max(Some(record.posting_date()));
            let mut entry = if record.kind.is_trade() {
                import.trade_entry(record)?
            } else {
                import.transfer_entry(record)?
            };
            import.add_fee_postings(&mut entry, record)?;
            directives.push(Directive::Transaction(entry));
        }

        let date = balance_assertion_date(
            self.config.balance_assertion_date_type,
            &BalanceDateInputs {
                statement_end: reader.statement_end_date(),
                last_transaction,
                available_balance: reader.available_balance_date(),
                balance_date: reader.balance_date(),
                today: Some(self.today),
            },
            self.config.balance_assertion_date_fudge,
        );
        let extractor = BalanceExtractor {
            resolver: &self.resolver,
            accounts: &import.accounts,
            settlement_fund: self.config.settlement_fund.as_deref(),
        };
        directives.extend(extractor.extract(
            &positions,
            date,
            reader.available_cash(),
            reader.settlement_fund_balance(),
        )?);

        directives.extend(reader.commodities().iter().map(commodity_entry));
        for account in reader.accounts() {
            directives.push(account_entry(&account)?);
        }

        let filing_account = if self.config.emit_filing_account_metadata {
            Some(import.accounts.filing_account())
        } else {
            None
        };
        annotate(&mut directives, reader.file_name(), filing_account);
        Ok(directives)
    }
}

/// Records where each directive came from.
pub(crate) fn annotate(
    directives: &mut [Directive<'static>],
    file_name: Option<&str>,
    filing_account: Option<&str>,
) {
    for (lineno, directive) in directives.iter_mut().enumerate() {
        let meta = directive.meta_mut();
        if let Some(name) = file_name {
            meta.insert("filename".into(), MetaValue::Text(name.to_string().into()));
            meta.insert("lineno".into(), MetaValue::Number(Decimal::from(lineno as u64)));
        }
        if let Some(account) = filing_account {
            meta.insert(
                "filing_account".into(),
                MetaValue::Text(account.to_string().into()),
            );
        }
    }
}

/// Per-statement state: the accounts with the statement currency filled in and the posting
/// factory for that currency.
struct StatementImport<'a, 'c> {
    builder: &'a InvestmentTransactionBuilder<'c>,
    accounts: ResolvedAccounts,
    postings: PostingFactory<'a>,
}

impl StatementImport<'_, '_> {
    fn target_account(
        &self,
        record: &TransactionRecord,
        role: AccountRole,
        ticker: Option<&str>,
    ) -> ImportResult<Account<'static>> {
        let sub_source = record.sub_source.as_deref();
        match self
            .builder
            .hooks
            .custom_target_account(record, &self.accounts)
        {
            Some(template) => self.accounts.account_from(&template, ticker, sub_source),
            None => self.accounts.account(role, ticker, sub_source),
        }
    }

    fn main_account(
        &self,
        record: &TransactionRecord,
        ticker: &str,
    ) -> ImportResult<Account<'static>> {
        self.accounts
            .account(AccountRole::Main, Some(ticker), record.sub_source.as_deref())
    }

    fn cash_account(&self, record: &TransactionRecord) -> ImportResult<Account<'static>> {
        self.accounts
            .account(AccountRole::Cash, None, record.sub_source.as_deref())
    }

    fn new_transaction(
        &self,
        record: &TransactionRecord,
        narration: String,
        mut meta: Meta<'static>,
    ) -> Transaction<'static> {
        let hooks = &self.builder.hooks;
        hooks.transaction_metadata(record, &mut meta);
        log::debug!("{} {}: {}", record.posting_date(), record.kind, narration);
        let payee: Option<Cow<'static, str>> = hooks.payee(record).map(Cow::Owned);
        Transaction::builder()
            .date(record.posting_date())
            .payee(payee)
            .narration(narration)
            .tags(hooks.tags(record).into_iter().collect::<HashSet<_>>())
            .meta(meta)
            .build()
    }

    /// A purchase, sale or reinvestment: one commodity against cash.
    fn trade_entry(&self, record: &TransactionRecord) -> ImportResult<Transaction<'static>> {
        let info = self.builder.resolver.resolved(record.require_security()?)?;
        let ticker = info.ticker.as_str();
        let is_money_market = self.builder.resolver.is_money_market(ticker);
        let kind = record.kind;

        let mut units = record.require(record.units, "units")?;
        let total = record.require(record.total, "total")?;

        let mut meta = Meta::new();
        if let Some(settled) = record.settle_date {
            if settled != record.posting_date() {
                meta.insert("settlement_date".into(), MetaValue::Date(settled.into()));
            }
        }
        if kind.is_sell() {
            units = -units.abs();
            if !is_money_market {
                meta.insert("todo".into(), MetaValue::Text(LOT_SELECTION_TODO.into()));
            }
        }

        // Reinvested dividends are booked to the security's own income account.
        let target_ticker = if kind == TransactionKind::Reinvest {
            Some(ticker)
        } else {
            None
        };
        let target = self.target_account(record, kind.target_role(), target_ticker)?;
        let main = self.main_account(record, ticker)?;

        let mut entry = self.new_transaction(record, narration(info), meta);
        let price = record.unit_price;
        if is_money_market {
            entry
                .postings
                .push(self.postings.price_posting(main, units, ticker, price, record)?);
        } else if kind.is_sell() {
            entry
                .postings
                .push(self.postings.open_lot_posting(main, units, ticker, price, record)?);
            let gains = self.accounts.account(
                AccountRole::CapitalGains,
                Some(ticker),
                record.sub_source.as_deref(),
            )?;
            entry.postings.push(self.postings.auto_posting(gains));
        } else {
            entry
                .postings
                .push(self.postings.cost_posting(main, units, ticker, price, record)?);
        }

        // Some institutions report both units and total as positive for purchases.
        let zero = Decimal::new(0, 0);
        let reverser = if units > zero && total > zero {
            Decimal::new(-1, 0)
        } else {
            Decimal::new(1, 0)
        };
        let counter = reverser * total;
        entry.postings.push(self.postings.cash(target, counter));

        let computed = price.unwrap_or_default() * units;
        if let Some(correction) =
            rounding::reconcile(-counter, computed, self.builder.config.max_rounding_error)
        {
            let account = self.accounts.account(AccountRole::RoundingError, None, None)?;
            let currency = self
                .builder
                .config
                .operating_currency
                .as_deref()
                .unwrap_or_else(|| self.accounts.currency());
            entry
                .postings
                .push(self.postings.simple(account, correction, currency));
        }
        Ok(entry)
    }

    /// A movement of cash or of a security between this account and another, or income.
    fn transfer_entry(&self, record: &TransactionRecord) -> ImportResult<Transaction<'static>> {
        let kind = record.kind;
        let units = record.quantity(kind.quantity_field())?;
        let role = if record.is_dividend_income() {
            AccountRole::Dividends
        } else {
            kind.target_role()
        };
        let currency = self.accounts.currency().to_string();

        let carries_security = kind.is_income() || kind == TransactionKind::Transfer;
        let (narration, source, target, commodity) = match record.security_id() {
            Some(id) if carries_security => {
                let info = self.builder.resolver.resolved(id)?;
                let ticker = info.ticker.as_str();
                let target = self.target_account(record, role, Some(ticker))?;
                if kind.is_income() {
                    (narration(info), self.cash_account(record)?, target, currency)
                } else {
                    (
                        narration(info),
                        self.main_account(record, ticker)?,
                        target,
                        ticker.to_string(),
                    )
                }
            }
            _ => (
                kind.name().to_string(),
                self.cash_account(record)?,
                self.target_account(record, role, None)?,
                currency,
            ),
        };

        let mut entry = self.new_transaction(record, narration, Meta::new());
        entry
            .postings
            .push(self.postings.simple(source, units, &commodity));
        entry
            .postings
            .push(self.postings.simple(target, -units, &commodity));
        Ok(entry)
    }

    fn add_fee_postings(
        &self,
        entry: &mut Transaction<'static>,
        record: &TransactionRecord,
    ) -> ImportResult<()> {
        for amount in [record.fees, record.commission].iter().flatten() {
            if amount.is_zero() {
                continue;
            }
            let account = self
                .accounts
                .account(AccountRole::Fees, None, record.sub_source.as_deref())?;
            entry.postings.push(self.postings.cash(account, *amount));
        }
        Ok(())
    }
}

fn narration(info: &SecurityInfo) -> String {
    format!("[{}] {}", info.ticker, info.long_name)
}

fn commodity_entry(record: &CommodityRecord) -> Directive<'static> {
    Directive::Commodity(
        Commodity::builder()
            .date(record.date)
            .name(record.security.clone())
            .build(),
    )
}

fn account_entry(record: &AccountRecord) -> ImportResult<Directive<'static>> {
    let account: Account<'static> =
        record
            .name
            .parse()
            .map_err(|source| ImportError::InvalidAccount {
                template: record.name.clone(),
                resolved: record.name.clone(),
                source,
            })?;
    let date = record.date;
    Ok(match record.action {
        AccountAction::Open => Directive::Open(Open::builder().date(date).account(account).build()),
        AccountAction::Close => {
            Directive::Close(Close::builder().date(date).account(account).build())
        }
    })
}
