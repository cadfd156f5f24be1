//! Construction of single postings, held at cost or converted at a price.

use std::borrow::Cow;

use beancount_core::{Account, Amount, CostSpec, IncompleteAmount, Posting, PriceSpec};
use rust_decimal::Decimal;

use crate::error::{ImportError, ImportResult};
use crate::record::TransactionRecord;

/// Decides whether a posting with neither a price nor a cost is acceptable.
///
/// Some institutions legitimately report a zero price, e.g. for options expiring worthless or
/// for corporate reorganizations. Implementations should accept only the cases they know about.
pub trait ZeroPriceHandler {
    fn accept(&self, record: &TransactionRecord) -> bool;
}

impl<F> ZeroPriceHandler for F
where
    F: Fn(&TransactionRecord) -> bool,
{
    fn accept(&self, record: &TransactionRecord) -> bool {
        self(record)
    }
}

/// How the commodity of a posting is valued.
#[derive(Clone, Debug, PartialEq)]
pub enum Valuation {
    /// Held at this per-unit cost (purchases).
    Cost(Decimal),
    /// Converted at this per-unit price (money market funds).
    Price(Decimal),
    /// Converted at this per-unit price, reducing whichever lot a human selects (sales).
    AnyLotAtPrice(Decimal),
}

impl Valuation {
    fn number(&self) -> Decimal {
        match self {
            Valuation::Cost(n) | Valuation::Price(n) | Valuation::AnyLotAtPrice(n) => *n,
        }
    }
}

/// Builds postings in the statement currency, consulting an optional zero-price handler.
pub struct PostingFactory<'h> {
    currency: String,
    zero_price_handler: Option<&'h dyn ZeroPriceHandler>,
}

impl<'h> PostingFactory<'h> {
    pub fn new(currency: &str, zero_price_handler: Option<&'h dyn ZeroPriceHandler>) -> Self {
        PostingFactory {
            currency: currency.to_string(),
            zero_price_handler,
        }
    }

    /// A posting of `units` of `commodity`, valued according to `valuation`.
    ///
    /// A zero or missing number is an error unless the zero-price handler accepts `record`, in
    /// which case the posting carries no price. A sale still reduces an unspecified lot (`{}`).
    pub fn build(
        &self,
        account: Account<'static>,
        units: Decimal,
        commodity: &str,
        valuation: Option<Valuation>,
        record: &TransactionRecord,
    ) -> ImportResult<Posting<'static>> {
        let units = Amount::new(units, commodity.to_string());
        let valuation = match valuation {
            Some(v) if !v.number().is_zero() => v,
            other => {
                let accepted = self
                    .zero_price_handler
                    .map_or(false, |handler| handler.accept(record));
                if !accepted {
                    return Err(ImportError::MissingPriceAndCost {
                        account: account.to_string(),
                        commodity: commodity.to_string(),
                        date: record.posting_date(),
                    });
                }
                log::warn!(
                    "posting {} to {} on {} with neither price nor cost",
                    units,
                    account,
                    record.posting_date()
                );
                let cost = match other {
                    Some(Valuation::AnyLotAtPrice(_)) => Some(CostSpec::any_lot()),
                    _ => None,
                };
                return Ok(Posting::builder()
                    .account(account)
                    .units(units)
                    .cost(cost)
                    .build());
            }
        };

        let in_currency = |n: Decimal| -> IncompleteAmount<'static> {
            Amount::new(n, self.currency.clone()).into()
        };
        let (cost, price) = match valuation {
            Valuation::Cost(n) => (
                Some(
                    CostSpec::builder()
                        .number_per(Some(n))
                        .currency(Some(Cow::Owned(self.currency.clone())))
                        .build(),
                ),
                None,
            ),
            Valuation::Price(n) => (None, Some(PriceSpec::PerUnit(in_currency(n)))),
            Valuation::AnyLotAtPrice(n) => (
                Some(CostSpec::any_lot()),
                Some(PriceSpec::PerUnit(in_currency(n))),
            ),
        };
        Ok(Posting::builder()
            .account(account)
            .units(units)
            .cost(cost)
            .price(price)
            .build())
    }

    /// Units held at a per-unit cost in the statement currency.
    pub fn cost_posting(
        &self,
        account: Account<'static>,
        units: Decimal,
        commodity: &str,
        cost: Option<Decimal>,
        record: &TransactionRecord,
    ) -> ImportResult<Posting<'static>> {
        self.build(account, units, commodity, cost.map(Valuation::Cost), record)
    }

    /// Units converted at a per-unit price in the statement currency.
    pub fn price_posting(
        &self,
        account: Account<'static>,
        units: Decimal,
        commodity: &str,
        price: Option<Decimal>,
        record: &TransactionRecord,
    ) -> ImportResult<Posting<'static>> {
        self.build(account, units, commodity, price.map(Valuation::Price), record)
    }

    /// Units taken from an unspecified lot (`{}`) and sold at a per-unit price.
    pub fn open_lot_posting(
        &self,
        account: Account<'static>,
        units: Decimal,
        commodity: &str,
        price: Option<Decimal>,
        record: &TransactionRecord,
    ) -> ImportResult<Posting<'static>> {
        self.build(account, units, commodity, price.map(Valuation::AnyLotAtPrice), record)
    }

    /// A posting of `units` of `commodity` with no cost or price.
    pub fn simple(
        &self,
        account: Account<'static>,
        units: Decimal,
        commodity: &str,
    ) -> Posting<'static> {
        Posting::builder()
            .account(account)
            .units(Amount::new(units, commodity.to_string()))
            .build()
    }

    /// A posting in the statement currency.
    pub fn cash(&self, account: Account<'static>, units: Decimal) -> Posting<'static> {
        self.simple(account, units, &self.currency)
    }

    /// A posting whose amount the ledger interpolates.
    pub fn auto_posting(&self, account: Account<'static>) -> Posting<'static> {
        Posting::builder()
            .account(account)
            .units(IncompleteAmount::empty())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TransactionKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record() -> TransactionRecord {
        TransactionRecord::builder()
            .kind(TransactionKind::Reinvest)
            .date(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap())
            .memo("DIVIDEND REINVEST".to_string())
            .build()
    }

    fn account() -> Account<'static> {
        "Assets:Vanguard:VTI".parse().unwrap()
    }

    #[test]
    fn cost_posting() {
        let factory = PostingFactory::new("USD", None);
        let posting = factory
            .cost_posting(account(), dec!(10), "VTI", Some(dec!(50.00)), &record())
            .unwrap();
        assert_eq!(
            posting.units,
            IncompleteAmount::from(Amount::new(dec!(10), "VTI"))
        );
        let cost = posting.cost.unwrap();
        assert_eq!(cost.number_per, Some(dec!(50.00)));
        assert_eq!(cost.currency.as_deref(), Some("USD"));
        assert!(posting.price.is_none());
    }

    #[test]
    fn price_posting() {
        let factory = PostingFactory::new("USD", None);
        let posting = factory
            .build(account(), dec!(-5), "VMFXX", Some(Valuation::Price(dec!(1))), &record())
            .unwrap();
        assert!(posting.cost.is_none());
        assert_eq!(
            posting.price,
            Some(PriceSpec::PerUnit(Amount::new(dec!(1), "USD").into()))
        );
    }

    #[test]
    fn any_lot_posting() {
        let factory = PostingFactory::new("USD", None);
        let posting = factory
            .open_lot_posting(account(), dec!(-5), "VTI", Some(dec!(200)), &record())
            .unwrap();
        let cost = posting.cost.unwrap();
        assert!(!cost.has_number());
        assert!(posting.price.is_some());
    }

    #[test]
    fn auto_posting_has_no_amount() {
        let factory = PostingFactory::new("USD", None);
        let posting = factory.auto_posting("Income:Capital-Gains:VTI".parse().unwrap());
        assert!(posting.units.is_empty());
    }

    #[test]
    fn zero_price_is_fatal_without_handler() {
        let factory = PostingFactory::new("USD", None);
        let result = factory.cost_posting(account(), dec!(10), "VTI", Some(dec!(0)), &record());
        assert!(matches!(result, Err(ImportError::MissingPriceAndCost { .. })));
        let result = factory.build(account(), dec!(10), "VTI", None, &record());
        assert!(matches!(result, Err(ImportError::MissingPriceAndCost { .. })));
    }

    #[test]
    fn zero_price_handler_allow_list() {
        let handler = |r: &TransactionRecord| r.memo == "DIVIDEND REINVEST";
        let factory = PostingFactory::new("USD", Some(&handler));
        let posting = factory
            .build(account(), dec!(10), "VTI", Some(Valuation::Cost(dec!(0))), &record())
            .unwrap();
        assert!(posting.cost.is_none());
        assert!(posting.price.is_none());
        assert_eq!(
            posting.units,
            IncompleteAmount::from(Amount::new(dec!(10), "VTI"))
        );

        let mut other = record();
        other.memo = "BUY".to_string();
        assert!(factory
            .build(account(), dec!(10), "VTI", None, &other)
            .is_err());
    }

    #[test]
    fn accepted_zero_price_sale_keeps_lot_spec() {
        let handler = |r: &TransactionRecord| r.memo == "DIVIDEND REINVEST";
        let factory = PostingFactory::new("USD", Some(&handler));
        let posting = factory
            .open_lot_posting(account(), dec!(-3), "VTI", Some(dec!(0)), &record())
            .unwrap();
        let cost = posting.cost.unwrap();
        assert!(!cost.has_number());
        assert!(posting.price.is_none());

        let posting = factory
            .price_posting(account(), dec!(-3), "VTI", Some(dec!(0)), &record())
            .unwrap();
        assert!(posting.cost.is_none());
    }
}
