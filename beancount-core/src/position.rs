use std::borrow::Cow;

use rust_decimal::Decimal;
use typed_builder::TypedBuilder;

use super::{Currency, Date};

// Amounts specified as either per-share or total prices or costs are always unsigned. Beancount
// raises an error on a negative cost.

/// Represents a "cost", which typically belongs to a [Posting](struct.Posting.html).
///
/// Every component is optional: an empty spec (`{}`) lets the booking method pick any matching
/// lot when the posting reduces a position.
///
/// <https://docs.google.com/document/d/1wAMVrKIA2qtRGmoVDSUBJGmYZSygUaR0uOMW1GV3YE0/edit#heading=h.mtqrwt24wnzs>
#[derive(Clone, Debug, Eq, PartialEq, Default, TypedBuilder)]
pub struct CostSpec<'a> {
    /// The per-unit cost.
    #[builder(default)]
    pub number_per: Option<Decimal>,

    /// The total cost.
    #[builder(default)]
    pub number_total: Option<Decimal>,

    /// The type of commodity for this cost.
    #[builder(default)]
    pub currency: Option<Currency<'a>>,

    /// The date of the at-cost.
    #[builder(default)]
    pub date: Option<Date<'a>>,

    /// The label of the cost.
    #[builder(default)]
    pub label: Option<Cow<'a, str>>,

    /// Average all lots of the commodity (`*`).
    #[builder(default)]
    pub merge_cost: bool,
}

impl CostSpec<'_> {
    /// A cost spec with no components, i.e. `{}`.
    pub fn any_lot() -> Self {
        CostSpec::default()
    }

    /// Whether the spec carries a per-unit or a total number.
    pub fn has_number(&self) -> bool {
        self.number_per.is_some() || self.number_total.is_some()
    }
}
