use std::borrow::Cow;
use std::collections::HashSet;

use rust_decimal::Decimal;
use typed_builder::TypedBuilder;

use super::account::Account;
use super::amount::Amount;
use super::flags::Flag;
use super::metadata::{Link, Meta, Tag};
use super::posting::Posting;
use super::{Currency, Date};

/// The directives an importer can produce.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive<'a> {
    Open(Open<'a>),
    Close(Close<'a>),
    Balance(Balance<'a>),
    Commodity(Commodity<'a>),
    Price(Price<'a>),
    Transaction(Transaction<'a>),
}

impl<'a> Directive<'a> {
    pub fn meta_mut(&mut self) -> &mut Meta<'a> {
        match self {
            Directive::Open(d) => &mut d.meta,
            Directive::Close(d) => &mut d.meta,
            Directive::Balance(d) => &mut d.meta,
            Directive::Commodity(d) => &mut d.meta,
            Directive::Price(d) => &mut d.meta,
            Directive::Transaction(d) => &mut d.meta,
        }
    }
}

/// Booking method of an account, used to pick lots when a position is reduced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Booking {
    Strict,
    None,
    Average,
    Fifo,
    Lifo,
}

/// Opens an account.
///
/// ```text
/// 2014-05-01 open Assets:US:Vanguard:VTI VTI
/// ```
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Open<'a> {
    pub date: Date<'a>,

    pub account: Account<'a>,

    /// Commodities the account is constrained to hold.
    #[builder(default)]
    pub currencies: Vec<Currency<'a>>,

    #[builder(default)]
    pub booking: Option<Booking>,

    #[builder(default)]
    pub meta: Meta<'a>,
}

/// Closes an account.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Close<'a> {
    pub date: Date<'a>,

    pub account: Account<'a>,

    #[builder(default)]
    pub meta: Meta<'a>,
}

/// Asserts the amount of a commodity held in an account at the beginning of `date`.
///
/// ```text
/// 2014-08-09 balance Assets:Cash     562.00 USD
/// ```
///
/// <https://docs.google.com/document/d/1wAMVrKIA2qtRGmoVDSUBJGmYZSygUaR0uOMW1GV3YE0/edit#heading=h.l0pvgeniwvq8>
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Balance<'a> {
    pub date: Date<'a>,

    pub account: Account<'a>,

    pub amount: Amount<'a>,

    #[builder(default)]
    pub tolerance: Option<Decimal>,

    #[builder(default)]
    pub meta: Meta<'a>,
}

/// Declares a commodity.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Commodity<'a> {
    pub date: Date<'a>,

    pub name: Currency<'a>,

    #[builder(default)]
    pub meta: Meta<'a>,
}

/// The price of one unit of `currency`, expressed as `amount`.
///
/// ```text
/// 2014-07-09 price HOOL  579.18 USD
/// ```
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Price<'a> {
    pub date: Date<'a>,

    pub currency: Currency<'a>,

    pub amount: Amount<'a>,

    #[builder(default)]
    pub meta: Meta<'a>,
}

/// A transaction: a dated set of postings that sum to zero.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Transaction<'a> {
    pub date: Date<'a>,

    #[builder(default)]
    pub flag: Flag<'a>,

    #[builder(default)]
    pub payee: Option<Cow<'a, str>>,

    pub narration: Cow<'a, str>,

    #[builder(default)]
    pub tags: HashSet<Tag<'a>>,

    #[builder(default)]
    pub links: HashSet<Link<'a>>,

    #[builder(default)]
    pub postings: Vec<Posting<'a>>,

    #[builder(default)]
    pub meta: Meta<'a>,
}
