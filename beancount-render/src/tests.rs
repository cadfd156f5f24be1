use crate::{render, render_directives};
use beancount_core::*;
use indoc::indoc;
use rust_decimal_macros::dec;
use std::borrow::Cow;
use std::collections::HashSet;

fn account(name: &str) -> Account<'static> {
    name.parse().unwrap()
}

fn rendered(directives: Vec<Directive<'_>>) -> anyhow::Result<String> {
    let ledger = Ledger::builder().directives(directives).build();
    let mut out = Vec::new();
    render(&mut out, &ledger)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_open_close() -> anyhow::Result<()> {
    let out = rendered(vec![
        Directive::Open(
            Open::builder()
                .date(Date::from_str_unchecked("2014-05-01"))
                .account(account("Assets:US:Vanguard:VTI"))
                .currencies(vec![Cow::from("VTI")])
                .booking(Some(Booking::Fifo))
                .build(),
        ),
        Directive::Close(
            Close::builder()
                .date(Date::from_str_unchecked("2016-11-28"))
                .account(account("Liabilities:CreditCard:CapitalOne"))
                .build(),
        ),
    ])?;
    assert_eq!(
        out,
        indoc! {r#"
            2014-05-01 open Assets:US:Vanguard:VTI VTI "FIFO"

            2016-11-28 close Liabilities:CreditCard:CapitalOne

        "#}
    );
    Ok(())
}

#[test]
fn test_commodity_directive() -> anyhow::Result<()> {
    let out = rendered(vec![Directive::Commodity(
        Commodity::builder()
            .date(Date::from_str_unchecked("2012-01-01"))
            .name(Cow::from("HOOL"))
            .build(),
    )])?;
    assert_eq!(out, "2012-01-01 commodity HOOL\n\n");
    Ok(())
}

#[test]
fn test_balance_directive() -> anyhow::Result<()> {
    let out = rendered(vec![
        Directive::Balance(
            Balance::builder()
                .date(Date::from_str_unchecked("2012-01-01"))
                .account(account("Assets:Checking"))
                .amount(Amount::new(dec!(100), "EUR"))
                .build(),
        ),
        Directive::Balance(
            Balance::builder()
                .date(Date::from_str_unchecked("2012-01-01"))
                .account(account("Assets:Checking"))
                .amount(Amount::new(dec!(100), "EUR"))
                .tolerance(Some(dec!(1)))
                .build(),
        ),
    ])?;
    assert_eq!(
        out,
        indoc! {"
            2012-01-01 balance Assets:Checking  100 EUR

            2012-01-01 balance Assets:Checking  100 ~ 1 EUR

        "}
    );
    Ok(())
}

#[test]
fn test_price() -> anyhow::Result<()> {
    let out = rendered(vec![Directive::Price(
        Price::builder()
            .date(Date::from_str_unchecked("2014-07-09"))
            .currency(Cow::from("HOOL"))
            .amount(Amount::new(dec!(579.18), "USD"))
            .build(),
    )])?;
    assert_eq!(out, "2014-07-09 price HOOL 579.18 USD\n\n");
    Ok(())
}

#[test]
fn test_transaction() -> anyhow::Result<()> {
    let mut meta = Meta::new();
    meta.insert(
        Cow::from("todo"),
        MetaValue::Text(Cow::from("select \"lots\"")),
    );
    let txn = Transaction::builder()
        .date(Date::from_str_unchecked("2020-10-01"))
        .payee(Some(Cow::from("SELL")))
        .narration(Cow::from("[HOOL] Hooli Inc"))
        .tags(vec![Cow::from("trading")].into_iter().collect::<HashSet<_>>())
        .meta(meta)
        .postings(vec![
            Posting::builder()
                .account(account("Assets:Trading:HOOL"))
                .units(Amount::new(dec!(-1), "HOOL"))
                .cost(Some(CostSpec::any_lot()))
                .price(Some(PriceSpec::PerUnit(
                    Amount::new(dec!(585.00), "USD").into(),
                )))
                .build(),
            Posting::builder()
                .account(account("Assets:Trading:USD"))
                .units(Amount::new(dec!(585.00), "USD"))
                .build(),
            Posting::builder()
                .account(account("Income:Trading:Gains"))
                .units(IncompleteAmount::empty())
                .build(),
        ])
        .build();
    let mut out = Vec::new();
    render_directives(&mut out, &[Directive::Transaction(txn)])?;
    assert_eq!(
        String::from_utf8(out)?,
        indoc! {r#"
            2020-10-01 * "SELL" "[HOOL] Hooli Inc" #trading
              todo: "select \"lots\""
              Assets:Trading:HOOL  -1 HOOL {} @ 585.00 USD
              Assets:Trading:USD  585.00 USD
              Income:Trading:Gains

        "#}
    );
    Ok(())
}

#[test]
fn test_cost_spec() -> anyhow::Result<()> {
    let renderer = crate::BasicRenderer::new();
    let mut out = Vec::new();
    crate::Renderer::render(
        &renderer,
        &CostSpec::builder()
            .number_per(Some(dec!(50.00)))
            .currency(Some(Cow::from("USD")))
            .date(Some(Date::from_str_unchecked("2020-01-01")))
            .build(),
        &mut out,
    )?;
    assert_eq!(String::from_utf8(out)?, "{50.00 USD, 2020-01-01}");

    let mut out = Vec::new();
    crate::Renderer::render(
        &renderer,
        &CostSpec::builder()
            .number_total(Some(dec!(200)))
            .currency(Some(Cow::from("USD")))
            .build(),
        &mut out,
    )?;
    assert_eq!(String::from_utf8(out)?, "{{200 USD}}");
    Ok(())
}
