use beancount_core::*;
use std::{io, io::Write};
use thiserror::Error;

#[cfg(test)]
mod tests;

const INDENT: &str = "  ";

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct BasicRenderer {}

impl BasicRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn render<W: Write>(w: &mut W, ledger: &Ledger<'_>) -> Result<(), BasicRendererError> {
    BasicRenderer::default().render(ledger, w)
}

/// Renders a list of directives separated by blank lines, the shape importers produce.
pub fn render_directives<W: Write>(
    w: &mut W,
    directives: &[Directive<'_>],
) -> Result<(), BasicRendererError> {
    let renderer = BasicRenderer::default();
    for directive in directives {
        renderer.render(directive, w)?;
        writeln!(w)?;
    }
    Ok(())
}

#[derive(Error, Debug)]
pub enum BasicRendererError {
    #[error("an io error occurred")]
    Io(#[from] io::Error),
}

pub trait Renderer<T, W: Write> {
    type Error;
    fn render(&self, renderable: T, write: &mut W) -> Result<(), Self::Error>;
}

impl<'a, W: Write> Renderer<&'a Ledger<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, ledger: &'a Ledger<'_>, write: &mut W) -> Result<(), Self::Error> {
        render_directives(write, &ledger.directives)
    }
}

impl<'a, W: Write> Renderer<&'a Directive<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, directive: &'a Directive<'_>, write: &mut W) -> Result<(), Self::Error> {
        use Directive::*;
        match directive {
            Open(open) => self.render(open, write),
            Close(close) => self.render(close, write),
            Balance(balance) => self.render(balance, write),
            Commodity(commodity) => self.render(commodity, write),
            Price(price) => self.render(price, write),
            Transaction(transaction) => self.render(transaction, write),
        }
    }
}

fn render_key_value<W: Write>(
    renderer: &BasicRenderer,
    w: &mut W,
    kv: &Meta<'_>,
    indent: &str,
) -> Result<(), BasicRendererError> {
    for (key, value) in kv {
        write!(w, "{}{}: ", indent, key)?;
        renderer.render(value, w)?;
        writeln!(w)?;
    }
    Ok(())
}

impl<'a, W: Write> Renderer<&'a MetaValue<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, mv: &'a MetaValue<'_>, w: &mut W) -> Result<(), Self::Error> {
        match mv {
            MetaValue::Account(account) => self.render(account, w)?,
            MetaValue::Amount(amount) => self.render(amount, w)?,
            MetaValue::Bool(b) => write!(w, "{}", if *b { "TRUE" } else { "FALSE" })?,
            MetaValue::Currency(curr) => write!(w, "{}", curr)?,
            MetaValue::Date(date) => write!(w, "{}", date)?,
            MetaValue::Number(num) => write!(w, "{}", num)?,
            MetaValue::Tag(t) => write!(w, "#{}", t)?,
            MetaValue::Text(t) => write!(w, "\"{}\"", escape(t))?,
        }
        Ok(())
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<'a, W: Write> Renderer<&'a Open<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, open: &'a Open<'_>, write: &mut W) -> Result<(), Self::Error> {
        write!(write, "{} open ", open.date)?;
        self.render(&open.account, write)?;
        if !open.currencies.is_empty() {
            write!(write, " {}", open.currencies.join(","))?;
        }
        match open.booking {
            Some(Booking::Strict) => write!(write, r#" "STRICT""#)?,
            Some(Booking::None) => write!(write, r#" "NONE""#)?,
            Some(Booking::Average) => write!(write, r#" "AVERAGE""#)?,
            Some(Booking::Fifo) => write!(write, r#" "FIFO""#)?,
            Some(Booking::Lifo) => write!(write, r#" "LIFO""#)?,
            None => {}
        };
        writeln!(write)?;
        render_key_value(self, write, &open.meta, INDENT)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Close<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, close: &'a Close<'_>, write: &mut W) -> Result<(), Self::Error> {
        write!(write, "{} close ", close.date)?;
        self.render(&close.account, write)?;
        writeln!(write)?;
        render_key_value(self, write, &close.meta, INDENT)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Account<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, account: &'a Account<'_>, write: &mut W) -> Result<(), Self::Error> {
        write!(write, "{}", account)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Balance<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, balance: &'a Balance<'_>, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "{} balance ", balance.date)?;
        self.render(&balance.account, w)?;
        write!(w, "{}", INDENT)?;
        match &balance.tolerance {
            Some(tolerance) => write!(
                w,
                "{} ~ {} {}",
                balance.amount.num, tolerance, balance.amount.currency
            )?,
            None => self.render(&balance.amount, w)?,
        }
        writeln!(w)?;
        render_key_value(self, w, &balance.meta, INDENT)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Amount<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, amount: &'a Amount<'_>, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "{} {}", amount.num, amount.currency)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Commodity<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, commodity: &'a Commodity<'_>, w: &mut W) -> Result<(), Self::Error> {
        writeln!(w, "{} commodity {}", commodity.date, commodity.name)?;
        render_key_value(self, w, &commodity.meta, INDENT)
    }
}

impl<'a, W: Write> Renderer<&'a Price<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, price: &'a Price<'_>, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "{} price {} ", price.date, price.currency)?;
        self.render(&price.amount, w)?;
        writeln!(w)?;
        render_key_value(self, w, &price.meta, INDENT)
    }
}

impl<'a, W: Write> Renderer<&'a Transaction<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, transaction: &'a Transaction<'_>, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "{} {}", transaction.date, transaction.flag)?;
        if let Some(payee) = &transaction.payee {
            write!(w, " \"{}\"", escape(payee))?;
        }
        write!(w, " \"{}\"", escape(&transaction.narration))?;
        let mut tags: Vec<_> = transaction.tags.iter().collect();
        tags.sort();
        for tag in tags {
            write!(w, " #{}", tag)?;
        }
        let mut links: Vec<_> = transaction.links.iter().collect();
        links.sort();
        for link in links {
            write!(w, " ^{}", link)?;
        }
        writeln!(w)?;
        render_key_value(self, w, &transaction.meta, INDENT)?;
        for posting in &transaction.postings {
            self.render(posting, w)?;
        }
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Posting<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, posting: &'a Posting<'_>, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "{}", INDENT)?;
        if let Some(flag) = &posting.flag {
            write!(w, "{} ", flag)?;
        }
        self.render(&posting.account, w)?;
        if !posting.units.is_empty() {
            write!(w, "{}", INDENT)?;
            self.render(&posting.units, w)?;
        }
        if let Some(cost) = &posting.cost {
            write!(w, " ")?;
            self.render(cost, w)?;
        }
        match &posting.price {
            Some(PriceSpec::PerUnit(price)) => {
                write!(w, " @ ")?;
                self.render(price, w)?;
            }
            Some(PriceSpec::Total(price)) => {
                write!(w, " @@ ")?;
                self.render(price, w)?;
            }
            None => {}
        }
        writeln!(w)?;
        render_key_value(self, w, &posting.meta, "    ")
    }
}

impl<'a, W: Write> Renderer<&'a CostSpec<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, cost: &'a CostSpec<'_>, w: &mut W) -> Result<(), Self::Error> {
        let double_brackets = cost.number_total.is_some();
        if double_brackets {
            write!(w, "{{{{")?;
        } else {
            write!(w, "{{")?;
        }
        let mut first = true;

        if let (Some(cost), Some(currency)) =
            (&cost.number_total.or(cost.number_per), &cost.currency)
        {
            write!(w, "{} {}", cost, currency)?;
            first = false;
        }

        if let Some(date) = &cost.date {
            if !first {
                write!(w, ", ")?;
            }
            write!(w, "{}", date)?;
            first = false;
        }

        if let Some(label) = &cost.label {
            if !first {
                write!(w, ", ")?;
            }
            write!(w, "\"{}\"", escape(label))?;
            first = false;
        }

        if cost.merge_cost {
            if !first {
                write!(w, ", ")?;
            }
            write!(w, "*")?;
        }

        if double_brackets {
            write!(w, "}}}}")?;
        } else {
            write!(w, "}}")?;
        }
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a IncompleteAmount<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(
        &self,
        incomplete_amount: &'a IncompleteAmount<'_>,
        w: &mut W,
    ) -> Result<(), Self::Error> {
        match (&incomplete_amount.num, &incomplete_amount.currency) {
            (Some(num), Some(currency)) => write!(w, "{} {}", num, currency),
            (None, Some(currency)) => write!(w, "{}", currency),
            (Some(num), None) => write!(w, "{}", num),
            _ => write!(w, ""),
        }?;
        Ok(())
    }
}
