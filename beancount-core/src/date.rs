use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "chrono")]
use chrono::NaiveDate;

#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct Date<'a> {
    s: Cow<'a, str>,
}

impl<'a> Date<'a> {
    /// Wraps a `YYYY-MM-DD` string without validating it.
    pub fn from_str_unchecked(s: &'a str) -> Self {
        Date { s: Cow::Borrowed(s) }
    }
}

impl<'a> From<Cow<'a, str>> for Date<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Date { s }
    }
}

impl fmt::Display for Date<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.s)
    }
}

#[cfg(feature = "chrono")]
impl From<NaiveDate> for Date<'static> {
    fn from(d: NaiveDate) -> Self {
        Cow::from(d.format("%Y-%m-%d").to_string()).into()
    }
}

#[cfg(feature = "chrono")]
#[test]
fn test_date_from_chrono() {
    assert_eq!(
        Date::from(chrono::NaiveDate::from_ymd_opt(2020, 5, 5).unwrap()),
        Date::from_str_unchecked("2020-05-05")
    );
}
