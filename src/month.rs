//! Parses the month names accepted by the statistics endpoints.

use time::Month;

use crate::Error;

/// Every month, in calendar order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// The month shown when the dashboard is opened without one.
pub const DEFAULT_MONTH: Month = Month::March;

/// Parse a full English month name, e.g. "March".
///
/// Case is ignored, as is whitespace around the name. Abbreviations and month
/// numbers are rejected.
///
/// # Errors
/// Returns [Error::InvalidMonth] with the text as given if it does not name a
/// month.
pub fn parse_month(text: &str) -> Result<Month, Error> {
    let name = text.trim();

    MONTHS
        .into_iter()
        .find(|month| month.to_string().eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::InvalidMonth(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::Error;

    use super::{MONTHS, parse_month};

    #[test]
    fn parses_every_month_name() {
        for month in MONTHS {
            assert_eq!(parse_month(&month.to_string()), Ok(month));
        }
    }

    #[test]
    fn ignores_case_and_whitespace() {
        assert_eq!(parse_month("march"), Ok(Month::March));
        assert_eq!(parse_month("DECEMBER"), Ok(Month::December));
        assert_eq!(parse_month("  jUnE\t"), Ok(Month::June));
    }

    #[test]
    fn rejects_misspelled_month() {
        assert_eq!(
            parse_month("Marchh"),
            Err(Error::InvalidMonth("Marchh".to_owned()))
        );
    }

    #[test]
    fn rejects_abbreviations_numbers_and_empty_text() {
        for text in ["Mar", "3", "03", "", "  "] {
            assert!(
                matches!(parse_month(text), Err(Error::InvalidMonth(_))),
                "want an error for {text:?}"
            );
        }
    }
}
