//! Builds the search filter for the transaction listing and runs the queries
//! behind it.

use rusqlite::{Connection, params_from_iter, types::Value};
use time::Month;

use crate::{Error, db::UNICODE_LOWER_FUNCTION, pagination::PageWindow};

use super::core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row};

/// Selects which transactions a listing query returns.
///
/// Build one from the raw search text with [SearchFilter::new].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFilter {
    /// Match every transaction.
    All,
    /// Match transactions whose title or description contains `text`
    /// (ignoring case), or whose price equals `price` exactly.
    Matching {
        /// The lowercase search text.
        text: String,
        /// The search text as a number, if it is one.
        price: Option<f64>,
    },
}

impl SearchFilter {
    /// Create a filter from free text.
    ///
    /// Empty or whitespace-only text matches everything. Otherwise the text is
    /// matched as given, so "pack " only matches where a space follows "pack".
    /// Text that parses as a finite number, ignoring surrounding whitespace,
    /// also matches prices equal to that number. Prices are never matched as
    /// text, so "99" does not match a price of 199.
    pub fn new(search: &str) -> Self {
        let trimmed = search.trim();

        if trimmed.is_empty() {
            return Self::All;
        }

        Self::Matching {
            text: search.to_lowercase(),
            price: trimmed.parse::<f64>().ok().filter(|price| price.is_finite()),
        }
    }

    /// The SQL `WHERE` clause (empty for [SearchFilter::All]) and its parameters.
    ///
    /// `instr` is used instead of `LIKE` so that `%` and `_` in the search text
    /// are matched literally. The columns are folded with
    /// [UNICODE_LOWER_FUNCTION] so they are compared with the text the same way
    /// it was lowercased.
    fn where_clause(&self) -> (String, Vec<Value>) {
        match self {
            SearchFilter::All => (String::new(), Vec::new()),
            SearchFilter::Matching { text, price } => {
                let mut conditions = vec![
                    format!("instr({UNICODE_LOWER_FUNCTION}(title), ?1) > 0"),
                    format!("instr({UNICODE_LOWER_FUNCTION}(description), ?1) > 0"),
                ];
                let mut parameters = vec![Value::Text(text.clone())];

                if let Some(price) = price {
                    conditions.push("price = ?2".to_owned());
                    parameters.push(Value::Real(*price));
                }

                (format!("WHERE {}", conditions.join(" OR ")), parameters)
            }
        }
    }
}

/// Get one page of the transactions matching `filter`, in insertion order.
///
/// A page past the last match is empty rather than an error.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn query_transactions(
    filter: &SearchFilter,
    window: PageWindow,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (where_clause, parameters) = filter.where_clause();
    let limit = i64::try_from(window.per_page).unwrap_or(i64::MAX);
    let offset = i64::try_from(window.offset()).unwrap_or(i64::MAX);

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM product_transaction {where_clause} \
        ORDER BY row_id ASC LIMIT {limit} OFFSET {offset}"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(parameters), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Count the transactions matching `filter`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_transactions(filter: &SearchFilter, connection: &Connection) -> Result<u64, Error> {
    let (where_clause, parameters) = filter.where_clause();
    let query = format!("SELECT COUNT(row_id) FROM product_transaction {where_clause}");

    let count: i64 = connection.query_row(&query, params_from_iter(parameters), |row| {
        row.get(0)
    })?;

    Ok(count.max(0) as u64)
}

/// Get every transaction sold in `month`, in any year, in insertion order.
///
/// The month is taken from the stored calendar date, not from a text match on
/// the date string.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_transactions_in_month(
    month: Month,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM product_transaction \
            WHERE CAST(strftime('%m', date_of_sale) AS INTEGER) = ?1 \
            ORDER BY row_id ASC"
        ))?
        .query_map([month as u8], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        db::initialize,
        pagination::PageWindow,
        transaction::{Transaction, replace_all_transactions},
    };

    use super::{SearchFilter, count_transactions, get_transactions_in_month, query_transactions};

    fn get_test_connection(transactions: &[Transaction]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        replace_all_transactions(transactions, &conn).unwrap();
        conn
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            Transaction::build(1, 109.95, date!(2021 - 03 - 27))
                .title("Fjallraven Backpack")
                .description("Your perfect pack for everyday use")
                .category("men's clothing")
                .finalize(),
            Transaction::build(2, 22.3, date!(2022 - 10 - 27))
                .title("Mens Casual T-Shirt")
                .description("Slim-fitting style")
                .category("men's clothing")
                .finalize(),
            Transaction::build(3, 99.5, date!(2021 - 03 - 01))
                .title("Solid Gold Bracelet")
                .description("Satisfaction guaranteed")
                .category("jewelery")
                .finalize(),
            Transaction::build(4, 199.0, date!(2022 - 01 - 05))
                .title("WD 2TB Hard Drive")
                .description("USB 3.0 and 100% compatible")
                .category("electronics")
                .finalize(),
        ]
    }

    fn first_page() -> PageWindow {
        PageWindow {
            page: 1,
            per_page: 10,
        }
    }

    fn ids(transactions: &[Transaction]) -> Vec<i64> {
        transactions.iter().map(|transaction| transaction.id).collect()
    }

    #[test]
    fn all_filter_returns_everything_in_insertion_order() {
        let conn = get_test_connection(&sample_transactions());

        let got = query_transactions(&SearchFilter::All, first_page(), &conn).unwrap();
        let count = count_transactions(&SearchFilter::All, &conn).unwrap();

        assert_eq!(ids(&got), vec![1, 2, 3, 4]);
        assert_eq!(count, 4);
    }

    #[test]
    fn matches_title_case_insensitively() {
        let conn = get_test_connection(&sample_transactions());
        let filter = SearchFilter::new("BACKPACK");

        let got = query_transactions(&filter, first_page(), &conn).unwrap();

        assert_eq!(ids(&got), vec![1]);
    }

    #[test]
    fn matches_non_ascii_title_in_any_case() {
        let conn = get_test_connection(&[
            Transaction::build(1, 10.0, date!(2022 - 03 - 01))
                .title("Éclair Stand")
                .finalize(),
            Transaction::build(2, 20.0, date!(2022 - 03 - 02))
                .title("Plain Stand")
                .description("ÜBERGRÖSSE")
                .finalize(),
        ]);

        for search in ["Éclair", "éCLAIR", "ÉCLAIR STAND"] {
            let got = query_transactions(&SearchFilter::new(search), first_page(), &conn).unwrap();
            assert_eq!(ids(&got), vec![1], "search {search:?}");
        }

        let got =
            query_transactions(&SearchFilter::new("Übergrösse"), first_page(), &conn).unwrap();
        assert_eq!(ids(&got), vec![2]);
    }

    #[test]
    fn trailing_space_is_part_of_the_search() {
        let conn = get_test_connection(&sample_transactions());

        let title_end = query_transactions(&SearchFilter::new("backpack "), first_page(), &conn)
            .unwrap();
        let inside_description =
            query_transactions(&SearchFilter::new("pack "), first_page(), &conn).unwrap();

        assert!(title_end.is_empty(), "want no matches, got {title_end:?}");
        assert_eq!(ids(&inside_description), vec![1]);
    }

    #[test]
    fn matches_description() {
        let conn = get_test_connection(&sample_transactions());
        let filter = SearchFilter::new("slim");

        let got = query_transactions(&filter, first_page(), &conn).unwrap();

        assert_eq!(ids(&got), vec![2]);
    }

    #[test]
    fn matches_exact_price_only() {
        let conn = get_test_connection(&sample_transactions());
        let filter = SearchFilter::new("99.5");

        let got = query_transactions(&filter, first_page(), &conn).unwrap();
        let count = count_transactions(&filter, &conn).unwrap();

        assert_eq!(ids(&got), vec![3]);
        assert_eq!(count, 1);
    }

    #[test]
    fn price_is_not_matched_as_text() {
        let conn = get_test_connection(&sample_transactions());
        let filter = SearchFilter::new("99");

        let got = query_transactions(&filter, first_page(), &conn).unwrap();

        assert!(got.is_empty(), "want no matches, got {got:?}");
    }

    #[test]
    fn wildcard_characters_are_literal() {
        let conn = get_test_connection(&sample_transactions());

        let percent = query_transactions(&SearchFilter::new("100%"), first_page(), &conn).unwrap();
        let underscore = query_transactions(&SearchFilter::new("_"), first_page(), &conn).unwrap();

        assert_eq!(ids(&percent), vec![4]);
        assert!(underscore.is_empty(), "want no matches, got {underscore:?}");
    }

    #[test]
    fn no_match_returns_empty_page_and_zero_total() {
        let conn = get_test_connection(&sample_transactions());
        let filter = SearchFilter::new("submarine");

        let got = query_transactions(&filter, first_page(), &conn).unwrap();
        let count = count_transactions(&filter, &conn).unwrap();

        assert!(got.is_empty());
        assert_eq!(count, 0);
    }

    #[test]
    fn pages_slice_the_matches() {
        let conn = get_test_connection(&sample_transactions());
        let window = |page| PageWindow { page, per_page: 3 };

        let first = query_transactions(&SearchFilter::All, window(1), &conn).unwrap();
        let second = query_transactions(&SearchFilter::All, window(2), &conn).unwrap();
        let past_end = query_transactions(&SearchFilter::All, window(3), &conn).unwrap();

        assert_eq!(ids(&first), vec![1, 2, 3]);
        assert_eq!(ids(&second), vec![4]);
        assert!(past_end.is_empty());
        assert_eq!(count_transactions(&SearchFilter::All, &conn).unwrap(), 4);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let conn = get_test_connection(&sample_transactions());
        let window = PageWindow {
            page: u64::MAX,
            per_page: u64::MAX,
        };

        let got = query_transactions(&SearchFilter::All, window, &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn month_filter_ignores_year() {
        let conn = get_test_connection(&sample_transactions());

        let march = get_transactions_in_month(Month::March, &conn).unwrap();
        let october = get_transactions_in_month(Month::October, &conn).unwrap();
        let june = get_transactions_in_month(Month::June, &conn).unwrap();

        assert_eq!(ids(&march), vec![1, 3]);
        assert_eq!(ids(&october), vec![2]);
        assert!(june.is_empty());
    }

    #[test]
    fn month_filter_does_not_match_day_of_month() {
        // The day 10 and month 10 must not be confused.
        let conn = get_test_connection(&[
            Transaction::build(1, 1.0, date!(2022 - 01 - 10)).finalize(),
            Transaction::build(2, 1.0, date!(2022 - 10 - 01)).finalize(),
        ]);

        let october = get_transactions_in_month(Month::October, &conn).unwrap();

        assert_eq!(ids(&october), vec![2]);
    }
}
