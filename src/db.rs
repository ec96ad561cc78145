//! Sets up the SQLite database used as the transaction store.

use rusqlite::{
    Connection, Transaction as SqlTransaction, TransactionBehavior, functions::FunctionFlags,
};

use crate::{Error, transaction::create_transaction_table};

/// The SQL function that lowercases text the same way as [str::to_lowercase].
///
/// SQLite's built-in `lower()` only folds ASCII letters.
pub const UNICODE_LOWER_FUNCTION: &str = "unicode_lower";

/// Create the tables for the application's data if they do not exist yet and
/// register the SQL functions the queries rely on.
///
/// Safe to call on a database that has already been initialized. Functions
/// only live as long as `connection`, so call this for every new connection.
///
/// # Errors
/// Returns an [Error::SqlError] if a table or function cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    register_unicode_lower(connection)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

fn register_unicode_lower(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        UNICODE_LOWER_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let text = context.get::<Option<String>>(0)?;

            Ok(text.map(|text| text.to_lowercase()))
        },
    )
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::transaction::{
        SearchFilter, Transaction, count_transactions, replace_all_transactions,
    };

    use super::{UNICODE_LOWER_FUNCTION, initialize};

    #[test]
    fn creates_empty_transaction_table() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();

        assert_eq!(count_transactions(&SearchFilter::All, &conn), Ok(0));
    }

    #[test]
    fn initialize_twice_keeps_data() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        replace_all_transactions(
            &[Transaction::build(1, 1.0, date!(2022 - 01 - 01)).finalize()],
            &conn,
        )
        .unwrap();

        initialize(&conn).unwrap();

        assert_eq!(count_transactions(&SearchFilter::All, &conn), Ok(1));
    }

    #[test]
    fn unicode_lower_folds_non_ascii_letters() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let got: String = conn
            .query_row(
                &format!("SELECT {UNICODE_LOWER_FUNCTION}('Éclair ÜBER Stand')"),
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(got, "éclair über stand");
    }
}
