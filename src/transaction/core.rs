//! Defines the transaction record and the queries that load and replace it.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// A product sale, one row of the seeded dataset.
///
/// Records are never edited after they are stored. Reseeding replaces the
/// whole set. To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID assigned by the seed source.
    ///
    /// This is not guaranteed to be unique, the source may reuse IDs across
    /// reseeds.
    pub id: i64,
    /// The product name.
    pub title: String,
    /// A longer text describing the product.
    pub description: String,
    /// The sale price, never negative.
    pub price: f64,
    /// The calendar date of the sale.
    pub date_of_sale: Date,
    /// A short label grouping similar products, e.g. "electronics".
    pub category: String,
    /// Whether the product was actually sold.
    pub sold: bool,
    /// The URL of a product image, if the source provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(id: i64, price: f64, date_of_sale: Date) -> TransactionBuilder {
        TransactionBuilder {
            id,
            price,
            date_of_sale,
            title: String::new(),
            description: String::new(),
            category: String::new(),
            sold: false,
            image: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Only the ID, price and date are required. The text fields default to empty
/// strings and `sold` defaults to `false`.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::Transaction;
///
/// let transaction = Transaction::build(1, 329.85, date!(2021 - 11 - 27))
///     .title("Fjallraven Backpack")
///     .category("men's clothing")
///     .sold(true)
///     .finalize();
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    id: i64,
    price: f64,
    date_of_sale: Date,
    title: String,
    description: String,
    category: String,
    sold: bool,
    image: Option<String>,
}

impl TransactionBuilder {
    /// Set the product name.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    /// Set the product description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category label.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Set the product image URL.
    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Create the [Transaction].
    pub fn finalize(self) -> Transaction {
        Transaction {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            date_of_sale: self.date_of_sale,
            category: self.category,
            sold: self.sold,
            image: self.image,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected by every transaction query, in the order expected by
/// [map_transaction_row].
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, description, price, date_of_sale, category, sold, image";

/// Delete every stored transaction and insert `transactions` in their place.
///
/// Both steps run in a single SQL transaction, so readers either see the old
/// set or the new one. The insertion order of `transactions` is the order
/// that queries return them in.
///
/// Returns the number of transactions inserted.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error, in
/// which case the previously stored transactions are kept.
pub fn replace_all_transactions(
    transactions: &[Transaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    tx.execute("DELETE FROM product_transaction", ())?;

    let mut stmt = tx.prepare(
        "INSERT INTO product_transaction
            (id, title, description, price, date_of_sale, category, sold, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    for transaction in transactions {
        stmt.execute((
            transaction.id,
            &transaction.title,
            &transaction.description,
            transaction.price,
            transaction.date_of_sale,
            &transaction.category,
            transaction.sold,
            &transaction.image,
        ))?;
    }

    drop(stmt);

    tx.commit()?;

    tracing::info!("Replaced stored transactions with {} records", transactions.len());

    Ok(transactions.len())
}

/// Create the transaction table in the database.
///
/// `row_id` only records insertion order, the source `id` may repeat.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product_transaction (
                row_id INTEGER PRIMARY KEY AUTOINCREMENT,
                id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0),
                date_of_sale TEXT NOT NULL,
                category TEXT NOT NULL,
                sold INTEGER NOT NULL,
                image TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must contain the columns in [TRANSACTION_COLUMNS].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        date_of_sale: row.get(4)?,
        category: row.get(5)?,
        sold: row.get(6)?,
        image: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
