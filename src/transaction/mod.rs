//! Product sale transactions.
//!
//! This module contains everything related to the stored transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for replacing and querying the stored set
//! - The JSON endpoint for searching transactions a page at a time

mod core;
mod query;
mod search_endpoint;

pub use core::{
    Transaction, TransactionBuilder, create_transaction_table, replace_all_transactions,
};
pub use query::{SearchFilter, count_transactions, get_transactions_in_month, query_transactions};
pub use search_endpoint::{SearchResults, get_transactions_endpoint, search_transactions};
