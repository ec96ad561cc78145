use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use sales_dashboard::{Transaction, initialize_db, replace_all_transactions};

/// A utility for creating a test database for the sales_dashboard server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many transactions to create for each month.
    #[arg(long, default_value_t = 5)]
    per_month: u8,
}

const CATEGORIES: [&str; 4] = [
    "electronics",
    "jewelery",
    "men's clothing",
    "women's clothing",
];

const PRODUCTS: [&str; 6] = [
    "Backpack",
    "Cotton Jacket",
    "Gold Ring",
    "Hard Drive",
    "Rain Coat",
    "Monitor",
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test transactions...");

    let transactions = sample_transactions(args.per_month)?;
    let count = replace_all_transactions(&transactions, &conn)?;

    println!("Created {count} transactions. Success!");

    Ok(())
}

/// Spread `per_month` transactions over every month of 2021 and 2022.
///
/// The values only depend on the position of each transaction, so the same
/// arguments always produce the same database.
fn sample_transactions(per_month: u8) -> Result<Vec<Transaction>, Box<dyn Error>> {
    let mut transactions = Vec::new();
    let mut id = 1;

    for month_number in 1..=12u8 {
        let month = Month::try_from(month_number)?;

        for index in 0..per_month {
            let seq = id as usize;
            let year = if index % 2 == 0 { 2021 } else { 2022 };
            let day = 1 + (seq * 7 % 28) as u8;
            let price = ((seq * 37) % 1000) as f64 + 0.99;
            let product = PRODUCTS[seq % PRODUCTS.len()];

            transactions.push(
                Transaction::build(id, price, Date::from_calendar_date(year, month, day)?)
                    .title(&format!("{product} #{id}"))
                    .description(&format!("A sample {} sold in {month}", product.to_lowercase()))
                    .category(CATEGORIES[seq % CATEGORIES.len()])
                    .sold(seq % 3 != 0)
                    .finalize(),
            );

            id += 1;
        }
    }

    Ok(transactions)
}
