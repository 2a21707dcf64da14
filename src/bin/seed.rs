use std::{error::Error, fs, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use fraud_watch::{
    PasswordHash, Role, ValidatedPassword, count_transactions, import_transactions, initialize_db,
    parse_transactions_csv, upsert_user,
};

const ADMIN_NAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@org.com";
const ADMIN_PASSWORD: &str = "password123";

/// A utility for setting up the fraud_watch database.
///
/// Creates the tables, adds the admin account and optionally imports
/// transactions from a CSV file. Running it again is safe: an existing admin
/// account, including its password, is left as it is.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. Created if it does not exist.
    #[arg(long)]
    db_path: String,

    /// A CSV file of transactions to import.
    #[arg(long)]
    csv: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);

    match db_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Database path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;
    println!("Initialized database at {db_path:#?}");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(ADMIN_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;
    upsert_user(
        ADMIN_NAME,
        ADMIN_EMAIL,
        password_hash,
        Role::Admin,
        &connection,
    )?;
    println!("Admin account ready: {ADMIN_EMAIL}");

    if let Some(csv_path) = args.csv {
        let text = fs::read_to_string(&csv_path)?;
        let transactions = match parse_transactions_csv(&text) {
            Ok(transactions) => transactions,
            Err(error) => {
                eprintln!("Could not import {csv_path}: {error}");
                exit(1);
            }
        };

        let imported = import_transactions(transactions, &connection)?;
        println!("Imported {imported} transactions from {csv_path}");
    }

    println!(
        "The database holds {} transactions",
        count_transactions(&connection)?
    );

    Ok(())
}
