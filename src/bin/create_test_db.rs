use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::{Connection, params};

use money_flow::initialize_db;

/// A utility for creating a test database for the money_flow web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of cash flow records to create.
    #[arg(long, short, default_value_t = 25)]
    records: u32,
}

const STATUSES: &[&str] = &["Business", "Personal"];

/// Each type with its categories, and each category with its subcategories.
const HIERARCHY: &[(&str, &[(&str, &[&str])])] = &[
    (
        "Income",
        &[
            ("Salary", &["Wages", "Bonus"]),
            ("Investments", &["Dividends", "Interest"]),
        ],
    ),
    (
        "Expense",
        &[
            ("Food", &["Groceries", "Eating Out"]),
            ("Housing", &["Rent", "Utilities"]),
            ("Transport", &["Fuel", "Public Transport"]),
        ],
    ),
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
    let mut conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let transaction = conn.transaction()?;

    println!("Creating statuses, types, categories and subcategories...");

    let mut status_ids = Vec::new();
    for status in STATUSES {
        transaction.execute("INSERT INTO status (name) VALUES (?1)", (status,))?;
        status_ids.push(transaction.last_insert_rowid());
    }

    // (type_id, category_id, subcategory_id) for every subcategory.
    let mut classifications = Vec::new();
    for (flow_type, categories) in HIERARCHY {
        transaction.execute("INSERT INTO flow_type (name) VALUES (?1)", (flow_type,))?;
        let type_id = transaction.last_insert_rowid();

        for (category, subcategories) in *categories {
            transaction.execute(
                "INSERT INTO category (name, type_id) VALUES (?1, ?2)",
                (category, type_id),
            )?;
            let category_id = transaction.last_insert_rowid();

            for subcategory in *subcategories {
                transaction.execute(
                    "INSERT INTO subcategory (name, category_id) VALUES (?1, ?2)",
                    (subcategory, category_id),
                )?;
                classifications.push((type_id, category_id, transaction.last_insert_rowid()));
            }
        }
    }

    println!("Creating {} cash flow records...", args.records);

    for i in 0..args.records as usize {
        let status_id = status_ids[i % status_ids.len()];
        let (type_id, category_id, subcategory_id) = classifications[i % classifications.len()];
        let date_created = format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1);
        let amount_cents = 500 + (i as i64 * 1_337) % 100_000;
        let comment = (i % 3 == 0).then(|| format!("Test record {}", i + 1));

        transaction.execute(
            "INSERT INTO cash_flow
                (date_created, status_id, type_id, category_id, subcategory_id, amount, comment)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                date_created,
                status_id,
                type_id,
                category_id,
                subcategory_id,
                amount_cents,
                comment
            ],
        )?;
    }

    transaction.commit()?;

    println!("Success!");

    Ok(())
}
