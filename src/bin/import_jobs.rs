//! Load job records from a salaries CSV.
//!
//! Usage:
//!   cargo run --bin import-jobs -- data/ds_salaries.csv
//!
//! Every row runs in its own transaction; duplicates and invalid rows are
//! skipped and counted.

use std::env;
use std::fs::File;
use std::io::BufReader;

use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

use job_catalog_lib::config::Config;
use job_catalog_lib::db::DbPool;
use job_catalog_lib::services::import::REQUIRED_COLUMNS;
use job_catalog_lib::services::import_jobs;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let path = match env::args().nth(1) {
        Some(arg) if arg == "--help" || arg == "-h" => {
            print_usage();
            return;
        }
        Some(path) => path,
        None => {
            eprintln!("Error: CSV path is required");
            print_usage();
            std::process::exit(1);
        }
    };

    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    match import_jobs(&pool, BufReader::new(file)).await {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            error!(path = %path, error = %e, "Import aborted");
            eprintln!("Error importing {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: import-jobs <path-to-csv>");
    eprintln!();
    eprintln!("Required columns: {}", REQUIRED_COLUMNS.join(", "));
    eprintln!();
}
