//! Print the salary and remote-work reports.
//!
//! Usage:
//!   cargo run --bin query-report -- [--top 5] [--out reports/salaries.txt]

use std::env;

use job_catalog_lib::config::Config;
use job_catalog_lib::db::DbPool;
use job_catalog_lib::services::SalaryReport;

const DEFAULT_TOP: usize = 5;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut top = DEFAULT_TOP;
    let mut out: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--top" | "-t" => match iter.next().map(|v| v.parse::<usize>()) {
                Some(Ok(n)) if n > 0 => top = n,
                _ => {
                    eprintln!("Error: --top expects a positive number");
                    std::process::exit(1);
                }
            },
            "--out" | "-o" => out = iter.next().cloned(),
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
    }

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

    let report = match SalaryReport::load(&pool, top).await {
        Ok(r) => r.render(),
        Err(e) => {
            eprintln!("Error running queries: {}", e);
            std::process::exit(1);
        }
    };

    print!("{}", report);

    if let Some(path) = out {
        if let Err(e) = std::fs::write(&path, &report) {
            eprintln!("Error writing {}: {}", path, e);
            std::process::exit(1);
        }
        println!();
        println!("Results have been saved to {}", path);
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: query-report [--top <n>] [--out <path>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --top, -t   Number of job titles in the salary ranking (default: 5)");
    eprintln!("  --out, -o   Also write the report to this file");
    eprintln!("  --help, -h  Show this help");
    eprintln!();
}
