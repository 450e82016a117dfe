//! Issue an API key for the REST write endpoints.
//!
//! Usage:
//!   cargo run --bin generate-api-key -- --name "Nightly import" --role contributor --expires-in 90d

use std::env;

use job_catalog_lib::config::Config;
use job_catalog_lib::db::DbPool;
use job_catalog_lib::models::ApiKeyRole;
use job_catalog_lib::services::api_key;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut name: Option<String> = None;
    let mut role = "contributor".to_string();
    let mut expires_in: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--name" | "-n" => name = iter.next().cloned(),
            "--role" | "-r" => {
                if let Some(value) = iter.next() {
                    role = value.clone();
                }
            }
            "--expires-in" | "-e" => expires_in = iter.next().cloned(),
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

    let Some(name) = name else {
        eprintln!("Error: --name is required");
        print_usage();
        std::process::exit(1);
    };

    let Some(role) = ApiKeyRole::parse(&role) else {
        eprintln!(
            "Error: Invalid role '{}'. Must be: admin, contributor, viewer",
            role
        );
        std::process::exit(1);
    };

    if let Some(ref raw) = expires_in
        && api_key::parse_duration(raw).is_none()
    {
        eprintln!("Error: Invalid duration '{}'. Use e.g. 30d or 1y", raw);
        std::process::exit(1);
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

    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    let (full_key, key) =
        match api_key::create_key(&pool, &name, role, expires_in.as_deref()).await {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Error generating key: {}", e);
                std::process::exit(1);
            }
        };

    println!();
    println!("================================================================");
    println!("  API Key Generated");
    println!("================================================================");
    println!();
    println!("  ID:      {}", key.id);
    println!("  Name:    {}", key.name);
    println!("  Role:    {}", key.role);
    println!("  Prefix:  {}", key.key_prefix);
    match key.expires_at {
        Some(expires) => println!("  Expires: {}", expires.to_rfc3339()),
        None => println!("  Expires: Never"),
    }
    println!();
    println!("  Key:     {}", full_key);
    println!();
    println!("  Save this key now. Only its hash is stored.");
    println!("================================================================");
    println!();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: generate-api-key --name <name> [--role <role>] [--expires-in <duration>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --name, -n        Name for the API key (required)");
    eprintln!("  --role, -r        Role: admin, contributor, viewer (default: contributor)");
    eprintln!("  --expires-in, -e  Expiration: 30d, 365d, 1y, etc. (default: never)");
    eprintln!("  --help, -h        Show this help");
    eprintln!();
}
