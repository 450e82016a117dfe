//! CSV import of job records.
//!
//! Rows are read and written one at a time, each in its own transaction:
//! referenced catalog rows are fetched or created, then the job record is
//! inserted. A duplicate (title, year, company location) keeps the catalog
//! rows created for it and is counted as skipped; any other row failure rolls
//! the row back and is counted as failed. Earlier rows are never affected.

use std::fmt;
use std::io::Read;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::{DbPool, catalog, commit, job_records};
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::{JobRecordInput, NewJobRecord, validation};

/// Columns every import file must carry.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "job_title",
    "employee_residence",
    "company_location",
    "experience_level",
    "employment_type",
    "work_year",
    "salary",
    "salary_currency",
    "salary_in_usd",
    "remote_ratio",
    "company_size",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub job_titles_created: u64,
    pub locations_created: u64,
    pub job_records_created: u64,
    pub duplicates_skipped: u64,
    pub rows_failed: u64,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Import Summary ---")?;
        writeln!(f, "Job Titles created: {}", self.job_titles_created)?;
        writeln!(f, "Locations created: {}", self.locations_created)?;
        writeln!(f, "Job Records created: {}", self.job_records_created)?;
        writeln!(f, "Duplicates skipped: {}", self.duplicates_skipped)?;
        write!(f, "Rows failed: {}", self.rows_failed)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CsvRow {
    job_title: String,
    employee_residence: String,
    company_location: String,
    experience_level: String,
    employment_type: String,
    work_year: String,
    salary: String,
    salary_currency: String,
    salary_in_usd: String,
    remote_ratio: String,
    company_size: String,
}

/// Numeric columns parsed ahead of any write.
#[derive(Debug, Clone)]
struct ParsedRow {
    raw: CsvRow,
    work_year: i32,
    salary: Decimal,
    salary_in_usd: Decimal,
    remote_ratio: i32,
}

impl CsvRow {
    fn parse(self) -> Result<ParsedRow, String> {
        for (column, value) in [
            ("job_title", &self.job_title),
            ("employee_residence", &self.employee_residence),
            ("company_location", &self.company_location),
            ("experience_level", &self.experience_level),
            ("employment_type", &self.employment_type),
        ] {
            if value.is_empty() {
                return Err(format!("{} is empty", column));
            }
        }
        let work_year = self
            .work_year
            .parse::<i32>()
            .map_err(|_| format!("work_year {:?} is not an integer", self.work_year))?;
        let remote_ratio = self
            .remote_ratio
            .parse::<i32>()
            .map_err(|_| format!("remote_ratio {:?} is not an integer", self.remote_ratio))?;
        let salary = parse_amount("salary", &self.salary)?;
        let salary_in_usd = parse_amount("salary_in_usd", &self.salary_in_usd)?;
        Ok(ParsedRow {
            raw: self,
            work_year,
            salary,
            salary_in_usd,
            remote_ratio,
        })
    }
}

/// Amounts are taken as written; one that does not fit the column fails the row.
fn parse_amount(column: &str, raw: &str) -> Result<Decimal, String> {
    let value = raw
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| format!("{} {:?} is not a number", column, raw))?;
    let mut errors = FieldErrors::new();
    validation::check_amount(&mut errors, column, value);
    match errors.get(column) {
        Some(messages) => Err(format!("{} {:?}: {}", column, raw, messages.join(" "))),
        None => Ok(value),
    }
}

/// Outcome of one committed row.
#[derive(Debug, Default)]
struct RowOutcome {
    job_titles_created: u64,
    locations_created: u64,
    duplicate: bool,
}

/// Import job records from CSV text with a header row.
///
/// Fails only when the header is missing columns or the input cannot be read.
pub async fn import_jobs<R: Read>(pool: &DbPool, reader: R) -> AppResult<ImportSummary> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::InvalidInput(format!("Unreadable CSV header: {}", e)))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "CSV is missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut summary = ImportSummary::default();
    for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 2;
        let parsed = match record {
            Err(e) if e.is_io_error() => {
                return Err(AppError::InvalidInput(format!("Failed to read CSV: {}", e)));
            }
            Err(e) => Err(e.to_string()),
            Ok(row) => row.parse(),
        };
        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(reason) => {
                warn!(line, %reason, "Rejected CSV row");
                summary.rows_failed += 1;
                continue;
            }
        };

        match import_row(pool, &parsed).await {
            Ok(outcome) => {
                summary.job_titles_created += outcome.job_titles_created;
                summary.locations_created += outcome.locations_created;
                if outcome.duplicate {
                    warn!(
                        line,
                        job_title = %parsed.raw.job_title,
                        work_year = parsed.work_year,
                        company_location = %parsed.raw.company_location,
                        "Skipped duplicate job record"
                    );
                    summary.duplicates_skipped += 1;
                } else {
                    summary.job_records_created += 1;
                }
            }
            Err(e) => {
                warn!(line, error = %e, "Failed to import CSV row");
                summary.rows_failed += 1;
            }
        }
    }

    info!(
        job_titles_created = summary.job_titles_created,
        locations_created = summary.locations_created,
        job_records_created = summary.job_records_created,
        duplicates_skipped = summary.duplicates_skipped,
        rows_failed = summary.rows_failed,
        "CSV import finished"
    );
    Ok(summary)
}

async fn import_row(pool: &DbPool, row: &ParsedRow) -> AppResult<RowOutcome> {
    let raw = &row.raw;
    let mut outcome = RowOutcome::default();
    let txn = pool.begin().await?;

    let (job_title, created) = catalog::get_or_create_job_title(&txn, &raw.job_title).await?;
    if created {
        info!(name = %job_title.name, "Created job title");
        outcome.job_titles_created += 1;
    }

    let (residence, created) = catalog::get_or_create_location(&txn, &raw.employee_residence).await?;
    if created {
        info!(country_code = %residence.country_code, "Created location");
        outcome.locations_created += 1;
    }
    let (company_location, created) =
        catalog::get_or_create_location(&txn, &raw.company_location).await?;
    if created {
        info!(country_code = %company_location.country_code, "Created location");
        outcome.locations_created += 1;
    }

    let (experience, _) = catalog::get_or_create_contract(
        &txn,
        &raw.experience_level,
        &format!("Experience Level: {}", raw.experience_level),
    )
    .await?;
    let (employment, _) = catalog::get_or_create_contract(
        &txn,
        &raw.employment_type,
        &format!("Employment Type: {}", raw.employment_type),
    )
    .await?;

    let new: NewJobRecord = JobRecordInput {
        work_year: row.work_year,
        experience_level: experience.type_code,
        employment_type: employment.type_code,
        job_title: job_title.id,
        salary: row.salary,
        salary_currency: raw.salary_currency.clone(),
        salary_in_usd: row.salary_in_usd,
        employee_residence: residence.id,
        remote_ratio: row.remote_ratio,
        company_location: company_location.id,
        company_size: raw.company_size.clone(),
        skills: Vec::new(),
        industry: None,
        candidate: None,
    }
    .validate()?;

    match job_records::insert_record(&txn, &new).await {
        Ok(id) => info!(job_record_id = id, "Created job record"),
        Err(AppError::Conflict(_)) => outcome.duplicate = true,
        Err(e) => return Err(e),
    }

    commit(txn).await?;
    Ok(outcome)
}
