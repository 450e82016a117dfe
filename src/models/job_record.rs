//! Job record domain models and DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::catalog::{Candidate, Contract, Industry, Skill};
use super::validation;
use crate::error::{AppError, AppResult, FieldErrors};

/// Salary currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Usd => "US Dollar",
            Self::Eur => "Euro",
            Self::Gbp => "British Pound",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            "GBP" => Some(Self::Gbp),
            _ => None,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Company size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CompanySize {
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
}

impl CompanySize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "S",
            Self::Medium => "M",
            Self::Large => "L",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "S" => Some(Self::Small),
            "M" => Some(Self::Medium),
            "L" => Some(Self::Large),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompanySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job record as returned by the API, with referenced catalog rows nested.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobRecordDetail {
    pub id: i32,
    /// Job title id
    pub job_title: i32,
    pub job_title_name: String,
    pub work_year: i32,
    /// Company location id
    pub company_location: i32,
    pub company_location_code: String,
    pub company_size: String,
    #[schema(value_type = String)]
    pub salary: Decimal,
    pub salary_currency: String,
    #[schema(value_type = String)]
    pub salary_in_usd: Decimal,
    /// Employee residence id
    pub employee_residence: i32,
    pub employee_residence_code: String,
    pub remote_ratio: i32,
    /// Experience level code
    pub experience_level: String,
    /// Employment type code
    pub employment_type: String,
    pub industry: Option<Industry>,
    pub candidate: Option<Candidate>,
    pub skills: Vec<Skill>,
    pub contract_experience: Contract,
    pub contract_employment: Contract,
    pub created_at: DateTime<Utc>,
}

impl JobRecordDetail {
    /// Writable fields of this record, as a full payload.
    pub fn to_input(&self) -> JobRecordInput {
        JobRecordInput {
            work_year: self.work_year,
            experience_level: self.experience_level.clone(),
            employment_type: self.employment_type.clone(),
            job_title: self.job_title,
            salary: self.salary,
            salary_currency: self.salary_currency.clone(),
            salary_in_usd: self.salary_in_usd,
            employee_residence: self.employee_residence,
            remote_ratio: self.remote_ratio,
            company_location: self.company_location,
            company_size: self.company_size.clone(),
            skills: self.skills.iter().map(|s| s.id).collect(),
            industry: self.industry.as_ref().map(|i| i.id),
            candidate: self.candidate.as_ref().map(|c| c.id),
        }
    }
}

/// `"<title> (<year>) - <salary> USD"`
pub fn display_name(job_title: &str, work_year: i32, salary_in_usd: Decimal) -> String {
    format!("{} ({}) - {} USD", job_title, work_year, salary_in_usd)
}

/// Full job record payload (POST/PUT).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct JobRecordInput {
    pub work_year: i32,
    pub experience_level: String,
    pub employment_type: String,
    pub job_title: i32,
    #[schema(value_type = String)]
    pub salary: Decimal,
    pub salary_currency: String,
    #[schema(value_type = String)]
    pub salary_in_usd: Decimal,
    pub employee_residence: i32,
    pub remote_ratio: i32,
    pub company_location: i32,
    pub company_size: String,
    #[serde(default)]
    pub skills: Vec<i32>,
    #[serde(default)]
    pub industry: Option<i32>,
    #[serde(default)]
    pub candidate: Option<i32>,
}

/// Partial job record payload (PATCH). `null` clears the optional references.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct JobRecordPatch {
    pub work_year: Option<i32>,
    pub experience_level: Option<String>,
    pub employment_type: Option<String>,
    pub job_title: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub salary: Option<Decimal>,
    pub salary_currency: Option<String>,
    #[schema(value_type = Option<String>)]
    pub salary_in_usd: Option<Decimal>,
    pub employee_residence: Option<i32>,
    pub remote_ratio: Option<i32>,
    pub company_location: Option<i32>,
    pub company_size: Option<String>,
    pub skills: Option<Vec<i32>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub industry: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub candidate: Option<Option<i32>>,
}

/// Distinguish an explicit `null` from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl JobRecordPatch {
    /// Overlay this patch on the current values.
    pub fn apply(self, current: JobRecordInput) -> JobRecordInput {
        JobRecordInput {
            work_year: self.work_year.unwrap_or(current.work_year),
            experience_level: self.experience_level.unwrap_or(current.experience_level),
            employment_type: self.employment_type.unwrap_or(current.employment_type),
            job_title: self.job_title.unwrap_or(current.job_title),
            salary: self.salary.unwrap_or(current.salary),
            salary_currency: self.salary_currency.unwrap_or(current.salary_currency),
            salary_in_usd: self.salary_in_usd.unwrap_or(current.salary_in_usd),
            employee_residence: self
                .employee_residence
                .unwrap_or(current.employee_residence),
            remote_ratio: self.remote_ratio.unwrap_or(current.remote_ratio),
            company_location: self.company_location.unwrap_or(current.company_location),
            company_size: self.company_size.unwrap_or(current.company_size),
            skills: self.skills.unwrap_or(current.skills),
            industry: self.industry.unwrap_or(current.industry),
            candidate: self.candidate.unwrap_or(current.candidate),
        }
    }
}

/// Job record fields that passed validation. References are checked on write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJobRecord {
    pub work_year: i32,
    pub experience_level: String,
    pub employment_type: String,
    pub job_title_id: i32,
    pub salary: Decimal,
    pub salary_currency: Currency,
    pub salary_in_usd: Decimal,
    pub employee_residence_id: i32,
    pub remote_ratio: i32,
    pub company_location_id: i32,
    pub company_size: CompanySize,
    pub skill_ids: Vec<i32>,
    pub industry_id: Option<i32>,
    pub candidate_id: Option<i32>,
}

impl JobRecordInput {
    pub fn validate(&self) -> AppResult<NewJobRecord> {
        let mut errors = FieldErrors::new();

        let experience_level =
            validation::required_text(&mut errors, "experience_level", &self.experience_level, 10);
        let employment_type =
            validation::required_text(&mut errors, "employment_type", &self.employment_type, 10);

        validation::check_amount(&mut errors, "salary", self.salary);
        validation::check_amount(&mut errors, "salary_in_usd", self.salary_in_usd);

        let currency = Currency::parse(self.salary_currency.trim());
        if currency.is_none() {
            errors.add("salary_currency", validation::INVALID_CHOICE);
        }

        let size = CompanySize::parse(self.company_size.trim());
        if size.is_none() {
            errors.add("company_size", validation::INVALID_CHOICE);
        }

        if !(0..=100).contains(&self.remote_ratio) {
            errors.add("remote_ratio", "Remote ratio must be between 0 and 100.");
        }

        let mut skill_ids = self.skills.clone();
        skill_ids.sort_unstable();
        skill_ids.dedup();

        match (currency, size) {
            (Some(salary_currency), Some(company_size)) if errors.is_empty() => Ok(NewJobRecord {
                work_year: self.work_year,
                experience_level,
                employment_type,
                job_title_id: self.job_title,
                salary: self.salary,
                salary_currency,
                salary_in_usd: self.salary_in_usd,
                employee_residence_id: self.employee_residence,
                remote_ratio: self.remote_ratio,
                company_location_id: self.company_location,
                company_size,
                skill_ids,
                industry_id: self.industry,
                candidate_id: self.candidate,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}
