//! Page form payloads.
//!
//! Forms arrive URL-encoded with every field as text, so parsing failures
//! become field errors and the submitted values are echoed back on re-render.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::feedback::FeedbackInput;
use super::job_record::JobRecordInput;
use super::validation::{self, INVALID_CHOICE};
use crate::error::{AppError, AppResult, FieldErrors};

/// Job record form. `skills` is a comma separated list of skill ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobForm {
    pub work_year: String,
    pub experience_level: String,
    pub employment_type: String,
    pub job_title: String,
    pub salary: String,
    pub salary_currency: String,
    pub salary_in_usd: String,
    pub employee_residence: String,
    pub remote_ratio: String,
    pub company_location: String,
    pub company_size: String,
    pub skills: String,
    pub industry: String,
    pub candidate: String,
}

impl JobForm {
    /// Parse into a typed payload; typed validation runs afterwards.
    pub fn parse(&self) -> AppResult<JobRecordInput> {
        let mut errors = FieldErrors::new();

        let work_year = validation::parse_int(&mut errors, "work_year", &self.work_year);
        let job_title = required_id(&mut errors, "job_title", &self.job_title);
        let salary = validation::parse_decimal(&mut errors, "salary", &self.salary);
        let salary_in_usd =
            validation::parse_decimal(&mut errors, "salary_in_usd", &self.salary_in_usd);
        let employee_residence =
            required_id(&mut errors, "employee_residence", &self.employee_residence);
        let remote_ratio = validation::parse_int(&mut errors, "remote_ratio", &self.remote_ratio);
        let company_location = required_id(&mut errors, "company_location", &self.company_location);
        let industry = validation::parse_optional_id(&mut errors, "industry", &self.industry);
        let candidate = validation::parse_optional_id(&mut errors, "candidate", &self.candidate);

        let mut skills = Vec::new();
        for raw in self.skills.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<i32>() {
                Ok(id) => skills.push(id),
                Err(_) => {
                    errors.add("skills", format!("\u{201c}{}\u{201d} is not a valid value.", raw));
                }
            }
        }

        match (
            work_year,
            job_title,
            salary,
            salary_in_usd,
            employee_residence,
            remote_ratio,
            company_location,
        ) {
            (
                Some(work_year),
                Some(job_title),
                Some(salary),
                Some(salary_in_usd),
                Some(employee_residence),
                Some(remote_ratio),
                Some(company_location),
            ) if errors.is_empty() => Ok(JobRecordInput {
                work_year,
                experience_level: self.experience_level.clone(),
                employment_type: self.employment_type.clone(),
                job_title,
                salary,
                salary_currency: self.salary_currency.clone(),
                salary_in_usd,
                employee_residence,
                remote_ratio,
                company_location,
                company_size: self.company_size.clone(),
                skills,
                industry,
                candidate,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }

    /// Prefill from an existing record (update page).
    pub fn from_input(input: &JobRecordInput) -> Self {
        Self {
            work_year: input.work_year.to_string(),
            experience_level: input.experience_level.clone(),
            employment_type: input.employment_type.clone(),
            job_title: input.job_title.to_string(),
            salary: decimal_text(input.salary),
            salary_currency: input.salary_currency.clone(),
            salary_in_usd: decimal_text(input.salary_in_usd),
            employee_residence: input.employee_residence.to_string(),
            remote_ratio: input.remote_ratio.to_string(),
            company_location: input.company_location.to_string(),
            company_size: input.company_size.clone(),
            skills: input
                .skills
                .iter()
                .map(i32::to_string)
                .collect::<Vec<_>>()
                .join(","),
            industry: input.industry.map(|i| i.to_string()).unwrap_or_default(),
            candidate: input.candidate.map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}

/// Feedback form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackForm {
    pub job: String,
    #[serde(alias = "author_name")]
    pub author: String,
    pub comment: String,
    pub rating: String,
}

impl FeedbackForm {
    /// Parse and validate. The rating range is checked here as well as in storage.
    pub fn parse(&self) -> AppResult<FeedbackInput> {
        let mut errors = FieldErrors::new();
        let job = required_id(&mut errors, "job", &self.job);
        let author = required_id(&mut errors, "author", &self.author);
        if self.comment.trim().is_empty() {
            errors.add("comment", validation::REQUIRED);
        }
        let rating = validation::parse_int(&mut errors, "rating", &self.rating);
        if let Some(rating) = rating {
            validation::check_rating(&mut errors, rating);
        }

        match (job, author, rating) {
            (Some(job), Some(author), Some(rating)) if errors.is_empty() => Ok(FeedbackInput {
                job,
                author,
                comment: self.comment.clone(),
                rating,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }

    pub fn from_input(input: &FeedbackInput) -> Self {
        Self {
            job: input.job.to_string(),
            author: input.author.to_string(),
            comment: input.comment.clone(),
            rating: input.rating.to_string(),
        }
    }
}

fn required_id(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, validation::REQUIRED);
        return None;
    }
    match raw.parse::<i32>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, INVALID_CHOICE);
            None
        }
    }
}

fn decimal_text(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback_form(rating: &str) -> FeedbackForm {
        FeedbackForm {
            job: "1".into(),
            author: "2".into(),
            comment: "Solid mentoring".into(),
            rating: rating.into(),
        }
    }

    #[test]
    fn test_feedback_form_rejects_out_of_range_rating() {
        for rating in ["0", "6"] {
            match feedback_form(rating).parse() {
                Err(AppError::Validation(errors)) => {
                    assert_eq!(
                        errors.get("rating"),
                        Some(&[validation::RATING_RANGE.to_string()][..])
                    );
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_feedback_form_non_numeric_rating() {
        match feedback_form("great").parse() {
            Err(AppError::Validation(errors)) => {
                assert_eq!(
                    errors.get("rating"),
                    Some(&[validation::INVALID_INTEGER.to_string()][..])
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_feedback_form_valid() {
        let input = feedback_form("4").parse().unwrap();
        assert_eq!((input.job, input.author, input.rating), (1, 2, 4));
    }

    #[test]
    fn test_job_form_parses_skills_and_optional_refs() {
        let form = JobForm {
            work_year: "2024".into(),
            experience_level: "SE".into(),
            employment_type: "FT".into(),
            job_title: "1".into(),
            salary: "90000".into(),
            salary_currency: "EUR".into(),
            salary_in_usd: "97000.50".into(),
            employee_residence: "2".into(),
            remote_ratio: "0".into(),
            company_location: "2".into(),
            company_size: "S".into(),
            skills: "1, 4".into(),
            industry: "".into(),
            candidate: "3".into(),
        };
        let input = form.parse().unwrap();
        assert_eq!(input.skills, vec![1, 4]);
        assert_eq!(input.industry, None);
        assert_eq!(input.candidate, Some(3));
        assert_eq!(JobForm::from_input(&input).salary_in_usd, "97000.50");
    }

    #[test]
    fn test_job_form_reports_missing_fields() {
        match JobForm::default().parse() {
            Err(AppError::Validation(errors)) => {
                for field in ["work_year", "job_title", "salary", "company_location"] {
                    assert!(errors.contains(field), "missing error for {}", field);
                }
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
