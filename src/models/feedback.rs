//! Feedback domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation;
use crate::entity;
use crate::error::{AppResult, FieldErrors};

/// A candidate's rating of a job record.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Feedback {
    pub id: i32,
    /// Job record id
    pub job: i32,
    /// Candidate id
    pub author: i32,
    pub comment: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl From<entity::feedback::Model> for Feedback {
    fn from(m: entity::feedback::Model) -> Self {
        Self {
            id: m.id,
            job: m.job_id,
            author: m.author_id,
            comment: m.comment,
            rating: m.rating,
            created_at: m.created_at,
        }
    }
}

/// Full feedback payload (POST/PUT).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FeedbackInput {
    pub job: i32,
    #[serde(alias = "author_name")]
    pub author: i32,
    #[serde(default)]
    pub comment: String,
    pub rating: i32,
}

/// Partial feedback payload (PATCH).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FeedbackPatch {
    pub job: Option<i32>,
    #[serde(alias = "author_name")]
    pub author: Option<i32>,
    pub comment: Option<String>,
    pub rating: Option<i32>,
}

impl FeedbackPatch {
    pub fn apply(self, current: &Feedback) -> FeedbackInput {
        FeedbackInput {
            job: self.job.unwrap_or(current.job),
            author: self.author.unwrap_or(current.author),
            comment: self.comment.unwrap_or_else(|| current.comment.clone()),
            rating: self.rating.unwrap_or(current.rating),
        }
    }
}

/// Validated feedback fields. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub job_id: i32,
    pub author_id: i32,
    pub comment: String,
    pub rating: i32,
}

impl FeedbackInput {
    pub fn validate(&self) -> AppResult<NewFeedback> {
        let mut errors = FieldErrors::new();
        if self.comment.trim().is_empty() {
            errors.add("comment", validation::REQUIRED);
        }
        validation::check_rating(&mut errors, self.rating);
        errors.into_result()?;
        Ok(NewFeedback {
            job_id: self.job,
            author_id: self.author,
            comment: self.comment.clone(),
            rating: self.rating,
        })
    }
}
