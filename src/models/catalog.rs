//! Reference catalog value objects and their write payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{self, INVALID_EMAIL};
use crate::entity;
use crate::error::{AppResult, FieldErrors};

/// Job category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Experience level or employment type, identified by its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Contract {
    pub type_code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Skill {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Industry {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JobTitle {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub id: i32,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Candidate {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Free-text location, unrelated to the location catalog.
    pub location: String,
}

impl From<entity::category::Model> for Category {
    fn from(m: entity::category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

impl From<entity::contract::Model> for Contract {
    fn from(m: entity::contract::Model) -> Self {
        Self {
            type_code: m.type_code,
            description: m.description,
        }
    }
}

impl From<entity::skill::Model> for Skill {
    fn from(m: entity::skill::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

impl From<entity::industry::Model> for Industry {
    fn from(m: entity::industry::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

impl From<entity::job_title::Model> for JobTitle {
    fn from(m: entity::job_title::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

impl From<entity::location::Model> for Location {
    fn from(m: entity::location::Model) -> Self {
        Self {
            id: m.id,
            country_code: m.country_code,
        }
    }
}

impl From<entity::candidate::Model> for Candidate {
    fn from(m: entity::candidate::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            location: m.location,
        }
    }
}

// Write payloads

/// Body for catalog entries that only carry a name
/// (categories, skills, industries, job titles).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NameInput {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NamePatch {
    pub name: Option<String>,
}

impl NameInput {
    /// Validate and return the trimmed name.
    pub fn validate(&self, max_len: usize) -> AppResult<String> {
        let mut errors = FieldErrors::new();
        let name = validation::required_text(&mut errors, "name", &self.name, max_len);
        errors.into_result()?;
        Ok(name)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LocationInput {
    #[serde(default)]
    pub country_code: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LocationPatch {
    pub country_code: Option<String>,
}

impl LocationInput {
    pub fn validate(&self) -> AppResult<String> {
        let mut errors = FieldErrors::new();
        let code = validation::required_text(&mut errors, "country_code", &self.country_code, 10);
        errors.into_result()?;
        Ok(code)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContractInput {
    #[serde(default)]
    pub type_code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ContractPatch {
    pub type_code: Option<String>,
    pub description: Option<String>,
}

impl ContractInput {
    pub fn validate(&self) -> AppResult<Contract> {
        let mut errors = FieldErrors::new();
        let type_code = validation::required_text(&mut errors, "type_code", &self.type_code, 10);
        let description =
            validation::required_text(&mut errors, "description", &self.description, 255);
        errors.into_result()?;
        Ok(Contract {
            type_code,
            description,
        })
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CandidateInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CandidatePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}

/// Validated candidate fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub location: String,
}

impl CandidateInput {
    pub fn validate(&self) -> AppResult<NewCandidate> {
        let mut errors = FieldErrors::new();
        let name = validation::required_text(&mut errors, "name", &self.name, 255);
        let email = validation::required_text(&mut errors, "email", &self.email, 254);
        if !email.is_empty() && !validation::is_valid_email(&email) {
            errors.add("email", INVALID_EMAIL);
        }
        let location = validation::required_text(&mut errors, "location", &self.location, 100);
        errors.into_result()?;
        Ok(NewCandidate {
            name,
            email: email.to_lowercase(),
            location,
        })
    }
}
