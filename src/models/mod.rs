//! Domain models for the job catalog.

pub mod api_key;
pub mod catalog;
pub mod feedback;
pub mod forms;
pub mod job_record;
pub mod stats;
pub mod validation;

// Re-export commonly used types
pub use api_key::{
    ApiKey, ApiKeyCreateResponse, ApiKeyListItem, ApiKeyRole, AuthenticatedCaller,
    CreateApiKeyRequest,
};
pub use catalog::{
    CandidateInput, CandidatePatch, Candidate, Category, Contract, ContractInput, ContractPatch,
    Industry, JobTitle, Location, LocationInput, LocationPatch, NameInput, NamePatch,
    NewCandidate, Skill,
};
pub use feedback::{Feedback, FeedbackInput, FeedbackPatch, NewFeedback};
pub use forms::{FeedbackForm, JobForm};
pub use job_record::{
    CompanySize, Currency, JobRecordDetail, JobRecordInput, JobRecordPatch, NewJobRecord,
};
pub use stats::{
    AverageRating, DashboardRow, ExperienceSalary, LocationCount, RemoteSummary, TitleSalary,
};
