//! SeaORM entity definitions.

pub mod api_key;
pub mod candidate;
pub mod category;
pub mod contract;
pub mod feedback;
pub mod industry;
pub mod job_record;
pub mod job_record_skill;
pub mod job_title;
pub mod location;
pub mod skill;
