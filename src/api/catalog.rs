//! REST endpoints for the reference catalog.
//!
//! Every catalog entity exposes the same collection/item surface, so the
//! handlers are written once over [`CatalogResource`] and mounted per entity.

use std::fmt::Display;

use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::auth::ApiKeyAuth;
use crate::db::{DbPool, catalog};
use crate::error::{AppError, AppResult};
use crate::models::{
    Candidate, CandidateInput, CandidatePatch, Category, Contract, ContractInput, ContractPatch,
    Industry, JobTitle, Location, LocationInput, LocationPatch, NameInput, NamePatch, Skill,
};

/// A catalog entity served under its own collection path.
#[allow(async_fn_in_trait)]
pub trait CatalogResource: Serialize + Sized + 'static {
    /// Path key: numeric id, or the type code for contracts.
    type Key: DeserializeOwned + Display + 'static;
    /// Full write payload (POST/PUT).
    type Input: DeserializeOwned + 'static;
    /// Partial write payload (PATCH).
    type Patch: DeserializeOwned + 'static;

    const LABEL: &'static str;

    async fn list(pool: &DbPool) -> AppResult<Vec<Self>>;
    async fn find(pool: &DbPool, key: &Self::Key) -> AppResult<Option<Self>>;
    async fn create(pool: &DbPool, input: Self::Input) -> AppResult<Self>;
    async fn update(pool: &DbPool, key: &Self::Key, input: Self::Input) -> AppResult<Self>;
    async fn delete(pool: &DbPool, key: &Self::Key) -> AppResult<bool>;

    /// Overlay a partial payload on the current row.
    fn merge(current: &Self, patch: Self::Patch) -> Self::Input;
}

fn not_found<R: CatalogResource>(key: &R::Key) -> AppError {
    AppError::NotFound(format!("{} {}", R::LABEL, key))
}

async fn list<R: CatalogResource>(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let items = R::list(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(items))
}

async fn retrieve<R: CatalogResource>(
    path: web::Path<R::Key>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let key = path.into_inner();
    let item = R::find(pool.get_ref(), &key)
        .await?
        .ok_or_else(|| not_found::<R>(&key))?;
    Ok(HttpResponse::Ok().json(item))
}

async fn create<R: CatalogResource>(
    auth: ApiKeyAuth,
    body: web::Json<R::Input>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let item = R::create(pool.get_ref(), body.into_inner()).await?;
    info!(resource = R::LABEL, caller = %auth.caller.key_prefix, "Catalog entry created");
    Ok(HttpResponse::Created().json(item))
}

async fn update<R: CatalogResource>(
    auth: ApiKeyAuth,
    path: web::Path<R::Key>,
    body: web::Json<R::Input>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let key = path.into_inner();
    if R::find(pool.get_ref(), &key).await?.is_none() {
        return Err(not_found::<R>(&key));
    }
    let item = R::update(pool.get_ref(), &key, body.into_inner()).await?;
    info!(resource = R::LABEL, key = %key, "Catalog entry updated");
    Ok(HttpResponse::Ok().json(item))
}

async fn partial_update<R: CatalogResource>(
    auth: ApiKeyAuth,
    path: web::Path<R::Key>,
    body: web::Json<R::Patch>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let key = path.into_inner();
    let current = R::find(pool.get_ref(), &key)
        .await?
        .ok_or_else(|| not_found::<R>(&key))?;
    let input = R::merge(&current, body.into_inner());
    let item = R::update(pool.get_ref(), &key, input).await?;
    info!(resource = R::LABEL, key = %key, "Catalog entry patched");
    Ok(HttpResponse::Ok().json(item))
}

async fn destroy<R: CatalogResource>(
    auth: ApiKeyAuth,
    path: web::Path<R::Key>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let key = path.into_inner();
    if !R::delete(pool.get_ref(), &key).await? {
        return Err(not_found::<R>(&key));
    }
    info!(resource = R::LABEL, key = %key, "Catalog entry deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Mount the collection and item routes of `R` under `path`.
fn mount<R: CatalogResource>(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(
        web::resource(path)
            .route(web::get().to(list::<R>))
            .route(web::post().to(create::<R>)),
    )
    .service(
        web::resource(format!("{}/{{key}}", path))
            .route(web::get().to(retrieve::<R>))
            .route(web::put().to(update::<R>))
            .route(web::patch().to(partial_update::<R>))
            .route(web::delete().to(destroy::<R>)),
    );
}

/// Configure catalog routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    mount::<Category>(cfg, "/category");
    mount::<Contract>(cfg, "/contract");
    mount::<Skill>(cfg, "/skill");
    mount::<Industry>(cfg, "/industry");
    mount::<JobTitle>(cfg, "/job-title");
    mount::<Location>(cfg, "/location");
    mount::<Candidate>(cfg, "/candidate");
}

fn merge_name(current: &str, patch: NamePatch) -> NameInput {
    NameInput {
        name: patch.name.unwrap_or_else(|| current.to_string()),
    }
}

impl CatalogResource for Category {
    type Key = i32;
    type Input = NameInput;
    type Patch = NamePatch;
    const LABEL: &'static str = "Category";

    async fn list(pool: &DbPool) -> AppResult<Vec<Self>> {
        catalog::list_categories(pool.connection()).await
    }

    async fn find(pool: &DbPool, key: &i32) -> AppResult<Option<Self>> {
        catalog::find_category(pool.connection(), *key).await
    }

    async fn create(pool: &DbPool, input: NameInput) -> AppResult<Self> {
        let name = input.validate(100)?;
        catalog::insert_category(pool.connection(), &name).await
    }

    async fn update(pool: &DbPool, key: &i32, input: NameInput) -> AppResult<Self> {
        let name = input.validate(100)?;
        catalog::update_category(pool.connection(), *key, &name).await
    }

    async fn delete(pool: &DbPool, key: &i32) -> AppResult<bool> {
        catalog::delete_category(pool.connection(), *key).await
    }

    fn merge(current: &Self, patch: NamePatch) -> NameInput {
        merge_name(&current.name, patch)
    }
}

impl CatalogResource for Contract {
    type Key = String;
    type Input = ContractInput;
    type Patch = ContractPatch;
    const LABEL: &'static str = "Contract";

    async fn list(pool: &DbPool) -> AppResult<Vec<Self>> {
        catalog::list_contracts(pool.connection()).await
    }

    async fn find(pool: &DbPool, key: &String) -> AppResult<Option<Self>> {
        catalog::find_contract(pool.connection(), key).await
    }

    async fn create(pool: &DbPool, input: ContractInput) -> AppResult<Self> {
        let contract = input.validate()?;
        catalog::insert_contract(pool.connection(), &contract).await
    }

    async fn update(pool: &DbPool, key: &String, input: ContractInput) -> AppResult<Self> {
        let contract = input.validate()?;
        if &contract.type_code != key {
            return Err(AppError::field(
                "type_code",
                "The type code of an existing contract cannot be changed.",
            ));
        }
        catalog::update_contract(pool.connection(), key, &contract.description).await
    }

    async fn delete(pool: &DbPool, key: &String) -> AppResult<bool> {
        pool.delete_contract(key).await
    }

    fn merge(current: &Self, patch: ContractPatch) -> ContractInput {
        ContractInput {
            type_code: patch.type_code.unwrap_or_else(|| current.type_code.clone()),
            description: patch
                .description
                .unwrap_or_else(|| current.description.clone()),
        }
    }
}

impl CatalogResource for Skill {
    type Key = i32;
    type Input = NameInput;
    type Patch = NamePatch;
    const LABEL: &'static str = "Skill";

    async fn list(pool: &DbPool) -> AppResult<Vec<Self>> {
        catalog::list_skills(pool.connection()).await
    }

    async fn find(pool: &DbPool, key: &i32) -> AppResult<Option<Self>> {
        catalog::find_skill(pool.connection(), *key).await
    }

    async fn create(pool: &DbPool, input: NameInput) -> AppResult<Self> {
        let name = input.validate(255)?;
        catalog::insert_skill(pool.connection(), &name).await
    }

    async fn update(pool: &DbPool, key: &i32, input: NameInput) -> AppResult<Self> {
        let name = input.validate(255)?;
        catalog::update_skill(pool.connection(), *key, &name).await
    }

    async fn delete(pool: &DbPool, key: &i32) -> AppResult<bool> {
        pool.delete_skill(*key).await
    }

    fn merge(current: &Self, patch: NamePatch) -> NameInput {
        merge_name(&current.name, patch)
    }
}

impl CatalogResource for Industry {
    type Key = i32;
    type Input = NameInput;
    type Patch = NamePatch;
    const LABEL: &'static str = "Industry";

    async fn list(pool: &DbPool) -> AppResult<Vec<Self>> {
        catalog::list_industries(pool.connection()).await
    }

    async fn find(pool: &DbPool, key: &i32) -> AppResult<Option<Self>> {
        catalog::find_industry(pool.connection(), *key).await
    }

    async fn create(pool: &DbPool, input: NameInput) -> AppResult<Self> {
        let name = input.validate(255)?;
        catalog::insert_industry(pool.connection(), &name).await
    }

    async fn update(pool: &DbPool, key: &i32, input: NameInput) -> AppResult<Self> {
        let name = input.validate(255)?;
        catalog::update_industry(pool.connection(), *key, &name).await
    }

    async fn delete(pool: &DbPool, key: &i32) -> AppResult<bool> {
        pool.delete_industry(*key).await
    }

    fn merge(current: &Self, patch: NamePatch) -> NameInput {
        merge_name(&current.name, patch)
    }
}

impl CatalogResource for JobTitle {
    type Key = i32;
    type Input = NameInput;
    type Patch = NamePatch;
    const LABEL: &'static str = "Job title";

    async fn list(pool: &DbPool) -> AppResult<Vec<Self>> {
        catalog::list_job_titles(pool.connection()).await
    }

    async fn find(pool: &DbPool, key: &i32) -> AppResult<Option<Self>> {
        catalog::find_job_title(pool.connection(), *key).await
    }

    async fn create(pool: &DbPool, input: NameInput) -> AppResult<Self> {
        let name = input.validate(255)?;
        catalog::insert_job_title(pool.connection(), &name).await
    }

    async fn update(pool: &DbPool, key: &i32, input: NameInput) -> AppResult<Self> {
        let name = input.validate(255)?;
        catalog::update_job_title(pool.connection(), *key, &name).await
    }

    async fn delete(pool: &DbPool, key: &i32) -> AppResult<bool> {
        pool.delete_job_title(*key).await
    }

    fn merge(current: &Self, patch: NamePatch) -> NameInput {
        merge_name(&current.name, patch)
    }
}

impl CatalogResource for Location {
    type Key = i32;
    type Input = LocationInput;
    type Patch = LocationPatch;
    const LABEL: &'static str = "Location";

    async fn list(pool: &DbPool) -> AppResult<Vec<Self>> {
        catalog::list_locations(pool.connection()).await
    }

    async fn find(pool: &DbPool, key: &i32) -> AppResult<Option<Self>> {
        catalog::find_location(pool.connection(), *key).await
    }

    async fn create(pool: &DbPool, input: LocationInput) -> AppResult<Self> {
        let code = input.validate()?;
        catalog::insert_location(pool.connection(), &code).await
    }

    async fn update(pool: &DbPool, key: &i32, input: LocationInput) -> AppResult<Self> {
        let code = input.validate()?;
        catalog::update_location(pool.connection(), *key, &code).await
    }

    async fn delete(pool: &DbPool, key: &i32) -> AppResult<bool> {
        pool.delete_location(*key).await
    }

    fn merge(current: &Self, patch: LocationPatch) -> LocationInput {
        LocationInput {
            country_code: patch
                .country_code
                .unwrap_or_else(|| current.country_code.clone()),
        }
    }
}

impl CatalogResource for Candidate {
    type Key = i32;
    type Input = CandidateInput;
    type Patch = CandidatePatch;
    const LABEL: &'static str = "Candidate";

    async fn list(pool: &DbPool) -> AppResult<Vec<Self>> {
        catalog::list_candidates(pool.connection()).await
    }

    async fn find(pool: &DbPool, key: &i32) -> AppResult<Option<Self>> {
        catalog::find_candidate(pool.connection(), *key).await
    }

    async fn create(pool: &DbPool, input: CandidateInput) -> AppResult<Self> {
        let candidate = input.validate()?;
        catalog::insert_candidate(pool.connection(), &candidate).await
    }

    async fn update(pool: &DbPool, key: &i32, input: CandidateInput) -> AppResult<Self> {
        let candidate = input.validate()?;
        catalog::update_candidate(pool.connection(), *key, &candidate).await
    }

    async fn delete(pool: &DbPool, key: &i32) -> AppResult<bool> {
        pool.delete_candidate(*key).await
    }

    fn merge(current: &Self, patch: CandidatePatch) -> CandidateInput {
        CandidateInput {
            name: patch.name.unwrap_or_else(|| current.name.clone()),
            email: patch.email.unwrap_or_else(|| current.email.clone()),
            location: patch.location.unwrap_or_else(|| current.location.clone()),
        }
    }
}
