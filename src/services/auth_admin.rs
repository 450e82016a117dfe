//! API key management endpoints.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ApiKeyCreateResponse, ApiKeyListItem, ApiKeyRole, CreateApiKeyRequest};
use crate::services::api_key;

/// Configure auth admin routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_api_key)
        .service(list_api_keys)
        .service(revoke_api_key);
}

/// Create a new API key.
#[utoipa::path(
    post,
    path = "/api/auth/keys",
    tag = "Auth",
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "API key created", body = ApiKeyCreateResponse),
        (status = 401, description = "Unauthorized - admin role required"),
        (status = 400, description = "Invalid input")
    ),
    security(
        ("api_key" = [])
    )
)]
#[post("/auth/keys")]
pub async fn create_api_key(
    auth: ApiKeyAuth,
    body: web::Json<CreateApiKeyRequest>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_admin("create API keys")?;

    if body.name.trim().is_empty() {
        return Err(AppError::field("name", "This field is required."));
    }

    let role = match body.role.as_deref() {
        None => ApiKeyRole::default(),
        Some(raw) => ApiKeyRole::parse(raw)
            .ok_or_else(|| AppError::field("role", format!("Unknown role '{}'", raw)))?,
    };

    let (full_key, api_key) = api_key::create_key(
        pool.get_ref(),
        body.name.trim(),
        role,
        body.expires_in.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(ApiKeyCreateResponse {
        id: api_key.id,
        key: full_key,
        name: api_key.name,
        role: api_key.role,
        expires_at: api_key.expires_at.map(|d| d.to_rfc3339()),
        created_at: api_key.created_at.to_rfc3339(),
    }))
}

/// List all API keys.
#[utoipa::path(
    get,
    path = "/api/auth/keys",
    tag = "Auth",
    responses(
        (status = 200, description = "List of API keys", body = ListApiKeysResponse),
        (status = 401, description = "Unauthorized - admin role required")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/auth/keys")]
pub async fn list_api_keys(auth: ApiKeyAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    auth.require_admin("list API keys")?;

    let keys = api_key::list_keys(pool.get_ref()).await?;
    let items: Vec<ApiKeyListItem> = keys.into_iter().map(ApiKeyListItem::from).collect();

    Ok(HttpResponse::Ok().json(ListApiKeysResponse { keys: items }))
}

/// Revoke an API key.
#[utoipa::path(
    delete,
    path = "/api/auth/keys/{id}",
    tag = "Auth",
    params(
        ("id" = String, Path, description = "API key UUID")
    ),
    responses(
        (status = 200, description = "API key revoked", body = RevokeApiKeyResponse),
        (status = 401, description = "Unauthorized - admin role required"),
        (status = 404, description = "API key not found or already revoked")
    ),
    security(
        ("api_key" = [])
    )
)]
#[delete("/auth/keys/{id}")]
pub async fn revoke_api_key(
    auth: ApiKeyAuth,
    path: web::Path<String>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_admin("revoke API keys")?;

    let id = path.into_inner();
    if id == auth.caller.key_id {
        return Err(AppError::InvalidInput(
            "Cannot revoke your own API key".to_string(),
        ));
    }

    if api_key::revoke_key(pool.get_ref(), &id).await? {
        Ok(HttpResponse::Ok().json(RevokeApiKeyResponse {
            message: "API key revoked".to_string(),
            id,
        }))
    } else {
        Err(AppError::NotFound(format!("API key {}", id)))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListApiKeysResponse {
    keys: Vec<ApiKeyListItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevokeApiKeyResponse {
    message: String,
    id: String,
}
