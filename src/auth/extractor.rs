//! Actix-web extractor for API key authentication.
//!
//! Header values are wrapped in `SecretString` as soon as they are read and
//! are never logged.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use secrecy::{ExposeSecret, SecretString};

use super::AdminKey;
use crate::config::{ADMIN_KEY_HEADER, API_KEY_HEADER};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ApiKeyRole, AuthenticatedCaller};
use crate::services::api_key;

/// Extract a secret header value. `None` if missing or not valid UTF-8.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

/// Extractor that requires a valid API key or the bootstrap admin key.
///
/// ```ignore
/// async fn protected_handler(auth: ApiKeyAuth) -> AppResult<HttpResponse> {
///     auth.require_write()?;
///     // ...
/// }
/// ```
#[derive(Debug)]
pub struct ApiKeyAuth {
    pub caller: AuthenticatedCaller,
}

impl ApiKeyAuth {
    /// Writes need an admin or contributor key.
    pub fn require_write(&self) -> AppResult<()> {
        if self.caller.can_write() {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "Role '{}' cannot modify data",
                self.caller.role
            )))
        }
    }

    pub fn require_admin(&self, action: &str) -> AppResult<()> {
        if self.caller.is_admin() {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "Admin role required to {}",
                action
            )))
        }
    }
}

impl FromRequest for ApiKeyAuth {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let stored_admin_key = req.app_data::<web::Data<AdminKey>>().cloned();
        let provided_api_key = extract_secret_header(req, API_KEY_HEADER);
        let provided_admin_key = extract_secret_header(req, ADMIN_KEY_HEADER);

        Box::pin(async move {
            // Bootstrap admin key first, compared in constant time
            if let (Some(provided), Some(stored)) = (&provided_admin_key, &stored_admin_key)
                && stored.verify(provided.expose_secret())
            {
                return Ok(ApiKeyAuth {
                    caller: AuthenticatedCaller {
                        key_id: "admin".to_string(),
                        name: "Admin (Bootstrap)".to_string(),
                        key_prefix: "admin".to_string(),
                        role: ApiKeyRole::Admin,
                    },
                });
            }

            let Some(key) = provided_api_key else {
                return Err(AppError::Unauthorized(format!(
                    "Missing API key. Provide {} header.",
                    API_KEY_HEADER
                )));
            };
            let pool = pool.ok_or_else(|| {
                AppError::Database("Database pool is not configured".to_string())
            })?;

            let caller = api_key::verify_key(pool.get_ref(), key.expose_secret()).await?;
            Ok(ApiKeyAuth { caller })
        })
    }
}
