use std::sync::Arc;

use axum::{extract::{Request, State}, http::{header, Method}, middleware::Next, response::Response};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use service::pokemon::{repository::PokemonRepository, PokemonService};
use service::pokemon::domain::PrincipalId;

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub pokemon_svc: Arc<PokemonService<dyn PokemonRepository>>,
    pub auth: ServerAuthConfig,
}

/// Bearer token claims. `sub` is the principal id stamped into audit fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: PrincipalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
}

/// Authenticated caller, placed in request extensions by the middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
}

fn is_public(method: &Method, path: &str) -> bool {
    *method == Method::OPTIONS
        || path == "/health"
        || path == "/metrics"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
}

/// 全局中间件：除健康检查、指标、文档与预检外，校验 Authorization: Bearer <token>
/// 缺失、格式错误、非法或过期均返回 401
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    if is_public(req.method(), &path) {
        return Ok(next.run(req).await);
    }

    let authz = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!(path = %path, "missing Authorization header");
            JsonApiError::unauthorized("missing bearer token")
        })?;
    let token = authz.strip_prefix("Bearer ").filter(|t| !t.is_empty()).ok_or_else(|| {
        warn!(path = %path, "invalid Authorization format (expect Bearer)");
        JsonApiError::unauthorized("invalid Authorization header")
    })?;

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => {
            req.extensions_mut().insert(Principal { id: data.claims.sub });
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized("invalid or expired token"))
        }
    }
}
