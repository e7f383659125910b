use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::de::DeserializeOwned;
use tracing::info;

use service::pokemon::domain::{Pokemon, PokemonAttributes, PokemonId, PokemonPatch};
use service::pokemon::listing::ListingRequest;

use crate::errors::JsonApiError;
use crate::observability;
use crate::routes::auth::{Principal, ServerState};

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, JsonApiError> {
    serde_json::from_slice(body).map_err(|e| JsonApiError::bad_request(format!("invalid JSON body: {e}")))
}

/// Parse a body that may be left out. An empty body and a JSON `null` both
/// mean absent.
fn parse_optional_body<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, JsonApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    parse_body::<Option<T>>(body)
}

fn parse_id(raw: &str) -> Result<PokemonId, JsonApiError> {
    raw.parse::<PokemonId>()
        .map_err(|_| JsonApiError::bad_request("Validation failed (numeric string is expected)"))
}

#[utoipa::path(
    post, path = "/pokemons", tag = "pokemons",
    request_body = crate::openapi::CreatePokemonDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::PokemonDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorBodyDoc)
    ),
    security(("bearer" = []))
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    body: Bytes,
) -> Result<(StatusCode, Json<Pokemon>), JsonApiError> {
    let attrs: PokemonAttributes = parse_body(&body)?;
    let started = Instant::now();
    let res = state.pokemon_svc.create(attrs, principal.id).await;
    observability::record("create", started, &res);
    Ok((StatusCode::CREATED, Json(res?)))
}

#[utoipa::path(
    post, path = "/pokemons/get", tag = "pokemons",
    request_body = crate::openapi::ListingRequestDoc,
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::PokemonDoc]),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 401, description = "Unauthorized", body = crate::openapi::ErrorBodyDoc)
    ),
    security(("bearer" = []))
)]
pub async fn list(State(state): State<ServerState>, body: Bytes) -> Result<Json<Vec<Pokemon>>, JsonApiError> {
    // An absent body lists with the menu defaults.
    let request: Option<ListingRequest> = parse_optional_body(&body)?;
    let started = Instant::now();
    let res = state.pokemon_svc.list(request.as_ref()).await;
    observability::record("list", started, &res);
    let rows = res?;
    info!(count = rows.len(), "list pokemons");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/pokemons/{id}", tag = "pokemons",
    params(("id" = i32, Path, description = "Pokemon id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::PokemonDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    ),
    security(("bearer" = []))
)]
pub async fn get(State(state): State<ServerState>, Path(raw): Path<String>) -> Result<Json<Pokemon>, JsonApiError> {
    let id = parse_id(&raw)?;
    let started = Instant::now();
    let res = state.pokemon_svc.get_by_id(id).await;
    observability::record("get", started, &res);
    Ok(Json(res?))
}

#[utoipa::path(
    patch, path = "/pokemons/{id}", tag = "pokemons",
    params(("id" = i32, Path, description = "Pokemon id")),
    request_body = crate::openapi::EditPokemonDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::PokemonDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    ),
    security(("bearer" = []))
)]
pub async fn edit(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(raw): Path<String>,
    body: Bytes,
) -> Result<Json<Pokemon>, JsonApiError> {
    let id = parse_id(&raw)?;
    // An absent body is an empty edit; it still stamps the caller.
    let patch: PokemonPatch = parse_optional_body(&body)?.unwrap_or_default();
    let started = Instant::now();
    let res = state.pokemon_svc.edit_by_id(id, principal.id, patch).await;
    observability::record("edit", started, &res);
    Ok(Json(res?))
}

#[utoipa::path(
    delete, path = "/pokemons/{id}", tag = "pokemons",
    params(("id" = i32, Path, description = "Pokemon id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    ),
    security(("bearer" = []))
)]
pub async fn delete(State(state): State<ServerState>, Path(raw): Path<String>) -> Result<StatusCode, JsonApiError> {
    let id = parse_id(&raw)?;
    let started = Instant::now();
    let res = state.pokemon_svc.delete_by_id(id).await;
    observability::record("delete", started, &res);
    res?;
    Ok(StatusCode::NO_CONTENT)
}
