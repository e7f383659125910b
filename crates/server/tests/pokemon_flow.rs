use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use server::routes::auth::Claims;
use service::pagination::PaginationMenu;
use service::pokemon::repository::memory::InMemoryPokemonRepository;

const SECRET: &str = "test-secret";

fn token_for(principal: i32) -> String {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    let claims = Claims { sub: principal, email: Some(format!("user{principal}@example.com")), exp };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).expect("mint token")
}

fn app() -> (Arc<InMemoryPokemonRepository>, Router) {
    let repo = Arc::new(InMemoryPokemonRepository::new());
    let app = server::build_app(repo.clone(), PaginationMenu::default(), SECRET);
    (repo, app)
}

async fn send(app: &Router, method: &str, uri: &str, principal: i32, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token_for(principal)))
        .header("content-type", "application/json");
    let req = match body {
        Some(v) => builder.body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

fn pikachu(name: &str) -> Value {
    json!({"name": name, "height": 1, "weight": 1, "image": "https://x"})
}

#[tokio::test]
async fn create_edit_get_delete_flow() -> anyhow::Result<()> {
    let (_, app) = app();

    let (status, created) = send(&app, "POST", "/pokemons", 1, Some(pikachu("Pikachu"))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["createdBy"], 1);
    assert_eq!(created["updatedBy"], 1);
    let id = created["id"].as_i64().unwrap();

    let (status, edited) = send(&app, "PATCH", &format!("/pokemons/{id}"), 2, Some(json!({"name": "Edited"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["name"], "Edited");
    assert_eq!(edited["height"], 1);
    assert_eq!(edited["createdBy"], 1);
    assert_eq!(edited["updatedBy"], 2);

    let (status, fetched) = send(&app, "GET", &format!("/pokemons/{id}"), 3, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, edited);

    let (status, body) = send(&app, "DELETE", &format!("/pokemons/{id}"), 3, None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", &format!("/pokemons/{id}"), 3, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Pokemon with this Id does not exist.");
    Ok(())
}

#[tokio::test]
async fn missing_ids_return_404_without_writes() -> anyhow::Result<()> {
    let (repo, app) = app();
    for (method, body) in [("GET", None), ("PATCH", Some(json!({"height": 2}))), ("DELETE", None)] {
        let (status, resp) = send(&app, method, "/pokemons/999", 1, body).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(resp["statusCode"], 404);
        assert_eq!(resp["error"], "Not Found");
        assert_eq!(resp["message"], "Pokemon with this Id does not exist.");
    }
    assert_eq!(repo.write_count(), 0);
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() -> anyhow::Result<()> {
    let (_, app) = app();
    let (status, body) = send(&app, "GET", "/pokemons/abc", 1, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);
    Ok(())
}

#[tokio::test]
async fn invalid_create_body_is_rejected() -> anyhow::Result<()> {
    let (repo, app) = app();
    let (status, _) = send(&app, "POST", "/pokemons", 1, Some(json!({"name": "Pikachu"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = send(&app, "POST", "/pokemons", 1, Some(json!({"name": "Pikachu", "height": 1, "weight": 1, "image": "nope"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "image must be a URL address");
    assert_eq!(repo.write_count(), 0);
    Ok(())
}

#[tokio::test]
async fn listing_pages_filters_and_validates() -> anyhow::Result<()> {
    let (_, app) = app();
    for i in 1..=109 {
        let body = json!({"name": format!("Pikachu{i}"), "height": i % 5, "weight": i % 9, "image": "https://x"});
        let (status, _) = send(&app, "POST", "/pokemons", 1, Some(body)).await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let ids = |v: &Value| v.as_array().unwrap().iter().map(|p| p["id"].as_i64().unwrap()).collect::<Vec<_>>();

    let (status, page) = send(&app, "POST", "/pokemons/get", 1, Some(json!({"take": 50, "skip": 0}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&page), (1..=50).collect::<Vec<_>>());

    let (_, page) = send(&app, "POST", "/pokemons/get", 1, Some(json!({"take": 50, "skip": 50, "orderBy": "id", "order": "asc"}))).await?;
    assert_eq!(ids(&page), (51..=100).collect::<Vec<_>>());

    let (_, page) = send(&app, "POST", "/pokemons/get", 1, None).await?;
    assert_eq!(ids(&page), (1..=10).collect::<Vec<_>>());

    let (_, page) = send(
        &app,
        "POST",
        "/pokemons/get",
        1,
        Some(json!({"take": 50, "skip": 0, "pokemonHeightRange": {"min": 1, "max": 2}, "pokemonWeightRange": {"min": 3, "max": 4}})),
    )
    .await?;
    let rows = page.as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|p| {
        let (h, w) = (p["height"].as_i64().unwrap(), p["weight"].as_i64().unwrap());
        (1..=2).contains(&h) && (3..=4).contains(&w)
    }));

    let (_, page) = send(&app, "POST", "/pokemons/get", 1, Some(json!({"take": 10, "skip": 0, "pokemonNameFilter": "Pikachu7"}))).await?;
    assert_eq!(ids(&page), vec![7]);

    let (_, page) = send(&app, "POST", "/pokemons/get", 1, Some(json!({"take": 10, "skip": 0, "pokemonNameFilter": "Mew"}))).await?;
    assert_eq!(page, json!([]));

    let (status, body) = send(&app, "POST", "/pokemons/get", 1, Some(json!({"take": 50, "skip": 100}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "skip must be one of the following values: 0, 10, 20, 50");

    let (status, _) = send(&app, "POST", "/pokemons/get", 1, Some(json!({"take": 15, "skip": 0}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/pokemons/get", 1, Some(json!({"take": 10, "skip": 0, "orderBy": "image"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn sorted_listing_respects_direction() -> anyhow::Result<()> {
    let (_, app) = app();
    for (name, weight) in [("b", 5), ("a", 9), ("c", 1)] {
        let body = json!({"name": name, "height": 1, "weight": weight, "image": "https://x"});
        send(&app, "POST", "/pokemons", 1, Some(body)).await?;
    }
    let (_, page) = send(&app, "POST", "/pokemons/get", 1, Some(json!({"take": 10, "skip": 0, "orderBy": "weight", "order": "desc"}))).await?;
    let weights: Vec<_> = page.as_array().unwrap().iter().map(|p| p["weight"].as_i64().unwrap()).collect();
    assert_eq!(weights, vec![9, 5, 1]);

    let (_, page) = send(&app, "POST", "/pokemons/get", 1, Some(json!({"take": 10, "skip": 0, "sortKey": "name"}))).await?;
    let names: Vec<_> = page.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap().to_string()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    Ok(())
}

#[tokio::test]
async fn null_or_empty_listing_body_uses_defaults() -> anyhow::Result<()> {
    let (_, app) = app();
    for i in 1..=15 {
        send(&app, "POST", "/pokemons", 1, Some(pikachu(&format!("P{i}")))).await?;
    }
    for body in [Some(Value::Null), None] {
        let (status, page) = send(&app, "POST", "/pokemons/get", 1, body).await?;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = page.as_array().unwrap().iter().map(|p| p["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }
    Ok(())
}

#[tokio::test]
async fn bodyless_edit_stamps_the_caller() -> anyhow::Result<()> {
    let (repo, app) = app();
    let (_, created) = send(&app, "POST", "/pokemons", 1, Some(pikachu("Pikachu"))).await?;
    let id = created["id"].as_i64().unwrap();

    let (status, edited) = send(&app, "PATCH", &format!("/pokemons/{id}"), 3, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["updatedBy"], 3);
    assert_eq!(edited["createdBy"], 1);
    assert_eq!(edited["name"], "Pikachu");

    let (status, edited) = send(&app, "PATCH", &format!("/pokemons/{id}"), 4, Some(Value::Null)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["updatedBy"], 4);
    assert_eq!(repo.write_count(), 3);
    Ok(())
}
