//! Stand-in backend for local runs: `cargo run --example mock_api`, then
//! `cargo run` and hit http://localhost:4321/api/games.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;

fn games() -> Vec<Value> {
    vec![
        json!({ "id": 1, "title": "Pipeline Panic", "publisher_id": 1, "category_id": 1 }),
        json!({ "id": 2, "title": "Merge Conflict Mayhem", "publisher_id": 2, "category_id": 2 }),
        json!({ "id": 3, "title": "Cloud Quest", "publisher_id": 1, "category_id": 2 }),
    ]
}

async fn list_games(Query(params): Query<HashMap<String, String>>) -> Json<Vec<Value>> {
    let matches = |game: &Value, key: &str| match params.get(key).and_then(|v| v.parse::<u64>().ok()) {
        Some(id) => game[key].as_u64() == Some(id),
        None => true,
    };
    Json(
        games()
            .into_iter()
            .filter(|g| matches(g, "category_id") && matches(g, "publisher_id"))
            .collect(),
    )
}

async fn get_game(Path(id): Path<u64>) -> impl IntoResponse {
    match games().into_iter().find(|g| g["id"].as_u64() == Some(id)) {
        Some(game) => (StatusCode::OK, Json(game)),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Game not found" }))),
    }
}

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/api/games", get(list_games))
        .route("/api/games/{id}", get(get_game))
        .route(
            "/api/publishers",
            get(|| async {
                Json(json!([
                    { "id": 1, "name": "DevGames Inc", "game_count": 2 },
                    { "id": 2, "name": "Scrum Studios", "game_count": 1 },
                ]))
            }),
        )
        .route(
            "/api/categories",
            get(|| async {
                Json(json!([
                    { "id": 1, "name": "Strategy", "game_count": 1 },
                    { "id": 2, "name": "Adventure", "game_count": 2 },
                ]))
            }),
        );

    let addr = SocketAddr::from(([127, 0, 0, 1], 5100));
    println!("Mock API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
