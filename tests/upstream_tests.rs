use std::{collections::HashMap, path::Path, time::Duration};

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use movie_recommender::{
    build_recommender,
    config::{Config, EnrichmentMode},
    error::AppError,
    services::{MetadataProvider, TmdbProvider},
};

const PLACEHOLDER: &str = "https://via.placeholder.com/500x750?text=Poster+Not+Found";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
const API_KEY: &str = "test_key";

const MOVIE_DICT: &str = r#"{
    "movie_id": {"0": 1, "1": 2, "2": 3, "3": 4},
    "title": {"0": "Avatar", "1": "Empty", "2": "NoPoster", "3": "Slow"}
}"#;
const SIMILARITY: &str = "[[1.0, 0.8, 0.6, 0.4], [0.8, 1.0, 0.5, 0.3], [0.6, 0.5, 1.0, 0.2], [0.4, 0.3, 0.2, 1.0]]";

/// Stand-in for TMDB search, keyed on the query title
async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("api_key").map(String::as_str) != Some(API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status_code": 7, "status_message": "Invalid API key" })),
        )
            .into_response();
    }

    match params.get("query").map(String::as_str) {
        Some("Avatar") => Json(json!({
            "page": 1,
            "results": [{ "id": 19995, "title": "Avatar", "poster_path": "/avatar.jpg" }]
        }))
        .into_response(),
        Some("Empty") => Json(json!({ "page": 1, "results": [] })).into_response(),
        Some("NoPoster") => Json(json!({
            "results": [{ "id": 3, "title": "NoPoster", "poster_path": null }]
        }))
        .into_response(),
        Some("NoPosterKey") => Json(json!({
            "results": [{ "id": 5, "title": "NoPosterKey" }]
        }))
        .into_response(),
        Some("Huge") => (StatusCode::SERVICE_UNAVAILABLE, "e".repeat(10_000)).into_response(),
        Some("Broken") => "<html>not json</html>".into_response(),
        Some("Slow") => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "results": [{ "poster_path": "/slow.jpg" }] })).into_response()
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/3/search/movie", get(search))
        .route("/files/movie_dict.json", get(|| async { MOVIE_DICT }))
        .route("/files/similarity.json", get(|| async { SIMILARITY }))
        .route(
            "/files/similarity_4x3.json",
            get(|| async { "[[1.0, 0.5, 0.5], [0.5, 1.0, 0.5], [0.5, 0.5, 1.0], [0.1, 0.2, 0.3]]" }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", address)
}

fn provider(base: &str, api_key: &str, timeout: Duration) -> TmdbProvider {
    TmdbProvider::new(
        api_key.to_string(),
        format!("{}/3/search/movie", base),
        IMAGE_BASE.to_string(),
        timeout,
    )
    .unwrap()
}

fn test_config(base: &str, dir: &Path) -> Config {
    Config {
        tmdb_api_key: API_KEY.to_string(),
        tmdb_search_url: format!("{}/3/search/movie", base),
        tmdb_image_base: IMAGE_BASE.to_string(),
        placeholder_poster_url: PLACEHOLDER.to_string(),
        tmdb_timeout_secs: 1,
        movie_dict_path: dir.join("movie_dict.json"),
        movie_dict_url: Some(format!("{}/files/movie_dict.json", base)),
        similarity_path: dir.join("similarity.json"),
        similarity_url: Some(format!("{}/files/similarity.json", base)),
        top_k: 5,
        enrichment_mode: EnrichmentMode::Concurrent,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

#[tokio::test]
async fn test_tmdb_resolves_top_poster() {
    let base = spawn_upstream().await;
    let tmdb = provider(&base, API_KEY, Duration::from_secs(5));

    let url = tmdb.fetch_poster_url("Avatar").await.unwrap();

    assert_eq!(url, "https://image.tmdb.org/t/p/w500/avatar.jpg");
}

#[tokio::test]
async fn test_tmdb_failures_are_errors() {
    let base = spawn_upstream().await;
    let tmdb = provider(&base, API_KEY, Duration::from_secs(5));

    for title in ["Empty", "NoPoster", "NoPosterKey", "Broken", "Unknown"] {
        assert!(
            matches!(
                tmdb.fetch_poster_url(title).await,
                Err(AppError::ExternalApi(_))
            ),
            "expected ExternalApi error for {}",
            title
        );
    }
}

#[tokio::test]
async fn test_tmdb_rejected_api_key() {
    let base = spawn_upstream().await;
    let tmdb = provider(&base, "wrong", Duration::from_secs(5));

    let err = tmdb.fetch_poster_url("Avatar").await.unwrap_err();

    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_tmdb_timeout() {
    let base = spawn_upstream().await;
    let tmdb = provider(&base, API_KEY, Duration::from_millis(200));

    let err = tmdb.fetch_poster_url("Slow").await.unwrap_err();

    assert!(matches!(err, AppError::HttpClient(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn test_tmdb_error_body_is_truncated() {
    let base = spawn_upstream().await;
    let tmdb = provider(&base, API_KEY, Duration::from_secs(5));

    let err = tmdb.fetch_poster_url("Huge").await.unwrap_err();

    assert!(matches!(err, AppError::ExternalApi(_)));
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().len() < 400);
}

#[tokio::test]
async fn test_tmdb_timeout_error_omits_api_key() {
    // Accepts connections but never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });
    let tmdb = provider(
        &format!("http://{}", address),
        "SUPERSECRETKEY",
        Duration::from_millis(200),
    );

    let err = tmdb.fetch_poster_url("Avatar").await.unwrap_err();

    assert!(matches!(err, AppError::HttpClient(ref e) if e.is_timeout()));
    assert!(!err.to_string().contains("SUPERSECRETKEY"));
    assert!(!format!("{:?}", err).contains("SUPERSECRETKEY"));
}

#[tokio::test]
async fn test_build_downloads_artifacts_and_recommends() {
    let base = spawn_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&base, dir.path());

    let recommender = build_recommender(&config).await.unwrap();

    assert!(dir.path().join("movie_dict.json").exists());
    assert!(dir.path().join("similarity.json").exists());
    assert_eq!(
        recommender.list_titles(),
        vec!["Avatar", "Empty", "NoPoster", "Slow"]
    );

    // "Slow" times out, "Empty" has no results, "NoPoster" has a null poster.
    let results = recommender.recommend("Avatar").await.unwrap();
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Empty", "NoPoster", "Slow"]);
    assert!(results.iter().all(|r| r.poster_url == PLACEHOLDER));

    let results = recommender.recommend("Slow").await.unwrap();
    assert_eq!(results[0].title, "Avatar");
    assert_eq!(results[0].poster_url, "https://image.tmdb.org/t/p/w500/avatar.jpg");
}

#[tokio::test]
async fn test_build_prefers_local_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("movie_dict.json"), r#"{"title": ["Heat", "Ronin"]}"#).unwrap();
    std::fs::write(dir.path().join("similarity.json"), "[[1.0, 0.7], [0.7, 1.0]]").unwrap();

    // Unroutable URLs: any download attempt would fail.
    let config = test_config("http://127.0.0.1:9", dir.path());

    let recommender = build_recommender(&config).await.unwrap();

    assert_eq!(recommender.list_titles(), vec!["Heat", "Ronin"]);
}

#[tokio::test]
async fn test_build_rejects_shape_mismatch() {
    let base = spawn_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("movie_dict.json"),
        r#"{"title": ["A", "B", "C", "D", "E"]}"#,
    )
    .unwrap();
    let config = test_config(&base, dir.path());

    let result = build_recommender(&config).await;

    assert!(matches!(result, Err(AppError::ShapeMismatch(_))));
}

#[tokio::test]
async fn test_build_rejects_non_square_download() {
    let base = spawn_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&base, dir.path());
    config.similarity_url = Some(format!("{}/files/similarity_4x3.json", base));

    let result = build_recommender(&config).await;

    assert!(matches!(result, Err(AppError::ShapeMismatch(_))));
}

#[tokio::test]
async fn test_build_fails_when_download_fails() {
    let base = spawn_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&base, dir.path());
    config.movie_dict_url = Some(format!("{}/files/missing.json", base));

    let result = build_recommender(&config).await;

    assert!(matches!(result, Err(AppError::SourceUnavailable(_))));
    assert!(!dir.path().join("movie_dict.json").exists());
}
