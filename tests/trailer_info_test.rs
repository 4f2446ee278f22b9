//! Trailer info endpoint tests
//!
//! Drives `GET /TrailerInfo/:movie_id` through the full router.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{body_json, TestHarness};
use std::path::PathBuf;
use tower::ServiceExt;
use trailerforged_common::{LocalTrailer, MovieId, MovieRef, RemoteTrailer, TrailerId};

fn movie(name: &str) -> MovieRef {
    MovieRef::new(MovieId::new(), name, format!("/movies/{name}/{name}.mkv"))
}

fn with_local(mut movie: MovieRef, name: &str) -> MovieRef {
    let path = PathBuf::from(format!("/movies/{0}/trailers/{name}.mp4", movie.name));
    movie.local_trailers.push(LocalTrailer {
        id: TrailerId::from_path(&path),
        name: name.to_string(),
        path,
        runtime_seconds: Some(132),
    });
    movie
}

fn with_remote(mut movie: MovieRef, url: &str) -> MovieRef {
    movie.remote_trailers.push(RemoteTrailer {
        name: None,
        url: url.to_string(),
    });
    movie
}

async fn get(harness: &TestHarness, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = harness
        .router()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response.into_body()).await)
}

#[tokio::test]
async fn test_local_trailer_is_returned() {
    let heat = with_local(movie("Heat"), "Trailer-1");
    let id = heat.id;
    let harness = TestHarness::new(vec![heat]);

    let (status, body) = get(&harness, &format!("/TrailerInfo/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Trailer-1");
    assert_eq!(body["origin"], "Local");
    assert_eq!(body["source"], "Local File");
    assert_eq!(body["path"], "/movies/Heat/trailers/Trailer-1.mp4");
    assert_eq!(body["runtimeSeconds"], 132);
}

#[tokio::test]
async fn test_local_trailer_wins_over_remote() {
    let heat = with_remote(
        with_local(movie("Heat"), "Trailer-1"),
        "https://youtu.be/abc123",
    );
    let id = heat.id;
    let harness = TestHarness::new(vec![heat]);

    let (status, body) = get(&harness, &format!("/TrailerInfo/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["origin"], "Local");
}

#[tokio::test]
async fn test_remote_trailer_is_labelled_by_host() {
    let alien = with_remote(movie("Alien"), "https://youtu.be/abc123");
    let id = alien.id;
    let harness = TestHarness::new(vec![alien]);

    let (status, body) = get(&harness, &format!("/TrailerInfo/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["origin"], "Remote");
    assert_eq!(body["source"], "YouTube");
    assert_eq!(body["path"], "https://youtu.be/abc123");
    assert_eq!(body["name"], "Alien Trailer");
    assert!(body.get("runtimeSeconds").is_none());
}

#[tokio::test]
async fn test_movie_without_trailer_is_404() {
    let m = movie("Primer");
    let id = m.id;
    let harness = TestHarness::new(vec![m]);

    let (status, body) = get(&harness, &format!("/TrailerInfo/{id}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], "TRAILER_NOT_FOUND");
    assert_eq!(body["message"], "no trailer found");
}

#[tokio::test]
async fn test_unknown_movie_is_404_with_distinct_code() {
    let harness = TestHarness::new(vec![with_local(movie("Heat"), "Trailer-1")]);

    let (status, body) = get(&harness, &format!("/TrailerInfo/{}", MovieId::new())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], "MOVIE_NOT_FOUND");
    assert_eq!(body["message"], "movie not found");
    assert!(body["requestId"].is_string());
}

#[tokio::test]
async fn test_nil_guid_is_rejected() {
    let harness = TestHarness::new(vec![]);

    let (status, body) = get(&harness, "/TrailerInfo/00000000-0000-0000-0000-000000000000").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let harness = TestHarness::new(vec![]);

    let (status, body) = get(&harness, "/TrailerInfo/not-a-movie").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let harness = TestHarness::new(vec![]);

    let response = harness
        .router()
        .oneshot(
            Request::get(format!("/TrailerInfo/{}", MovieId::new()))
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
    let body = body_json(response.into_body()).await;
    assert_eq!(body["requestId"], "req-42");
}

#[tokio::test]
async fn test_health_endpoint() {
    let harness = TestHarness::new(vec![]);

    let response = harness
        .router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_undecodable_id_gets_structured_error() {
    let harness = TestHarness::new(vec![]);

    let (status, body) = get(&harness, "/TrailerInfo/%FF%FE").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_ARGUMENT");
    assert!(body["message"].is_string());
    assert!(body["details"].as_str().unwrap().contains("UTF-8"));
    assert!(body["requestId"].is_string());
}

#[tokio::test]
async fn test_unknown_route_gets_structured_error() {
    let harness = TestHarness::new(vec![]);

    let (status, body) = get(&harness, "/NoSuchEndpoint").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], "NOT_FOUND");
    assert!(body["requestId"].is_string());
}
