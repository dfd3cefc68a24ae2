//! Tests for the HTTP API, driven through the router without a socket.

use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use knots_server::{
    AppState, GameRegistry, GameSummary, MessageResponse, MoveResponse, NewGameResponse,
    StateResponse, TurnResult, router,
};
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use tower::ServiceExt;

fn app_for(registry: &GameRegistry, ip: [u8; 4]) -> Router {
    router(AppState::new(registry.clone())).layer(MockConnectInfo(SocketAddr::from((ip, 4000))))
}

fn app() -> Router {
    app_for(&GameRegistry::new(), [127, 0, 0, 1])
}

async fn send<T: DeserializeOwned>(app: &Router, method: Method, uri: &str) -> (StatusCode, T) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("Bad body for {uri}: {e}: {}", String::from_utf8_lossy(&bytes)));
    (status, body)
}

async fn get<T: DeserializeOwned>(app: &Router, uri: &str) -> (StatusCode, T) {
    send(app, Method::GET, uri).await
}

async fn start(app: &Router) -> String {
    let (status, body): (_, NewGameResponse) = get(app, "/game/init").await;
    assert_eq!(status, StatusCode::OK);
    body.game_id
}

/// Finds the first empty square in a rendered board, as `(x, y)`.
fn first_empty(rows: [&str; 3]) -> Option<(i64, i64)> {
    rows.iter().enumerate().find_map(|(r, row)| {
        row.split(" | ")
            .position(|cell| cell == ".")
            .map(|c| (c as i64 + 1, 3 - r as i64))
    })
}

#[tokio::test]
async fn test_welcome() {
    let (status, body): (_, MessageResponse) = get(&app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.message.contains("/game/init"));
}

#[tokio::test]
async fn test_new_game_starts_empty() {
    let app = app();
    let (status, created): (_, NewGameResponse) = get(&app, "/game/init").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created.board.row1, ". | . | .");
    assert_eq!(created.board.row3, ". | . | .");

    let (status, state): (_, StateResponse) =
        get(&app, &format!("/game/{}/state", created.game_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.open);
    assert_eq!(state.winner, "None yet");
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].turn, 0);
}

#[tokio::test]
async fn test_valid_move_gets_reply() {
    let app = app();
    let id = start(&app).await;

    let (status, moved): (_, MoveResponse) = get(&app, &format!("/game/{id}/move?x=1&y=3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved.result, TurnResult::Continued);
    assert_eq!(moved.message, "Move successful");
    assert!(moved.history.is_none());
    assert!(moved.board.row1.starts_with("X | "));
    assert_eq!(moved.board.to_string().matches('O').count(), 1);

    let (_, state): (_, StateResponse) = get(&app, &format!("/game/{id}/state")).await;
    assert_eq!(state.history.len(), 3);
    assert_eq!(state.board, moved.board);
}

#[tokio::test]
async fn test_post_move_is_accepted() {
    let app = app();
    let id = start(&app).await;
    let (status, moved): (_, MoveResponse) =
        send(&app, Method::POST, &format!("/game/{id}/move?x=2&y=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved.result, TurnResult::Continued);
    assert_eq!(moved.board.row2.split(" | ").nth(1), Some("X"));
}

#[tokio::test]
async fn test_occupied_square_is_invalid() {
    let app = app();
    let id = start(&app).await;
    let (_, first): (_, MoveResponse) = get(&app, &format!("/game/{id}/move?x=2&y=2")).await;

    let (status, again): (_, MoveResponse) = get(&app, &format!("/game/{id}/move?x=2&y=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again.result, TurnResult::Invalid);
    assert!(again.message.starts_with("Invalid move"));
    assert_eq!(again.board, first.board);

    let (_, state): (_, StateResponse) = get(&app, &format!("/game/{id}/state")).await;
    assert_eq!(state.history.len(), 3);
}

#[tokio::test]
async fn test_off_board_move_is_invalid() {
    let app = app();
    let id = start(&app).await;
    let (status, moved): (_, MoveResponse) = get(&app, &format!("/game/{id}/move?x=0&y=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved.result, TurnResult::Invalid);
    assert!(moved.message.contains("off the board"));
}

#[tokio::test]
async fn test_unparseable_move_is_rejected() {
    let app = app();
    let id = start(&app).await;
    let request = Request::builder()
        .uri(format!("/game/{id}/move?x=left&y=1"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_game() {
    let app = app();
    let (status, body): (_, MessageResponse) = get(&app, "/game/nope/state").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.message, "Can't find a game with id nope");

    let (status, _): (_, MessageResponse) = get(&app, "/game/nope/move?x=1&y=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_games_are_private_to_caller_address() {
    let registry = GameRegistry::new();
    let alice = app_for(&registry, [10, 0, 0, 1]);
    let bob = app_for(&registry, [10, 0, 0, 2]);

    let id = start(&alice).await;
    let (status, _): (_, MessageResponse) = get(&bob, &format!("/game/{id}/state")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed): (_, Vec<GameSummary>) = get(&bob, "/game/list").await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_list_most_recently_updated_first() {
    let app = app();
    let first = start(&app).await;
    let second = start(&app).await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (_, _): (_, MoveResponse) = get(&app, &format!("/game/{first}/move?x=1&y=1")).await;

    let (status, listed): (_, Vec<GameSummary>) = get(&app, "/game/list").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].game_id, first);
    assert_eq!(listed[1].game_id, second);
    assert!(listed[0].updated_at > listed[1].updated_at);
}

#[tokio::test]
async fn test_play_to_the_end() {
    let app = app();
    let id = start(&app).await;

    let mut last = None;
    for _ in 0..5 {
        let (_, state): (_, StateResponse) = get(&app, &format!("/game/{id}/state")).await;
        if !state.open {
            break;
        }
        let (x, y) = first_empty(state.board.rows()).expect("open game has an empty square");
        let (_, moved): (_, MoveResponse) =
            get(&app, &format!("/game/{id}/move?x={x}&y={y}")).await;
        assert_ne!(moved.result, TurnResult::Invalid);
        last = Some(moved);
    }

    let last = last.unwrap();
    let history = last.history.expect("finished game reports its history");
    assert!(matches!(
        last.result,
        TurnResult::HumanWon | TurnResult::ComputerWon | TurnResult::Tied
    ));
    assert_eq!(history.last().unwrap().board, last.board);

    let (_, state): (_, StateResponse) = get(&app, &format!("/game/{id}/state")).await;
    assert!(!state.open);
    assert_ne!(state.winner, "None yet");

    let (_, refused): (_, MoveResponse) = get(&app, &format!("/game/{id}/move?x=1&y=1")).await;
    assert_eq!(refused.result, TurnResult::Invalid);
}

#[tokio::test]
async fn test_demo_computer_win() {
    let app = app();
    let (status, state): (_, StateResponse) = get(&app, "/game/test/computer_win").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.winner, "O");
    assert!(!state.open);
    assert_eq!(state.history.len(), 7);

    let (_, listed): (_, Vec<GameSummary>) = get(&app, "/game/list").await;
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_demo_scripted_game() {
    let app = app();
    let (status, state): (_, StateResponse) = get(&app, "/game/test").await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.history.len() >= 3);
    assert!(state.board.row1.starts_with("X | "));
}
