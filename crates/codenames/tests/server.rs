//! Integration tests for the HTTP surface and full connection flow.

use std::sync::Arc;
use std::time::Duration;

use codenames::prelude::*;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message as WsMessage;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A word source that is always down.
struct DownWords;

impl WordSource for DownWords {
    async fn fetch_words(&self, _count: usize) -> Result<Vec<String>, WordSourceError> {
        Err(WordSourceError::Fetch("service unavailable".into()))
    }
}

/// Starts a server on a random port and returns the address and the
/// server's lobby.
async fn start_server_with<W: WordSource>(
    words: W,
    room_config: RoomConfig,
) -> (String, Arc<Mutex<Lobby>>) {
    let server = CodenamesServerBuilder::new()
        .bind("127.0.0.1:0")
        .room_config(room_config)
        .build(words)
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();
    let lobby = server.lobby();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    (addr, lobby)
}

async fn start_server() -> (String, Arc<Mutex<Lobby>>) {
    start_server_with(WordList::builtin(), RoomConfig::default()).await
}

async fn create(addr: &str, query: &str) -> (u16, Value) {
    let response = reqwest::get(format!("http://{addr}/room/create?{query}"))
        .await
        .expect("request should complete");
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.expect("json body");
    (status, body)
}

async fn connect(addr: &str, query: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/room/join?{query}"))
        .await
        .expect("should connect");
    ws
}

/// Reads text frames until one is a state snapshot matching `pred`.
async fn state_where(ws: &mut ClientWs, pred: impl Fn(&Value) -> bool) -> Value {
    let wait = async {
        loop {
            let msg = ws.next().await.expect("stream ended").expect("recv");
            if let WsMessage::Text(text) = msg {
                let json: Value = serde_json::from_str(text.as_str()).expect("json frame");
                if json.get("roomId").is_some() && pred(&json) {
                    return json;
                }
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("timed out waiting for state")
}

async fn send(ws: &mut ClientWs, text: &str) {
    ws.send(WsMessage::Text(text.into())).await.expect("send");
}

// =========================================================================
// HTTP
// =========================================================================

#[tokio::test]
async fn test_root_welcomes() {
    let (addr, _lobby) = start_server().await;
    let body = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "Welcome to Codenames Backend");
}

#[tokio::test]
async fn test_create_room_success() {
    let (addr, lobby) = start_server().await;

    let (status, body) = create(&addr, "roomid=abc123&nickname=Alice&playerid=p1").await;

    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!({ "message": "Room created", "ok": true }));
    let lobby = lobby.lock().await;
    assert_eq!(lobby.room_ids(), vec![RoomId::from("abc123")]);
}

#[tokio::test]
async fn test_create_room_missing_param_is_bad_request() {
    let (addr, lobby) = start_server().await;

    let (status, body) = create(&addr, "roomid=abc123&nickname=Alice").await;

    assert_eq!(status, 400);
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Room or User is not mentioned");
    assert_eq!(lobby.lock().await.room_count(), 0);
}

#[tokio::test]
async fn test_create_room_word_source_down_is_server_error() {
    let (addr, lobby) = start_server_with(DownWords, RoomConfig::default()).await;

    let (status, body) = create(&addr, "roomid=r&nickname=Alice&playerid=p1").await;

    assert_eq!(status, 500);
    assert_eq!(body["ok"], false);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("failed to fetch words:"), "{message}");
    assert_eq!(lobby.lock().await.room_count(), 0);
}

#[tokio::test]
async fn test_create_room_duplicate_under_reject_is_conflict() {
    let config = RoomConfig {
        collision: CollisionPolicy::Reject,
        ..RoomConfig::default()
    };
    let (addr, _lobby) = start_server_with(WordList::builtin(), config).await;

    let (first, _) = create(&addr, "roomid=dup&nickname=Alice&playerid=p1").await;
    let (second, body) = create(&addr, "roomid=dup&nickname=Bob&playerid=p2").await;

    assert_eq!(first, 200);
    assert_eq!(second, 409);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_join_missing_param_is_bad_request() {
    let (addr, _lobby) = start_server().await;
    let response = reqwest::get(format!("http://{addr}/room/join?roomid=abc123"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Room or User is not mentioned");
}

// =========================================================================
// WebSocket
// =========================================================================

#[tokio::test]
async fn test_join_unknown_room_closes_with_reason() {
    let (addr, lobby) = start_server().await;
    let mut ws = connect(&addr, "roomid=zzz&nickname=Bob&playerid=p2").await;

    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out")
        .expect("stream ended")
        .expect("recv");
    match msg {
        WsMessage::Close(Some(frame)) => {
            assert_eq!(frame.reason.as_str(), ROOM_NOT_FOUND);
            assert_eq!(u16::from(frame.code), 1000);
        }
        other => panic!("expected close frame, got {other:?}"),
    }
    assert_eq!(lobby.lock().await.room_count(), 0);
}

#[tokio::test]
async fn test_join_receives_snapshot() {
    let (addr, _lobby) = start_server().await;
    create(&addr, "roomid=abc123&nickname=Alice&playerid=p1").await;

    let mut ws = connect(&addr, "roomid=abc123&nickname=Alice&playerid=p1").await;
    let state = state_where(&mut ws, |_| true).await;

    assert_eq!(state["roomId"], "abc123");
    assert_eq!(state["owner"]["id"], "p1");
    assert_eq!(state["turn"], "red");
    let cards = state["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 25);
    assert!(cards.iter().all(|c| c["label"] == "unknown"));
}

#[tokio::test]
async fn test_spymaster_and_guesser_see_different_boards() {
    let (addr, _lobby) = start_server().await;
    create(&addr, "roomid=game&nickname=Alice&playerid=p1").await;

    let mut spy = connect(&addr, "roomid=game&nickname=Alice&playerid=p1").await;
    send(&mut spy, r#"{"msgType":"join-red-spy","data":{}}"#).await;
    let spy_view = state_where(&mut spy, |s| !s["redSpy"].is_null()).await;
    assert!(spy_view["cards"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["label"] != "unknown"));

    let mut guesser = connect(&addr, "roomid=game&nickname=Bob&playerid=p2").await;
    send(&mut guesser, r#"{"msgType":"join-red","data":{}}"#).await;
    let guess_view = state_where(&mut guesser, |s| {
        s["teamRed"].as_array().is_some_and(|t| !t.is_empty())
    })
    .await;
    assert!(guess_view["cards"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["label"] == "unknown"));
    assert_eq!(guess_view["redSpy"]["id"], "p1");

    // The spymaster sees the same roster change with the answers intact.
    let spy_view = state_where(&mut spy, |s| {
        s["teamRed"].as_array().is_some_and(|t| !t.is_empty())
    })
    .await;
    assert!(spy_view["cards"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["label"] != "unknown"));
}

#[tokio::test]
async fn test_hint_and_reveal_over_the_wire() {
    let (addr, lobby) = start_server().await;
    create(&addr, "roomid=play&nickname=Alice&playerid=p1").await;
    let room = lobby.lock().await.find_room(&RoomId::from("play")).unwrap();
    let answers = room.inspect().await.unwrap().answers;
    let red = answers.iter().position(|c| c.label == Label::Red).unwrap();

    let mut ws = connect(&addr, "roomid=play&nickname=Alice&playerid=p1").await;
    send(&mut ws, r#"{"msgType":"hint","data":{"word":"fruit","count":2}}"#).await;
    state_where(&mut ws, |s| s["hint"]["word"] == "fruit").await;

    send(&mut ws, &format!(r#"{{"msgType":"card-click","data":{{"idx":{red}}}}}"#)).await;
    let state = state_where(&mut ws, |s| s["score"]["red"] == 1).await;

    assert_eq!(state["cards"][red]["label"], "red");
    assert_eq!(state["hint"]["count"], 1);
    assert_eq!(state["turn"], "red");
    let last = state["log"].as_array().unwrap().last().unwrap();
    assert_eq!(
        last["text"],
        format!("Alice clicked on {}", answers[red].name)
    );
}

#[tokio::test]
async fn test_chat_is_relayed_to_other_players() {
    let (addr, _lobby) = start_server().await;
    create(&addr, "roomid=talk&nickname=Alice&playerid=p1").await;
    let mut alice = connect(&addr, "roomid=talk&nickname=Alice&playerid=p1").await;
    state_where(&mut alice, |_| true).await;
    let mut bob = connect(&addr, "roomid=talk&nickname=Bob&playerid=p2").await;
    state_where(&mut bob, |_| true).await;

    send(&mut bob, r#"{"msgType":"chat","data":{"text":"hello"}}"#).await;

    let relayed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let msg = alice.next().await.expect("stream ended").expect("recv");
            if let WsMessage::Text(text) = msg {
                let json: Value = serde_json::from_str(text.as_str()).unwrap();
                if json["text"] == "hello" {
                    return json;
                }
            }
        }
    })
    .await
    .expect("timed out waiting for chat");
    assert_eq!(relayed["playerid"], "p2");
    assert_eq!(relayed["type"], "CHAT");
}

#[tokio::test]
async fn test_close_request_leaves_room() {
    let (addr, lobby) = start_server().await;
    create(&addr, "roomid=bye&nickname=Alice&playerid=p1").await;
    let mut ws = connect(&addr, "roomid=bye&nickname=Alice&playerid=p1").await;
    state_where(&mut ws, |_| true).await;

    send(&mut ws, "con-closed").await;

    // The server answers with a close frame once the room lets go.
    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(Ok(msg)) = ws.next().await {
            if matches!(msg, WsMessage::Close(_)) {
                return true;
            }
        }
        false
    })
    .await
    .expect("timed out waiting for close");
    assert!(closed);

    let room = lobby.lock().await.find_room(&RoomId::from("bye")).unwrap();
    let info = room.inspect().await.unwrap();
    assert_eq!(info.connections, 0);
    assert!(info.state.log.iter().any(|m| m.text == "Alice left the room"));
}
