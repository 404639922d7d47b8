#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use wagerarena::ArenaConfig;
use wagerarena::catalog::{GameKind, Token};
use wagerarena::choice::RawChoice;
use wagerarena::messages::{ClientMessage, ServerMessage};
use wagerarena::session::{OpponentMode, Phase};
use wagerarena::snapshot::SessionSnapshot;

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Countdown tick used by the integration tests
pub const TEST_TICK: Duration = Duration::from_millis(10);

pub struct TestServer {
    base_url: String,
}

impl TestServer {
    pub fn ws_url(&self) -> String {
        format!("{}/ws", self.base_url)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!(
            "http://{}{}",
            self.base_url.strip_prefix("ws://").unwrap(),
            path
        )
    }
}

pub async fn spawn_test_server() -> TestServer {
    spawn_test_server_with_tick(TEST_TICK).await
}

pub async fn spawn_test_server_with_tick(countdown_tick: Duration) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let app = wagerarena::app_with_config(ArenaConfig { countdown_tick });
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("ws://{}", addr),
    }
}

pub async fn connect(server: &TestServer) -> WsStream {
    let (ws, _) = connect_async(&server.ws_url()).await.expect("Failed to connect");
    ws
}

/// Connect and consume the greeting: catalog, then the lobby snapshot
pub async fn connect_to_lobby(server: &TestServer) -> WsStream {
    let mut ws = connect(server).await;
    assert!(matches!(recv(&mut ws).await, ServerMessage::Catalog(_)));
    assert_eq!(recv_state(&mut ws).await.phase, Phase::Lobby);
    ws
}

fn encode(msg: &ClientMessage) -> Message {
    let json = serde_json::to_string(msg).unwrap();
    Message::Text(json.into())
}

pub fn select_game_msg(game: GameKind) -> Message {
    encode(&ClientMessage::SelectGame { game })
}

pub fn back_msg() -> Message {
    encode(&ClientMessage::Back)
}

pub fn opponent_mode_msg(mode: OpponentMode) -> Message {
    encode(&ClientMessage::SetOpponentMode { mode })
}

pub fn wager_msg(amount: &str, token: Token) -> Message {
    encode(&ClientMessage::SetWager {
        amount: amount.to_string(),
        token,
    })
}

pub fn start_msg() -> Message {
    encode(&ClientMessage::Start)
}

pub fn submit_msg(choice: impl Into<RawChoice>) -> Message {
    encode(&ClientMessage::Submit {
        choice: choice.into(),
    })
}

pub fn rematch_msg() -> Message {
    encode(&ClientMessage::Rematch)
}

pub fn new_game_msg() -> Message {
    encode(&ClientMessage::NewGame)
}

pub async fn send(ws: &mut WsStream, msg: Message) {
    ws.send(msg).await.unwrap();
}

pub async fn recv(ws: &mut WsStream) -> ServerMessage {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Timed out waiting for a server message")
        .unwrap()
        .unwrap();
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}

pub async fn recv_state(ws: &mut WsStream) -> SessionSnapshot {
    match recv(ws).await {
        ServerMessage::State { session } => session,
        other => panic!("Expected state, got {:?}", other),
    }
}

/// Skip countdown snapshots until the session reaches `phase`
pub async fn recv_until_phase(ws: &mut WsStream, phase: Phase) -> SessionSnapshot {
    loop {
        let snapshot = recv_state(ws).await;
        if snapshot.phase == phase {
            return snapshot;
        }
    }
}

/// Drive a connected client from the lobby into a running round
pub async fn start_round(ws: &mut WsStream, game: GameKind) -> SessionSnapshot {
    send(ws, select_game_msg(game)).await;
    assert_eq!(recv_state(ws).await.phase, Phase::WagerSetup);

    send(ws, start_msg()).await;
    let snapshot = recv_state(ws).await;
    assert_eq!(snapshot.phase, Phase::Playing);
    snapshot
}
