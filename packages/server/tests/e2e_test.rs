//! End-to-end tests: the real router served in-process, driven over WebSocket.
//!
//! Profiles come from a static fetcher keyed by access token, so no Spotify
//! traffic is involved. Results are delivered without delay.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use quizduel_server::{
    domain::{AccessToken, ProfileFetchError, ProfileFetcher, ProfileSummary, TimeRange},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
        spotify::{SpotifyAuthClient, SpotifyCredentials},
    },
    ui::{AppState, Server},
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, SubmitAnswersUseCase,
    },
};
use quizduel_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Latency of profile lookups for tokens prefixed with `slow-`.
const SLOW_FETCH: Duration = Duration::from_millis(800);

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Profiles keyed by access token; unknown tokens are rejected like an expired token.
/// A `slow-` prefix serves the same profile after `SLOW_FETCH`.
struct StaticProfileFetcher {
    profiles: HashMap<String, ProfileSummary>,
}

impl StaticProfileFetcher {
    fn new() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "alice-token".to_string(),
            ProfileSummary::new(
                "Alice".to_string(),
                strings(&["a", "b", "c", "d", "e", "f"]),
                strings(&["sa1", "sa2", "sa3", "sa4", "sa5"]),
            ),
        );
        profiles.insert(
            "bob-token".to_string(),
            ProfileSummary::new(
                "Bob".to_string(),
                strings(&["g", "h", "i", "j", "k", "l"]),
                strings(&["sb1", "sb2", "sb3", "sb4", "sb5"]),
            ),
        );
        profiles.insert(
            "carol-token".to_string(),
            ProfileSummary::new("Carol".to_string(), strings(&["m"]), strings(&["sc1"])),
        );
        Self { profiles }
    }
}

#[async_trait]
impl ProfileFetcher for StaticProfileFetcher {
    async fn fetch(
        &self,
        token: &AccessToken,
        _time_range: TimeRange,
    ) -> Result<ProfileSummary, ProfileFetchError> {
        let key = match token.as_str().strip_prefix("slow-") {
            Some(key) => {
                tokio::time::sleep(SLOW_FETCH).await;
                key
            }
            None => token.as_str(),
        };
        self.profiles
            .get(key)
            .cloned()
            .ok_or(ProfileFetchError::Status(401))
    }
}

/// In-process server bound to an ephemeral port
struct TestServer {
    port: u16,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(SystemClock)));
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let auth_client = SpotifyAuthClient::new(
            SpotifyCredentials {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
                redirect_uri: "http://127.0.0.1/callback".to_string(),
            },
            Duration::from_secs(1),
        )
        .unwrap();

        let state = AppState {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                message_pusher.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                Arc::new(StaticProfileFetcher::new()),
            )),
            submit_answers_usecase: Arc::new(SubmitAnswersUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                Duration::ZERO,
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
            auth_client: Arc::new(auth_client),
            frontend_url: "http://localhost:3000".to_string(),
        };

        let app = Server::new(state).router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer { port, handle }
    }

    fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// `GET /api/rooms/{room_id}`, `None` once the room is gone
    async fn room_detail(&self, room_id: &str) -> Option<Value> {
        let response = reqwest::get(self.http_url(&format!("/api/rooms/{}", room_id)))
            .await
            .unwrap();
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return None;
        }
        Some(response.json().await.unwrap())
    }

    /// Poll the room detail until `check` holds or about a second has passed
    async fn wait_for_room(&self, room_id: &str, check: impl Fn(&Value) -> bool) -> bool {
        for _ in 0..50 {
            if let Some(detail) = self.room_detail(room_id).await {
                if check(&detail) {
                    return true;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }
}

fn seated(detail: &Value) -> usize {
    detail["participants"].as_array().map_or(0, |p| p.len())
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One WebSocket participant
struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    participant_id: String,
}

impl TestClient {
    /// Connect and consume the `connected` greeting
    async fn connect(server: &TestServer) -> Self {
        let (ws, _) = connect_async(server.ws_url()).await.unwrap();
        let mut client = TestClient {
            ws,
            participant_id: String::new(),
        };
        let greeting = client.recv().await;
        assert_eq!(greeting["type"], "connected");
        client.participant_id = greeting["participantId"].as_str().unwrap().to_string();
        client
    }

    async fn send(&mut self, message: Value) {
        self.ws
            .send(Message::Text(message.to_string().into()))
            .await
            .unwrap();
    }

    async fn join(&mut self, room_id: &str, token: &str) {
        self.send(json!({
            "type": "join_room",
            "roomId": room_id,
            "accessToken": token,
        }))
        .await;
    }

    async fn submit(&mut self, room_id: &str, artists: &[&str], songs: &[&str]) {
        let user_id = self.participant_id.clone();
        self.send(json!({
            "type": "submit_answers",
            "roomId": room_id,
            "userId": user_id,
            "answers": { "artists": artists, "songs": songs },
        }))
        .await;
    }

    /// Next JSON text frame
    async fn recv(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Next JSON text frame, or `None` if nothing arrives within `wait`
    async fn try_recv(&mut self, wait: Duration) -> Option<Value> {
        loop {
            let frame = tokio::time::timeout(wait, self.ws.next()).await.ok()??.ok()?;
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).ok();
            }
        }
    }

    async fn close(mut self) {
        self.ws.close(None).await.unwrap();
    }
}

/// Two participants joined to `room_id`, both past `quiz_ready`
async fn ready_pair(server: &TestServer, room_id: &str) -> (TestClient, Value, TestClient, Value) {
    let mut alice = TestClient::connect(server).await;
    let mut bob = TestClient::connect(server).await;
    alice.join(room_id, "alice-token").await;
    bob.join(room_id, "bob-token").await;
    let alice_quiz = alice.recv().await;
    let bob_quiz = bob.recv().await;
    (alice, alice_quiz, bob, bob_quiz)
}

#[tokio::test]
async fn test_full_game() {
    // テスト項目: 2人が参加しクイズを受け取り、回答を送信して結果を受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, alice_quiz, mut bob, bob_quiz) = ready_pair(&server, "R1").await;

    // then (期待する結果): 各自が相手についての問題を受け取る
    assert_eq!(alice_quiz["type"], "quiz_ready");
    assert_eq!(alice_quiz["roomId"], "R1");
    assert_eq!(
        alice_quiz["questions"]["artists"]["question"],
        "What are Bob's top 5 artists"
    );
    assert_eq!(
        alice_quiz["questions"]["artists"]["correctAnswers"],
        json!(["g", "h", "i", "j", "k"])
    );
    let mut options: Vec<String> =
        serde_json::from_value(alice_quiz["questions"]["artists"]["options"].clone()).unwrap();
    options.sort();
    assert_eq!(options, strings(&["g", "h", "i", "j", "k", "l"]));
    assert_eq!(
        bob_quiz["questions"]["songs"]["correctAnswers"],
        json!(["sa1", "sa2", "sa3", "sa4", "sa5"])
    );
    assert_eq!(alice_quiz["users"].as_array().unwrap().len(), 2);

    // when (操作):
    alice.submit("R1", &["g", "h", "i", "j", "k"], &[]).await;
    bob.submit("R1", &["e", "d", "c", "b", "a"], &[]).await;

    // then (期待する結果): 両者に同じ結果が届く
    let alice_results = alice.recv().await;
    let bob_results = bob.recv().await;
    assert_eq!(alice_results, bob_results);
    assert_eq!(alice_results["type"], "game_results");
    assert_eq!(alice_results["scores"][alice.participant_id.as_str()], 15);
    assert_eq!(alice_results["scores"][bob.participant_id.as_str()], 7);
    assert_eq!(alice_results["winner"], "Alice");
}

#[tokio::test]
async fn test_third_participant_gets_room_full() {
    // テスト項目: 満員の部屋への3人目の参加は room_full になり、部屋は変わらない
    // given (前提条件):
    let server = TestServer::start().await;
    let (_alice, _, _bob, _) = ready_pair(&server, "R1").await;
    let mut carol = TestClient::connect(&server).await;

    // when (操作):
    carol.join("R1", "carol-token").await;

    // then (期待する結果):
    let reply = carol.recv().await;
    assert_eq!(reply["type"], "room_full");
    assert_eq!(reply["message"], "This room is already full.");

    let detail: Value = reqwest::get(server.http_url("/api/rooms/R1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["phase"], "ready");
    assert_eq!(detail["participants"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_errors_are_reported_to_sender() {
    // テスト項目: 不正なメッセージ・プロフィール取得失敗・未生成のクイズへの回答がエラーとして返される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;

    // when (操作) / then (期待する結果):
    client.send(json!({ "type": "dance" })).await;
    assert_eq!(client.recv().await["code"], "invalid_message");

    client.join("R1", "expired-token").await;
    assert_eq!(client.recv().await["code"], "profile_unavailable");

    client.submit("R1", &["a"], &[]).await;
    assert_eq!(client.recv().await["code"], "unknown_room");

    client.join("R2", "carol-token").await;
    client.submit("R2", &["a"], &[]).await;
    assert_eq!(client.recv().await["code"], "quiz_not_ready");
}

#[tokio::test]
async fn test_disconnect_closes_started_room() {
    // テスト項目: クイズ開始後に相手が切断すると、残った参加者に room_closed が届き、以降の回答も room_closed になる
    // given (前提条件):
    let server = TestServer::start().await;
    let (alice, _, mut bob, _) = ready_pair(&server, "R1").await;

    // when (操作):
    alice.close().await;

    // then (期待する結果):
    let notice = bob.recv().await;
    assert_eq!(notice["type"], "error");
    assert_eq!(notice["code"], "room_closed");
    assert!(
        server
            .wait_for_room("R1", |detail| detail["phase"] == "closed")
            .await
    );

    bob.submit("R1", &["a"], &[]).await;
    assert_eq!(bob.recv().await["code"], "room_closed");
}

#[tokio::test]
async fn test_close_during_profile_fetch_frees_the_seat() {
    // テスト項目: プロフィール取得中に切断した参加者の席は解放され、部屋は別の参加者で始められる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    alice.join("R9", "alice-token").await;
    assert!(server.wait_for_room("R9", |d| seated(d) == 1).await);

    let mut bob = TestClient::connect(&server).await;
    bob.join("R9", "slow-bob-token").await;
    assert!(server.wait_for_room("R9", |d| seated(d) == 2).await);

    // when (操作): 取得が終わる前に切断する
    bob.close().await;

    // then (期待する結果): 取得の完了を待たずに席が空き、部屋は Forming のまま
    assert!(
        server
            .wait_for_room("R9", |d| seated(d) == 1 && d["phase"] == "forming")
            .await
    );
    tokio::time::sleep(SLOW_FETCH + Duration::from_millis(200)).await;
    let detail = server.room_detail("R9").await.unwrap();
    assert_eq!(detail["phase"], "forming");
    assert_eq!(seated(&detail), 1);
    assert_eq!(detail["participants"][0]["id"], alice.participant_id.as_str());
    assert_eq!(alice.try_recv(Duration::from_millis(100)).await, None);

    let mut carol = TestClient::connect(&server).await;
    carol.join("R9", "carol-token").await;
    let alice_quiz = alice.recv().await;
    let carol_quiz = carol.recv().await;
    assert_eq!(alice_quiz["type"], "quiz_ready");
    assert_eq!(carol_quiz["type"], "quiz_ready");
    assert_eq!(
        alice_quiz["questions"]["artists"]["question"],
        "What are Carol's top 5 artists"
    );
}

#[tokio::test]
async fn test_http_endpoints() {
    // テスト項目: ヘルスチェック、部屋一覧、ログインのリダイレクト
    // given (前提条件):
    let server = TestServer::start().await;
    let _pair = ready_pair(&server, "R1").await;
    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    // when (操作):
    let health: Value = http
        .get(server.http_url("/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rooms: Value = http
        .get(server.http_url("/api/rooms"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let missing = http
        .get(server.http_url("/api/rooms/nope"))
        .send()
        .await
        .unwrap();
    let login = http.get(server.http_url("/login")).send().await.unwrap();
    let callback = http
        .get(server.http_url("/callback?error=access_denied"))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health["status"], "ok");
    assert_eq!(rooms[0]["id"], "R1");
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    assert!(login.status().is_redirection());
    let location = login.headers()["location"].to_str().unwrap();
    assert!(location.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(location.contains("client_id=test-client"));
    assert_eq!(callback.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = callback.json().await.unwrap();
    assert_eq!(body["error"], "access_denied");
}
