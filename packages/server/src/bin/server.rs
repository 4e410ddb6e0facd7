//! Head-to-head music quiz server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin quizduel-server
//! cargo run --bin quizduel-server -- --host 0.0.0.0 --port 4000
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use quizduel_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
        spotify::{SpotifyAuthClient, SpotifyCredentials, SpotifyProfileFetcher},
    },
    ui::{AppState, Server},
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, SubmitAnswersUseCase,
    },
};
use quizduel_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "quizduel-server")]
#[command(about = "Head-to-head Spotify music quiz server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "4000")]
    port: u16,

    /// Spotify application client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID")]
    spotify_client_id: String,

    /// Spotify application client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    spotify_client_secret: String,

    /// OAuth redirect URI registered with Spotify (points at /callback)
    #[arg(long, env = "REDIRECT_URI")]
    redirect_uri: String,

    /// Front-end URL the browser returns to after login
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:3000")]
    frontend_url: String,

    /// Delay before game results are delivered, in milliseconds
    #[arg(long, env = "RESULT_DELAY_MS", default_value = "2000")]
    result_delay_ms: u64,

    /// Timeout for Spotify API requests, in seconds
    #[arg(long, env = "PROFILE_TIMEOUT_SECS", default_value = "10")]
    profile_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    setup_logger(&[env!("CARGO_BIN_NAME"), "tower_http"], "debug");

    let args = Args::parse();
    let timeout = Duration::from_secs(args.profile_timeout_secs);

    // 1. Repository / MessagePusher / ProfileFetcher
    let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(SystemClock)));
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let profile_fetcher = match SpotifyProfileFetcher::new(timeout) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            tracing::error!("Failed to build Spotify client: {}", e);
            std::process::exit(1);
        }
    };
    let credentials = SpotifyCredentials {
        client_id: args.spotify_client_id,
        client_secret: args.spotify_client_secret,
        redirect_uri: args.redirect_uri,
    };
    let auth_client = match SpotifyAuthClient::new(credentials, timeout) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Failed to build Spotify auth client: {}", e);
            std::process::exit(1);
        }
    };

    // 2. UseCases
    let state = AppState {
        connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
            message_pusher.clone(),
        )),
        join_room_usecase: Arc::new(JoinRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            profile_fetcher,
        )),
        submit_answers_usecase: Arc::new(SubmitAnswersUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            Duration::from_millis(args.result_delay_ms),
        )),
        disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
        get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
        auth_client,
        frontend_url: args.frontend_url,
    };

    // 3. Server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
