//! Spotify との連携
//!
//! ## 実装
//!
//! - `auth`: 認可コードフロー（ログイン URL の生成とコード交換）
//! - `profile`: `ProfileFetcher` trait の Spotify Web API 実装

pub mod auth;
pub mod profile;

pub use auth::{AuthError, SpotifyAuthClient, SpotifyCredentials, frontend_redirect_url};
pub use profile::SpotifyProfileFetcher;
