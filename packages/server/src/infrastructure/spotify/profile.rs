//! Spotify Web API を使った ProfileFetcher 実装
//!
//! ## 責務
//!
//! - アクセストークンで表示名・トップアーティスト・トップトラックを取得
//! - HTTP エラーやタイムアウトを `ProfileFetchError` に変換
//!
//! ## 設計ノート
//!
//! リクエストのタイムアウトは `reqwest::Client` に設定します。
//! 参加処理は部屋のロックを持たずにこの取得を待つため、遅い応答が他の部屋の操作を止めることはありません。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, de::DeserializeOwned};

use crate::domain::{AccessToken, ProfileFetchError, ProfileFetcher, ProfileSummary, TimeRange};

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";
pub const TOP_ARTISTS_LIMIT: usize = 10;
pub const TOP_TRACKS_LIMIT: usize = 15;

pub struct SpotifyProfileFetcher {
    http: reqwest::Client,
    api_base: String,
}

impl SpotifyProfileFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_api_base(DEFAULT_API_BASE.to_string(), timeout)
    }

    pub fn with_api_base(api_base: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AccessToken,
    ) -> Result<T, ProfileFetchError> {
        let url = format!("{}{}", self.api_base, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileFetchError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProfileFetchError::Decode(e.to_string()))
    }
}

fn map_request_error(error: reqwest::Error) -> ProfileFetchError {
    if error.is_timeout() {
        ProfileFetchError::Timeout
    } else {
        ProfileFetchError::Request(error.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    id: String,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Artist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Track {
    name: String,
    artists: Vec<Artist>,
}

/// `"{track} - {artist1, artist2}"`
fn track_label(track: &Track) -> String {
    let artists = track
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} - {}", track.name, artists)
}

fn build_summary(user: UserProfile, artists: Page<Artist>, tracks: Page<Track>) -> ProfileSummary {
    let display_name = user
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(user.id);

    ProfileSummary::new(
        display_name,
        artists
            .items
            .into_iter()
            .take(TOP_ARTISTS_LIMIT)
            .map(|a| a.name)
            .collect(),
        tracks
            .items
            .iter()
            .take(TOP_TRACKS_LIMIT)
            .map(track_label)
            .collect(),
    )
}

#[async_trait]
impl ProfileFetcher for SpotifyProfileFetcher {
    async fn fetch(
        &self,
        token: &AccessToken,
        time_range: TimeRange,
    ) -> Result<ProfileSummary, ProfileFetchError> {
        let range = time_range.as_provider_param();
        let artists_path = format!(
            "/me/top/artists?time_range={}&limit={}",
            range, TOP_ARTISTS_LIMIT
        );
        let tracks_path = format!(
            "/me/top/tracks?time_range={}&limit={}",
            range, TOP_TRACKS_LIMIT
        );

        let (user, artists, tracks) = tokio::try_join!(
            self.get_json::<UserProfile>("/me", token),
            self.get_json::<Page<Artist>>(&artists_path, token),
            self.get_json::<Page<Track>>(&tracks_path, token),
        )?;

        let summary = build_summary(user, artists, tracks);
        tracing::debug!(
            "Fetched profile for '{}' ({} artists, {} tracks, {})",
            summary.display_name,
            summary.top_artists.len(),
            summary.top_tracks.len(),
            range
        );
        Ok(summary)
    }
}
