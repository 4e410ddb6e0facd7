//! Spotify 認可コードフロー
//!
//! ## 責務
//!
//! - `/login` でリダイレクトする同意画面 URL の生成
//! - `/callback` で受け取った認可コードとアクセストークンの交換
//! - トークンを付けたフロントエンドへのリダイレクト URL の生成

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{AccessToken, ValueObjectError};

pub const DEFAULT_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";
pub const SCOPES: &str = "user-top-read user-read-recently-played";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token endpoint returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Token endpoint returned an empty access token")]
    EmptyToken(#[from] ValueObjectError),
}

/// Client credentials registered with Spotify.
#[derive(Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

pub struct SpotifyAuthClient {
    credentials: SpotifyCredentials,
    accounts_base: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl SpotifyAuthClient {
    pub fn new(credentials: SpotifyCredentials, timeout: Duration) -> Result<Self, AuthError> {
        Self::with_accounts_base(credentials, DEFAULT_ACCOUNTS_BASE.to_string(), timeout)
    }

    pub fn with_accounts_base(
        credentials: SpotifyCredentials,
        accounts_base: String,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            credentials,
            accounts_base: accounts_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// URL of the provider's consent page.
    pub fn authorize_url(&self) -> Result<Url, AuthError> {
        Url::parse_with_params(
            &format!("{}/authorize", self.accounts_base),
            &[
                ("response_type", "code"),
                ("client_id", self.credentials.client_id.as_str()),
                ("scope", SCOPES),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|e| AuthError::InvalidUrl(e.to_string()))
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_base))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token = response.json::<TokenResponse>().await?;
        Ok(AccessToken::new(token.access_token)?)
    }
}

/// Front-end URL the browser is sent back to, carrying the token.
pub fn frontend_redirect_url(frontend_url: &str, token: &AccessToken) -> Result<Url, AuthError> {
    Url::parse_with_params(frontend_url, &[("access_token", token.as_str())])
        .map_err(|e| AuthError::InvalidUrl(e.to_string()))
}
