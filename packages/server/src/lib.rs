//! Head-to-head music taste quiz server.
//!
//! Layers, innermost first:
//! - `domain`: rooms, quiz generation, scoring, and the traits below
//! - `usecase`: join / submit / leave coordination
//! - `infrastructure`: in-memory store, WebSocket pusher, Spotify adapters, DTOs
//! - `ui`: axum router and connection handling

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
